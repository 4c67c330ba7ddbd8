use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Cannot read source file {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Source file is missing required columns: {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    #[error("Municipality directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("Line {line}: {message}")]
    RecordParse { line: u64, message: String },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Boundary file error: {0}")]
    Boundary(#[from] geojson::Error),

    #[error("Chart rendering error: {0}")]
    Render(String),

    #[error("Missing required data: {0}")]
    MissingData(String),
}

impl ReportError {
    /// File- and service-level failures abort the run; record-level ones are skipped.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ReportError::RecordParse { .. }
                | ReportError::InvalidGeometry(_)
                | ReportError::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_message_lists_columns() {
        let err = ReportError::SchemaMismatch {
            missing: vec!["centroide".to_string(), "bioma".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Source file is missing required columns: centroide, bioma"
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_record_errors_are_recoverable() {
        let err = ReportError::RecordParse {
            line: 7,
            message: "bad timestamp".to_string(),
        };
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "Line 7: bad timestamp");
        assert!(ReportError::DirectoryUnavailable("timeout".into()).is_fatal());
    }
}

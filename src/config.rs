use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, DEFAULT_CONFIG_FILE, DEFAULT_DIRECTORY_URL,
    DEFAULT_HEX_SIZE, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_BACKOFF_MS, DEFAULT_TOP_N, ENV_PREFIX,
};
use crate::writers::ChartFormat;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

/// Run settings, layered: defaults, config file, `QUEIMADAS_*` environment, CLI flags
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct Settings {
    #[validate(length(min = 1))]
    pub directory_url: String,

    #[validate(range(min = 1, max = 5))]
    pub max_attempts: u32,

    pub retry_backoff_ms: u64,

    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[validate(range(min = 1, max = 1000))]
    pub top_n: usize,

    #[validate(range(exclusive_min = 0.0, max = 90.0))]
    pub hex_size: f64,

    #[serde(default)]
    pub format: ChartFormat,

    #[validate(range(min = 200, max = 10000))]
    pub chart_width: u32,

    #[validate(range(min = 200, max = 10000))]
    pub chart_height: u32,
}

impl Settings {
    /// Load settings from `config_file` if given, otherwise from `queimadas.toml` when present
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        let settings: Settings = Self::defaults()?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        debug!(?settings, "settings loaded");
        Ok(settings)
    }

    /// Parse settings from TOML text on top of the defaults, without touching the environment
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = Self::defaults()?
            .add_source(File::from_str(content, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("directory_url", DEFAULT_DIRECTORY_URL)?
            .set_default("max_attempts", i64::from(DEFAULT_MAX_ATTEMPTS))?
            .set_default("retry_backoff_ms", DEFAULT_RETRY_BACKOFF_MS as i64)?
            .set_default("top_n", DEFAULT_TOP_N as i64)?
            .set_default("hex_size", DEFAULT_HEX_SIZE)?
            .set_default("format", "png")?
            .set_default("chart_width", i64::from(DEFAULT_CHART_WIDTH))?
            .set_default("chart_height", i64::from(DEFAULT_CHART_HEIGHT))?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            directory_url: DEFAULT_DIRECTORY_URL.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            output_dir: None,
            top_n: DEFAULT_TOP_N,
            hex_size: DEFAULT_HEX_SIZE,
            format: ChartFormat::Png,
            chart_width: DEFAULT_CHART_WIDTH,
            chart_height: DEFAULT_CHART_HEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_file() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            top_n = 5
            hex_size = 1.25
            format = "svg"
            output_dir = "charts"
            "#,
        )
        .unwrap();

        assert_eq!(settings.top_n, 5);
        assert_eq!(settings.hex_size, 1.25);
        assert_eq!(settings.format, ChartFormat::Svg);
        assert_eq!(settings.output_dir, Some(PathBuf::from("charts")));
        assert_eq!(settings.directory_url, DEFAULT_DIRECTORY_URL);
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let result = Settings::from_toml_str("max_attempts = 9");
        assert!(matches!(result, Err(ReportError::Validation(_))));

        let result = Settings::from_toml_str("hex_size = 0.0");
        assert!(matches!(result, Err(ReportError::Validation(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "chart_width = 640").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.chart_width, 640);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let result = Settings::load(Some(Path::new("/nonexistent/queimadas.toml")));
        assert!(matches!(result, Err(ReportError::Config(_))));
    }
}

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ReportError, Result};
use crate::models::Centroid;
use crate::utils::constants::{MAX_VALID_YEAR, MIN_VALID_YEAR};

/// One fire focus detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FireRecord {
    #[validate(range(min = MIN_VALID_YEAR, max = MAX_VALID_YEAR))]
    pub year: i32,

    #[validate(length(equal = 2))]
    pub state_code: String,

    pub municipality_id: u32,
    pub biome: Option<String>,
    pub detection_id: String,
    pub occurrence_id: String,
    pub timestamp: NaiveDateTime,
    pub centroid: Option<Centroid>,

    /// Filled in by the directory join
    pub municipality_name: Option<String>,
}

impl FireRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: i32,
        state_code: String,
        municipality_id: u32,
        biome: Option<String>,
        detection_id: String,
        occurrence_id: String,
        timestamp: NaiveDateTime,
        centroid: Option<Centroid>,
    ) -> Self {
        Self {
            year,
            state_code,
            municipality_id,
            biome,
            detection_id,
            occurrence_id,
            timestamp,
            centroid,
            municipality_name: None,
        }
    }

    pub fn month(&self) -> u32 {
        self.timestamp.month()
    }

    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    pub fn has_centroid(&self) -> bool {
        self.centroid.is_some()
    }

    pub fn is_resolved(&self) -> bool {
        self.municipality_name.is_some()
    }

    pub fn with_municipality_name(mut self, name: Option<String>) -> Self {
        self.municipality_name = name;
        self
    }
}

pub struct FireRecordBuilder {
    year: Option<i32>,
    state_code: Option<String>,
    municipality_id: Option<u32>,
    biome: Option<String>,
    detection_id: String,
    occurrence_id: String,
    timestamp: Option<NaiveDateTime>,
    centroid: Option<Centroid>,
    municipality_name: Option<String>,
}

impl Default for FireRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FireRecordBuilder {
    pub fn new() -> Self {
        Self {
            year: None,
            state_code: None,
            municipality_id: None,
            biome: None,
            detection_id: String::new(),
            occurrence_id: String::new(),
            timestamp: None,
            centroid: None,
            municipality_name: None,
        }
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn state_code(mut self, state_code: impl Into<String>) -> Self {
        self.state_code = Some(state_code.into());
        self
    }

    pub fn municipality_id(mut self, municipality_id: u32) -> Self {
        self.municipality_id = Some(municipality_id);
        self
    }

    pub fn biome(mut self, biome: impl Into<String>) -> Self {
        self.biome = Some(biome.into());
        self
    }

    pub fn detection_id(mut self, detection_id: impl Into<String>) -> Self {
        self.detection_id = detection_id.into();
        self
    }

    pub fn occurrence_id(mut self, occurrence_id: impl Into<String>) -> Self {
        self.occurrence_id = occurrence_id.into();
        self
    }

    pub fn timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn centroid(mut self, longitude: f64, latitude: f64) -> Self {
        self.centroid = Some(Centroid::new(longitude, latitude));
        self
    }

    pub fn municipality_name(mut self, name: impl Into<String>) -> Self {
        self.municipality_name = Some(name.into());
        self
    }

    pub fn build(self) -> Result<FireRecord> {
        let year = self
            .year
            .ok_or_else(|| ReportError::MissingData("year".to_string()))?;
        let state_code = self
            .state_code
            .ok_or_else(|| ReportError::MissingData("state_code".to_string()))?;
        let municipality_id = self
            .municipality_id
            .ok_or_else(|| ReportError::MissingData("municipality_id".to_string()))?;
        let timestamp = self
            .timestamp
            .ok_or_else(|| ReportError::MissingData("timestamp".to_string()))?;

        let record = FireRecord::new(
            year,
            state_code,
            municipality_id,
            self.biome,
            self.detection_id,
            self.occurrence_id,
            timestamp,
            self.centroid,
        )
        .with_municipality_name(self.municipality_name);

        record.validate()?;

        Ok(record)
    }
}

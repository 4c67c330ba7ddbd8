use crate::analyzers::rankings::{
    counts_by_hour, counts_by_month, counts_by_year, month_abbreviation, top_centroids,
    top_municipalities, top_n_by_group, CentroidCount, GroupCount, GroupKey, MunicipalityCount,
};
use crate::analyzers::spatial::{centroid_bounds, hexbin, HexCell};
use crate::analyzers::variance::{yearly_variance_by_state, StateVariance};
use crate::error::{ReportError, Result};
use crate::models::FireRecord;
use crate::utils::constants::{DEFAULT_HEX_SIZE, DEFAULT_TOP_N};
use chrono::NaiveDateTime;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct FireStatistics {
    pub total_records: usize,
    pub unique_states: usize,
    pub unique_municipalities: usize,
    pub unique_biomes: usize,
    pub year_range: (i32, i32),
    pub time_range: (NaiveDateTime, NaiveDateTime),
    pub located_records: usize,
    pub resolved_records: usize,
    pub geographic_bounds: Option<GeographicBounds>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeographicBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Every aggregation a full report renders, computed from one record set
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub statistics: FireStatistics,
    pub top_municipalities: Vec<MunicipalityCount>,
    pub top_states: Vec<GroupCount>,
    pub biomes: Vec<GroupCount>,
    pub by_year: Vec<(i32, usize)>,
    pub by_month: Vec<(u32, usize)>,
    pub by_hour: Vec<(u32, usize)>,
    pub state_variance: Vec<StateVariance>,
    pub top_centroids: Vec<CentroidCount>,
    pub hex_cells: Vec<HexCell>,
    pub hex_size: f64,
}

pub struct FireAnalyzer {
    top_n: usize,
    hex_size: f64,
}

impl FireAnalyzer {
    pub fn new() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            hex_size: DEFAULT_HEX_SIZE,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_hex_size(mut self, hex_size: f64) -> Self {
        self.hex_size = hex_size;
        self
    }

    pub fn analyze(&self, records: &[FireRecord]) -> Result<AnalysisReport> {
        let statistics = self.calculate_statistics(records)?;

        Ok(AnalysisReport {
            statistics,
            top_municipalities: top_municipalities(records, self.top_n),
            top_states: top_n_by_group(records, GroupKey::State, self.top_n),
            biomes: top_n_by_group(records, GroupKey::Biome, usize::MAX),
            by_year: counts_by_year(records),
            by_month: counts_by_month(records),
            by_hour: counts_by_hour(records),
            state_variance: yearly_variance_by_state(records),
            top_centroids: top_centroids(records, self.top_n),
            hex_cells: hexbin(records, self.hex_size),
            hex_size: self.hex_size,
        })
    }

    pub fn calculate_statistics(&self, records: &[FireRecord]) -> Result<FireStatistics> {
        let first = records
            .first()
            .ok_or_else(|| ReportError::MissingData("No records to analyze".to_string()))?;

        let mut states = HashSet::new();
        let mut municipalities = HashSet::new();
        let mut biomes = HashSet::new();
        let mut min_year = first.year;
        let mut max_year = first.year;
        let mut min_time = first.timestamp;
        let mut max_time = first.timestamp;
        let mut located = 0;
        let mut resolved = 0;

        for record in records {
            states.insert(record.state_code.as_str());
            municipalities.insert(record.municipality_id);
            if let Some(ref biome) = record.biome {
                biomes.insert(biome.as_str());
            }

            min_year = min_year.min(record.year);
            max_year = max_year.max(record.year);
            min_time = min_time.min(record.timestamp);
            max_time = max_time.max(record.timestamp);

            if record.has_centroid() {
                located += 1;
            }
            if record.is_resolved() {
                resolved += 1;
            }
        }

        let geographic_bounds = centroid_bounds(records).map(|rect| GeographicBounds {
            min_lat: rect.min().y,
            max_lat: rect.max().y,
            min_lon: rect.min().x,
            max_lon: rect.max().x,
        });

        Ok(FireStatistics {
            total_records: records.len(),
            unique_states: states.len(),
            unique_municipalities: municipalities.len(),
            unique_biomes: biomes.len(),
            year_range: (min_year, max_year),
            time_range: (min_time, max_time),
            located_records: located,
            resolved_records: resolved,
            geographic_bounds,
        })
    }
}

impl Default for FireAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FireStatistics {
    fn share(&self, count: usize) -> f64 {
        (count as f64 / self.total_records as f64) * 100.0
    }

    pub fn summary(&self) -> String {
        let coverage = match self.geographic_bounds {
            Some(b) => format!(
                "lat {:.2} to {:.2}, lon {:.2} to {:.2}",
                b.min_lat, b.max_lat, b.min_lon, b.max_lon
            ),
            None => "No valid centroids".to_string(),
        };

        format!(
            "Fire Occurrences: {} records\n\
            Years: {} to {}\n\
            Detections: {} to {}\n\
            States: {}, Municipalities: {}, Biomes: {}\n\
            Located: {:.1}% with valid centroid\n\
            Named: {:.1}% with resolved municipality\n\
            Coverage: {}",
            self.total_records,
            self.year_range.0,
            self.year_range.1,
            self.time_range.0,
            self.time_range.1,
            self.unique_states,
            self.unique_municipalities,
            self.unique_biomes,
            self.share(self.located_records),
            self.share(self.resolved_records),
            coverage
        )
    }
}

impl AnalysisReport {
    /// Statistics plus the head of each ranking, for terminal output
    pub fn detailed_summary(&self) -> String {
        let mut summary = self.statistics.summary();

        let push_ranking = |summary: &mut String, title: &str, rows: Vec<String>| {
            summary.push_str(&format!("\n\n{}:", title));
            if rows.is_empty() {
                summary.push_str("\n  (none)");
            }
            for (i, row) in rows.iter().enumerate() {
                summary.push_str(&format!("\n  {}. {}", i + 1, row));
            }
        };

        push_ranking(
            &mut summary,
            "Top Municipalities",
            self.top_municipalities
                .iter()
                .map(|m| format!("{}: {}", m.label, m.count))
                .collect(),
        );
        push_ranking(
            &mut summary,
            "Top States",
            self.top_states
                .iter()
                .map(|g| format!("{}: {}", g.value, g.count))
                .collect(),
        );
        push_ranking(
            &mut summary,
            "Biomes",
            self.biomes
                .iter()
                .map(|g| {
                    format!(
                        "{}: {} ({:.1}%)",
                        g.value,
                        g.count,
                        self.statistics.share(g.count)
                    )
                })
                .collect(),
        );
        push_ranking(
            &mut summary,
            "Busiest Months",
            self.by_month
                .iter()
                .take(3)
                .map(|(month, count)| format!("{}: {}", month_abbreviation(*month), count))
                .collect(),
        );
        push_ranking(
            &mut summary,
            "Busiest Hours",
            self.by_hour
                .iter()
                .take(3)
                .map(|(hour, count)| format!("{:02}h: {}", hour, count))
                .collect(),
        );
        push_ranking(
            &mut summary,
            "Yearly Variation by State",
            self.state_variance
                .iter()
                .map(|v| format!("{}: {:+}", v.state_code, v.total))
                .collect(),
        );
        push_ranking(
            &mut summary,
            "Top Centroids",
            self.top_centroids
                .iter()
                .map(|c| format!("({}): {}", c.centroid, c.count))
                .collect(),
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::{record, record_at};

    #[test]
    fn test_statistics_on_empty_input() {
        let result = FireAnalyzer::new().calculate_statistics(&[]);
        assert!(matches!(result, Err(ReportError::MissingData(_))));
    }

    #[test]
    fn test_statistics() {
        let mut named = record(2019, "PA", 1);
        named.municipality_name = Some("Alpha".to_string());
        let records = vec![
            named,
            record(2021, "MT", 2),
            record_at(2020, 9, 16, Some((-60.0, -10.0))),
            record_at(2020, 9, 16, Some((-45.0, -2.0))),
        ];

        let stats = FireAnalyzer::new().calculate_statistics(&records).unwrap();

        assert_eq!(stats.total_records, 4);
        assert_eq!(stats.year_range, (2019, 2021));
        assert_eq!(stats.unique_states, 2);
        assert_eq!(stats.located_records, 2);
        assert_eq!(stats.resolved_records, 1);

        let bounds = stats.geographic_bounds.unwrap();
        assert_eq!((bounds.min_lon, bounds.max_lat), (-60.0, -2.0));
        assert!(stats.summary().contains("Located: 50.0% with valid centroid"));
    }

    #[test]
    fn test_analyze_ranks_municipalities_by_id() {
        let records = vec![
            record(2020, "PA", 7),
            record(2020, "PA", 7),
            record(2020, "MT", 3).with_municipality_name(Some("Bom Jesus".to_string())),
            record(2020, "PI", 5).with_municipality_name(Some("Bom Jesus".to_string())),
        ];

        let report = FireAnalyzer::new().with_top_n(3).analyze(&records).unwrap();

        let labels: Vec<&str> = report
            .top_municipalities
            .iter()
            .map(|m| m.label.as_str())
            .collect();
        assert_eq!(labels, vec!["7", "Bom Jesus (MT)", "Bom Jesus (PI)"]);
        assert_eq!(report.top_municipalities[0].count, 2);
        assert_eq!(report.top_states[0].value.to_string(), "PA");
        assert!(report.detailed_summary().contains("Top States:\n  1. PA: 2"));
    }
}

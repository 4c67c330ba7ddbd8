use crate::models::{FireRecord, MunicipalityDirectory};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinReport {
    pub resolved: usize,
    pub unresolved: usize,
    /// Distinct ids the directory did not know, ascending
    pub unresolved_ids: BTreeSet<u32>,
}

impl JoinReport {
    pub fn resolved_percentage(&self) -> f64 {
        let total = self.resolved + self.unresolved;
        if total == 0 {
            0.0
        } else {
            100.0 * self.resolved as f64 / total as f64
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Municipality names resolved for {}/{} records ({:.1}%), {} unknown municipality ids",
            self.resolved,
            self.resolved + self.unresolved,
            self.resolved_percentage(),
            self.unresolved_ids.len()
        )
    }
}

/// Resolve a municipality id against a directory
pub fn resolve(municipality_id: u32, directory: &MunicipalityDirectory) -> Option<String> {
    directory.resolve(municipality_id).map(str::to_string)
}

/// Join municipality names onto the records.
///
/// Ids missing from the directory leave `municipality_name` as `None`;
/// the join itself never fails.
pub fn enrich(
    records: Vec<FireRecord>,
    directory: &MunicipalityDirectory,
) -> (Vec<FireRecord>, JoinReport) {
    let mut report = JoinReport::default();

    let enriched = records
        .into_iter()
        .map(|record| {
            let name = resolve(record.municipality_id, directory);
            if name.is_some() {
                report.resolved += 1;
            } else {
                report.unresolved += 1;
                report.unresolved_ids.insert(record.municipality_id);
            }
            record.with_municipality_name(name)
        })
        .collect();

    debug!(
        resolved = report.resolved,
        unresolved = report.unresolved,
        "municipality join complete"
    );

    (enriched, report)
}

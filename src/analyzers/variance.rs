use crate::models::FireRecord;
use std::collections::{BTreeMap, BTreeSet};

/// Count change between two consecutive observed years
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearDiff {
    pub from_year: i32,
    pub to_year: i32,
    pub diff: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateVariance {
    pub state_code: String,
    /// Only years with at least one record for the state
    pub yearly_counts: BTreeMap<i32, usize>,
    pub diffs: Vec<YearDiff>,
    pub total: i64,
}

/// Year-over-year variation of record counts per state.
///
/// The year axis is every year observed anywhere in `records`, ascending.
/// A state contributes the difference for a consecutive pair of that axis
/// only when it has records in both years; a year without records is
/// missing, not zero. States are ranked by the summed difference
/// descending, then by state code.
pub fn yearly_variance_by_state(records: &[FireRecord]) -> Vec<StateVariance> {
    let mut per_state: BTreeMap<&str, BTreeMap<i32, usize>> = BTreeMap::new();
    let mut observed_years: BTreeSet<i32> = BTreeSet::new();

    for record in records {
        observed_years.insert(record.year);
        *per_state
            .entry(record.state_code.as_str())
            .or_default()
            .entry(record.year)
            .or_default() += 1;
    }

    let year_axis: Vec<i32> = observed_years.into_iter().collect();

    let mut variances: Vec<StateVariance> = per_state
        .into_iter()
        .map(|(state_code, yearly_counts)| {
            let diffs: Vec<YearDiff> = year_axis
                .windows(2)
                .filter_map(|pair| {
                    let before = yearly_counts.get(&pair[0])?;
                    let after = yearly_counts.get(&pair[1])?;
                    Some(YearDiff {
                        from_year: pair[0],
                        to_year: pair[1],
                        diff: *after as i64 - *before as i64,
                    })
                })
                .collect();
            let total = diffs.iter().map(|d| d.diff).sum();

            StateVariance {
                state_code: state_code.to_string(),
                yearly_counts,
                diffs,
                total,
            }
        })
        .collect();

    // per_state iterates in state order, so a stable sort keeps codes ascending on ties
    variances.sort_by(|a, b| b.total.cmp(&a.total));
    variances
}

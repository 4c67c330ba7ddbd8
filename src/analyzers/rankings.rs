use crate::models::{Centroid, FireRecord};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;

/// Column a ranking groups records by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Year,
    State,
    MunicipalityId,
    MunicipalityName,
    Biome,
}

impl GroupKey {
    /// Group value of a record, `None` when the record has no value for this key
    pub fn value_of(&self, record: &FireRecord) -> Option<GroupValue> {
        match self {
            GroupKey::Year => Some(GroupValue::Int(i64::from(record.year))),
            GroupKey::State => Some(GroupValue::Text(record.state_code.clone())),
            GroupKey::MunicipalityId => Some(GroupValue::Int(i64::from(record.municipality_id))),
            GroupKey::MunicipalityName => record.municipality_name.clone().map(GroupValue::Text),
            GroupKey::Biome => record.biome.clone().map(GroupValue::Text),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GroupKey::Year => "Year",
            GroupKey::State => "State",
            GroupKey::MunicipalityId => "Municipality id",
            GroupKey::MunicipalityName => "Municipality",
            GroupKey::Biome => "Biome",
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Values within one key share a variant, so the derived order is the natural one
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupValue {
    Int(i64),
    Text(String),
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupValue::Int(value) => write!(f, "{}", value),
            GroupValue::Text(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub value: GroupValue,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CentroidCount {
    pub centroid: Centroid,
    pub count: usize,
    /// Index of the first record carrying this centroid
    pub first_seen: usize,
}

/// A municipality ranked by id, labelled for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MunicipalityCount {
    pub municipality_id: u32,
    /// `name (UF)` when the directory knew the id, the bare id otherwise
    pub label: String,
    pub count: usize,
}

/// Sort `(key, count)` pairs by count descending, then key ascending
fn rank_counts<K: Ord + Hash>(counts: HashMap<K, usize>) -> Vec<(K, usize)> {
    let mut ranked: Vec<(K, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// The `n` most frequent values of `group_key`; ties go to the smaller value
pub fn top_n_by_group(records: &[FireRecord], group_key: GroupKey, n: usize) -> Vec<GroupCount> {
    let mut counts: HashMap<GroupValue, usize> = HashMap::new();
    for value in records.iter().filter_map(|r| group_key.value_of(r)) {
        *counts.entry(value).or_default() += 1;
    }

    rank_counts(counts)
        .into_iter()
        .take(n)
        .map(|(value, count)| GroupCount { value, count })
        .collect()
}

/// The `n` municipalities with most records, grouped by id.
///
/// Names only label the entries, so homonymous municipalities stay apart
/// and unresolved ids still compete. Ties go to the smaller id.
pub fn top_municipalities(records: &[FireRecord], n: usize) -> Vec<MunicipalityCount> {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    let mut labels: HashMap<u32, String> = HashMap::new();

    for record in records {
        *counts.entry(record.municipality_id).or_default() += 1;
        if let Some(ref name) = record.municipality_name {
            labels
                .entry(record.municipality_id)
                .or_insert_with(|| format!("{} ({})", name, record.state_code));
        }
    }

    rank_counts(counts)
        .into_iter()
        .take(n)
        .map(|(municipality_id, count)| MunicipalityCount {
            municipality_id,
            label: labels
                .remove(&municipality_id)
                .unwrap_or_else(|| municipality_id.to_string()),
            count,
        })
        .collect()
}

/// Records per year, ascending year
pub fn counts_by_year(records: &[FireRecord]) -> Vec<(i32, usize)> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.year).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Records per calendar month (1-12), busiest first
pub fn counts_by_month(records: &[FireRecord]) -> Vec<(u32, usize)> {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.month()).or_default() += 1;
    }
    rank_counts(counts)
}

/// Records per hour of day (0-23), busiest first
pub fn counts_by_hour(records: &[FireRecord]) -> Vec<(u32, usize)> {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.hour()).or_default() += 1;
    }
    rank_counts(counts)
}

/// The `n` most frequent centroids; ties keep first-occurrence order
pub fn top_centroids(records: &[FireRecord], n: usize) -> Vec<CentroidCount> {
    let mut counts: HashMap<Centroid, CentroidCount> = HashMap::new();

    for (index, centroid) in records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.centroid.map(|c| (i, c)))
    {
        counts
            .entry(centroid)
            .or_insert(CentroidCount {
                centroid,
                count: 0,
                first_seen: index,
            })
            .count += 1;
    }

    let mut ranked: Vec<CentroidCount> = counts.into_values().collect();
    ranked.sort_by_key(|c| (Reverse(c.count), c.first_seen));
    ranked.truncate(n);
    ranked
}

pub fn month_abbreviation(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "?",
    }
}

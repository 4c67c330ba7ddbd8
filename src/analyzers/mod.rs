pub mod fire_analyzer;
pub mod rankings;
pub mod spatial;
pub mod variance;

pub use fire_analyzer::{AnalysisReport, FireAnalyzer, FireStatistics, GeographicBounds};
pub use rankings::{
    counts_by_hour, counts_by_month, counts_by_year, top_centroids, top_municipalities,
    top_n_by_group, CentroidCount, GroupCount, GroupKey, GroupValue, MunicipalityCount,
};
pub use spatial::{centroid_bounds, hexbin, HexCell};
pub use variance::{yearly_variance_by_state, StateVariance, YearDiff};

pub mod enrichment;
pub mod load_report;

pub use enrichment::{enrich, resolve, JoinReport};
pub use load_report::{LoadReport, SkippedRow};

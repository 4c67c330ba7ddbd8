pub mod constants;
pub mod filename;
pub mod progress;
pub mod wkt;

pub use constants::*;
pub use filename::{chart_path, generate_default_output_dir};
pub use progress::ProgressReporter;
pub use wkt::parse_wkt_point;

pub mod chart_writer;
pub mod charts;
pub mod maps;

pub use chart_writer::{Chart, ChartFormat, ChartWriter, DrawResult};
pub use charts::{BarChart, LineChart, PieChart};
pub use maps::{Boundary, HeatMap, PointMap};

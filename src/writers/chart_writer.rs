use crate::error::{ReportError, Result};
use crate::utils::constants::{DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH};
use crate::utils::filename::chart_path;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub type DrawResult<DB> =
    std::result::Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// A chart built from one aggregation result, drawable on any plotters backend
pub trait Chart {
    fn title(&self) -> &str;

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    #[default]
    Png,
    Svg,
}

impl ChartFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ChartFormat::Png => "png",
            ChartFormat::Svg => "svg",
        }
    }
}

pub struct ChartWriter {
    output_dir: PathBuf,
    format: ChartFormat,
    size: (u32, u32),
}

impl ChartWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: ChartFormat::Png,
            size: (DEFAULT_CHART_WIDTH, DEFAULT_CHART_HEIGHT),
        }
    }

    pub fn with_format(mut self, format: ChartFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render `chart` into `<output_dir>/<name>.<ext>` and return the path
    pub fn write<C: Chart>(&self, chart: &C, name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = chart_path(&self.output_dir, name, self.format.extension());

        match self.format {
            ChartFormat::Png => {
                let root = BitMapBackend::new(&path, self.size).into_drawing_area();
                render(chart, &root)?;
            }
            ChartFormat::Svg => {
                let root = SVGBackend::new(&path, self.size).into_drawing_area();
                render(chart, &root)?;
            }
        }

        info!(chart = chart.title(), path = %path.display(), "chart written");
        Ok(path)
    }
}

fn render<C: Chart, DB: DrawingBackend>(chart: &C, root: &DrawingArea<DB, Shift>) -> Result<()> {
    chart
        .draw(root)
        .and_then(|_| root.present())
        .map_err(|e| ReportError::Render(format!("{}: {}", chart.title(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_extension() {
        assert_eq!(ChartFormat::Png.extension(), "png");
        assert_eq!(ChartFormat::Svg.extension(), "svg");
        assert_eq!(ChartFormat::default(), ChartFormat::Png);
    }

    #[test]
    fn test_writer_configuration() {
        let writer = ChartWriter::new("out").with_format(ChartFormat::Svg).with_size(640, 480);
        assert_eq!(writer.output_dir(), Path::new("out"));
        assert_eq!(writer.size, (640, 480));
        assert_eq!(writer.format, ChartFormat::Svg);
    }

    mod rendering {
        use crate::analyzers::{CentroidCount, GroupCount, GroupValue, HexCell, StateVariance};
        use crate::models::Centroid;
        use crate::writers::{
            BarChart, Boundary, ChartFormat, ChartWriter, HeatMap, LineChart, PieChart, PointMap,
        };
        use pretty_assertions::assert_eq;
        use std::collections::BTreeMap;
        use std::fs;
        use std::path::{Path, PathBuf};
        use tempfile::TempDir;

        const OUTLINE: &str = r#"{"type": "Polygon", "coordinates": [[[-60.0, -15.0], [-45.0, -15.0], [-45.0, 0.0], [-60.0, -15.0]]]}"#;

        fn groups() -> Vec<GroupCount> {
            vec![
                GroupCount {
                    value: GroupValue::Text("Amazônia".into()),
                    count: 40,
                },
                GroupCount {
                    value: GroupValue::Text("Cerrado".into()),
                    count: 25,
                },
            ]
        }

        fn assert_written(path: &Path) {
            let size = fs::metadata(path).unwrap().len();
            assert!(size > 0, "{} is empty", path.display());
        }

        fn write_all(writer: &ChartWriter, empty: bool) -> Vec<PathBuf> {
            let groups = if empty { Vec::new() } else { groups() };
            let variance = if empty {
                Vec::new()
            } else {
                vec![StateVariance {
                    state_code: "PA".into(),
                    yearly_counts: BTreeMap::from([(2019, 10), (2020, 4)]),
                    diffs: Vec::new(),
                    total: -6,
                }]
            };
            let years: Vec<(i32, usize)> = if empty {
                Vec::new()
            } else {
                vec![(2019, 10), (2020, 4)]
            };
            let cells = if empty {
                Vec::new()
            } else {
                vec![HexCell {
                    q: -64,
                    r: -10,
                    center: (-50.0, -7.5),
                    count: 3,
                }]
            };
            let points = if empty {
                Vec::new()
            } else {
                vec![CentroidCount {
                    centroid: Centroid::new(-52.2, -3.2),
                    count: 2,
                    first_seen: 0,
                }]
            };
            let boundary = (!empty).then(|| Boundary::from_geojson_str(OUTLINE).unwrap());

            vec![
                writer
                    .write(&BarChart::from_groups("States", "State", &groups), "bars")
                    .unwrap(),
                writer
                    .write(&BarChart::from_state_variance("Variation", &variance), "variance")
                    .unwrap(),
                writer
                    .write(&PieChart::from_groups("Biomes", &groups, 6), "pie")
                    .unwrap(),
                writer
                    .write(&LineChart::from_years("Per year", &years), "line")
                    .unwrap(),
                writer
                    .write(
                        &HeatMap::new("Density", cells, 0.5).with_boundary(boundary.clone()),
                        "heat",
                    )
                    .unwrap(),
                writer
                    .write(
                        &PointMap::new("Centroids", points).with_boundary(boundary),
                        "points",
                    )
                    .unwrap(),
            ]
        }

        #[test]
        fn test_every_chart_renders_to_svg() {
            let temp_dir = TempDir::new().unwrap();
            let writer = ChartWriter::new(temp_dir.path().join("charts"))
                .with_format(ChartFormat::Svg)
                .with_size(640, 480);

            let paths = write_all(&writer, false);

            assert_eq!(paths.len(), 6);
            for path in &paths {
                assert_eq!(path.extension().unwrap(), "svg");
                assert_written(path);
            }
        }

        #[test]
        fn test_empty_inputs_render_titled_frames() {
            let temp_dir = TempDir::new().unwrap();
            let writer = ChartWriter::new(temp_dir.path()).with_format(ChartFormat::Svg);

            for path in write_all(&writer, true) {
                assert_written(&path);
            }
        }

        #[test]
        fn test_png_output() {
            let temp_dir = TempDir::new().unwrap();
            let writer = ChartWriter::new(temp_dir.path()).with_size(320, 240);

            let path = writer
                .write(&BarChart::from_groups("Biomes", "Biome", &groups()), "top_biomas")
                .unwrap();

            assert_eq!(path, temp_dir.path().join("top_biomas.png"));
            assert_written(&path);
        }
    }
}

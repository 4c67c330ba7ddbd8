use crate::analyzers::{CentroidCount, HexCell};
use crate::error::Result;
use crate::writers::chart_writer::{Chart, DrawResult};
use geo::{BoundingRect, MultiPoint, Point};
use geojson::{GeoJson, Geometry, Value};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::Path;
use tracing::debug;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 30);
const MAP_PADDING_DEGREES: f64 = 1.0;

/// YlOrRd stops used for the heat ramp
const HEAT_STOPS: [(u8, u8, u8); 5] = [
    (255, 255, 178),
    (254, 204, 92),
    (253, 141, 60),
    (240, 59, 32),
    (189, 0, 38),
];

/// Outline drawn under the map layers, e.g. country or state borders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Boundary {
    pub lines: Vec<Vec<(f64, f64)>>,
}

impl Boundary {
    pub fn from_geojson_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_geojson_str(&content)
    }

    pub fn from_geojson_str(content: &str) -> Result<Self> {
        let geojson: GeoJson = content.parse()?;
        let mut boundary = Boundary::default();

        match geojson {
            GeoJson::FeatureCollection(collection) => {
                for feature in collection.features {
                    if let Some(geometry) = feature.geometry {
                        boundary.add_geometry(&geometry);
                    }
                }
            }
            GeoJson::Feature(feature) => {
                if let Some(geometry) = feature.geometry {
                    boundary.add_geometry(&geometry);
                }
            }
            GeoJson::Geometry(geometry) => boundary.add_geometry(&geometry),
        }

        debug!(lines = boundary.lines.len(), "boundary loaded");
        Ok(boundary)
    }

    fn add_geometry(&mut self, geometry: &Geometry) {
        match &geometry.value {
            Value::LineString(line) => self.add_line(line),
            Value::MultiLineString(lines) | Value::Polygon(lines) => {
                lines.iter().for_each(|line| self.add_line(line))
            }
            Value::MultiPolygon(polygons) => polygons
                .iter()
                .flatten()
                .for_each(|ring| self.add_line(ring)),
            Value::GeometryCollection(geometries) => {
                geometries.iter().for_each(|g| self.add_geometry(g))
            }
            Value::Point(_) | Value::MultiPoint(_) => {}
        }
    }

    fn add_line(&mut self, positions: &[Vec<f64>]) {
        let line: Vec<(f64, f64)> = positions
            .iter()
            .filter(|p| p.len() >= 2)
            .map(|p| (p[0], p[1]))
            .collect();
        if line.len() >= 2 {
            self.lines.push(line);
        }
    }

    fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.lines.iter().flatten().copied()
    }
}

/// Linear interpolation along the heat ramp, `t` clamped to `[0, 1]`
pub fn heat_color(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (HEAT_STOPS.len() - 1) as f64;
    let index = (scaled.floor() as usize).min(HEAT_STOPS.len() - 2);
    let local = scaled - index as f64;

    let (r0, g0, b0) = HEAT_STOPS[index];
    let (r1, g1, b1) = HEAT_STOPS[index + 1];
    let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * local).round() as u8;

    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Marker radius in pixels, area proportional to the count
pub fn marker_radius(count: usize, max_count: usize) -> i32 {
    const MIN_RADIUS: f64 = 3.0;
    const MAX_RADIUS: f64 = 18.0;
    if max_count == 0 {
        return MIN_RADIUS as i32;
    }
    let ratio = (count as f64 / max_count as f64).sqrt();
    (MIN_RADIUS + (MAX_RADIUS - MIN_RADIUS) * ratio).round() as i32
}

/// Padded `(lon range, lat range)` covering every given point
pub fn map_extent<I>(points: I) -> Option<((f64, f64), (f64, f64))>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let multi: MultiPoint<f64> = points.into_iter().map(Point::from).collect();
    let rect = multi.bounding_rect()?;
    Some((
        (rect.min().x - MAP_PADDING_DEGREES, rect.max().x + MAP_PADDING_DEGREES),
        (rect.min().y - MAP_PADDING_DEGREES, rect.max().y + MAP_PADDING_DEGREES),
    ))
}

fn draw_base<'a, DB: DrawingBackend>(
    root: &'a DrawingArea<DB, Shift>,
    title: &str,
    extent: ((f64, f64), (f64, f64)),
    boundary: Option<&Boundary>,
) -> std::result::Result<
    ChartContext<'a, DB, Cartesian2d<plotters::coord::types::RangedCoordf64, plotters::coord::types::RangedCoordf64>>,
    plotters::drawing::DrawingAreaErrorKind<DB::ErrorType>,
> {
    let ((min_lon, max_lon), (min_lat, max_lat)) = extent;

    let mut chart = ChartBuilder::on(root)
        .caption(title, CAPTION_FONT)
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(min_lon..max_lon, min_lat..max_lat)?;

    chart
        .configure_mesh()
        .x_desc("Longitude")
        .y_desc("Latitude")
        .draw()?;

    if let Some(boundary) = boundary {
        chart.draw_series(
            boundary
                .lines
                .iter()
                .map(|line| PathElement::new(line.clone(), BLACK.mix(0.6).stroke_width(1))),
        )?;
    }

    Ok(chart)
}

/// Hexbin density of fire foci
#[derive(Debug, Clone, PartialEq)]
pub struct HeatMap {
    pub title: String,
    pub cells: Vec<HexCell>,
    pub cell_size: f64,
    pub boundary: Option<Boundary>,
}

impl HeatMap {
    pub fn new(title: &str, cells: Vec<HexCell>, cell_size: f64) -> Self {
        Self {
            title: title.to_string(),
            cells,
            cell_size,
            boundary: None,
        }
    }

    pub fn with_boundary(mut self, boundary: Option<Boundary>) -> Self {
        self.boundary = boundary;
        self
    }

    fn extent(&self) -> Option<((f64, f64), (f64, f64))> {
        let cells = self
            .cells
            .iter()
            .flat_map(|c| c.vertices(self.cell_size));
        let boundary = self.boundary.iter().flat_map(|b| b.points());
        map_extent(cells.chain(boundary))
    }
}

impl Chart for HeatMap {
    fn title(&self) -> &str {
        &self.title
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        let Some(extent) = self.extent() else {
            root.titled(&self.title, CAPTION_FONT)?;
            return Ok(());
        };

        let mut chart = draw_base(root, &self.title, extent, self.boundary.as_ref())?;

        let max_count = self.cells.iter().map(|c| c.count).max().unwrap_or(1);
        // Draw sparse cells first so dense ones stay on top
        chart.draw_series(self.cells.iter().rev().map(|cell| {
            let t = cell.count as f64 / max_count as f64;
            Polygon::new(
                cell.vertices(self.cell_size),
                heat_color(t).mix(0.85).filled(),
            )
        }))?;

        Ok(())
    }
}

/// Most frequent centroids, marker size by count
#[derive(Debug, Clone, PartialEq)]
pub struct PointMap {
    pub title: String,
    pub points: Vec<CentroidCount>,
    pub boundary: Option<Boundary>,
}

impl PointMap {
    pub fn new(title: &str, points: Vec<CentroidCount>) -> Self {
        Self {
            title: title.to_string(),
            points,
            boundary: None,
        }
    }

    pub fn with_boundary(mut self, boundary: Option<Boundary>) -> Self {
        self.boundary = boundary;
        self
    }

    fn extent(&self) -> Option<((f64, f64), (f64, f64))> {
        let points = self
            .points
            .iter()
            .map(|p| (p.centroid.longitude, p.centroid.latitude));
        let boundary = self.boundary.iter().flat_map(|b| b.points());
        map_extent(points.chain(boundary))
    }
}

impl Chart for PointMap {
    fn title(&self) -> &str {
        &self.title
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        let Some(extent) = self.extent() else {
            root.titled(&self.title, CAPTION_FONT)?;
            return Ok(());
        };

        let mut chart = draw_base(root, &self.title, extent, self.boundary.as_ref())?;

        let max_count = self.points.iter().map(|p| p.count).max().unwrap_or(0);
        chart.draw_series(self.points.iter().map(|p| {
            Circle::new(
                (p.centroid.longitude, p.centroid.latitude),
                marker_radius(p.count, max_count),
                RED.mix(0.55).filled(),
            )
        }))?;

        Ok(())
    }
}

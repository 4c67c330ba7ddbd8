use crate::analyzers::rankings::month_abbreviation;
use crate::analyzers::{GroupCount, MunicipalityCount, StateVariance};
use crate::utils::constants::OTHERS_LABEL;
use crate::writers::chart_writer::{Chart, DrawResult};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::f64::consts::TAU;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 30);
const LABEL_FONT: (&str, u32) = ("sans-serif", 14);

/// Vertical bars, one per ranked entry, in ranking order
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub bars: Vec<(String, i64)>,
}

impl BarChart {
    pub fn new(title: &str, x_desc: &str, y_desc: &str, bars: Vec<(String, i64)>) -> Self {
        Self {
            title: title.to_string(),
            x_desc: x_desc.to_string(),
            y_desc: y_desc.to_string(),
            bars,
        }
    }

    pub fn from_groups(title: &str, x_desc: &str, groups: &[GroupCount]) -> Self {
        let bars = groups
            .iter()
            .map(|g| (g.value.to_string(), g.count as i64))
            .collect();
        Self::new(title, x_desc, "Fire foci", bars)
    }

    pub fn from_municipalities(title: &str, municipalities: &[MunicipalityCount]) -> Self {
        let bars = municipalities
            .iter()
            .map(|m| (m.label.clone(), m.count as i64))
            .collect();
        Self::new(title, "Municipality", "Fire foci", bars)
    }

    pub fn from_months(title: &str, by_month: &[(u32, usize)]) -> Self {
        let bars = by_month
            .iter()
            .map(|&(month, count)| (month_abbreviation(month).to_string(), count as i64))
            .collect();
        Self::new(title, "Month", "Fire foci", bars)
    }

    pub fn from_hours(title: &str, by_hour: &[(u32, usize)]) -> Self {
        let bars = by_hour
            .iter()
            .map(|&(hour, count)| (format!("{:02}h", hour), count as i64))
            .collect();
        Self::new(title, "Hour of day", "Fire foci", bars)
    }

    pub fn from_state_variance(title: &str, variance: &[StateVariance]) -> Self {
        let bars = variance
            .iter()
            .map(|v| (v.state_code.clone(), v.total))
            .collect();
        Self::new(title, "State", "Summed yearly change", bars)
    }

    /// Value axis always includes zero and leaves headroom for the labels
    fn value_range(&self) -> (i64, i64) {
        let min = self.bars.iter().map(|(_, v)| *v).min().unwrap_or(0).min(0);
        let max = self.bars.iter().map(|(_, v)| *v).max().unwrap_or(0).max(0);
        let padding = ((max - min) / 10).max(1);
        let low = if min < 0 { min - padding } else { 0 };
        (low, max + padding)
    }
}

impl Chart for BarChart {
    fn title(&self) -> &str {
        &self.title
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        if self.bars.is_empty() {
            root.titled(&self.title, CAPTION_FONT)?;
            return Ok(());
        }

        let n = self.bars.len() as i32;
        let (low, high) = self.value_range();

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, CAPTION_FONT)
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d((0..n).into_segmented(), low..high)?;

        let labels = &self.bars;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(self.x_desc.as_str())
            .y_desc(self.y_desc.as_str())
            .x_labels(self.bars.len())
            .x_label_formatter(&|value| match value {
                SegmentValue::CenterOf(i) => labels
                    .get(*i as usize)
                    .map(|(label, _)| label.clone())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .draw()?;

        chart.draw_series(self.bars.iter().enumerate().map(|(i, (_, value))| {
            let color = if *value < 0 { RED } else { BLUE };
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(i as i32), 0),
                    (SegmentValue::Exact(i as i32 + 1), *value),
                ],
                color.mix(0.7).filled(),
            );
            bar.set_margin(0, 0, 6, 6);
            bar
        }))?;

        chart.draw_series(self.bars.iter().enumerate().map(|(i, (_, value))| {
            Text::new(
                value.to_string(),
                (SegmentValue::CenterOf(i as i32), *value),
                LABEL_FONT,
            )
        }))?;

        Ok(())
    }
}

/// Counts over a continuous year axis
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub points: Vec<(i32, i64)>,
}

impl LineChart {
    pub fn from_years(title: &str, by_year: &[(i32, usize)]) -> Self {
        Self {
            title: title.to_string(),
            x_desc: "Year".to_string(),
            y_desc: "Fire foci".to_string(),
            points: by_year
                .iter()
                .map(|&(year, count)| (year, count as i64))
                .collect(),
        }
    }
}

impl Chart for LineChart {
    fn title(&self) -> &str {
        &self.title
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first.0, last.0),
            _ => {
                root.titled(&self.title, CAPTION_FONT)?;
                return Ok(());
            }
        };

        let max = self.points.iter().map(|(_, v)| *v).max().unwrap_or(0);
        let y_top = max + (max / 10).max(1);

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, CAPTION_FONT)
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d((first - 1)..(last + 1), 0i64..y_top)?;

        chart
            .configure_mesh()
            .x_desc(self.x_desc.as_str())
            .y_desc(self.y_desc.as_str())
            .x_labels((last - first + 3) as usize)
            .x_label_formatter(&|year| year.to_string())
            .draw()?;

        chart.draw_series(LineSeries::new(
            self.points.iter().copied(),
            BLUE.stroke_width(2),
        ))?;
        chart.draw_series(
            self.points
                .iter()
                .map(|&point| Circle::new(point, 4, BLUE.filled())),
        )?;

        Ok(())
    }
}

/// Share of each category, small categories folded into one slice
#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<(String, usize)>,
}

impl PieChart {
    pub fn from_groups(title: &str, groups: &[GroupCount], max_slices: usize) -> Self {
        let max_slices = max_slices.max(1);
        let mut slices: Vec<(String, usize)> = groups
            .iter()
            .take(max_slices)
            .map(|g| (g.value.to_string(), g.count))
            .collect();

        let rest: usize = groups.iter().skip(max_slices).map(|g| g.count).sum();
        if rest > 0 {
            slices.push((OTHERS_LABEL.to_string(), rest));
        }

        Self {
            title: title.to_string(),
            slices,
        }
    }

    /// Fraction of the total for each slice
    pub fn shares(&self) -> Vec<f64> {
        let total: usize = self.slices.iter().map(|(_, c)| c).sum();
        if total == 0 {
            return vec![0.0; self.slices.len()];
        }
        self.slices
            .iter()
            .map(|(_, count)| *count as f64 / total as f64)
            .collect()
    }
}

/// Pixel outline of a pie slice, starting at the center
pub fn slice_polygon(center: (i32, i32), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = ((sweep.to_degrees().abs()).ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for step in 0..=steps {
        let angle = start + sweep * step as f64 / steps as f64;
        points.push((
            center.0 + (radius * angle.cos()).round() as i32,
            center.1 + (radius * angle.sin()).round() as i32,
        ));
    }
    points
}

impl Chart for PieChart {
    fn title(&self) -> &str {
        &self.title
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        let area = root.titled(&self.title, CAPTION_FONT)?;

        let (width, height) = area.dim_in_pixel();
        let center = (width as i32 / 2, height as i32 / 2);
        let radius = f64::from(width.min(height)) * 0.35;

        // Start at twelve o'clock
        let mut start = -TAU / 4.0;
        for (i, ((label, _), share)) in self.slices.iter().zip(self.shares()).enumerate() {
            if share <= 0.0 {
                continue;
            }
            let sweep = share * TAU;

            area.draw(&Polygon::new(
                slice_polygon(center, radius, start, sweep),
                Palette99::pick(i).filled(),
            ))?;

            let middle = start + sweep / 2.0;
            let label_radius = radius * 1.15;
            let position = (
                center.0 + (label_radius * middle.cos()) as i32 - 30,
                center.1 + (label_radius * middle.sin()) as i32,
            );
            area.draw(&Text::new(
                format!("{} ({:.1}%)", label, share * 100.0),
                position,
                LABEL_FONT,
            ))?;

            start += sweep;
        }

        Ok(())
    }
}

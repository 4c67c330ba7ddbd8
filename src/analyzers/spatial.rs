use crate::models::FireRecord;
use geo::{BoundingRect, MultiPoint, Point, Rect};
use std::cmp::Reverse;
use std::collections::HashMap;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// One pointy-top hexagon of a hexbin grid, in axial coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct HexCell {
    pub q: i32,
    pub r: i32,
    pub center: (f64, f64),
    pub count: usize,
}

impl HexCell {
    /// Corner points (longitude, latitude) for a cell of the given size
    pub fn vertices(&self, size: f64) -> Vec<(f64, f64)> {
        (0..6)
            .map(|i| {
                let angle = (60.0 * i as f64 - 30.0).to_radians();
                (
                    self.center.0 + size * angle.cos(),
                    self.center.1 + size * angle.sin(),
                )
            })
            .collect()
    }
}

/// Axial coordinates of the hexagon containing `(x, y)`
pub fn hex_coordinates(x: f64, y: f64, size: f64) -> (i32, i32) {
    let q = (SQRT_3 / 3.0 * x - y / 3.0) / size;
    let r = (2.0 / 3.0 * y) / size;
    cube_round(q, r)
}

/// Center of the hexagon at axial `(q, r)`
pub fn hex_center(q: i32, r: i32, size: f64) -> (f64, f64) {
    let (q, r) = (f64::from(q), f64::from(r));
    (size * SQRT_3 * (q + r / 2.0), size * 1.5 * r)
}

fn cube_round(q: f64, r: f64) -> (i32, i32) {
    let s = -q - r;
    let (mut rq, mut rr, rs) = (q.round(), r.round(), s.round());

    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }

    (rq as i32, rr as i32)
}

/// Bin record centroids into hexagons of `cell_size` degrees.
///
/// Cells are ordered by count descending, then by `(q, r)`. A non-positive
/// or non-finite size yields no cells.
pub fn hexbin(records: &[FireRecord], cell_size: f64) -> Vec<HexCell> {
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return Vec::new();
    }

    let mut counts: HashMap<(i32, i32), usize> = HashMap::new();
    for centroid in records.iter().filter_map(|r| r.centroid) {
        let cell = hex_coordinates(centroid.longitude, centroid.latitude, cell_size);
        *counts.entry(cell).or_default() += 1;
    }

    let mut cells: Vec<HexCell> = counts
        .into_iter()
        .map(|((q, r), count)| HexCell {
            q,
            r,
            center: hex_center(q, r, cell_size),
            count,
        })
        .collect();

    cells.sort_by_key(|c| (Reverse(c.count), c.q, c.r));
    cells
}

/// Bounding box of every record centroid
pub fn centroid_bounds(records: &[FireRecord]) -> Option<Rect<f64>> {
    let points: Vec<Point<f64>> = records
        .iter()
        .filter_map(|r| r.centroid.map(|c| c.point()))
        .collect();
    MultiPoint::from(points).bounding_rect()
}

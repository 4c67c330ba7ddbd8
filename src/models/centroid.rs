use crate::error::Result;
use crate::utils::wkt::{format_wkt_point, parse_wkt_point};
use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Representative location of a fire focus, in WGS84 degrees.
///
/// Two centroids are the same value only when both coordinates are
/// bit-identical, which is what counting "distinct centroids" relies on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Centroid {
    pub longitude: f64,
    pub latitude: f64,
}

impl Centroid {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn from_wkt(wkt: &str) -> Result<Self> {
        let (longitude, latitude) = parse_wkt_point(wkt)?;
        Ok(Self::new(longitude, latitude))
    }

    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }

    pub fn to_wkt(&self) -> String {
        format_wkt_point(self.longitude, self.latitude)
    }

    fn key(&self) -> (u64, u64) {
        (self.longitude.to_bits(), self.latitude.to_bits())
    }
}

impl PartialEq for Centroid {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Centroid {}

impl Hash for Centroid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl From<Centroid> for Point<f64> {
    fn from(centroid: Centroid) -> Self {
        centroid.point()
    }
}

impl fmt::Display for Centroid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_from_wkt() {
        let centroid = Centroid::from_wkt("POINT(-55.5 -11.25)").unwrap();
        assert_eq!(centroid.longitude, -55.5);
        assert_eq!(centroid.latitude, -11.25);
        assert_eq!(centroid.point().x(), -55.5);
        assert_eq!(centroid.to_wkt(), "POINT(-55.5 -11.25)");
    }

    #[test]
    fn test_distinct_values() {
        let mut seen = HashSet::new();
        seen.insert(Centroid::new(-55.5, -11.25));
        seen.insert(Centroid::new(-55.5, -11.25));
        seen.insert(Centroid::new(-55.5, -11.26));
        assert_eq!(seen.len(), 2);
    }
}

use crate::error::{ReportError, Result};

/// Parse a well-known-text point into `(longitude, latitude)`
///
/// # Examples
/// ```
/// use queimadas_report::utils::wkt::parse_wkt_point;
///
/// let (lon, lat) = parse_wkt_point("POINT(-51.35 -1.23)").unwrap();
/// assert_eq!((lon, lat), (-51.35, -1.23));
/// ```
pub fn parse_wkt_point(wkt: &str) -> Result<(f64, f64)> {
    let trimmed = wkt.trim();

    let keyword_len = "POINT".len();
    let is_point = trimmed
        .get(..keyword_len)
        .is_some_and(|keyword| keyword.eq_ignore_ascii_case("POINT"));
    if !is_point {
        return Err(ReportError::InvalidGeometry(format!(
            "Expected a POINT geometry, got: '{}'",
            wkt
        )));
    }

    let body = trimmed[keyword_len..].trim_start();
    let inner = body
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| {
            ReportError::InvalidGeometry(format!("Unbalanced parentheses in '{}'", wkt))
        })?;

    let parts: Vec<&str> = inner.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(ReportError::InvalidGeometry(format!(
            "POINT needs exactly two coordinates, got {} in '{}'",
            parts.len(),
            wkt
        )));
    }

    let longitude = parse_ordinate(parts[0], wkt)?;
    let latitude = parse_ordinate(parts[1], wkt)?;

    validate_coordinates(longitude, latitude)?;

    Ok((longitude, latitude))
}

fn parse_ordinate(value: &str, wkt: &str) -> Result<f64> {
    let parsed = value.parse::<f64>().map_err(|_| {
        ReportError::InvalidGeometry(format!("Invalid coordinate '{}' in '{}'", value, wkt))
    })?;
    if !parsed.is_finite() {
        return Err(ReportError::InvalidGeometry(format!(
            "Non-finite coordinate '{}' in '{}'",
            value, wkt
        )));
    }
    Ok(parsed)
}

/// Validate WGS84 coordinate bounds
pub fn validate_coordinates(longitude: f64, latitude: f64) -> Result<()> {
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ReportError::InvalidGeometry(format!(
            "Longitude {} is outside [-180, 180]",
            longitude
        )));
    }

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ReportError::InvalidGeometry(format!(
            "Latitude {} is outside [-90, 90]",
            latitude
        )));
    }

    Ok(())
}

/// Format a coordinate pair back into WKT
pub fn format_wkt_point(longitude: f64, latitude: f64) -> String {
    format!("POINT({} {})", longitude, latitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wkt_point() {
        assert_eq!(
            parse_wkt_point("POINT(-47.9292 -15.7801)").unwrap(),
            (-47.9292, -15.7801)
        );
        assert_eq!(
            parse_wkt_point("  point ( -60.1  -3.05 ) ").unwrap(),
            (-60.1, -3.05)
        );
    }

    #[test]
    fn test_invalid_wkt() {
        assert!(parse_wkt_point("").is_err());
        assert!(parse_wkt_point("LINESTRING(0 0, 1 1)").is_err());
        assert!(parse_wkt_point("POINT(-47.9)").is_err());
        assert!(parse_wkt_point("POINT(-47.9 abc)").is_err());
        assert!(parse_wkt_point("POINT -47.9 -15.7").is_err());
        assert!(parse_wkt_point("POINT(200 10)").is_err()); // Longitude out of range
        assert!(parse_wkt_point("POINT(NaN 10)").is_err());
    }

    #[test]
    fn test_format_round_trip() {
        let wkt = format_wkt_point(-51.5, -10.25);
        assert_eq!(wkt, "POINT(-51.5 -10.25)");
        assert_eq!(parse_wkt_point(&wkt).unwrap(), (-51.5, -10.25));
    }
}

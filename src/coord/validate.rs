use crate::error::GeoGridError;
use crate::index::constants::MIN_GRID_SIZE;

/// Checks that a latitude/longitude pair is finite and within WGS84 range.
///
/// Latitude: [-90.0, 90.0], Longitude: [-180.0, 180.0]
///
/// ```
/// use geogrid::validate_lat_lon;
///
/// assert!(validate_lat_lon(12.9716, 77.5946).is_ok());
/// assert!(validate_lat_lon(95.0, 77.5946).is_err());
/// assert!(validate_lat_lon(f64::NAN, 0.0).is_err());
/// ```
pub fn validate_lat_lon(lat: f64, lon: f64) -> Result<(), GeoGridError> {
    if !lat.is_finite() {
        return Err(GeoGridError::InvalidCoordinate(format!(
            "Latitude must be finite, got: {}",
            lat
        )));
    }

    if !lon.is_finite() {
        return Err(GeoGridError::InvalidCoordinate(format!(
            "Longitude must be finite, got: {}",
            lon
        )));
    }

    if !(-90.0..=90.0).contains(&lat) {
        return Err(GeoGridError::InvalidCoordinate(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            lat
        )));
    }

    if !(-180.0..=180.0).contains(&lon) {
        return Err(GeoGridError::InvalidCoordinate(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            lon
        )));
    }

    Ok(())
}

/// Checks that a grid size is finite and at least [`MIN_GRID_SIZE`] degrees.
pub fn validate_grid_size(grid_size: f64) -> Result<(), GeoGridError> {
    if !grid_size.is_finite() || grid_size < MIN_GRID_SIZE {
        return Err(GeoGridError::InvalidGridSize(grid_size));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_points() {
        assert!(validate_lat_lon(0.0, 0.0).is_ok());
        assert!(validate_lat_lon(90.0, 180.0).is_ok());
        assert!(validate_lat_lon(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            validate_lat_lon(90.0001, 0.0),
            Err(GeoGridError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            validate_lat_lon(0.0, -180.5),
            Err(GeoGridError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_non_finite() {
        assert!(validate_lat_lon(f64::NAN, 0.0).is_err());
        assert!(validate_lat_lon(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_grid_size() {
        assert!(validate_grid_size(0.01).is_ok());
        assert_eq!(validate_grid_size(0.0), Err(GeoGridError::InvalidGridSize(0.0)));
        assert!(validate_grid_size(-0.5).is_err());
        assert!(validate_grid_size(f64::NAN).is_err());
    }

    #[test]
    fn test_grid_size_lower_bound() {
        assert!(validate_grid_size(MIN_GRID_SIZE).is_ok());
        assert_eq!(
            validate_grid_size(1e-300),
            Err(GeoGridError::InvalidGridSize(1e-300))
        );
        assert!(validate_grid_size(f64::MIN_POSITIVE).is_err());
    }
}

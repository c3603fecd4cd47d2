use crate::coord::validate_lat_lon;
use crate::error::GeoGridError;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Converts degrees to radians. NaN and infinities pass through.
pub fn to_radians(degrees: f64) -> f64 {
    degrees * (std::f64::consts::PI / 180.0)
}

/// Great-circle distance between two points in kilometers.
///
/// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].
/// Inputs are not validated; non-finite coordinates yield NaN.
///
/// ```
/// use geogrid::haversine_distance;
///
/// let d = haversine_distance(12.9716, 77.5946, 17.385044, 78.486671);
/// assert!((d - 500.0).abs() < 1.0);
/// ```
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = to_radians(lat2 - lat1);
    let d_lon = to_radians(lon2 - lon1);

    let a = (d_lat / 2.0).sin().powi(2)
        + to_radians(lat1).cos() * to_radians(lat2).cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `a` just outside [0, 1] near antipodes.
    let a = a.clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Like [`haversine_distance`], but rejects non-finite or out-of-range coordinates.
pub fn try_haversine_distance(
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
) -> Result<f64, GeoGridError> {
    validate_lat_lon(lat1, lon1)?;
    validate_lat_lon(lat2, lon2)?;
    Ok(haversine_distance(lat1, lon1, lat2, lon2))
}

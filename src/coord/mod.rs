mod validate;

pub use validate::{validate_grid_size, validate_lat_lon};

use geo_types::Point;
use serde::{Deserialize, Serialize};

/// Trait for types that can provide a WGS84 latitude/longitude.
///
/// Implemented for `(f64, f64)` tuples in `(lon, lat)` order (the GeoJSON
/// and `geo_types` axis order), `geo_types::Point<f64>` and [`GeoPoint`].
pub trait Coordinate {
    /// Returns the latitude in decimal degrees.
    fn lat(&self) -> f64;
    /// Returns the longitude in decimal degrees.
    fn lon(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn lat(&self) -> f64 {
        self.1
    }
    fn lon(&self) -> f64 {
        self.0
    }
}

impl Coordinate for Point<f64> {
    fn lat(&self) -> f64 {
        self.y()
    }
    fn lon(&self) -> f64 {
        self.x()
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in kilometers.
    ///
    /// ```
    /// use geogrid::GeoPoint;
    ///
    /// let hyderabad = GeoPoint::new(17.385044, 78.486671);
    /// assert_eq!(hyderabad.haversine_distance(&hyderabad), 0.0);
    /// ```
    pub fn haversine_distance(&self, other: &GeoPoint) -> f64 {
        crate::geom::haversine_distance(self.lat, self.lon, other.lat, other.lon)
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl Coordinate for GeoPoint {
    fn lat(&self) -> f64 {
        self.lat
    }
    fn lon(&self) -> f64 {
        self.lon
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(p: GeoPoint) -> Self {
        Point::new(p.lon, p.lat)
    }
}

impl From<Point<f64>> for GeoPoint {
    fn from(p: Point<f64>) -> Self {
        GeoPoint::new(p.y(), p.x())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_trait_tuple_is_lon_lat() {
        let tuple = (77.5946, 12.9716);
        assert_eq!(tuple.lat(), 12.9716);
        assert_eq!(tuple.lon(), 77.5946);
    }

    #[test]
    fn test_coordinate_trait_point() {
        let point = Point::new(77.5946, 12.9716);
        assert_eq!(point.lat(), 12.9716);
        assert_eq!(point.lon(), 77.5946);
    }

    #[test]
    fn test_geopoint_point_conversion() {
        let gp = GeoPoint::new(12.9716, 77.5946);
        let pt: Point<f64> = gp.into();
        assert_eq!(pt.x(), 77.5946);
        assert_eq!(pt.y(), 12.9716);
        assert_eq!(GeoPoint::from(pt), gp);
    }

    #[test]
    fn test_geopoint_serializes_as_lat_lon() -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(&GeoPoint::new(12.975, 77.595))?;
        assert_eq!(json, r#"{"lat":12.975,"lon":77.595}"#);
        Ok(())
    }
}

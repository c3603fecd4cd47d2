use crate::coord::{Coordinate, GeoPoint};
use geo_types::{Polygon, Rect, coord};
use serde::{Deserialize, Serialize};

/// Returns true if the point lies inside the box, edges included.
///
/// The box is not validated: an inverted box (min > max) matches nothing.
///
/// ```
/// use geogrid::is_within_bounding_box;
///
/// assert!(is_within_bounding_box(12.97, 77.59, 12.0, 77.0, 13.0, 78.0));
/// assert!(!is_within_bounding_box(14.0, 77.59, 12.0, 77.0, 13.0, 78.0));
/// ```
pub fn is_within_bounding_box(
    lat: f64,
    lon: f64,
    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
) -> bool {
    lat >= min_lat && lat <= max_lat && lon >= min_lon && lon <= max_lon
}

/// An axis-aligned latitude/longitude box, inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Smallest box containing every point, or `None` for an empty slice.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let init = Self::new(first.lat, first.lon, first.lat, first.lon);
        Some(points.iter().skip(1).fold(init, |b, p| {
            Self::new(
                b.min_lat.min(p.lat),
                b.min_lon.min(p.lon),
                b.max_lat.max(p.lat),
                b.max_lon.max(p.lon),
            )
        }))
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        is_within_bounding_box(
            lat,
            lon,
            self.min_lat,
            self.min_lon,
            self.max_lat,
            self.max_lon,
        )
    }

    pub fn contains_point(&self, coord: &impl Coordinate) -> bool {
        self.contains(coord.lat(), coord.lon())
    }

    /// True when min <= max on both axes.
    pub fn is_valid(&self) -> bool {
        self.min_lat <= self.max_lat && self.min_lon <= self.max_lon
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Converts to a `geo_types::Rect` with x = longitude, y = latitude.
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_lon, y: self.min_lat },
            coord! { x: self.max_lon, y: self.max_lat },
        )
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        self.to_rect().to_polygon()
    }
}

impl From<Rect<f64>> for BoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        Self::new(rect.min().y, rect.min().x, rect.max().y, rect.max().x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inside_and_outside() {
        assert!(is_within_bounding_box(12.97, 77.59, 12.0, 77.0, 13.0, 78.0));
        assert!(!is_within_bounding_box(14.0, 77.59, 12.0, 77.0, 13.0, 78.0));
    }

    #[test]
    fn test_edges_are_inclusive() {
        let b = BoundingBox::new(12.0, 77.0, 13.0, 78.0);
        assert!(b.contains(12.0, 77.5));
        assert!(b.contains(13.0, 77.5));
        assert!(b.contains(12.5, 77.0));
        assert!(b.contains(12.5, 78.0));
        assert!(b.contains(12.0, 77.0));
        assert!(b.contains(13.0, 78.0));
    }

    #[test]
    fn test_epsilon_outside_each_edge() {
        let b = BoundingBox::new(12.0, 77.0, 13.0, 78.0);
        let eps = 1e-9;
        assert!(!b.contains(12.0 - eps, 77.5));
        assert!(!b.contains(13.0 + eps, 77.5));
        assert!(!b.contains(12.5, 77.0 - eps));
        assert!(!b.contains(12.5, 78.0 + eps));
    }

    #[test]
    fn test_inverted_box_matches_nothing() {
        let b = BoundingBox::new(13.0, 78.0, 12.0, 77.0);
        assert!(!b.is_valid());
        assert!(!b.contains(12.5, 77.5));
        assert!(!b.contains(13.0, 78.0));
    }

    #[test]
    fn test_nan_is_never_inside() {
        assert!(!is_within_bounding_box(f64::NAN, 77.5, 12.0, 77.0, 13.0, 78.0));
    }

    #[test]
    fn test_from_points() {
        let pts = vec![
            GeoPoint::new(12.9, 77.6),
            GeoPoint::new(13.1, 77.4),
            GeoPoint::new(12.95, 77.8),
        ];
        let b = BoundingBox::from_points(&pts);
        assert_eq!(b, Some(BoundingBox::new(12.9, 77.4, 13.1, 77.8)));
        assert_eq!(BoundingBox::from_points(&[]), None);
    }

    #[test]
    fn test_rect_roundtrip() {
        let b = BoundingBox::new(12.0, 77.0, 13.0, 78.0);
        let rect = b.to_rect();
        assert_eq!(rect.min().x, 77.0);
        assert_eq!(rect.min().y, 12.0);
        assert_eq!(BoundingBox::from(rect), b);
        assert_eq!(b.to_polygon().exterior().coords().count(), 5);
    }

    #[test]
    fn test_contains_point_uses_lon_lat_tuple() {
        let b = BoundingBox::new(12.0, 77.0, 13.0, 78.0);
        assert!(b.contains_point(&(77.59, 12.97)));
        assert!(!b.contains_point(&(12.97, 77.59)));
    }
}

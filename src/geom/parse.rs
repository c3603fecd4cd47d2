use crate::coord::validate_lat_lon;
use crate::error::GeoGridError;
use geo::CoordsIter;
use geo_types::{Geometry, GeometryCollection};
use geojson::GeoJson;
use std::str::FromStr;
use wkt::Wkt;

fn geometry_error(e: impl std::fmt::Display) -> GeoGridError {
    GeoGridError::GeometryParseError(e.to_string())
}

/// Rejects empty geometries and any vertex outside WGS84 lon/lat range.
fn into_wgs84(geom: Geometry<f64>) -> Result<Geometry<f64>, GeoGridError> {
    if geom.coords_count() == 0 {
        return Err(GeoGridError::GeometryParseError(
            "geometry has no coordinates".to_string(),
        ));
    }
    for c in geom.coords_iter() {
        validate_lat_lon(c.y, c.x)?;
    }
    Ok(geom)
}

/// Parses a lon/lat geometry string in WKT or GeoJSON.
///
/// GeoJSON is detected by a leading `{`, everything else is tried as WKT.
/// Coordinates are `x = longitude`, `y = latitude`; empty geometries and
/// vertices outside WGS84 range are rejected.
///
/// ```
/// use geogrid::parse_geometry;
///
/// assert!(parse_geometry("POINT(77.5946 12.9716)").is_ok());
/// assert!(parse_geometry("POINT(12.9716 977.5946)").is_err());
/// ```
pub fn parse_geometry(s: &str) -> Result<Geometry<f64>, GeoGridError> {
    let trimmed = s.trim();
    if trimmed.starts_with('{') {
        parse_geojson(trimmed)
    } else {
        parse_wkt(trimmed)
    }
}

/// Parses a GeoJSON geometry, feature or feature collection.
///
/// A feature collection becomes a `GeometryCollection` of its features'
/// geometries; features without a geometry are ignored.
pub fn parse_geojson(s: &str) -> Result<Geometry<f64>, GeoGridError> {
    let geojson: GeoJson = s.parse().map_err(|e: geojson::Error| geometry_error(e))?;

    let geom = match geojson {
        GeoJson::Geometry(g) => Geometry::try_from(g).map_err(geometry_error)?,
        GeoJson::Feature(feature) => {
            let g = feature
                .geometry
                .ok_or_else(|| geometry_error("feature has no geometry"))?;
            Geometry::try_from(g).map_err(geometry_error)?
        }
        GeoJson::FeatureCollection(fc) => {
            let parts = fc
                .features
                .into_iter()
                .filter_map(|feature| feature.geometry)
                .map(|g| Geometry::try_from(g).map_err(geometry_error))
                .collect::<Result<Vec<_>, _>>()?;
            Geometry::GeometryCollection(GeometryCollection(parts))
        }
    };

    into_wgs84(geom)
}

/// Parses a WKT geometry in lon/lat order.
pub fn parse_wkt(s: &str) -> Result<Geometry<f64>, GeoGridError> {
    let wkt = Wkt::<f64>::from_str(s).map_err(geometry_error)?;
    let geom: Geometry<f64> = wkt
        .try_into()
        .map_err(|_| geometry_error(format!("unsupported WKT geometry: {}", s)))?;
    into_wgs84(geom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geojson_point_is_lon_lat() -> Result<(), GeoGridError> {
        let json = r#"{"type":"Point","coordinates":[77.5946,12.9716]}"#;
        let Geometry::Point(pt) = parse_geometry(json)? else {
            return Err(geometry_error("expected a point"));
        };
        assert!((pt.x() - 77.5946).abs() < 1e-9);
        assert!((pt.y() - 12.9716).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_geojson_feature_route() -> Result<(), GeoGridError> {
        let json = r#"{"type":"Feature","properties":{"route":"500D"},"geometry":{"type":"LineString","coordinates":[[77.59,12.97],[77.60,12.98]]}}"#;
        let Geometry::LineString(line) = parse_geometry(json)? else {
            return Err(geometry_error("expected a line string"));
        };
        assert_eq!(line.0.len(), 2);
        Ok(())
    }

    #[test]
    fn test_feature_collection_becomes_collection() -> Result<(), GeoGridError> {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[77.59,12.97]}},
            {"type":"Feature","properties":{},"geometry":null},
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[77.20,28.61]}}
        ]}"#;
        let Geometry::GeometryCollection(gc) = parse_geometry(json)? else {
            return Err(geometry_error("expected a collection"));
        };
        assert_eq!(gc.0.len(), 2);
        Ok(())
    }

    #[test]
    fn test_empty_geometries_rejected() {
        let empty_fc = r#"{"type":"FeatureCollection","features":[]}"#;
        assert!(matches!(
            parse_geometry(empty_fc),
            Err(GeoGridError::GeometryParseError(_))
        ));
        assert!(matches!(
            parse_wkt("LINESTRING EMPTY"),
            Err(GeoGridError::GeometryParseError(_))
        ));
    }

    #[test]
    fn test_wkt_point() -> Result<(), GeoGridError> {
        let Geometry::Point(pt) = parse_geometry("  POINT(77.5946 12.9716) ")? else {
            return Err(geometry_error("expected a point"));
        };
        assert!((pt.y() - 12.9716).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_swapped_axes_rejected() {
        // lat/lon written in the wrong order puts 95.0 on the latitude axis.
        assert!(matches!(
            parse_wkt("LINESTRING(12.97 77.59, 12.98 95.0)"),
            Err(GeoGridError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            parse_geojson(r#"{"type":"Point","coordinates":[200.0,12.97]}"#),
            Err(GeoGridError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            parse_geometry("not a geometry"),
            Err(GeoGridError::GeometryParseError(_))
        ));
        assert!(parse_geometry("{not json").is_err());
    }
}

mod bbox;
mod distance;
mod parse;

pub use bbox::{BoundingBox, is_within_bounding_box};
pub use distance::{EARTH_RADIUS_KM, haversine_distance, to_radians, try_haversine_distance};
pub use parse::{parse_geojson, parse_geometry, parse_wkt};

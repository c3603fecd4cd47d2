use crate::coord::GeoPoint;
use crate::error::GeoGridError;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A coordinate that may arrive as a JSON number or a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Degrees {
    Number(f64),
    Text(String),
}

impl Degrees {
    fn value(&self) -> Result<f64, GeoGridError> {
        match self {
            Degrees::Number(v) => Ok(*v),
            Degrees::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| GeoGridError::JsonError(format!("Invalid coordinate: '{}'", s))),
        }
    }
}

#[derive(Deserialize)]
struct GpsRecord {
    latitude: Degrees,
    longitude: Degrees,
}

/// Parses a JSON array of GPS records into points.
///
/// Each record needs `latitude` and `longitude` fields, given as numbers
/// or numeric strings; other fields are ignored.
///
/// ```
/// use geogrid::parse_gps_json;
///
/// # fn main() -> Result<(), geogrid::GeoGridError> {
/// let points = parse_gps_json(r#"[{"latitude": "12.9716", "longitude": 77.5946, "speed": 30}]"#)?;
/// assert_eq!(points[0].lat, 12.9716);
/// # Ok(())
/// # }
/// ```
pub fn parse_gps_json(json: &str) -> Result<Vec<GeoPoint>, GeoGridError> {
    let records: Vec<GpsRecord> =
        serde_json::from_str(json).map_err(|e| GeoGridError::JsonError(e.to_string()))?;
    records_to_points(records)
}

/// Reads a JSON file in the [`parse_gps_json`] format.
pub fn read_gps_json(path: impl AsRef<Path>) -> Result<Vec<GeoPoint>, GeoGridError> {
    let file = File::open(path).map_err(|e| GeoGridError::IoError(e.to_string()))?;
    let records: Vec<GpsRecord> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| GeoGridError::JsonError(e.to_string()))?;
    records_to_points(records)
}

fn records_to_points(records: Vec<GpsRecord>) -> Result<Vec<GeoPoint>, GeoGridError> {
    records
        .iter()
        .map(|r| Ok(GeoPoint::new(r.latitude.value()?, r.longitude.value()?)))
        .collect()
}

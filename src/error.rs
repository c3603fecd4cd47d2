/// Error type for geogrid operations.
#[derive(Debug, PartialEq)]
pub enum GeoGridError {
    /// A latitude or longitude is non-finite or outside its valid range.
    InvalidCoordinate(String),
    /// The grid size is not a positive, finite number of degrees.
    InvalidGridSize(f64),
    /// A cell identifier could not be parsed as `"<lat>,<lon>"`.
    InvalidCellId(String),
    /// Enumerating a grid would produce more cells than allowed.
    GridTooLarge(usize),
    /// File I/O or serialization error.
    IoError(String),
    /// CSV parsing or reading error.
    CsvError(String),
    /// JSON parsing or writing error.
    JsonError(String),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    GeometryParseError(String),
    /// Two heatmaps with different grid sizes or bounds cannot be merged.
    IncompatibleHeatmaps(String),
    /// A command-line argument could not be interpreted.
    InvalidArgument(String),
}

impl std::fmt::Display for GeoGridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoGridError::InvalidCoordinate(msg) => write!(f, "Invalid coordinate: {}", msg),
            GeoGridError::InvalidGridSize(size) => write!(f, "Invalid grid size: {}", size),
            GeoGridError::InvalidCellId(id) => write!(f, "Invalid cell id: '{}'", id),
            GeoGridError::GridTooLarge(n) => write!(f, "Grid too large: {} cells", n),
            GeoGridError::IoError(msg) => write!(f, "IO error: {}", msg),
            GeoGridError::CsvError(msg) => write!(f, "CSV error: {}", msg),
            GeoGridError::JsonError(msg) => write!(f, "JSON error: {}", msg),
            GeoGridError::GeometryParseError(msg) => write!(f, "Geometry parse error: {}", msg),
            GeoGridError::IncompatibleHeatmaps(msg) => write!(f, "Incompatible heatmaps: {}", msg),
            GeoGridError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for GeoGridError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            GeoGridError::InvalidCellId("abc".to_string()).to_string(),
            "Invalid cell id: 'abc'"
        );
        assert_eq!(
            GeoGridError::InvalidGridSize(-1.0).to_string(),
            "Invalid grid size: -1"
        );
        assert_eq!(
            GeoGridError::IncompatibleHeatmaps("grid size 0.01 vs 0.1".to_string()).to_string(),
            "Incompatible heatmaps: grid size 0.01 vs 0.1"
        );
    }
}

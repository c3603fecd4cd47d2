use crate::coord::{GeoPoint, validate_lat_lon};
use crate::error::GeoGridError;
use crate::index::constants::{CELL_ID_DECIMALS, DEFAULT_GRID_SIZE, DEFAULT_HALF_CELL};
use crate::index::grid_size::GridSize;

/// Floors `coord` to the lower edge of its cell.
fn quantize(coord: f64, grid_size: f64) -> f64 {
    (coord / grid_size).floor() * grid_size
}

/// Renders one id component the way JavaScript's `toFixed(2)` does.
///
/// Non-finite values become `NaN`/`Infinity`/`-Infinity`, `-0.0` renders
/// as `0.00` and exact ties round away from zero (`0.125` -> `0.13`).
fn format_component(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let name = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return name.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    // A double sits exactly halfway between two hundredths only when it is
    // an odd multiple of 1/8; scaling by 8 is exact.
    let eighths = magnitude * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        let hundredths = (magnitude * 100.0).ceil() as u64;
        return format!("{}{}.{:02}", sign, hundredths / 100, hundredths % 100);
    }

    format!("{}{:.*}", sign, CELL_ID_DECIMALS, magnitude)
}

pub(crate) fn format_cell_id(lat: f64, lon: f64) -> String {
    format!("{},{}", format_component(lat), format_component(lon))
}

/// Quantizes a point to the id of the grid cell containing it.
///
/// Each coordinate is floored to a multiple of `grid_size` (the cell's
/// lower-left corner) and rendered with two decimals. Inputs are not
/// validated; NaN renders as `"NaN"`.
///
/// ```
/// use geogrid::get_grid_cell;
///
/// assert_eq!(get_grid_cell(12.9716, 77.5946, 0.01), "12.97,77.59");
/// assert_eq!(get_grid_cell(-0.001, -0.001, 0.01), "-0.01,-0.01");
/// ```
pub fn get_grid_cell(lat: f64, lon: f64, grid_size: f64) -> String {
    format_cell_id(quantize(lat, grid_size), quantize(lon, grid_size))
}

/// [`get_grid_cell`] at [`DEFAULT_GRID_SIZE`].
pub fn get_default_grid_cell(lat: f64, lon: f64) -> String {
    get_grid_cell(lat, lon, DEFAULT_GRID_SIZE)
}

/// Like [`get_grid_cell`], but rejects invalid coordinates and grid sizes.
pub fn try_get_grid_cell(lat: f64, lon: f64, grid_size: f64) -> Result<String, GeoGridError> {
    validate_lat_lon(lat, lon)?;
    let size = GridSize::new(grid_size)?;
    Ok(get_grid_cell(lat, lon, size.degrees()))
}

/// Splits a cell id into its `(lat, lon)` corner.
pub fn parse_cell_id(cell_id: &str) -> Result<(f64, f64), GeoGridError> {
    let invalid = || GeoGridError::InvalidCellId(cell_id.to_string());

    let (lat_str, lon_str) = cell_id.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat_str.trim().parse().map_err(|_| invalid())?;
    let lon: f64 = lon_str.trim().parse().map_err(|_| invalid())?;

    Ok((lat, lon))
}

/// Returns the center of a cell produced at the default grid size.
///
/// Adds a fixed half-cell of 0.005 degrees to each corner component. For
/// cells at any other resolution use [`get_grid_cell_center_with_size`].
///
/// ```
/// use geogrid::get_grid_cell_center;
///
/// # fn main() -> Result<(), geogrid::GeoGridError> {
/// let center = get_grid_cell_center("12.97,77.59")?;
/// assert!((center.lat - 12.975).abs() < 1e-9);
/// assert!((center.lon - 77.595).abs() < 1e-9);
/// # Ok(())
/// # }
/// ```
pub fn get_grid_cell_center(cell_id: &str) -> Result<GeoPoint, GeoGridError> {
    let (lat, lon) = parse_cell_id(cell_id)?;
    Ok(GeoPoint::new(lat + DEFAULT_HALF_CELL, lon + DEFAULT_HALF_CELL))
}

/// Returns the center of a cell produced at `grid_size`.
pub fn get_grid_cell_center_with_size(
    cell_id: &str,
    grid_size: GridSize,
) -> Result<GeoPoint, GeoGridError> {
    let (lat, lon) = parse_cell_id(cell_id)?;
    Ok(GeoPoint::new(lat + grid_size.half(), lon + grid_size.half()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_cell() {
        assert_eq!(get_grid_cell(12.9716, 77.5946, 0.01), "12.97,77.59");
        assert_eq!(get_default_grid_cell(12.9716, 77.5946), "12.97,77.59");
    }

    #[test]
    fn test_negative_coordinates_floor() {
        assert_eq!(get_grid_cell(-0.001, -0.001, 0.01), "-0.01,-0.01");
        assert_eq!(get_grid_cell(-12.345, -77.001, 0.01), "-12.35,-77.01");
    }

    #[test]
    fn test_zero_and_negative_zero() {
        assert_eq!(get_grid_cell(0.0, 0.0, 0.01), "0.00,0.00");
        assert_eq!(get_grid_cell(-0.0, -0.0, 0.01), "0.00,0.00");
        assert_eq!(get_grid_cell(1e-9, 1e-9, 0.01), "0.00,0.00");
    }

    #[test]
    fn test_exact_ties_round_away_from_zero() {
        assert_eq!(get_grid_cell(0.125, -0.125, 0.125), "0.13,-0.13");
        assert_eq!(get_grid_cell(0.375, 1.125, 0.125), "0.38,1.13");
        assert_eq!(get_grid_cell(-2.625, 0.25, 0.125), "-2.63,0.25");
        // 0.005 is not exactly representable and sits below the tie.
        assert_eq!(format_component(0.005), "0.01");
        assert_eq!(format_component(1.005), "1.00");
    }

    #[test]
    fn test_infinite_components() {
        assert_eq!(
            get_grid_cell(f64::INFINITY, f64::NEG_INFINITY, 0.01),
            "Infinity,-Infinity"
        );
        assert_eq!(format_component(-0.0), "0.00");
    }

    #[test]
    fn test_same_bucket_same_id() {
        let a = get_grid_cell(12.9716, 77.5946, 0.01);
        let b = get_grid_cell(12.9750, 77.5990, 0.01);
        let c = get_grid_cell(12.9799, 77.5901, 0.01);
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_ne!(a, get_grid_cell(12.9816, 77.5946, 0.01));
    }

    #[test]
    fn test_coarser_grid() {
        assert_eq!(get_grid_cell(12.9716, 77.5946, 0.1), "12.90,77.50");
        assert_eq!(get_grid_cell(12.9716, 77.5946, 1.0), "12.00,77.00");
    }

    #[test]
    fn test_permissive_nan() {
        assert_eq!(get_grid_cell(f64::NAN, 77.5, 0.01), "NaN,77.50");
    }

    #[test]
    fn test_strict_variant() -> Result<(), GeoGridError> {
        assert_eq!(try_get_grid_cell(12.9716, 77.5946, 0.01)?, "12.97,77.59");
        assert!(try_get_grid_cell(f64::NAN, 0.0, 0.01).is_err());
        assert!(try_get_grid_cell(0.0, 190.0, 0.01).is_err());
        assert!(matches!(
            try_get_grid_cell(0.0, 0.0, 0.0),
            Err(GeoGridError::InvalidGridSize(_))
        ));
        Ok(())
    }

    #[test]
    fn test_center_within_one_cell_of_origin() -> Result<(), GeoGridError> {
        let points = [
            (12.9716, 77.5946),
            (17.385044, 78.486671),
            (-33.8688, 151.2093),
            (-0.001, -0.001),
            (51.5074, -0.1278),
        ];
        for (lat, lon) in points {
            let center = get_grid_cell_center(&get_default_grid_cell(lat, lon))?;
            assert!((center.lat - lat).abs() <= DEFAULT_GRID_SIZE);
            assert!((center.lon - lon).abs() <= DEFAULT_GRID_SIZE);
        }
        Ok(())
    }

    #[test]
    fn test_center_with_size() -> Result<(), GeoGridError> {
        let size = GridSize::new(0.1)?;
        let id = get_grid_cell(12.9716, 77.5946, size.degrees());
        let center = get_grid_cell_center_with_size(&id, size)?;
        assert!((center.lat - 12.95).abs() < 1e-9);
        assert!((center.lon - 77.55).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_parse_cell_id() -> Result<(), GeoGridError> {
        assert_eq!(parse_cell_id("12.97,77.59")?, (12.97, 77.59));
        assert_eq!(parse_cell_id("-0.01, -0.01")?, (-0.01, -0.01));
        Ok(())
    }

    #[test]
    fn test_malformed_cell_ids() {
        for id in ["", "12.97", "12.97;77.59", "abc,77.59", "12.97,77.59,1.0"] {
            assert_eq!(
                get_grid_cell_center(id),
                Err(GeoGridError::InvalidCellId(id.to_string()))
            );
        }
    }
}

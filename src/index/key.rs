use crate::coord::{GeoPoint, validate_lat_lon};
use crate::error::GeoGridError;
use crate::index::grid_size::GridSize;
use crate::index::identifier::{format_cell_id, parse_cell_id};
use serde::{Deserialize, Serialize};

/// Largest magnitude at which every integer is exactly representable in `f64`.
const MAX_EXACT_INDEX: f64 = 9_007_199_254_740_992.0;

/// Converts an already floored/rounded `coord / grid_size` into an index.
fn to_index(scaled: f64) -> Option<i64> {
    (scaled.is_finite() && scaled.abs() <= MAX_EXACT_INDEX).then_some(scaled as i64)
}

/// Integer row/column of a cell: `floor(coord / grid_size)` on each axis.
///
/// A cheap hashable key for aggregation. It only has meaning together with
/// the [`GridSize`] it was computed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    pub lat_idx: i64,
    pub lon_idx: i64,
}

impl CellKey {
    pub fn new(lat_idx: i64, lon_idx: i64) -> Self {
        Self { lat_idx, lon_idx }
    }

    /// Key of the cell containing `(lat, lon)`.
    ///
    /// ```
    /// use geogrid::{CellKey, GridSize};
    ///
    /// # fn main() -> Result<(), geogrid::GeoGridError> {
    /// let key = CellKey::from_lat_lon(12.9716, 77.5946, GridSize::default())?;
    /// assert_eq!(key, CellKey::new(1297, 7759));
    /// assert_eq!(key.to_cell_id(GridSize::default()), "12.97,77.59");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_lat_lon(lat: f64, lon: f64, grid_size: GridSize) -> Result<Self, GeoGridError> {
        validate_lat_lon(lat, lon)?;
        let size = grid_size.degrees();
        match (to_index((lat / size).floor()), to_index((lon / size).floor())) {
            (Some(lat_idx), Some(lon_idx)) => Ok(Self { lat_idx, lon_idx }),
            _ => Err(GeoGridError::InvalidGridSize(size)),
        }
    }

    /// Recovers a key from a cell id rendered at `grid_size`.
    ///
    /// Ids carry two decimals, so grid sizes finer than 0.01 cannot be
    /// recovered exactly.
    pub fn from_cell_id(cell_id: &str, grid_size: GridSize) -> Result<Self, GeoGridError> {
        let (lat, lon) = parse_cell_id(cell_id)?;
        let size = grid_size.degrees();
        match (to_index((lat / size).round()), to_index((lon / size).round())) {
            (Some(lat_idx), Some(lon_idx)) => Ok(Self { lat_idx, lon_idx }),
            _ => Err(GeoGridError::InvalidCellId(cell_id.to_string())),
        }
    }

    /// Lower-left corner of the cell.
    pub fn lower_left(&self, grid_size: GridSize) -> GeoPoint {
        let size = grid_size.degrees();
        GeoPoint::new(self.lat_idx as f64 * size, self.lon_idx as f64 * size)
    }

    pub fn center(&self, grid_size: GridSize) -> GeoPoint {
        let corner = self.lower_left(grid_size);
        GeoPoint::new(corner.lat + grid_size.half(), corner.lon + grid_size.half())
    }

    pub fn to_cell_id(&self, grid_size: GridSize) -> String {
        let corner = self.lower_left(grid_size);
        format_cell_id(corner.lat, corner.lon)
    }
}

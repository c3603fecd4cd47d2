/// Default cell edge in degrees (~1.1 km of latitude).
pub const DEFAULT_GRID_SIZE: f64 = 0.01;

/// Smallest accepted cell edge in degrees (~0.1 mm).
///
/// Keeps every cell index of a WGS84 coordinate well inside `i64`.
pub const MIN_GRID_SIZE: f64 = 1e-9;

/// Half-cell offset assumed by [`get_grid_cell_center`](crate::get_grid_cell_center).
///
/// Only correct for cells produced at [`DEFAULT_GRID_SIZE`].
pub const DEFAULT_HALF_CELL: f64 = 0.005;

/// Decimal places used when rendering a cell id component.
pub const CELL_ID_DECIMALS: usize = 2;

/// Upper bound on the number of cells a [`CellGrid`](crate::CellGrid) will enumerate.
pub const MAX_GRID_CELLS: usize = 4_000_000;

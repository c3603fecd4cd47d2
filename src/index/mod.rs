pub mod constants;
mod grid_size;
mod identifier;
mod key;

pub use constants::{
    CELL_ID_DECIMALS, DEFAULT_GRID_SIZE, DEFAULT_HALF_CELL, MAX_GRID_CELLS, MIN_GRID_SIZE,
};
pub use grid_size::GridSize;
pub use identifier::{
    get_default_grid_cell, get_grid_cell, get_grid_cell_center, get_grid_cell_center_with_size,
    parse_cell_id, try_get_grid_cell,
};
pub use key::CellKey;

//! # geogrid-rs
//!
//! Grid-based geospatial indexing for traffic heatmaps. Points are bucketed
//! into square latitude/longitude cells, identified by the lower-left corner
//! rendered as `"<lat>,<lon>"` with two decimals.
//!
//! ### 1. Free functions
//!
//! ```
//! use geogrid::{get_grid_cell, get_grid_cell_center, haversine_distance, is_within_bounding_box};
//!
//! # fn main() -> Result<(), geogrid::GeoGridError> {
//! let id = get_grid_cell(12.9716, 77.5946, 0.01);
//! assert_eq!(id, "12.97,77.59");
//!
//! let center = get_grid_cell_center(&id)?;
//! let km = haversine_distance(12.9716, 77.5946, center.lat, center.lon);
//! assert!(km < 1.0);
//!
//! assert!(is_within_bounding_box(12.97, 77.59, 12.0, 77.0, 13.0, 78.0));
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `GridCell` and `CellGrid`
//!
//! ```
//! use geogrid::{BoundingBox, CellGrid, GridCell, GridSize};
//!
//! # fn main() -> Result<(), geogrid::GeoGridError> {
//! let size = GridSize::new(0.05)?;
//! let cell = GridCell::from_lat_lon(28.6139, 77.2090, size)?;
//! let polygon = cell.to_polygon();
//!
//! let grid = CellGrid::from_bounding_box(&BoundingBox::new(28.5, 77.0, 28.8, 77.3), size)?;
//! assert!(grid.get_cell_at(28.6139, 77.2090).is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `Heatmap` - Point Aggregation
//!
//! ```no_run
//! use geogrid::{CsvCellConfig, GridSize, Heatmap, csv_to_heatmap, read_gps_json};
//!
//! let points = read_gps_json("gps.json").unwrap();
//! let mut heatmap = Heatmap::new(GridSize::default());
//! heatmap.add_points(&points);
//! println!("{}", heatmap.to_json().unwrap());
//!
//! let config = CsvCellConfig::from_coords("pickup_lat", "pickup_long");
//! let pickups = csv_to_heatmap("rides.csv", &config).unwrap();
//! pickups.to_geoparquet("pickups.parquet").unwrap();
//! ```
//!

pub mod cell;
pub mod coord;
pub mod error;
pub mod geom;
pub mod grid;
pub mod heatmap;
pub mod index;
pub mod io;

pub use cell::GridCell;
pub use coord::{Coordinate, GeoPoint, validate_grid_size, validate_lat_lon};
pub use error::GeoGridError;
pub use geom::{
    BoundingBox, EARTH_RADIUS_KM, haversine_distance, is_within_bounding_box, parse_geojson,
    parse_geometry, parse_wkt, to_radians, try_haversine_distance,
};
pub use grid::{CellGrid, CellGridBuilder};
pub use heatmap::{Heatmap, HeatmapBin};
pub use index::{
    CELL_ID_DECIMALS, CellKey, DEFAULT_GRID_SIZE, DEFAULT_HALF_CELL, GridSize, MAX_GRID_CELLS,
    MIN_GRID_SIZE, get_default_grid_cell, get_grid_cell, get_grid_cell_center, get_grid_cell_center_with_size,
    parse_cell_id, try_get_grid_cell,
};
pub use io::{
    CoordinateSource, CsvCellConfig, CsvToCells, GeometryFormat, GridCellsToArrow,
    GridCellsToGeoParquet, csv_to_cell_csv, csv_to_heatmap, parse_gps_json, read_gps_json,
    write_geoparquet,
};

pub use geo_types;
pub use geoarrow_array;
pub use geoarrow_schema;
pub use geoparquet;

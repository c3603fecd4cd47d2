pub mod arrow;
pub mod csv;
pub mod json;
pub mod parquet;

pub use self::arrow::GridCellsToArrow;
pub use self::csv::{
    CoordinateSource, CsvCellConfig, CsvToCells, GeometryFormat, csv_to_cell_csv, csv_to_heatmap,
};
pub use self::json::{parse_gps_json, read_gps_json};
pub use self::parquet::{GridCellsToGeoParquet, write_geoparquet};

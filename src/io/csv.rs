use crate::cell::GridCell;
use crate::error::GeoGridError;
use crate::geom::{BoundingBox, parse_geometry};
use crate::heatmap::Heatmap;
use crate::index::GridSize;
use csv::StringRecord;
use log::{info, warn};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

enum SourceIndices {
    Geometry(usize),
    Coordinates { lat_idx: usize, lon_idx: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    /// Well-Known Text format (e.g., "POLYGON((...))")
    Wkt,
    /// GeoJSON format
    GeoJson,
}

#[derive(Debug, Clone)]
pub enum CoordinateSource {
    /// A single column containing WKT or GeoJSON geometry (x = lon, y = lat)
    GeometryColumn(String),
    /// Separate latitude and longitude columns
    CoordinateColumns { lat_column: String, lon_column: String },
}

#[derive(Debug, Clone)]
pub struct CsvCellConfig {
    pub source: CoordinateSource,
    pub exclude_columns: Vec<String>,
    pub grid_size: GridSize,
    pub include_cell_geometry: Option<GeometryFormat>,
    pub bounds: Option<BoundingBox>,
    pub skip_invalid_rows: bool,
}

impl CsvCellConfig {
    /// Create config for a CSV with a geometry column (WKT or GeoJSON).
    ///
    /// # Example
    /// ```
    /// use geogrid::CsvCellConfig;
    ///
    /// let config = CsvCellConfig::new("geometry");
    /// ```
    pub fn new(geometry_column: impl Into<String>) -> Self {
        Self {
            source: CoordinateSource::GeometryColumn(geometry_column.into()),
            exclude_columns: Vec::new(),
            grid_size: GridSize::default(),
            include_cell_geometry: None,
            bounds: None,
            skip_invalid_rows: false,
        }
    }

    /// Create config for a CSV with separate latitude/longitude columns.
    ///
    /// # Example
    /// ```
    /// use geogrid::{CsvCellConfig, GridSize};
    ///
    /// # fn main() -> Result<(), geogrid::GeoGridError> {
    /// let config = CsvCellConfig::from_coords("pickup_lat", "pickup_long")
    ///     .grid_size(GridSize::new(0.05)?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_coords(lat_column: impl Into<String>, lon_column: impl Into<String>) -> Self {
        Self {
            source: CoordinateSource::CoordinateColumns {
                lat_column: lat_column.into(),
                lon_column: lon_column.into(),
            },
            ..Self::new(String::new())
        }
    }

    pub fn exclude(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    pub fn grid_size(mut self, grid_size: GridSize) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Include cell polygon geometry in output.
    pub fn with_cell_geometry(mut self, format: GeometryFormat) -> Self {
        self.include_cell_geometry = Some(format);
        self
    }

    /// Only keep points inside `bounds` when building a heatmap.
    pub fn bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Log and drop rows that fail to parse instead of aborting.
    pub fn skip_invalid_rows(mut self, skip: bool) -> Self {
        self.skip_invalid_rows = skip;
        self
    }
}

pub trait CsvToCells {
    fn to_cell_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvCellConfig,
    ) -> Result<(), GeoGridError>;

    fn to_heatmap(&self, config: &CsvCellConfig) -> Result<Heatmap, GeoGridError>;
}

impl<P: AsRef<Path>> CsvToCells for P {
    fn to_cell_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvCellConfig,
    ) -> Result<(), GeoGridError> {
        csv_to_cell_csv(self, output_path, config)
    }

    fn to_heatmap(&self, config: &CsvCellConfig) -> Result<Heatmap, GeoGridError> {
        csv_to_heatmap(self, config)
    }
}

fn polygon_to_wkt(polygon: &geo_types::Polygon<f64>) -> String {
    use wkt::ToWkt;
    polygon.wkt_string()
}

fn polygon_to_geojson(polygon: &geo_types::Polygon<f64>) -> String {
    let geom = geojson::Geometry::from(polygon);
    geom.to_string()
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize, GeoGridError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| GeoGridError::CsvError(format!("Column '{}' not found", name)))
}

fn resolve_source(
    headers: &StringRecord,
    source: &CoordinateSource,
) -> Result<(SourceIndices, HashSet<usize>), GeoGridError> {
    match source {
        CoordinateSource::GeometryColumn(col) => {
            let idx = column_index(headers, col)?;
            Ok((SourceIndices::Geometry(idx), HashSet::from([idx])))
        }
        CoordinateSource::CoordinateColumns {
            lat_column,
            lon_column,
        } => {
            let lat_idx = column_index(headers, lat_column)?;
            let lon_idx = column_index(headers, lon_column)?;
            Ok((
                SourceIndices::Coordinates { lat_idx, lon_idx },
                HashSet::from([lat_idx, lon_idx]),
            ))
        }
    }
}

fn parse_number(record: &StringRecord, idx: usize, what: &str) -> Result<f64, GeoGridError> {
    let raw = record
        .get(idx)
        .ok_or_else(|| GeoGridError::CsvError(format!("Missing {} column at index {}", what, idx)))?
        .trim();
    raw.parse()
        .map_err(|_| GeoGridError::CsvError(format!("Invalid {}: '{}'", what, raw)))
}

fn record_to_cells(
    record: &StringRecord,
    source: &SourceIndices,
    grid_size: GridSize,
) -> Result<Vec<GridCell>, GeoGridError> {
    match source {
        SourceIndices::Geometry(idx) => {
            let geom_str = record.get(*idx).ok_or_else(|| {
                GeoGridError::CsvError(format!("Missing geometry column at index {}", idx))
            })?;
            let geom = parse_geometry(geom_str)?;
            GridCell::from_geometry(geom, grid_size)
        }
        SourceIndices::Coordinates { lat_idx, lon_idx } => {
            let lat = parse_number(record, *lat_idx, "latitude")?;
            let lon = parse_number(record, *lon_idx, "longitude")?;
            Ok(vec![GridCell::from_lat_lon(lat, lon, grid_size)?])
        }
    }
}

/// Converts a CSV file with geometry or coordinate columns to a CSV file with cell ids.
///
/// Streams output to minimize memory usage for large files. The output
/// starts with `cell_id` (and `cell_geometry` when requested), followed by
/// every input column that is not a source or excluded column. Rows whose
/// geometry spans several cells are written once per cell.
///
/// # Example
///
/// ```no_run
/// use geogrid::{csv_to_cell_csv, CsvCellConfig, GeometryFormat};
///
/// let config = CsvCellConfig::from_coords("pickup_lat", "pickup_long")
///     .exclude(vec!["user_id".into()])
///     .with_cell_geometry(GeometryFormat::Wkt);
///
/// csv_to_cell_csv("rides.csv", "rides_cells.csv", &config).unwrap();
/// ```
pub fn csv_to_cell_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CsvCellConfig,
) -> Result<(), GeoGridError> {
    let file = File::open(csv_path).map_err(|e| GeoGridError::IoError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| GeoGridError::CsvError(e.to_string()))?
        .clone();

    let (source_indices, mut exclude_indices) = resolve_source(&headers, &config.source)?;

    for col_name in &config.exclude_columns {
        if let Some(idx) = headers.iter().position(|h| h == col_name) {
            exclude_indices.insert(idx);
        }
    }

    let out_file = File::create(output_path).map_err(|e| GeoGridError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = vec!["cell_id"];
    if config.include_cell_geometry.is_some() {
        header_row.push("cell_geometry");
    }
    for (i, h) in headers.iter().enumerate() {
        if !exclude_indices.contains(&i) {
            header_row.push(h);
        }
    }
    writer
        .write_record(&header_row)
        .map_err(|e| GeoGridError::CsvError(e.to_string()))?;

    let mut written = 0usize;
    let mut dropped = 0usize;

    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| GeoGridError::CsvError(e.to_string()))?;

        let cells = match record_to_cells(&record, &source_indices, config.grid_size) {
            Ok(cells) => cells,
            Err(e) if config.skip_invalid_rows => {
                warn!("dropping row {}: {}", line + 1, e);
                dropped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        for cell in cells {
            let mut row: Vec<String> = vec![cell.id.clone()];

            if let Some(format) = config.include_cell_geometry {
                let polygon = cell.to_polygon();
                let geom_str = match format {
                    GeometryFormat::Wkt => polygon_to_wkt(&polygon),
                    GeometryFormat::GeoJson => polygon_to_geojson(&polygon),
                };
                row.push(geom_str);
            }

            for (i, field) in record.iter().enumerate() {
                if !exclude_indices.contains(&i) {
                    row.push(field.to_string());
                }
            }
            writer
                .write_record(&row)
                .map_err(|e| GeoGridError::CsvError(e.to_string()))?;
            written += 1;
        }
    }

    writer
        .flush()
        .map_err(|e| GeoGridError::CsvError(e.to_string()))?;

    info!("wrote {} cell rows ({} input rows dropped)", written, dropped);
    Ok(())
}

// Coordinate rows count as raw points, so invalid or out-of-bounds values are
// tallied by the heatmap instead of failing the row.
fn add_record_to_heatmap(
    heatmap: &mut Heatmap,
    record: &StringRecord,
    source: &SourceIndices,
) -> Result<(), GeoGridError> {
    match source {
        SourceIndices::Coordinates { lat_idx, lon_idx } => {
            let lat = parse_number(record, *lat_idx, "latitude")?;
            let lon = parse_number(record, *lon_idx, "longitude")?;
            heatmap.add_point(lat, lon);
        }
        SourceIndices::Geometry(_) => {
            for cell in record_to_cells(record, source, heatmap.grid_size())? {
                heatmap.add_point(cell.lat(), cell.lon());
            }
        }
    }
    Ok(())
}

/// Aggregates the points of a CSV file into a [`Heatmap`].
///
/// Coordinate rows are counted like [`Heatmap::add_point`]. For geometry
/// rows every cell produced counts once, so a line adds one to each cell it
/// crosses.
///
/// # Example
///
/// ```no_run
/// use geogrid::{csv_to_heatmap, CsvCellConfig};
///
/// let config = CsvCellConfig::from_coords("latitude", "longitude").skip_invalid_rows(true);
/// let heatmap = csv_to_heatmap("gps_pings.csv", &config).unwrap();
/// println!("{}", heatmap.to_json().unwrap());
/// ```
pub fn csv_to_heatmap(
    csv_path: impl AsRef<Path>,
    config: &CsvCellConfig,
) -> Result<Heatmap, GeoGridError> {
    let file = File::open(csv_path).map_err(|e| GeoGridError::IoError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| GeoGridError::CsvError(e.to_string()))?
        .clone();
    let (source_indices, _) = resolve_source(&headers, &config.source)?;

    let mut heatmap = Heatmap::new(config.grid_size);
    if let Some(bounds) = config.bounds {
        heatmap = heatmap.with_bounds(bounds);
    }

    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| GeoGridError::CsvError(e.to_string()))?;

        if let Err(e) = add_record_to_heatmap(&mut heatmap, &record, &source_indices) {
            if !config.skip_invalid_rows {
                return Err(e);
            }
            warn!("dropping row {}: {}", line + 1, e);
        }
    }

    info!(
        "built heatmap with {} cells from {} points",
        heatmap.len(),
        heatmap.total_points()
    );
    Ok(heatmap)
}

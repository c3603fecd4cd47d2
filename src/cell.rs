use crate::coord::{Coordinate, GeoPoint, validate_lat_lon};
use crate::error::GeoGridError;
use crate::geom::BoundingBox;
use crate::index::{CellKey, GridSize};
use crate::io::arrow::GridCellsToArrow;
use crate::io::parquet::GridCellsToGeoParquet;
use arrow_array::RecordBatch;
use geo::Centroid;
use geo_types::{Geometry, LineString, Point, Polygon};
use geoarrow_array::array::{PointArray, PolygonArray};
use std::collections::HashSet;
use std::path::Path;

/// A single square cell of a lat/lon grid.
///
/// Unlike a bare cell id string, a `GridCell` carries the grid size it was
/// built at, so its center and polygon are correct at any resolution.
///
/// # Example
///
/// ```
/// use geogrid::{GridCell, GridSize};
///
/// # fn main() -> Result<(), geogrid::GeoGridError> {
/// let cell = GridCell::from_lat_lon(12.9716, 77.5946, GridSize::default())?;
/// assert_eq!(cell.id, "12.97,77.59");
/// println!("Center: ({}, {})", cell.lat(), cell.lon());
///
/// let polygon = cell.to_polygon();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    /// Cell id, `"<lat>,<lon>"` of the lower-left corner with two decimals
    pub id: String,
    /// Integer grid position
    pub key: CellKey,
    /// Edge length the cell was quantized at
    pub grid_size: GridSize,
    /// Center point, x = longitude, y = latitude
    pub center: Point<f64>,
}

impl GridCell {
    pub(crate) fn from_key(key: CellKey, grid_size: GridSize) -> Self {
        Self {
            id: key.to_cell_id(grid_size),
            key,
            grid_size,
            center: key.center(grid_size).into(),
        }
    }

    /// Create a GridCell containing a latitude/longitude.
    pub fn from_lat_lon(lat: f64, lon: f64, grid_size: GridSize) -> Result<Self, GeoGridError> {
        let key = CellKey::from_lat_lon(lat, lon, grid_size)?;
        Ok(Self::from_key(key, grid_size))
    }

    /// Create a GridCell from any [`Coordinate`].
    ///
    /// # Example
    /// ```
    /// use geogrid::{GridCell, GridSize};
    /// use geo_types::Point;
    ///
    /// # fn main() -> Result<(), geogrid::GeoGridError> {
    /// // Tuples are (lon, lat)
    /// let a = GridCell::from_coord(&(77.5946, 12.9716), GridSize::default())?;
    /// let b = GridCell::from_coord(&Point::new(77.5946, 12.9716), GridSize::default())?;
    /// assert_eq!(a, b);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_coord(coord: &impl Coordinate, grid_size: GridSize) -> Result<Self, GeoGridError> {
        Self::from_lat_lon(coord.lat(), coord.lon(), grid_size)
    }

    /// Create a GridCell from a cell id rendered at `grid_size`.
    pub fn from_cell_id(id: &str, grid_size: GridSize) -> Result<Self, GeoGridError> {
        let key = CellKey::from_cell_id(id, grid_size)?;
        Ok(Self::from_key(key, grid_size))
    }

    /// Create GridCells along a LineString (x = lon, y = lat).
    ///
    /// Samples each segment at half-cell steps and returns the unique cells
    /// touched, in order of first visit.
    pub fn from_line_string(line: &LineString, grid_size: GridSize) -> Result<Vec<Self>, GeoGridError> {
        for vertex in &line.0 {
            validate_lat_lon(vertex.y, vertex.x)?;
        }
        let step_size = grid_size.half();

        let mut seen: HashSet<CellKey> = HashSet::with_capacity(line.0.len());
        let mut cells: Vec<GridCell> = Vec::with_capacity(line.0.len());

        if let [only] = line.0.as_slice() {
            cells.push(Self::from_lat_lon(only.y, only.x, grid_size)?);
            return Ok(cells);
        }

        for window in line.0.windows(2) {
            let start = &window[0];
            let end = &window[1];

            let dx = end.x - start.x;
            let dy = end.y - start.y;
            let segment_length = (dx * dx + dy * dy).sqrt();
            let steps = (segment_length / step_size).ceil() as usize;

            for i in 0..=steps {
                let t = if steps == 0 {
                    0.0
                } else {
                    i as f64 / steps as f64
                };
                let lon = start.x + t * dx;
                let lat = start.y + t * dy;

                let key = CellKey::from_lat_lon(lat, lon, grid_size)?;
                if seen.insert(key) {
                    cells.push(Self::from_key(key, grid_size));
                }
            }
        }

        Ok(cells)
    }

    /// Create GridCells from an arbitrary `geo_types::Geometry`.
    ///
    /// Points and polygon centroids produce a single cell; lines and
    /// collections may produce many.
    pub fn from_geometry(geom: Geometry<f64>, grid_size: GridSize) -> Result<Vec<Self>, GeoGridError> {
        match geom {
            Geometry::Point(pt) => Ok(vec![Self::from_coord(&pt, grid_size)?]),
            Geometry::MultiPoint(mp) => mp
                .0
                .iter()
                .map(|pt| Self::from_coord(pt, grid_size))
                .collect(),
            Geometry::Line(line) => Self::from_line_string(&line.into(), grid_size),
            Geometry::LineString(line) => Self::from_line_string(&line, grid_size),
            Geometry::MultiLineString(mls) => {
                let mut all_cells = Vec::new();
                for line in mls.0 {
                    all_cells.extend(Self::from_line_string(&line, grid_size)?);
                }
                Ok(all_cells)
            }
            Geometry::Polygon(poly) => match poly.centroid() {
                Some(centroid) => Ok(vec![Self::from_coord(&centroid, grid_size)?]),
                None => Ok(vec![]),
            },
            Geometry::MultiPolygon(mp) => {
                let mut cells = Vec::new();
                for poly in mp.0 {
                    if let Some(centroid) = poly.centroid() {
                        cells.push(Self::from_coord(&centroid, grid_size)?);
                    }
                }
                Ok(cells)
            }
            Geometry::GeometryCollection(gc) => {
                let mut all_cells = Vec::new();
                for g in gc.0 {
                    all_cells.extend(Self::from_geometry(g, grid_size)?);
                }
                Ok(all_cells)
            }
            _ => Err(GeoGridError::GeometryParseError(
                "Unsupported geometry type".to_string(),
            )),
        }
    }

    /// Latitude of the cell center.
    pub fn lat(&self) -> f64 {
        self.center.y()
    }

    /// Longitude of the cell center.
    pub fn lon(&self) -> f64 {
        self.center.x()
    }

    pub fn center_point(&self) -> GeoPoint {
        GeoPoint::from(self.center)
    }

    pub fn lower_left(&self) -> GeoPoint {
        self.key.lower_left(self.grid_size)
    }

    pub fn to_bounding_box(&self) -> BoundingBox {
        let corner = self.lower_left();
        let size = self.grid_size.degrees();
        BoundingBox::new(corner.lat, corner.lon, corner.lat + size, corner.lon + size)
    }

    /// Converts this cell to a square polygon (x = lon, y = lat).
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.to_bounding_box().to_polygon()
    }

    /// Converts this cell's center to an Arrow PointArray.
    pub fn to_arrow_points(&self) -> PointArray {
        std::slice::from_ref(self).to_arrow_points()
    }

    /// Converts this cell to an Arrow PolygonArray.
    pub fn to_arrow_polygons(&self) -> PolygonArray {
        std::slice::from_ref(self).to_arrow_polygons()
    }

    /// Converts this cell to an Arrow RecordBatch with all attributes.
    pub fn to_record_batch(&self) -> Result<RecordBatch, GeoGridError> {
        std::slice::from_ref(self).to_record_batch()
    }

    /// Writes this cell to a GeoParquet file.
    pub fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), GeoGridError> {
        std::slice::from_ref(self).to_geoparquet(path)
    }
}

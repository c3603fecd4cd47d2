use crate::cell::GridCell;
use crate::error::GeoGridError;
use crate::geom::BoundingBox;
use crate::index::{CellKey, GridSize, MAX_GRID_CELLS};
use geo_types::{Polygon, Rect};

/// Every grid cell overlapping a bounding box, in row-major order
/// (south to north, then west to east).
#[derive(Debug, Clone)]
pub struct CellGrid {
    cells: Vec<GridCell>,
    grid_size: GridSize,
}

impl CellGrid {
    pub fn builder() -> CellGridBuilder {
        CellGridBuilder::new()
    }

    /// Enumerates the cells covering `bbox`.
    ///
    /// An inverted box yields an empty grid.
    ///
    /// ```
    /// use geogrid::{BoundingBox, CellGrid, GridSize};
    ///
    /// # fn main() -> Result<(), geogrid::GeoGridError> {
    /// let bbox = BoundingBox::new(12.90, 77.50, 12.95, 77.55);
    /// let grid = CellGrid::from_bounding_box(&bbox, GridSize::default())?;
    /// assert_eq!(grid.len(), 36);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_bounding_box(bbox: &BoundingBox, grid_size: GridSize) -> Result<Self, GeoGridError> {
        let cells = generate_cells_for_bbox(bbox, grid_size)?;
        Ok(Self { cells, grid_size })
    }

    pub fn from_extent(
        min_lat: f64,
        min_lon: f64,
        max_lat: f64,
        max_lon: f64,
        grid_size: GridSize,
    ) -> Result<Self, GeoGridError> {
        Self::from_bounding_box(&BoundingBox::new(min_lat, min_lon, max_lat, max_lon), grid_size)
    }

    /// Builds a grid from a `geo_types::Rect` with x = lon, y = lat.
    pub fn from_rect(rect: &Rect<f64>, grid_size: GridSize) -> Result<Self, GeoGridError> {
        Self::from_bounding_box(&BoundingBox::from(*rect), grid_size)
    }

    pub fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter()
    }

    /// The cell containing `(lat, lon)`, if it is part of this grid.
    pub fn get_cell_at(&self, lat: f64, lon: f64) -> Option<&GridCell> {
        let key = CellKey::from_lat_lon(lat, lon, self.grid_size).ok()?;
        self.cells
            .binary_search_by_key(&key, |cell| cell.key)
            .ok()
            .map(|idx| &self.cells[idx])
    }

    pub fn to_polygons(&self) -> Vec<Polygon<f64>> {
        self.cells.iter().map(|cell| cell.to_polygon()).collect()
    }

    pub fn filter<F>(&self, predicate: F) -> Vec<&GridCell>
    where
        F: Fn(&GridCell) -> bool,
    {
        self.cells.iter().filter(|cell| predicate(cell)).collect()
    }
}

#[derive(Debug, Default)]
pub struct CellGridBuilder {
    grid_size: Option<GridSize>,
    bbox: Option<BoundingBox>,
}

impl CellGridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid_size(mut self, grid_size: GridSize) -> Self {
        self.grid_size = Some(grid_size);
        self
    }

    pub fn extent(mut self, min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        self.bbox = Some(BoundingBox::new(min_lat, min_lon, max_lat, max_lon));
        self
    }

    pub fn bounding_box(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn rect(mut self, rect: &Rect<f64>) -> Self {
        self.bbox = Some(BoundingBox::from(*rect));
        self
    }

    /// Builds the grid. The grid size defaults to 0.01 degrees; the extent
    /// is required.
    pub fn build(self) -> Result<CellGrid, GeoGridError> {
        let bbox = self.bbox.ok_or_else(|| {
            GeoGridError::InvalidCoordinate("extent must be set".to_string())
        })?;
        CellGrid::from_bounding_box(&bbox, self.grid_size.unwrap_or_default())
    }
}

fn generate_cells_for_bbox(
    bbox: &BoundingBox,
    grid_size: GridSize,
) -> Result<Vec<GridCell>, GeoGridError> {
    if !bbox.is_valid() {
        return Ok(Vec::new());
    }

    let ll = CellKey::from_lat_lon(bbox.min_lat, bbox.min_lon, grid_size)?;
    let ur = CellKey::from_lat_lon(bbox.max_lat, bbox.max_lon, grid_size)?;

    let span = |lo: i64, hi: i64| {
        hi.checked_sub(lo)
            .and_then(|d| d.checked_add(1))
            .and_then(|n| usize::try_from(n).ok())
    };
    let (Some(rows), Some(cols)) = (span(ll.lat_idx, ur.lat_idx), span(ll.lon_idx, ur.lon_idx))
    else {
        return Err(GeoGridError::GridTooLarge(usize::MAX));
    };
    let total = rows.saturating_mul(cols);
    if total > MAX_GRID_CELLS {
        return Err(GeoGridError::GridTooLarge(total));
    }

    let mut cells = Vec::with_capacity(total);
    for lat_idx in ll.lat_idx..=ur.lat_idx {
        for lon_idx in ll.lon_idx..=ur.lon_idx {
            cells.push(GridCell::from_key(CellKey::new(lat_idx, lon_idx), grid_size));
        }
    }

    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::coord;

    #[test]
    fn test_grid_from_extent() -> Result<(), GeoGridError> {
        let grid = CellGrid::from_extent(12.90, 77.50, 12.95, 77.55, GridSize::default())?;
        assert_eq!(grid.len(), 36);
        assert_eq!(grid.grid_size(), GridSize::default());
        assert_eq!(grid.cells()[0].id, "12.90,77.50");
        Ok(())
    }

    #[test]
    fn test_grid_from_rect() -> Result<(), GeoGridError> {
        let rect = Rect::new(coord! { x: 77.50, y: 12.90 }, coord! { x: 77.55, y: 12.95 });
        let grid = CellGrid::from_rect(&rect, GridSize::default())?;
        assert!(!grid.is_empty());
        Ok(())
    }

    #[test]
    fn test_grid_builder() -> Result<(), GeoGridError> {
        let grid = CellGrid::builder()
            .grid_size(GridSize::new(0.1)?)
            .extent(12.0, 77.0, 12.95, 77.95)
            .build()?;
        assert_eq!(grid.len(), 100);

        assert!(CellGrid::builder().build().is_err());
        Ok(())
    }

    #[test]
    fn test_inverted_box_is_empty() -> Result<(), GeoGridError> {
        let grid = CellGrid::from_extent(13.0, 78.0, 12.0, 77.0, GridSize::default())?;
        assert!(grid.is_empty());
        Ok(())
    }

    #[test]
    fn test_too_large() -> Result<(), GeoGridError> {
        let result = CellGrid::from_extent(-90.0, -180.0, 90.0, 180.0, GridSize::new(0.001)?);
        assert!(matches!(result, Err(GeoGridError::GridTooLarge(_))));
        Ok(())
    }

    #[test]
    fn test_tiny_grid_size_is_rejected() -> Result<(), GeoGridError> {
        assert_eq!(GridSize::new(1e-300), Err(GeoGridError::InvalidGridSize(1e-300)));

        let finest = GridSize::new(crate::index::MIN_GRID_SIZE)?;
        let result = CellGrid::from_extent(-90.0, -180.0, 90.0, 180.0, finest);
        assert!(matches!(result, Err(GeoGridError::GridTooLarge(_))));
        let result = CellGrid::from_extent(-1.0, -1.0, 1.0, 1.0, finest);
        assert!(matches!(result, Err(GeoGridError::GridTooLarge(_))));
        Ok(())
    }

    #[test]
    fn test_get_cell_at() -> Result<(), GeoGridError> {
        let grid = CellGrid::from_extent(12.90, 77.50, 12.99, 77.59, GridSize::default())?;

        let cell = grid.get_cell_at(12.9716, 77.5946);
        assert_eq!(cell.map(|c| c.id.as_str()), Some("12.97,77.59"));
        assert!(grid.get_cell_at(13.5, 77.5946).is_none());
        Ok(())
    }

    #[test]
    fn test_filter_and_polygons() -> Result<(), GeoGridError> {
        let grid = CellGrid::from_extent(12.90, 77.50, 12.99, 77.59, GridSize::default())?;

        let north = grid.filter(|cell| cell.lat() > 12.95);
        assert!(!north.is_empty());
        assert!(north.len() < grid.len());
        assert_eq!(grid.to_polygons().len(), grid.len());
        Ok(())
    }
}

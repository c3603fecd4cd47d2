use crate::cell::GridCell;
use crate::error::GeoGridError;
use crate::heatmap::Heatmap;
use arrow_array::{Float64Array, Int64Array, RecordBatch, StringArray, UInt64Array};
use arrow_schema::{DataType, Field, Schema};
use geoarrow_array::IntoArrow;
use geoarrow_array::array::{PointArray, PolygonArray};
use geoarrow_array::builder::{PointBuilder, PolygonBuilder};
use geoarrow_schema::{Crs, Dimension, Metadata, PointType, PolygonType};
use rayon::prelude::*;
use std::sync::Arc;

fn wgs84_metadata() -> Arc<Metadata> {
    let crs = Crs::from_authority_code("EPSG:4326".to_string());
    Arc::new(Metadata::new(crs, None))
}

fn cell_polygons(cells: &[GridCell]) -> PolygonArray {
    let poly = PolygonType::new(Dimension::XY, wgs84_metadata());
    let polygons: Vec<_> = cells.par_iter().map(|c: &GridCell| c.to_polygon()).collect();
    PolygonBuilder::from_polygons(&polygons, poly).finish()
}

/// Trait for converting collections of [`GridCell`]s to Arrow arrays.
///
/// Implemented for `[GridCell]` and `Vec<GridCell>`.
pub trait GridCellsToArrow {
    /// Converts cell centers to an Arrow PointArray.
    fn to_arrow_points(&self) -> PointArray;
    /// Converts cells to an Arrow PolygonArray of squares.
    fn to_arrow_polygons(&self) -> PolygonArray;
    /// Converts cells to a RecordBatch with id, grid_size, lat_idx, lon_idx, lat, lon, and geometry.
    fn to_record_batch(&self) -> Result<RecordBatch, GeoGridError>;
}

impl GridCellsToArrow for [GridCell] {
    fn to_arrow_points(&self) -> PointArray {
        let point = PointType::new(Dimension::XY, wgs84_metadata());
        let mut builder = PointBuilder::with_capacity(point, self.len());

        for cell in self {
            builder.push_point(Some(&cell.center));
        }
        builder.finish()
    }

    fn to_arrow_polygons(&self) -> PolygonArray {
        cell_polygons(self)
    }

    fn to_record_batch(&self) -> Result<RecordBatch, GeoGridError> {
        let polygon_array = self.to_arrow_polygons();
        let ids: StringArray = self.iter().map(|c| Some(c.id.as_str())).collect();
        let sizes: Float64Array = self.iter().map(|c| Some(c.grid_size.degrees())).collect();
        let lat_idxs: Int64Array = self.iter().map(|c| Some(c.key.lat_idx)).collect();
        let lon_idxs: Int64Array = self.iter().map(|c| Some(c.key.lon_idx)).collect();
        let lats: Float64Array = self.iter().map(|c| Some(c.lat())).collect();
        let lons: Float64Array = self.iter().map(|c| Some(c.lon())).collect();

        let geometry_field = polygon_array.extension_type().to_field("geometry", false);
        let schema = Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("grid_size", DataType::Float64, false),
            Field::new("lat_idx", DataType::Int64, false),
            Field::new("lon_idx", DataType::Int64, false),
            Field::new("lat", DataType::Float64, false),
            Field::new("lon", DataType::Float64, false),
            geometry_field,
        ]);

        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(ids),
                Arc::new(sizes),
                Arc::new(lat_idxs),
                Arc::new(lon_idxs),
                Arc::new(lats),
                Arc::new(lons),
                Arc::new(polygon_array.into_arrow()),
            ],
        )
        .map_err(|e| GeoGridError::IoError(e.to_string()))
    }
}

impl GridCellsToArrow for Vec<GridCell> {
    fn to_arrow_points(&self) -> PointArray {
        self.as_slice().to_arrow_points()
    }

    fn to_arrow_polygons(&self) -> PolygonArray {
        self.as_slice().to_arrow_polygons()
    }

    fn to_record_batch(&self) -> Result<RecordBatch, GeoGridError> {
        self.as_slice().to_record_batch()
    }
}

impl Heatmap {
    /// Converts non-empty cells to a RecordBatch with cell_id, lat, lon
    /// (lower-left corner), density, and the cell polygon as geometry.
    pub fn to_record_batch(&self) -> Result<RecordBatch, GeoGridError> {
        let (cells, densities): (Vec<GridCell>, Vec<u64>) = self.cells().into_iter().unzip();

        let polygon_array = cell_polygons(&cells);
        let ids: StringArray = cells.iter().map(|c| Some(c.id.as_str())).collect();
        let lats: Float64Array = cells.iter().map(|c| Some(c.lower_left().lat)).collect();
        let lons: Float64Array = cells.iter().map(|c| Some(c.lower_left().lon)).collect();
        let densities = UInt64Array::from(densities);

        let geometry_field = polygon_array.extension_type().to_field("geometry", false);
        let schema = Schema::new(vec![
            Field::new("cell_id", DataType::Utf8, false),
            Field::new("lat", DataType::Float64, false),
            Field::new("lon", DataType::Float64, false),
            Field::new("density", DataType::UInt64, false),
            geometry_field,
        ]);

        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(ids),
                Arc::new(lats),
                Arc::new(lons),
                Arc::new(densities),
                Arc::new(polygon_array.into_arrow()),
            ],
        )
        .map_err(|e| GeoGridError::IoError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::GeoPoint;
    use crate::index::GridSize;
    use geoarrow_array::GeoArrowArray;

    fn sample_cells() -> Result<Vec<GridCell>, GeoGridError> {
        Ok(vec![
            GridCell::from_lat_lon(12.9716, 77.5946, GridSize::default())?,
            GridCell::from_lat_lon(17.385044, 78.486671, GridSize::default())?,
        ])
    }

    #[test]
    fn test_cells_to_arrow_points() -> Result<(), GeoGridError> {
        let point_array = sample_cells()?.to_arrow_points();
        assert_eq!(point_array.len(), 2);
        Ok(())
    }

    #[test]
    fn test_cells_to_arrow_polygons() -> Result<(), GeoGridError> {
        let polygon_array = sample_cells()?.as_slice().to_arrow_polygons();
        assert_eq!(polygon_array.len(), 2);
        Ok(())
    }

    #[test]
    fn test_cells_to_record_batch() -> Result<(), GeoGridError> {
        let batch = sample_cells()?.to_record_batch()?;
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 7);
        assert_eq!(batch.schema().field(0).name(), "id");
        Ok(())
    }

    #[test]
    fn test_heatmap_to_record_batch() -> Result<(), GeoGridError> {
        let mut heatmap = Heatmap::new(GridSize::default());
        heatmap.add_points(&[
            GeoPoint::new(12.9716, 77.5946),
            GeoPoint::new(12.9720, 77.5950),
            GeoPoint::new(28.6139, 77.2090),
        ]);

        let batch = heatmap.to_record_batch()?;
        assert_eq!(batch.num_rows(), 2);

        let densities = batch
            .column(3)
            .as_any()
            .downcast_ref::<UInt64Array>()
            .ok_or_else(|| GeoGridError::IoError("density column type".to_string()))?;
        assert_eq!(densities.value(0), 2);
        assert_eq!(densities.value(1), 1);
        Ok(())
    }
}

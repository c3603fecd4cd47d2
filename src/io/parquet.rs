use crate::cell::GridCell;
use crate::error::GeoGridError;
use crate::heatmap::Heatmap;
use crate::io::arrow::GridCellsToArrow;
use arrow_array::RecordBatch;
use geoparquet::writer::{
    GeoParquetRecordBatchEncoder, GeoParquetWriterEncoding, GeoParquetWriterOptionsBuilder,
};
use parquet::arrow::ArrowWriter;
use std::fs::File;
use std::path::Path;

pub fn write_geoparquet(batch: &RecordBatch, path: impl AsRef<Path>) -> Result<(), GeoGridError> {
    let schema = batch.schema();

    let options = GeoParquetWriterOptionsBuilder::default()
        .set_encoding(GeoParquetWriterEncoding::WKB)
        .build();

    let mut encoder = GeoParquetRecordBatchEncoder::try_new(&schema, &options)
        .map_err(|e| GeoGridError::IoError(e.to_string()))?;

    let file = File::create(path).map_err(|e| GeoGridError::IoError(e.to_string()))?;
    let mut writer = ArrowWriter::try_new(file, encoder.target_schema(), None)
        .map_err(|e| GeoGridError::IoError(e.to_string()))?;

    let encoded_batch = encoder
        .encode_record_batch(batch)
        .map_err(|e| GeoGridError::IoError(e.to_string()))?;

    writer
        .write(&encoded_batch)
        .map_err(|e| GeoGridError::IoError(e.to_string()))?;

    let kv_metadata = encoder
        .into_keyvalue()
        .map_err(|e| GeoGridError::IoError(e.to_string()))?;

    writer.append_key_value_metadata(kv_metadata);
    writer
        .finish()
        .map_err(|e| GeoGridError::IoError(e.to_string()))?;

    Ok(())
}

pub trait GridCellsToGeoParquet: GridCellsToArrow {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), GeoGridError>;
}

impl GridCellsToGeoParquet for [GridCell] {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), GeoGridError> {
        let batch = self.to_record_batch()?;
        write_geoparquet(&batch, path)
    }
}

impl GridCellsToGeoParquet for Vec<GridCell> {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), GeoGridError> {
        self.as_slice().to_geoparquet(path)
    }
}

impl Heatmap {
    /// Writes the heatmap cells with their densities to a GeoParquet file.
    pub fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), GeoGridError> {
        let batch = self.to_record_batch()?;
        write_geoparquet(&batch, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::GridSize;
    use tempfile::tempdir;

    #[test]
    fn test_cells_to_geoparquet() -> Result<(), GeoGridError> {
        let cells = vec![
            GridCell::from_lat_lon(12.9716, 77.5946, GridSize::default())?,
            GridCell::from_lat_lon(12.9816, 77.5946, GridSize::default())?,
        ];

        let dir = tempdir().map_err(|e| GeoGridError::IoError(e.to_string()))?;
        let path = dir.path().join("cells.parquet");

        cells.to_geoparquet(&path)?;

        let metadata = std::fs::metadata(&path).map_err(|e| GeoGridError::IoError(e.to_string()))?;
        assert!(metadata.len() > 0);
        Ok(())
    }

    #[test]
    fn test_heatmap_to_geoparquet() -> Result<(), GeoGridError> {
        let mut heatmap = Heatmap::new(GridSize::default());
        heatmap.add_point(12.9716, 77.5946);
        heatmap.add_point(-0.001, -0.001);

        let dir = tempdir().map_err(|e| GeoGridError::IoError(e.to_string()))?;
        let path = dir.path().join("heatmap.parquet");

        heatmap.to_geoparquet(&path)?;
        assert!(path.exists());
        Ok(())
    }
}

use crate::cell::TileCell;
use crate::error::QuadtileError;
use crate::grid::TileGrid;
use crate::io::arrow::TileCellsToArrow;
use arrow_array::RecordBatch;
use geoparquet::writer::{
    GeoParquetRecordBatchEncoder, GeoParquetWriterEncoding, GeoParquetWriterOptionsBuilder,
};
use log::info;
use parquet::arrow::ArrowWriter;
use std::fs::File;
use std::path::Path;

/// Writes a record batch with a GeoArrow geometry column to a GeoParquet file.
///
/// Geometries are stored as WKB; the CRS recorded on the geometry field is
/// carried into the GeoParquet metadata.
pub fn write_geoparquet(batch: &RecordBatch, path: impl AsRef<Path>) -> Result<(), QuadtileError> {
    let schema = batch.schema();

    let options = GeoParquetWriterOptionsBuilder::default()
        .set_encoding(GeoParquetWriterEncoding::WKB)
        .build();

    let mut encoder = GeoParquetRecordBatchEncoder::try_new(&schema, &options)
        .map_err(|e| QuadtileError::IoError(e.to_string()))?;

    let file = File::create(path.as_ref()).map_err(|e| QuadtileError::IoError(e.to_string()))?;
    let mut writer = ArrowWriter::try_new(file, encoder.target_schema(), None)
        .map_err(|e| QuadtileError::IoError(e.to_string()))?;

    let encoded_batch = encoder
        .encode_record_batch(batch)
        .map_err(|e| QuadtileError::IoError(e.to_string()))?;

    writer
        .write(&encoded_batch)
        .map_err(|e| QuadtileError::IoError(e.to_string()))?;

    let kv_metadata = encoder
        .into_keyvalue()
        .map_err(|e| QuadtileError::IoError(e.to_string()))?;

    writer.append_key_value_metadata(kv_metadata);
    writer
        .finish()
        .map_err(|e| QuadtileError::IoError(e.to_string()))?;

    info!(
        "Wrote {} rows to {}",
        batch.num_rows(),
        path.as_ref().display()
    );
    Ok(())
}

pub trait TileCellsToGeoParquet: TileCellsToArrow {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), QuadtileError>;
}

impl TileCellsToGeoParquet for [TileCell] {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), QuadtileError> {
        let batch = self.to_record_batch()?;
        write_geoparquet(&batch, path)
    }
}

impl TileCellsToGeoParquet for Vec<TileCell> {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), QuadtileError> {
        self.as_slice().to_geoparquet(path)
    }
}

impl TileGrid {
    /// Writes every cell of the grid to a GeoParquet file.
    pub fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), QuadtileError> {
        self.cells().to_geoparquet(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::GeoPoint;
    use crate::grid::bbox_to_grid;
    use tempfile::tempdir;

    #[test]
    fn test_grid_to_geoparquet() -> Result<(), QuadtileError> {
        let grid = bbox_to_grid(GeoPoint::new(41.95, 12.40), GeoPoint::new(41.85, 12.55), 11)?;

        let dir = tempdir().map_err(|e| QuadtileError::IoError(e.to_string()))?;
        let path = dir.path().join("grid.parquet");

        grid.to_geoparquet(&path)?;

        assert!(path.exists());
        let metadata = std::fs::metadata(&path).map_err(|e| QuadtileError::IoError(e.to_string()))?;
        assert!(metadata.len() > 0);
        Ok(())
    }

    #[test]
    fn test_single_cell_to_geoparquet() -> Result<(), QuadtileError> {
        let dir = tempdir().map_err(|e| QuadtileError::IoError(e.to_string()))?;
        let path = dir.path().join("cell.parquet");

        TileCell::from_quadkey("120")?.to_geoparquet(&path)?;
        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn test_unwritable_path() -> Result<(), QuadtileError> {
        let dir = tempdir().map_err(|e| QuadtileError::IoError(e.to_string()))?;
        let path = dir.path().join("missing").join("grid.parquet");

        let result = vec![TileCell::from_tile(0, 0, 0)?].to_geoparquet(&path);
        assert!(matches!(result, Err(QuadtileError::IoError(_))));
        Ok(())
    }
}

use crate::cell::TileCell;
use crate::error::QuadtileError;
use arrow_array::{Float64Array, RecordBatch, StringArray, UInt8Array, UInt32Array};
use arrow_schema::{DataType, Field, Schema};
use geo_types::Point;
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

fn corner_column(cells: &[TileCell], value: impl Fn(&TileCell) -> f64) -> Float64Array {
    cells.iter().map(|c| Some(value(c))).collect()
}

/// Trait for converting collections of [`TileCell`]s to Arrow arrays.
///
/// Implemented for `[TileCell]` and `Vec<TileCell>`.
pub trait TileCellsToArrow {
    /// Converts tile centres to an Arrow PointArray.
    fn to_arrow_points(&self) -> Result<PointArray, QuadtileError>;
    /// Converts cells to an Arrow PolygonArray of tile footprints.
    fn to_arrow_polygons(&self) -> PolygonArray;
    /// Converts cells to a RecordBatch with quadkey, level, tile indices,
    /// the eight corner columns and the geometry.
    fn to_record_batch(&self) -> Result<RecordBatch, QuadtileError>;
}

impl TileCellsToArrow for [TileCell] {
    fn to_arrow_points(&self) -> Result<PointArray, QuadtileError> {
        let point = PointType::new(Dimension::XY, wgs84_metadata());
        let mut builder = PointBuilder::with_capacity(point, self.len());

        for cell in self {
            let center: Point<f64> = cell.center()?.into();
            builder.push_point(Some(&center));
        }
        Ok(builder.finish())
    }

    fn to_arrow_polygons(&self) -> PolygonArray {
        let poly = PolygonType::new(Dimension::XY, wgs84_metadata());
        let polygons: Vec<_> = self.par_iter().map(|c: &TileCell| c.to_polygon()).collect();
        PolygonBuilder::from_polygons(&polygons, poly).finish()
    }

    fn to_record_batch(&self) -> Result<RecordBatch, QuadtileError> {
        let polygon_array = self.to_arrow_polygons();
        let quadkeys: StringArray = self.iter().map(|c| Some(c.quadkey.as_str())).collect();
        let levels: UInt8Array = self.iter().map(|c| Some(c.level)).collect();
        let tile_xs: UInt32Array = self.iter().map(|c| Some(c.tile_x)).collect();
        let tile_ys: UInt32Array = self.iter().map(|c| Some(c.tile_y)).collect();

        let lat_ul = corner_column(self, |c| c.corners.upper_left.lat);
        let lat_ur = corner_column(self, |c| c.corners.upper_right.lat);
        let lat_bl = corner_column(self, |c| c.corners.bottom_left.lat);
        let lat_br = corner_column(self, |c| c.corners.bottom_right.lat);
        let long_ul = corner_column(self, |c| c.corners.upper_left.lon);
        let long_ur = corner_column(self, |c| c.corners.upper_right.lon);
        let long_bl = corner_column(self, |c| c.corners.bottom_left.lon);
        let long_br = corner_column(self, |c| c.corners.bottom_right.lon);

        let geometry_field = polygon_array.extension_type().to_field("geometry", false);
        let schema = Schema::new(vec![
            Field::new("quadkey", DataType::Utf8, false),
            Field::new("level", DataType::UInt8, false),
            Field::new("tile_x", DataType::UInt32, false),
            Field::new("tile_y", DataType::UInt32, false),
            Field::new("lat_ul", DataType::Float64, false),
            Field::new("lat_ur", DataType::Float64, false),
            Field::new("lat_bl", DataType::Float64, false),
            Field::new("lat_br", DataType::Float64, false),
            Field::new("long_ul", DataType::Float64, false),
            Field::new("long_ur", DataType::Float64, false),
            Field::new("long_bl", DataType::Float64, false),
            Field::new("long_br", DataType::Float64, false),
            geometry_field,
        ]);

        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(quadkeys),
                Arc::new(levels),
                Arc::new(tile_xs),
                Arc::new(tile_ys),
                Arc::new(lat_ul),
                Arc::new(lat_ur),
                Arc::new(lat_bl),
                Arc::new(lat_br),
                Arc::new(long_ul),
                Arc::new(long_ur),
                Arc::new(long_bl),
                Arc::new(long_br),
                Arc::new(polygon_array.into_arrow()),
            ],
        )
        .map_err(|e| QuadtileError::IoError(e.to_string()))
    }
}

impl TileCellsToArrow for Vec<TileCell> {
    fn to_arrow_points(&self) -> Result<PointArray, QuadtileError> {
        self.as_slice().to_arrow_points()
    }

    fn to_arrow_polygons(&self) -> PolygonArray {
        self.as_slice().to_arrow_polygons()
    }

    fn to_record_batch(&self) -> Result<RecordBatch, QuadtileError> {
        self.as_slice().to_record_batch()
    }
}

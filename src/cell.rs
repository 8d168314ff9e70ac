use crate::coord::{BoundsPolicy, Coordinate, GeoPoint, TileCoord};
use crate::error::QuadtileError;
use crate::geom::tile_polygon;
use crate::index::{
    TILE_SIZE, geo_to_tile, pixel_to_geo, quadkey_to_tile, tile_to_geo_with_policy,
    tile_to_quadkey_with_policy,
};
use crate::io::arrow::TileCellsToArrow;
use crate::io::parquet::TileCellsToGeoParquet;
use arrow_array::RecordBatch;
use geo_types::Polygon;
use geoarrow_array::array::PolygonArray;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geographic positions of the four corners of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileCorners {
    pub upper_left: GeoPoint,
    pub upper_right: GeoPoint,
    pub bottom_left: GeoPoint,
    pub bottom_right: GeoPoint,
}

impl TileCorners {
    /// Corners of tile `(tile_x, tile_y)`, taken from the upper-left corners
    /// of it and of its east, south and south-east neighbours.
    pub fn of_tile(
        tile_x: u32,
        tile_y: u32,
        level: u8,
        policy: BoundsPolicy,
    ) -> Result<Self, QuadtileError> {
        let east = tile_x.saturating_add(1);
        let south = tile_y.saturating_add(1);

        Ok(Self {
            upper_left: tile_to_geo_with_policy(tile_x, tile_y, level, policy)?,
            upper_right: tile_to_geo_with_policy(east, tile_y, level, policy)?,
            bottom_left: tile_to_geo_with_policy(tile_x, south, level, policy)?,
            bottom_right: tile_to_geo_with_policy(east, south, level, policy)?,
        })
    }
}

/// A single tile of the quadtree, labelled with its quadkey.
///
/// # Example
///
/// ```
/// use quadtile_rs::TileCell;
///
/// # fn main() -> Result<(), quadtile_rs::QuadtileError> {
/// // Milan, as (lon, lat)
/// let cell = TileCell::from_wgs84(&(9.19, 45.4642), 12)?;
/// println!("Quadkey: {}", cell.quadkey);
/// println!("Tile: ({}, {})", cell.tile_x, cell.tile_y);
///
/// let polygon = cell.to_polygon();
/// assert_eq!(polygon.exterior().0.len(), 5);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TileCell {
    /// Quadkey of the tile, one digit per level
    pub quadkey: String,
    /// Column index, growing eastwards
    pub tile_x: u32,
    /// Row index, growing southwards
    pub tile_y: u32,
    /// Level of detail (0-23)
    pub level: u8,
    /// Corner positions in WGS 84
    pub corners: TileCorners,
    /// Closed footprint ring: upper-left, upper-right, bottom-right, bottom-left
    pub polygon: Polygon<f64>,
}

impl TileCell {
    /// Create a TileCell from a tile index.
    ///
    /// Out-of-range indices are handled as [`BoundsPolicy::Clamp`] describes.
    pub fn from_tile(tile_x: u32, tile_y: u32, level: u8) -> Result<Self, QuadtileError> {
        Self::from_tile_with_policy(tile_x, tile_y, level, BoundsPolicy::Clamp)
    }

    pub fn from_tile_with_policy(
        tile_x: u32,
        tile_y: u32,
        level: u8,
        policy: BoundsPolicy,
    ) -> Result<Self, QuadtileError> {
        let quadkey = tile_to_quadkey_with_policy(tile_x, tile_y, level, policy)?;
        let corners = TileCorners::of_tile(tile_x, tile_y, level, policy)?;
        let polygon = tile_polygon(
            corners.upper_left,
            corners.upper_right,
            corners.bottom_right,
            corners.bottom_left,
        );

        Ok(Self {
            quadkey,
            tile_x,
            tile_y,
            level,
            corners,
            polygon,
        })
    }

    /// Create a TileCell from a WGS 84 `(lon, lat)` coordinate.
    ///
    /// # Example
    /// ```
    /// use quadtile_rs::TileCell;
    /// use geo_types::Point;
    ///
    /// # fn main() -> Result<(), quadtile_rs::QuadtileError> {
    /// let from_tuple = TileCell::from_wgs84(&(0.0, 0.0), 1)?;
    /// let from_point = TileCell::from_wgs84(&Point::new(0.0, 0.0), 1)?;
    /// assert_eq!(from_tuple.quadkey, "3");
    /// assert_eq!(from_tuple, from_point);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_wgs84(coord: &impl Coordinate, level: u8) -> Result<Self, QuadtileError> {
        let tile = geo_to_tile(coord.y(), coord.x(), level)?;
        Self::from_tile(tile.x, tile.y, level)
    }

    /// Create a TileCell from its quadkey.
    ///
    /// # Example
    /// ```
    /// use quadtile_rs::TileCell;
    ///
    /// # fn main() -> Result<(), quadtile_rs::QuadtileError> {
    /// let cell = TileCell::from_wgs84(&(9.19, 45.4642), 14)?;
    /// let restored = TileCell::from_quadkey(&cell.quadkey)?;
    /// assert_eq!(cell, restored);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_quadkey(quadkey: &str) -> Result<Self, QuadtileError> {
        let (tile, level) = quadkey_to_tile(quadkey)?;
        Self::from_tile(tile.x, tile.y, level)
    }

    pub fn tile(&self) -> TileCoord {
        TileCoord::new(self.tile_x, self.tile_y)
    }

    /// Returns the footprint polygon.
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.polygon.clone()
    }

    /// Position at the middle of the tile, in pixel space.
    ///
    /// This is not the midpoint of the corner latitudes, since Mercator
    /// stretches the northern half of each tile.
    pub fn center(&self) -> Result<GeoPoint, QuadtileError> {
        let half = TILE_SIZE / 2;
        pixel_to_geo(
            self.tile_x.saturating_mul(TILE_SIZE).saturating_add(half),
            self.tile_y.saturating_mul(TILE_SIZE).saturating_add(half),
            self.level,
        )
    }

    /// Converts this cell to an Arrow PolygonArray.
    pub fn to_arrow_polygons(&self) -> PolygonArray {
        std::slice::from_ref(self).to_arrow_polygons()
    }

    /// Converts this cell to an Arrow RecordBatch with all attributes.
    pub fn to_record_batch(&self) -> Result<RecordBatch, QuadtileError> {
        std::slice::from_ref(self).to_record_batch()
    }

    /// Writes this cell to a GeoParquet file.
    pub fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), QuadtileError> {
        std::slice::from_ref(self).to_geoparquet(path)
    }
}

//! # quadtile-rs
//!
//! Spherical Mercator tile addressing in the Bing Maps quadkey scheme, and
//! labelled tile grids over a bounding box.
//!
//! There are currently three main entry points.
//!
//! ### 1. Transforms - Geographic, Pixel and Tile Coordinates
//!
//! ```
//! use quadtile_rs::{geo_to_tile, tile_to_geo, tile_to_quadkey, quadkey_to_tile};
//!
//! # fn main() -> Result<(), quadtile_rs::QuadtileError> {
//! let tile = geo_to_tile(45.4642, 9.19, 12)?;
//! let quadkey = tile_to_quadkey(tile.x, tile.y, 12)?;
//! assert_eq!(quadkey_to_tile(&quadkey)?, (tile, 12));
//!
//! let upper_left = tile_to_geo(tile.x, tile.y, 12)?;
//! println!("{} starts at ({}, {})", quadkey, upper_left.lat, upper_left.lon);
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `TileGrid` - Tiles Covering a Bounding Box
//!
//! ```
//! use quadtile_rs::{GeoPoint, TileGrid};
//!
//! # fn main() -> Result<(), quadtile_rs::QuadtileError> {
//! let grid = TileGrid::builder()
//!     .level(13)
//!     .corners(GeoPoint::new(45.52, 9.08), GeoPoint::new(45.40, 9.28))
//!     .build()?;
//!
//! if let Some(cell) = grid.get_cell_at(&GeoPoint::new(45.4642, 9.19)) {
//!     println!("{}", cell.quadkey);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. Writers - GeoParquet, CSV and GeoJSON
//!
//! ```no_run
//! use quadtile_rs::{CsvGridConfig, GeoPoint, GeometryFormat, bbox_to_grid, write_grid_csv};
//!
//! # fn main() -> Result<(), quadtile_rs::QuadtileError> {
//! let grid = bbox_to_grid(GeoPoint::new(45.52, 9.08), GeoPoint::new(45.40, 9.28), 14)?;
//!
//! grid.to_geoparquet("milan.parquet")?;
//! write_grid_csv(
//!     grid.cells(),
//!     "milan.csv",
//!     &CsvGridConfig::new().geometry(GeometryFormat::GeoJson),
//! )?;
//! # Ok(())
//! # }
//! ```
//!

pub mod cell;
pub mod coord;
pub mod error;
pub mod geom;
pub mod grid;
pub mod index;
pub mod io;

pub use cell::{TileCell, TileCorners};
pub use coord::{BoundingBox, BoundsPolicy, Coordinate, GeoPoint, PixelCoord, TileCoord};
pub use error::QuadtileError;
pub use geom::{geometry_bounds, parse_geojson, parse_geometry, parse_wkt};
pub use grid::{TileGrid, TileGridBuilder, TileRange, bbox_to_grid};
pub use index::{
    DEFAULT_MAX_CELLS, EARTH_RADIUS, MAX_LATITUDE, MAX_LEVEL, MAX_LONGITUDE, MIN_LATITUDE,
    MIN_LONGITUDE, TILE_SIZE, geo_to_pixel, geo_to_pixel_with_policy, geo_to_tile,
    geo_to_tile_with_policy, ground_resolution, map_scale, map_size, pixel_to_geo,
    pixel_to_geo_with_policy, quadkey_to_tile, tile_to_geo, tile_to_geo_with_policy,
    tile_to_quadkey, tile_to_quadkey_with_policy, tiles_per_axis,
};
pub use io::{
    CsvGridConfig, GeometryFormat, TileCellsToArrow, TileCellsToGeoParquet, to_feature_collection,
    write_geoparquet, write_grid_csv, write_grid_geojson, write_outline_geojson,
};

pub use geo_types;
pub use geoarrow_array;
pub use geoarrow_schema;
pub use geoparquet;

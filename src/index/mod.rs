pub mod constants;
mod quadkey;
mod transform;

pub use constants::{
    DEFAULT_MAX_CELLS, EARTH_RADIUS, MAX_LATITUDE, MAX_LEVEL, MAX_LONGITUDE, MIN_LATITUDE,
    MIN_LONGITUDE, TILE_SIZE,
};
pub use quadkey::{quadkey_to_tile, tile_to_quadkey, tile_to_quadkey_with_policy};
pub(crate) use transform::check_level;
pub use transform::{
    geo_to_pixel, geo_to_pixel_with_policy, geo_to_tile, geo_to_tile_with_policy,
    ground_resolution, map_scale, map_size, pixel_to_geo, pixel_to_geo_with_policy, tile_to_geo,
    tile_to_geo_with_policy, tiles_per_axis,
};

mod parse;
mod polygon;

pub use parse::{geometry_bounds, parse_geojson, parse_geometry, parse_wkt};
pub use polygon::{ring_polygon, tile_polygon};

/// Equatorial radius of the WGS 84 ellipsoid, in meters
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Latitude bounds of the spherical Mercator projection
pub const MIN_LATITUDE: f64 = -85.05112878;
pub const MAX_LATITUDE: f64 = 85.05112878;

/// Longitude bounds
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Width and height of a single tile, in pixels
pub const TILE_SIZE: u32 = 256;

/// Deepest supported level of detail
pub const MAX_LEVEL: u8 = 23;

/// Default upper bound on the number of cells a grid may hold
pub const DEFAULT_MAX_CELLS: u64 = 1_000_000;

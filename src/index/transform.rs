use crate::coord::{BoundsPolicy, GeoPoint, PixelCoord, TileCoord};
use crate::error::QuadtileError;
use crate::index::constants::{
    EARTH_RADIUS, MAX_LATITUDE, MAX_LEVEL, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE, TILE_SIZE,
};
use std::f64::consts::PI;

pub(crate) fn check_level(level: u8) -> Result<(), QuadtileError> {
    if level > MAX_LEVEL {
        return Err(QuadtileError::InvalidLevel(level));
    }
    Ok(())
}

/// Width and height of the whole world map in pixels at `level` (`256 << level`).
pub fn map_size(level: u8) -> Result<u64, QuadtileError> {
    check_level(level)?;
    Ok(u64::from(TILE_SIZE) << level)
}

/// Number of tiles along each axis at `level` (`2^level`).
pub fn tiles_per_axis(level: u8) -> Result<u64, QuadtileError> {
    check_level(level)?;
    Ok(1u64 << level)
}

/// Converts a WGS 84 position to pixel coordinates at the given level.
///
/// Latitude and longitude are clamped to the Mercator band, so any number,
/// infinities included, yields a valid pixel. NaN is rejected with
/// [`QuadtileError::LatitudeOutOfRange`] or
/// [`QuadtileError::LongitudeOutOfRange`].
///
/// # Example
/// ```
/// use quadtile_rs::geo_to_pixel;
///
/// # fn main() -> Result<(), quadtile_rs::QuadtileError> {
/// let px = geo_to_pixel(0.0, 0.0, 1)?;
/// assert_eq!((px.x, px.y), (256, 256));
/// # Ok(())
/// # }
/// ```
pub fn geo_to_pixel(lat: f64, lon: f64, level: u8) -> Result<PixelCoord, QuadtileError> {
    geo_to_pixel_with_policy(lat, lon, level, BoundsPolicy::Clamp)
}

/// Same as [`geo_to_pixel`], with an explicit out-of-range policy.
pub fn geo_to_pixel_with_policy(
    lat: f64,
    lon: f64,
    level: u8,
    policy: BoundsPolicy,
) -> Result<PixelCoord, QuadtileError> {
    let size = map_size(level)? as f64;

    // NaN passes through clamp and would truncate to pixel 0
    if lat.is_nan() {
        return Err(QuadtileError::LatitudeOutOfRange(lat));
    }
    if lon.is_nan() {
        return Err(QuadtileError::LongitudeOutOfRange(lon));
    }

    if policy == BoundsPolicy::Strict {
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&lat) {
            return Err(QuadtileError::LatitudeOutOfRange(lat));
        }
        if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&lon) {
            return Err(QuadtileError::LongitudeOutOfRange(lon));
        }
    }

    let lat = lat.clamp(MIN_LATITUDE, MAX_LATITUDE);
    let lon = lon.clamp(MIN_LONGITUDE, MAX_LONGITUDE);

    let x = (lon + 180.0) / 360.0;
    let sin_lat = (lat * PI / 180.0).sin();
    let y = 0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI);

    // +0.5 then truncate rounds to the nearest pixel
    Ok(PixelCoord {
        x: (x * size + 0.5).clamp(0.0, size - 1.0) as u32,
        y: (y * size + 0.5).clamp(0.0, size - 1.0) as u32,
    })
}

/// Converts a WGS 84 position to the index of the tile containing it.
///
/// # Example
/// ```
/// use quadtile_rs::geo_to_tile;
///
/// # fn main() -> Result<(), quadtile_rs::QuadtileError> {
/// let tile = geo_to_tile(0.0, 0.0, 1)?;
/// assert_eq!((tile.x, tile.y), (1, 1));
/// # Ok(())
/// # }
/// ```
pub fn geo_to_tile(lat: f64, lon: f64, level: u8) -> Result<TileCoord, QuadtileError> {
    geo_to_tile_with_policy(lat, lon, level, BoundsPolicy::Clamp)
}

/// Same as [`geo_to_tile`], with an explicit out-of-range policy.
pub fn geo_to_tile_with_policy(
    lat: f64,
    lon: f64,
    level: u8,
    policy: BoundsPolicy,
) -> Result<TileCoord, QuadtileError> {
    let pixel = geo_to_pixel_with_policy(lat, lon, level, policy)?;
    Ok(TileCoord {
        x: pixel.x / TILE_SIZE,
        y: pixel.y / TILE_SIZE,
    })
}

/// Converts pixel coordinates at the given level back to a WGS 84 position.
///
/// Pixels past the edge of the map are clamped to the last row/column.
pub fn pixel_to_geo(pixel_x: u32, pixel_y: u32, level: u8) -> Result<GeoPoint, QuadtileError> {
    pixel_to_geo_with_policy(pixel_x, pixel_y, level, BoundsPolicy::Clamp)
}

/// Same as [`pixel_to_geo`], with an explicit out-of-range policy.
pub fn pixel_to_geo_with_policy(
    pixel_x: u32,
    pixel_y: u32,
    level: u8,
    policy: BoundsPolicy,
) -> Result<GeoPoint, QuadtileError> {
    let size = map_size(level)?;

    if policy == BoundsPolicy::Strict && (u64::from(pixel_x) >= size || u64::from(pixel_y) >= size)
    {
        return Err(QuadtileError::PixelOutOfRange {
            x: pixel_x,
            y: pixel_y,
            level,
        });
    }

    Ok(unproject(u64::from(pixel_x), u64::from(pixel_y), size))
}

fn unproject(pixel_x: u64, pixel_y: u64, size: u64) -> GeoPoint {
    let size_f = size as f64;
    let x = pixel_x.min(size - 1) as f64 / size_f - 0.5;
    let y = 0.5 - pixel_y.min(size - 1) as f64 / size_f;

    GeoPoint {
        lat: 90.0 - 360.0 * (-y * 2.0 * PI).exp().atan() / PI,
        lon: 360.0 * x,
    }
}

/// Returns the position of the upper-left corner of a tile.
///
/// Index `2^level` is accepted on either axis so the far edge of the last
/// tile can be addressed; like any pixel past the map edge it is clamped to
/// the last pixel row/column.
///
/// # Example
/// ```
/// use quadtile_rs::tile_to_geo;
///
/// # fn main() -> Result<(), quadtile_rs::QuadtileError> {
/// let corner = tile_to_geo(0, 0, 0)?;
/// assert!((corner.lat - 85.05113).abs() < 1e-5);
/// assert_eq!(corner.lon, -180.0);
/// # Ok(())
/// # }
/// ```
pub fn tile_to_geo(tile_x: u32, tile_y: u32, level: u8) -> Result<GeoPoint, QuadtileError> {
    tile_to_geo_with_policy(tile_x, tile_y, level, BoundsPolicy::Clamp)
}

/// Same as [`tile_to_geo`], with an explicit out-of-range policy.
///
/// Strict mode rejects indices greater than `2^level`.
pub fn tile_to_geo_with_policy(
    tile_x: u32,
    tile_y: u32,
    level: u8,
    policy: BoundsPolicy,
) -> Result<GeoPoint, QuadtileError> {
    let size = map_size(level)?;
    let tiles = tiles_per_axis(level)?;

    if policy == BoundsPolicy::Strict && (u64::from(tile_x) > tiles || u64::from(tile_y) > tiles) {
        return Err(QuadtileError::TileOutOfRange {
            x: tile_x,
            y: tile_y,
            level,
        });
    }

    let tile_size = u64::from(TILE_SIZE);
    Ok(unproject(
        u64::from(tile_x) * tile_size,
        u64::from(tile_y) * tile_size,
        size,
    ))
}

/// Ground distance covered by one pixel, in meters, at the given latitude and level.
pub fn ground_resolution(lat: f64, level: u8) -> Result<f64, QuadtileError> {
    let size = map_size(level)? as f64;
    if lat.is_nan() {
        return Err(QuadtileError::LatitudeOutOfRange(lat));
    }
    let lat = lat.clamp(MIN_LATITUDE, MAX_LATITUDE);
    Ok((lat * PI / 180.0).cos() * 2.0 * PI * EARTH_RADIUS / size)
}

/// Map scale denominator (1 : N) at the given latitude, level and screen resolution.
pub fn map_scale(lat: f64, level: u8, screen_dpi: u32) -> Result<f64, QuadtileError> {
    const METERS_PER_INCH: f64 = 0.0254;
    Ok(ground_resolution(lat, level)? * f64::from(screen_dpi) / METERS_PER_INCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_to_tile_center_of_world() -> Result<(), QuadtileError> {
        let tile = geo_to_tile(0.0, 0.0, 1)?;
        assert_eq!(tile, TileCoord::new(1, 1));
        Ok(())
    }

    #[test]
    fn test_pixel_to_geo_top_left() -> Result<(), QuadtileError> {
        let p = pixel_to_geo(0, 0, 0)?;
        assert!((p.lat - 85.05113).abs() < 1e-5);
        assert_eq!(p.lon, -180.0);
        Ok(())
    }

    #[test]
    fn test_geo_to_pixel_clamps_out_of_range() -> Result<(), QuadtileError> {
        let level = 3;
        let size = map_size(level)? as u32;

        assert_eq!(geo_to_pixel(0.0, 181.0, level)?, geo_to_pixel(0.0, 180.0, level)?);
        assert_eq!(geo_to_pixel(90.0, 0.0, level)?.y, 0);
        assert_eq!(geo_to_pixel(-90.0, 0.0, level)?.y, size - 1);
        assert_eq!(geo_to_pixel(0.0, 180.0, level)?.x, size - 1);
        assert_eq!(geo_to_pixel(0.0, -500.0, level)?.x, 0);
        Ok(())
    }

    #[test]
    fn test_geo_to_pixel_strict_rejects() {
        let lat = geo_to_pixel_with_policy(86.0, 0.0, 5, BoundsPolicy::Strict);
        assert!(matches!(lat, Err(QuadtileError::LatitudeOutOfRange(_))));

        let lon = geo_to_pixel_with_policy(0.0, 181.0, 5, BoundsPolicy::Strict);
        assert!(matches!(lon, Err(QuadtileError::LongitudeOutOfRange(_))));

        let nan = geo_to_pixel_with_policy(f64::NAN, 0.0, 5, BoundsPolicy::Strict);
        assert!(nan.is_err());
    }

    #[test]
    fn test_nan_is_rejected_in_both_policies() {
        assert!(matches!(
            geo_to_tile(f64::NAN, 0.0, 5),
            Err(QuadtileError::LatitudeOutOfRange(lat)) if lat.is_nan()
        ));
        assert!(matches!(
            geo_to_tile(0.0, f64::NAN, 5),
            Err(QuadtileError::LongitudeOutOfRange(lon)) if lon.is_nan()
        ));
        assert!(matches!(
            geo_to_pixel_with_policy(f64::NAN, f64::NAN, 5, BoundsPolicy::Strict),
            Err(QuadtileError::LatitudeOutOfRange(_))
        ));
    }

    #[test]
    fn test_infinity_is_clamped() -> Result<(), QuadtileError> {
        assert_eq!(geo_to_tile(f64::INFINITY, f64::NEG_INFINITY, 3)?, TileCoord::new(0, 0));
        assert_eq!(geo_to_tile(f64::NEG_INFINITY, f64::INFINITY, 3)?, TileCoord::new(7, 7));
        Ok(())
    }

    #[test]
    fn test_strict_accepts_in_range() -> Result<(), QuadtileError> {
        let clamped = geo_to_tile(45.4642, 9.19, 12)?;
        let strict = geo_to_tile_with_policy(45.4642, 9.19, 12, BoundsPolicy::Strict)?;
        assert_eq!(clamped, strict);
        Ok(())
    }

    #[test]
    fn test_pixel_to_geo_clamps_and_strict() -> Result<(), QuadtileError> {
        let level = 2;
        let last = map_size(level)? as u32 - 1;

        assert_eq!(pixel_to_geo(last + 50, 0, level)?, pixel_to_geo(last, 0, level)?);

        let result = pixel_to_geo_with_policy(last + 1, 0, level, BoundsPolicy::Strict);
        assert!(matches!(
            result,
            Err(QuadtileError::PixelOutOfRange { level: 2, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_invalid_level() {
        assert!(matches!(
            geo_to_pixel(0.0, 0.0, 24),
            Err(QuadtileError::InvalidLevel(24))
        ));
        assert!(matches!(
            pixel_to_geo(0, 0, 30),
            Err(QuadtileError::InvalidLevel(30))
        ));
        assert!(tile_to_geo(0, 0, 255).is_err());
        assert!(map_size(MAX_LEVEL).is_ok());
    }

    #[test]
    fn test_round_trip_within_one_pixel() -> Result<(), QuadtileError> {
        let samples = [
            (0.0, 0.0),
            (45.4642, 9.19),
            (-33.8688, 151.2093),
            (64.1466, -21.9426),
            (-54.8019, -68.303),
            (85.0, 179.9),
            (-85.0, -179.9),
        ];

        for level in [1u8, 5, 10, 15, 20, 23] {
            let tolerance = 360.0 / map_size(level)? as f64;
            for &(lat, lon) in &samples {
                let px = geo_to_pixel(lat, lon, level)?;
                let back = pixel_to_geo(px.x, px.y, level)?;
                assert!(
                    (back.lat - lat).abs() <= tolerance,
                    "lat {} -> {} at level {}",
                    lat,
                    back.lat,
                    level
                );
                assert!(
                    (back.lon - lon).abs() <= tolerance,
                    "lon {} -> {} at level {}",
                    lon,
                    back.lon,
                    level
                );
            }
        }
        Ok(())
    }

    #[test]
    fn test_tile_to_geo_matches_pixel_corner() -> Result<(), QuadtileError> {
        let corner = tile_to_geo(3, 5, 4)?;
        let via_pixel = pixel_to_geo(3 * 256, 5 * 256, 4)?;
        assert_eq!(corner, via_pixel);
        Ok(())
    }

    #[test]
    fn test_tile_to_geo_far_edge() -> Result<(), QuadtileError> {
        let level = 2;
        let edge = tile_to_geo(4, 4, level)?;
        let last = map_size(level)? as u32 - 1;
        assert_eq!(edge, pixel_to_geo(last, last, level)?);

        assert!(tile_to_geo_with_policy(4, 4, level, BoundsPolicy::Strict).is_ok());
        assert!(matches!(
            tile_to_geo_with_policy(5, 0, level, BoundsPolicy::Strict),
            Err(QuadtileError::TileOutOfRange { x: 5, y: 0, level: 2 })
        ));
        Ok(())
    }

    #[test]
    fn test_tile_to_geo_huge_index_does_not_overflow() -> Result<(), QuadtileError> {
        let p = tile_to_geo(u32::MAX, u32::MAX, MAX_LEVEL)?;
        assert!(p.lon < 180.0);
        assert!(p.lat < -85.0);
        Ok(())
    }

    #[test]
    fn test_ground_resolution() -> Result<(), QuadtileError> {
        // ~156543 m/px at the equator on level 0
        let res = ground_resolution(0.0, 0)?;
        assert!((res - 156543.03392).abs() < 0.001);

        let halved = ground_resolution(0.0, 1)?;
        assert!((res / 2.0 - halved).abs() < 1e-9);

        assert!(ground_resolution(60.0, 0)? < res);
        assert!(ground_resolution(f64::NAN, 0).is_err());
        Ok(())
    }

    #[test]
    fn test_map_scale() -> Result<(), QuadtileError> {
        let scale = map_scale(0.0, 0, 96)?;
        assert!((scale - 591657527.59).abs() < 1.0);
        Ok(())
    }
}

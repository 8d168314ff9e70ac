use crate::coord::{BoundsPolicy, TileCoord};
use crate::error::QuadtileError;
use crate::index::constants::MAX_LEVEL;
use crate::index::transform::{check_level, tiles_per_axis};

/// Encodes a tile index as a quadkey string.
///
/// One digit per level, most significant quadrant first. Each digit is
/// `'0' + (x bit) + 2 * (y bit)` for that level, so the key is a path from
/// the whole world down to the tile. Level 0 yields an empty string.
///
/// Indices at or beyond `2^level` are not rejected: only the low `level`
/// bits are encoded, which wraps them back onto the grid.
///
/// # Example
/// ```
/// use quadtile_rs::tile_to_quadkey;
///
/// # fn main() -> Result<(), quadtile_rs::QuadtileError> {
/// assert_eq!(tile_to_quadkey(1, 1, 1)?, "3");
/// assert_eq!(tile_to_quadkey(3, 5, 3)?, "213");
/// # Ok(())
/// # }
/// ```
pub fn tile_to_quadkey(tile_x: u32, tile_y: u32, level: u8) -> Result<String, QuadtileError> {
    tile_to_quadkey_with_policy(tile_x, tile_y, level, BoundsPolicy::Clamp)
}

/// Same as [`tile_to_quadkey`], with an explicit out-of-range policy.
///
/// Strict mode rejects indices at or beyond `2^level`.
pub fn tile_to_quadkey_with_policy(
    tile_x: u32,
    tile_y: u32,
    level: u8,
    policy: BoundsPolicy,
) -> Result<String, QuadtileError> {
    let tiles = tiles_per_axis(level)?;

    if policy == BoundsPolicy::Strict && (u64::from(tile_x) >= tiles || u64::from(tile_y) >= tiles)
    {
        return Err(QuadtileError::TileOutOfRange {
            x: tile_x,
            y: tile_y,
            level,
        });
    }

    let mut quadkey = String::with_capacity(level as usize);
    for i in (1..=level).rev() {
        let mask = 1u32 << (i - 1);
        let mut digit = b'0';
        if tile_x & mask != 0 {
            digit += 1;
        }
        if tile_y & mask != 0 {
            digit += 2;
        }
        quadkey.push(digit as char);
    }

    Ok(quadkey)
}

/// Decodes a quadkey back to its tile index and level.
///
/// # Example
/// ```
/// use quadtile_rs::{quadkey_to_tile, TileCoord};
///
/// # fn main() -> Result<(), quadtile_rs::QuadtileError> {
/// let (tile, level) = quadkey_to_tile("213")?;
/// assert_eq!(tile, TileCoord::new(3, 5));
/// assert_eq!(level, 3);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// - [`QuadtileError::QuadkeyTooLong`] - More digits than [`MAX_LEVEL`]
/// - [`QuadtileError::InvalidQuadkeyDigit`] - A character outside `'0'..='3'`
pub fn quadkey_to_tile(quadkey: &str) -> Result<(TileCoord, u8), QuadtileError> {
    let len = quadkey.chars().count();
    if len > MAX_LEVEL as usize {
        return Err(QuadtileError::QuadkeyTooLong(len));
    }
    let level = len as u8;
    check_level(level)?;

    let mut tile = TileCoord::new(0, 0);
    for (i, c) in quadkey.chars().enumerate() {
        let mask = 1u32 << (len - i - 1);
        match c {
            '0' => {}
            '1' => tile.x |= mask,
            '2' => tile.y |= mask,
            '3' => {
                tile.x |= mask;
                tile.y |= mask;
            }
            other => return Err(QuadtileError::InvalidQuadkeyDigit(other)),
        }
    }

    Ok((tile, level))
}

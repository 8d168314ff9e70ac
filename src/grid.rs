use crate::cell::TileCell;
use crate::coord::{BoundingBox, BoundsPolicy, GeoPoint, TileCoord};
use crate::error::QuadtileError;
use crate::geom::geometry_bounds;
use crate::index::{DEFAULT_MAX_CELLS, check_level, geo_to_tile_with_policy, quadkey_to_tile};
use geo_types::{Geometry, Polygon};
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Inclusive rectangle of tile indices at one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileRange {
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: u32,
    pub y_max: u32,
    pub level: u8,
}

impl TileRange {
    /// Tile range spanned by two corners given in any order.
    pub fn from_corners(
        a: &GeoPoint,
        b: &GeoPoint,
        level: u8,
        policy: BoundsPolicy,
    ) -> Result<Self, QuadtileError> {
        let ta = geo_to_tile_with_policy(a.lat, a.lon, level, policy)?;
        let tb = geo_to_tile_with_policy(b.lat, b.lon, level, policy)?;

        Ok(Self {
            x_min: ta.x.min(tb.x),
            x_max: ta.x.max(tb.x),
            y_min: ta.y.min(tb.y),
            y_max: ta.y.max(tb.y),
            level,
        })
    }

    pub fn width(&self) -> u64 {
        u64::from(self.x_max - self.x_min) + 1
    }

    pub fn height(&self) -> u64 {
        u64::from(self.y_max - self.y_min) + 1
    }

    /// Number of tiles in the range.
    pub fn cell_count(&self) -> u64 {
        self.width() * self.height()
    }

    pub fn contains(&self, tile: &TileCoord) -> bool {
        (self.x_min..=self.x_max).contains(&tile.x) && (self.y_min..=self.y_max).contains(&tile.y)
    }

    /// Tiles of the range, x ascending, then y ascending within each column.
    pub fn tiles(&self) -> impl Iterator<Item = TileCoord> + use<> {
        let (y_min, y_max) = (self.y_min, self.y_max);
        (self.x_min..=self.x_max)
            .flat_map(move |x| (y_min..=y_max).map(move |y| TileCoord::new(x, y)))
    }

    /// Position of `tile` in iteration order.
    fn position(&self, tile: &TileCoord) -> Option<usize> {
        if !self.contains(tile) {
            return None;
        }
        let column = u64::from(tile.x - self.x_min);
        let row = u64::from(tile.y - self.y_min);
        usize::try_from(column * self.height() + row).ok()
    }
}

/// Every tile covering a bounding box at one level, each with its quadkey
/// and polygon.
///
/// Cells are ordered by `tile_x` ascending, then `tile_y` ascending.
#[derive(Debug, Clone)]
pub struct TileGrid {
    cells: Vec<TileCell>,
    range: TileRange,
}

impl TileGrid {
    pub fn builder() -> TileGridBuilder {
        TileGridBuilder::new()
    }

    /// Grid over the box spanned by two corners, with default settings.
    pub fn from_corners(a: GeoPoint, b: GeoPoint, level: u8) -> Result<Self, QuadtileError> {
        Self::builder().level(level).corners(a, b).build()
    }

    pub fn from_bbox(bbox: &BoundingBox, level: u8) -> Result<Self, QuadtileError> {
        Self::builder().level(level).bbox(bbox).build()
    }

    /// Grid over the bounding rectangle of a lon/lat geometry.
    pub fn from_geometry(geom: &Geometry<f64>, level: u8) -> Result<Self, QuadtileError> {
        let bbox = geometry_bounds(geom)
            .ok_or_else(|| QuadtileError::GeometryParseError("Geometry is empty".to_string()))?;
        Self::from_bbox(&bbox, level)
    }

    pub fn level(&self) -> u8 {
        self.range.level
    }

    pub fn range(&self) -> &TileRange {
        &self.range
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[TileCell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<TileCell> {
        self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileCell> {
        self.cells.iter()
    }

    /// Cell containing `point`, if it lies within the grid.
    ///
    /// Points outside the Mercator band or the longitude range are never
    /// clamped onto an edge cell; they yield `None`.
    pub fn get_cell_at(&self, point: &GeoPoint) -> Option<&TileCell> {
        let tile =
            geo_to_tile_with_policy(point.lat, point.lon, self.level(), BoundsPolicy::Strict)
                .ok()?;
        self.cell_at_tile(&tile)
    }

    /// Cell labelled `quadkey`, if the key is at the grid's level and inside it.
    pub fn get_by_quadkey(&self, quadkey: &str) -> Option<&TileCell> {
        let (tile, level) = quadkey_to_tile(quadkey).ok()?;
        if level != self.level() {
            return None;
        }
        self.cell_at_tile(&tile)
    }

    fn cell_at_tile(&self, tile: &TileCoord) -> Option<&TileCell> {
        self.range
            .position(tile)
            .and_then(|idx| self.cells.get(idx))
    }

    pub fn to_polygons(&self) -> Vec<Polygon<f64>> {
        self.cells.iter().map(|cell| cell.to_polygon()).collect()
    }

    pub fn filter<F>(&self, predicate: F) -> Vec<&TileCell>
    where
        F: Fn(&TileCell) -> bool,
    {
        self.cells.iter().filter(|cell| predicate(cell)).collect()
    }
}

impl<'a> IntoIterator for &'a TileGrid {
    type Item = &'a TileCell;
    type IntoIter = std::slice::Iter<'a, TileCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Builds a grid from two corners with default settings.
///
/// # Example
/// ```
/// use quadtile_rs::{GeoPoint, bbox_to_grid};
///
/// # fn main() -> Result<(), quadtile_rs::QuadtileError> {
/// let origin = GeoPoint::new(0.0, 0.0);
/// let grid = bbox_to_grid(origin, origin, 1)?;
/// assert_eq!(grid.len(), 1);
/// assert_eq!(grid.cells()[0].quadkey, "3");
/// # Ok(())
/// # }
/// ```
pub fn bbox_to_grid(
    corner_a: GeoPoint,
    corner_b: GeoPoint,
    level: u8,
) -> Result<TileGrid, QuadtileError> {
    TileGrid::from_corners(corner_a, corner_b, level)
}

/// Configures and builds a [`TileGrid`].
///
/// # Example
/// ```
/// use quadtile_rs::{BoundsPolicy, GeoPoint, TileGrid};
///
/// # fn main() -> Result<(), quadtile_rs::QuadtileError> {
/// let grid = TileGrid::builder()
///     .level(12)
///     .corners(GeoPoint::new(45.50, 9.10), GeoPoint::new(45.40, 9.25))
///     .max_cells(10_000)
///     .policy(BoundsPolicy::Strict)
///     .parallel(true)
///     .build()?;
///
/// assert_eq!(grid.len() as u64, grid.range().cell_count());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TileGridBuilder {
    level: Option<u8>,
    corners: Option<(GeoPoint, GeoPoint)>,
    max_cells: Option<u64>,
    policy: BoundsPolicy,
    parallel: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for TileGridBuilder {
    fn default() -> Self {
        Self {
            level: None,
            corners: None,
            max_cells: Some(DEFAULT_MAX_CELLS),
            policy: BoundsPolicy::default(),
            parallel: false,
            cancel: None,
        }
    }
}

impl TileGridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    pub fn corners(mut self, a: GeoPoint, b: GeoPoint) -> Self {
        self.corners = Some((a, b));
        self
    }

    pub fn bbox(mut self, bbox: &BoundingBox) -> Self {
        self.corners = Some((bbox.corner1, bbox.corner2));
        self
    }

    /// Reject grids with more than `limit` cells before allocating them.
    pub fn max_cells(mut self, limit: u64) -> Self {
        self.max_cells = Some(limit);
        self
    }

    pub fn no_cell_limit(mut self) -> Self {
        self.max_cells = None;
        self
    }

    pub fn policy(mut self, policy: BoundsPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Compute columns on the rayon thread pool. Output order is unchanged.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Abort with [`QuadtileError::Cancelled`] once `flag` is set.
    ///
    /// The flag is polled once per column.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn build(self) -> Result<TileGrid, QuadtileError> {
        let level = self.level.ok_or(QuadtileError::MissingParameter("level"))?;
        check_level(level)?;
        let (a, b) = self
            .corners
            .ok_or(QuadtileError::MissingParameter("corners"))?;

        let range = TileRange::from_corners(&a, &b, level, self.policy)?;
        let count = range.cell_count();
        debug!(
            "level {}: tiles x {}..={}, y {}..={} ({} cells)",
            level, range.x_min, range.x_max, range.y_min, range.y_max, count
        );

        if let Some(limit) = self.max_cells {
            if count > limit {
                return Err(QuadtileError::TooManyCells { count, limit });
            }
        }

        let cancel = self.cancel.as_deref();
        let cells = if self.parallel {
            generate_cells_parallel(&range, self.policy, cancel)?
        } else {
            generate_cells(&range, self.policy, cancel)?
        };
        info!("Built grid of {} cells at level {}", cells.len(), level);

        Ok(TileGrid { cells, range })
    }
}

fn check_cancelled(cancel: Option<&AtomicBool>) -> Result<(), QuadtileError> {
    match cancel {
        Some(flag) if flag.load(Ordering::Relaxed) => Err(QuadtileError::Cancelled),
        _ => Ok(()),
    }
}

fn generate_cells(
    range: &TileRange,
    policy: BoundsPolicy,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<TileCell>, QuadtileError> {
    let capacity = range.cell_count().min(DEFAULT_MAX_CELLS) as usize;
    let mut cells = Vec::with_capacity(capacity);

    for x in range.x_min..=range.x_max {
        check_cancelled(cancel)?;
        for y in range.y_min..=range.y_max {
            cells.push(TileCell::from_tile_with_policy(x, y, range.level, policy)?);
        }
    }

    Ok(cells)
}

fn generate_cells_parallel(
    range: &TileRange,
    policy: BoundsPolicy,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<TileCell>, QuadtileError> {
    let (y_min, y_max, level) = (range.y_min, range.y_max, range.level);

    let columns: Vec<Vec<TileCell>> = (range.x_min..=range.x_max)
        .into_par_iter()
        .map(|x| {
            check_cancelled(cancel)?;
            (y_min..=y_max)
                .map(|y| TileCell::from_tile_with_policy(x, y, level, policy))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(columns.into_iter().flatten().collect())
}

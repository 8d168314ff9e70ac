use geo_types::{Coord, Point};
use serde::{Deserialize, Serialize};

/// Trait for types that can provide x/y coordinates.
///
/// Implemented for `(f64, f64)` tuples, `geo_types::Point<f64>` and [`GeoPoint`].
/// For geographic input x is the longitude and y is the latitude.
pub trait Coordinate {
    /// Returns the x-coordinate (longitude).
    fn x(&self) -> f64;
    /// Returns the y-coordinate (latitude).
    fn y(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn x(&self) -> f64 {
        Point::x(*self)
    }
    fn y(&self) -> f64 {
        Point::y(*self)
    }
}

impl Coordinate for GeoPoint {
    fn x(&self) -> f64 {
        self.lon
    }
    fn y(&self) -> f64 {
        self.lat
    }
}

/// A WGS 84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn from_coordinate(coord: &impl Coordinate) -> Self {
        Self {
            lat: coord.y(),
            lon: coord.x(),
        }
    }
}

impl From<GeoPoint> for Coord<f64> {
    fn from(p: GeoPoint) -> Self {
        Coord { x: p.lon, y: p.lat }
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(p: GeoPoint) -> Self {
        Point::new(p.lon, p.lat)
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from(c: Coord<f64>) -> Self {
        Self { lat: c.y, lon: c.x }
    }
}

/// Pixel position at a given level, each axis in `[0, map_size - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelCoord {
    pub x: u32,
    pub y: u32,
}

/// Tile index at a given level, each axis in `[0, 2^level - 1]`.
///
/// `y` grows southwards, like pixel rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// How conversions treat input outside the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundsPolicy {
    /// Silently clamp to the nearest valid value
    #[default]
    Clamp,
    /// Reject out-of-range input with an error
    Strict,
}

/// A rectangular region given by two opposite corners, in any order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub corner1: GeoPoint,
    pub corner2: GeoPoint,
}

impl BoundingBox {
    pub fn new(corner1: GeoPoint, corner2: GeoPoint) -> Self {
        Self { corner1, corner2 }
    }

    /// Outline of the box as a closed ring, starting at `corner1`.
    ///
    /// Vertices are `(lon1, lat1), (lon2, lat1), (lon2, lat2), (lon1, lat2)`.
    /// Coordinates are used as given, without clamping.
    pub fn outline(&self) -> geo_types::Polygon<f64> {
        let (a, b) = (self.corner1, self.corner2);
        crate::geom::ring_polygon([
            GeoPoint::new(a.lat, a.lon),
            GeoPoint::new(a.lat, b.lon),
            GeoPoint::new(b.lat, b.lon),
            GeoPoint::new(b.lat, a.lon),
        ])
    }
}

use crate::coord::GeoPoint;
use geo_types::{Coord, LineString, Polygon};

/// Builds a closed polygon from four vertices, in the order given.
pub fn ring_polygon(vertices: [GeoPoint; 4]) -> Polygon<f64> {
    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(5);
    coords.extend(vertices.iter().map(|&v| Coord::from(v)));
    coords.push(coords[0]);

    Polygon::new(LineString::from(coords), vec![])
}

/// Builds the footprint of a tile from its four corners.
///
/// The ring runs upper-left, upper-right, bottom-right, bottom-left and
/// back to upper-left.
pub fn tile_polygon(
    upper_left: GeoPoint,
    upper_right: GeoPoint,
    bottom_right: GeoPoint,
    bottom_left: GeoPoint,
) -> Polygon<f64> {
    ring_polygon([upper_left, upper_right, bottom_right, bottom_left])
}

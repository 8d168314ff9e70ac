use crate::coord::{BoundingBox, GeoPoint};
use crate::error::QuadtileError;
use geo::BoundingRect;
use geo_types::Geometry;
use geojson::GeoJson;
use std::str::FromStr;
use wkt::Wkt;

/// Parses a geometry string, auto-detecting WKT or GeoJSON format.
///
/// GeoJSON is detected by a leading `{`, everything else is tried as WKT.
pub fn parse_geometry(s: &str) -> Result<Geometry<f64>, QuadtileError> {
    let trimmed = s.trim();
    if trimmed.starts_with('{') {
        parse_geojson(trimmed)
    } else {
        parse_wkt(trimmed)
    }
}

/// Parses a GeoJSON geometry or feature into a `geo_types::Geometry`.
pub fn parse_geojson(s: &str) -> Result<Geometry<f64>, QuadtileError> {
    let geojson: GeoJson = s
        .parse()
        .map_err(|e: geojson::Error| QuadtileError::GeometryParseError(e.to_string()))?;

    let geometry = match geojson {
        GeoJson::Geometry(geom) => geom,
        GeoJson::Feature(feat) => feat.geometry.ok_or_else(|| {
            QuadtileError::GeometryParseError("Feature has no geometry".to_string())
        })?,
        GeoJson::FeatureCollection(_) => {
            return Err(QuadtileError::GeometryParseError(
                "FeatureCollection not supported, use a single geometry".to_string(),
            ));
        }
    };

    Geometry::try_from(geometry).map_err(|e| QuadtileError::GeometryParseError(e.to_string()))
}

/// Parses a WKT string into a `geo_types::Geometry`.
pub fn parse_wkt(s: &str) -> Result<Geometry<f64>, QuadtileError> {
    let wkt: Wkt<f64> =
        Wkt::from_str(s).map_err(|e| QuadtileError::GeometryParseError(e.to_string()))?;

    wkt.try_into().map_err(|_| {
        QuadtileError::GeometryParseError("Failed to convert WKT to geometry".to_string())
    })
}

/// Bounding box of a lon/lat geometry, or `None` for an empty one.
///
/// `corner1` is the north-west corner and `corner2` the south-east one.
pub fn geometry_bounds(geom: &Geometry<f64>) -> Option<BoundingBox> {
    let rect = geom.bounding_rect()?;
    Some(BoundingBox::new(
        GeoPoint::new(rect.max().y, rect.min().x),
        GeoPoint::new(rect.min().y, rect.max().x),
    ))
}

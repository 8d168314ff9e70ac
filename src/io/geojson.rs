use crate::cell::TileCell;
use crate::coord::BoundingBox;
use crate::error::QuadtileError;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, feature::Id};
use log::info;
use serde_json::json;
use std::fs;
use std::path::Path;

fn cell_feature(cell: &TileCell) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("quadkey".to_string(), json!(cell.quadkey));
    properties.insert("tile_x".to_string(), json!(cell.tile_x));
    properties.insert("tile_y".to_string(), json!(cell.tile_y));
    properties.insert("level".to_string(), json!(cell.level));

    Feature {
        bbox: None,
        geometry: Some(Geometry::from(&cell.polygon)),
        id: Some(Id::String(cell.quadkey.clone())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Builds a FeatureCollection with one polygon feature per cell.
///
/// Each feature carries `quadkey`, `tile_x`, `tile_y` and `level` properties
/// and uses the quadkey as its id.
pub fn to_feature_collection(cells: &[TileCell]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: cells.iter().map(cell_feature).collect(),
        foreign_members: None,
    }
}

fn write_collection(
    collection: &FeatureCollection,
    output_path: &Path,
) -> Result<(), QuadtileError> {
    fs::write(output_path, collection.to_string())
        .map_err(|e| QuadtileError::IoError(e.to_string()))
}

/// Writes cells to a GeoJSON FeatureCollection file.
///
/// # Example
///
/// ```no_run
/// use quadtile_rs::{GeoPoint, bbox_to_grid, write_grid_geojson};
///
/// # fn main() -> Result<(), quadtile_rs::QuadtileError> {
/// let grid = bbox_to_grid(GeoPoint::new(51.52, -0.15), GeoPoint::new(51.48, -0.08), 15)?;
/// write_grid_geojson(grid.cells(), "london.geojson")?;
/// # Ok(())
/// # }
/// ```
pub fn write_grid_geojson(
    cells: &[TileCell],
    output_path: impl AsRef<Path>,
) -> Result<(), QuadtileError> {
    write_collection(&to_feature_collection(cells), output_path.as_ref())?;
    info!(
        "Wrote {} features to {}",
        cells.len(),
        output_path.as_ref().display()
    );
    Ok(())
}

/// Writes the rectangle spanned by a bounding box as a single-feature
/// GeoJSON file.
pub fn write_outline_geojson(
    bbox: &BoundingBox,
    output_path: impl AsRef<Path>,
) -> Result<(), QuadtileError> {
    let feature = Feature {
        bbox: None,
        geometry: Some(Geometry::from(&bbox.outline())),
        id: None,
        properties: None,
        foreign_members: None,
    };
    let collection = FeatureCollection {
        bbox: None,
        features: vec![feature],
        foreign_members: None,
    };
    write_collection(&collection, output_path.as_ref())?;
    info!("Wrote bounding box outline to {}", output_path.as_ref().display());
    Ok(())
}

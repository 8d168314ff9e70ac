use crate::cell::TileCell;
use crate::error::QuadtileError;
use log::info;
use std::fs::File;
use std::path::Path;

/// Output format for tile polygon geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeometryFormat {
    /// Well-Known Text format (e.g., "POLYGON((...))")
    #[default]
    Wkt,
    /// GeoJSON format
    GeoJson,
}

/// Configuration for writing cells to CSV.
#[derive(Debug, Clone)]
pub struct CsvGridConfig {
    pub geometry: Option<GeometryFormat>,
    pub include_corners: bool,
    pub delimiter: u8,
}

impl Default for CsvGridConfig {
    fn default() -> Self {
        Self {
            geometry: Some(GeometryFormat::Wkt),
            include_corners: true,
            delimiter: b',',
        }
    }
}

impl CsvGridConfig {
    /// Config with WKT geometry and corner columns.
    ///
    /// # Example
    /// ```
    /// use quadtile_rs::{CsvGridConfig, GeometryFormat};
    ///
    /// let config = CsvGridConfig::new()
    ///     .geometry(GeometryFormat::GeoJson)
    ///     .without_corners()
    ///     .delimiter(b';');
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geometry(mut self, format: GeometryFormat) -> Self {
        self.geometry = Some(format);
        self
    }

    pub fn without_geometry(mut self) -> Self {
        self.geometry = None;
        self
    }

    pub fn without_corners(mut self) -> Self {
        self.include_corners = false;
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

fn corner_fields(cell: &TileCell) -> [String; 8] {
    let c = &cell.corners;
    [
        c.upper_left.lat,
        c.upper_right.lat,
        c.bottom_left.lat,
        c.bottom_right.lat,
        c.upper_left.lon,
        c.upper_right.lon,
        c.bottom_left.lon,
        c.bottom_right.lon,
    ]
    .map(|v| v.to_string())
}

fn polygon_to_wkt(polygon: &geo_types::Polygon<f64>) -> String {
    use wkt::ToWkt;
    polygon.wkt_string()
}

fn polygon_to_geojson(polygon: &geo_types::Polygon<f64>) -> String {
    let geom = geojson::Geometry::from(polygon);
    geom.to_string()
}

fn header(config: &CsvGridConfig) -> Vec<&'static str> {
    let mut header = vec!["quadkey", "level", "tile_x", "tile_y"];
    if config.include_corners {
        header.extend([
            "lat_ul", "lat_ur", "lat_bl", "lat_br", "long_ul", "long_ur", "long_bl", "long_br",
        ]);
    }
    if config.geometry.is_some() {
        header.push("geometry");
    }
    header
}

/// Writes cells to a CSV file, one row per cell.
///
/// # Example
///
/// ```no_run
/// use quadtile_rs::{CsvGridConfig, GeoPoint, bbox_to_grid, write_grid_csv};
///
/// # fn main() -> Result<(), quadtile_rs::QuadtileError> {
/// let grid = bbox_to_grid(GeoPoint::new(45.52, 9.08), GeoPoint::new(45.40, 9.28), 14)?;
/// write_grid_csv(grid.cells(), "milan.csv", &CsvGridConfig::default())?;
/// # Ok(())
/// # }
/// ```
pub fn write_grid_csv(
    cells: &[TileCell],
    output_path: impl AsRef<Path>,
    config: &CsvGridConfig,
) -> Result<(), QuadtileError> {
    let out_file =
        File::create(output_path.as_ref()).map_err(|e| QuadtileError::IoError(e.to_string()))?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(false)
        .from_writer(out_file);

    writer
        .write_record(header(config))
        .map_err(|e| QuadtileError::CsvError(e.to_string()))?;

    for cell in cells {
        let mut row: Vec<String> = vec![
            cell.quadkey.clone(),
            cell.level.to_string(),
            cell.tile_x.to_string(),
            cell.tile_y.to_string(),
        ];

        if config.include_corners {
            row.extend(corner_fields(cell));
        }

        if let Some(format) = config.geometry {
            row.push(match format {
                GeometryFormat::Wkt => polygon_to_wkt(&cell.polygon),
                GeometryFormat::GeoJson => polygon_to_geojson(&cell.polygon),
            });
        }

        writer
            .write_record(&row)
            .map_err(|e| QuadtileError::CsvError(e.to_string()))?;
    }

    writer
        .flush()
        .map_err(|e| QuadtileError::CsvError(e.to_string()))?;

    info!(
        "Wrote {} cells to {}",
        cells.len(),
        output_path.as_ref().display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::GeoPoint;
    use crate::grid::bbox_to_grid;
    use tempfile::tempdir;

    fn read(path: &Path) -> Result<String, QuadtileError> {
        std::fs::read_to_string(path).map_err(|e| QuadtileError::IoError(e.to_string()))
    }

    #[test]
    fn test_write_grid_csv_wkt() -> Result<(), QuadtileError> {
        let dir = tempdir().map_err(|e| QuadtileError::IoError(e.to_string()))?;
        let path = dir.path().join("grid.csv");
        let grid = bbox_to_grid(GeoPoint::new(45.52, 9.08), GeoPoint::new(45.40, 9.28), 12)?;

        write_grid_csv(grid.cells(), &path, &CsvGridConfig::default())?;

        let output = read(&path)?;
        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some(
                "quadkey,level,tile_x,tile_y,lat_ul,lat_ur,lat_bl,lat_br,\
                 long_ul,long_ur,long_bl,long_br,geometry"
            )
        );
        assert_eq!(lines.count(), grid.len());
        assert!(output.contains("POLYGON(("));
        assert!(output.contains(&grid.cells()[0].quadkey));
        Ok(())
    }

    #[test]
    fn test_write_grid_csv_geojson_without_corners() -> Result<(), QuadtileError> {
        let dir = tempdir().map_err(|e| QuadtileError::IoError(e.to_string()))?;
        let path = dir.path().join("grid.csv");
        let cells = vec![TileCell::from_quadkey("31")?];

        let config = CsvGridConfig::new()
            .geometry(GeometryFormat::GeoJson)
            .without_corners();
        write_grid_csv(&cells, &path, &config)?;

        let output = read(&path)?;
        assert!(output.starts_with("quadkey,level,tile_x,tile_y,geometry\n"));
        assert!(output.contains("31,2,3,2,"));
        assert!(output.contains("Polygon"));
        assert!(!output.contains("lat_ul"));
        Ok(())
    }

    #[test]
    fn test_write_grid_csv_attributes_only() -> Result<(), QuadtileError> {
        let dir = tempdir().map_err(|e| QuadtileError::IoError(e.to_string()))?;
        let path = dir.path().join("grid.tsv");
        let cells = vec![TileCell::from_tile(1, 1, 1)?];

        let config = CsvGridConfig::new()
            .without_geometry()
            .without_corners()
            .delimiter(b'\t');
        write_grid_csv(&cells, &path, &config)?;

        assert_eq!(read(&path)?, "quadkey\tlevel\ttile_x\ttile_y\n3\t1\t1\t1\n");
        Ok(())
    }
}

use clap::Parser;
use env_logger::Builder;
use log::{debug, info};
use quadtile_rs::{
    BoundingBox, BoundsPolicy, CsvGridConfig, DEFAULT_MAX_CELLS, GeoPoint, GeometryFormat,
    MAX_LEVEL, QuadtileError, TileGrid, TileRange, geometry_bounds, parse_geometry, write_grid_csv,
    write_grid_geojson, write_outline_geojson,
};
use serde::Serialize;
use std::env;
use std::path::PathBuf;

#[derive(clap::ValueEnum, Clone, Default, Debug, Serialize, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
enum OutputFormat {
    #[default]
    Parquet,
    Csv,
    Geojson,
}

#[derive(clap::ValueEnum, Clone, Default, Debug, Copy, PartialEq)]
enum CsvGeometry {
    #[default]
    Wkt,
    Geojson,
}

impl From<CsvGeometry> for GeometryFormat {
    fn from(value: CsvGeometry) -> Self {
        match value {
            CsvGeometry::Wkt => GeometryFormat::Wkt,
            CsvGeometry::Geojson => GeometryFormat::GeoJson,
        }
    }
}

fn parse_lat_lon(s: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{s}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude '{lat}': {e}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude '{lon}': {e}"))?;
    if !lat.is_finite() || !lon.is_finite() {
        return Err(format!("coordinates must be finite numbers, got '{s}'"));
    }
    Ok(GeoPoint::new(lat, lon))
}

/// Generate the quadkey-labelled tiles covering a bounding box
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// First corner of the bounding box, as LAT,LON
    #[arg(long, value_parser = parse_lat_lon, allow_hyphen_values = true, requires = "corner2")]
    corner1: Option<GeoPoint>,

    /// Opposite corner of the bounding box, as LAT,LON
    #[arg(long, value_parser = parse_lat_lon, allow_hyphen_values = true, requires = "corner1")]
    corner2: Option<GeoPoint>,

    /// WKT or GeoJSON geometry whose bounding rectangle is gridded
    #[arg(long, conflicts_with_all = ["corner1", "corner2"], required_unless_present = "corner1")]
    geometry: Option<String>,

    /// Level of detail (0-23)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=i64::from(MAX_LEVEL)))]
    level: u8,

    /// Output file
    #[arg(long)]
    output: PathBuf,

    #[arg(long, default_value_t, value_enum)]
    format: OutputFormat,

    /// Geometry encoding of the CSV geometry column
    #[arg(long, default_value_t, value_enum)]
    geometry_format: CsvGeometry,

    /// Refuse grids with more cells than this
    #[arg(long, default_value_t = DEFAULT_MAX_CELLS)]
    max_cells: u64,

    /// Build the grid whatever its size
    #[arg(long, default_value_t = false, conflicts_with = "max_cells")]
    no_cell_limit: bool,

    /// Reject out-of-range coordinates instead of clamping them
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Build columns in parallel
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Also write the bounding box rectangle as GeoJSON
    #[arg(long)]
    outline: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG is used when absent
    #[arg(long)]
    loglevel: Option<String>,
}

#[derive(Serialize, Debug)]
struct Summary {
    level: u8,
    cells: usize,
    range: TileRange,
    format: OutputFormat,
    output: PathBuf,
}

fn init_logger(loglevel: Option<&str>) {
    let mut builder = Builder::new();
    let filters = match (loglevel, env::var("RUST_LOG")) {
        (None, Ok(rust_log)) => rust_log,
        (level, _) => level.unwrap_or("info").to_string(),
    };
    builder.parse_filters(&filters);
    builder.init();
}

fn bounding_box(args: &Args) -> Result<BoundingBox, QuadtileError> {
    match (&args.geometry, args.corner1, args.corner2) {
        (Some(text), _, _) => {
            let geom = parse_geometry(text)?;
            geometry_bounds(&geom).ok_or_else(|| {
                QuadtileError::GeometryParseError("geometry has no extent".to_string())
            })
        }
        (None, Some(a), Some(b)) => Ok(BoundingBox::new(a, b)),
        _ => Err(QuadtileError::MissingParameter("corner1/corner2 or geometry")),
    }
}

fn run(args: &Args) -> Result<Summary, QuadtileError> {
    let bbox = bounding_box(args)?;
    debug!("bounding box {:?}", bbox);

    let policy = if args.strict {
        BoundsPolicy::Strict
    } else {
        BoundsPolicy::Clamp
    };

    let mut builder = TileGrid::builder()
        .level(args.level)
        .bbox(&bbox)
        .max_cells(args.max_cells)
        .policy(policy)
        .parallel(args.parallel);
    if args.no_cell_limit {
        builder = builder.no_cell_limit();
    }
    let grid = builder.build()?;

    match args.format {
        OutputFormat::Parquet => grid.to_geoparquet(&args.output)?,
        OutputFormat::Csv => {
            let config = CsvGridConfig::new().geometry(args.geometry_format.into());
            write_grid_csv(grid.cells(), &args.output, &config)?
        }
        OutputFormat::Geojson => write_grid_geojson(grid.cells(), &args.output)?,
    }

    if let Some(outline) = &args.outline {
        write_outline_geojson(&bbox, outline)?;
    }

    Ok(Summary {
        level: grid.level(),
        cells: grid.len(),
        range: *grid.range(),
        format: args.format,
        output: args.output.clone(),
    })
}

fn main() -> Result<(), QuadtileError> {
    let args = Args::parse();
    init_logger(args.loglevel.as_deref());

    let summary = run(&args)?;
    info!("Done: {} cells", summary.cells);

    let json = serde_json::to_string_pretty(&summary)
        .map_err(|e| QuadtileError::IoError(e.to_string()))?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_lat_lon() {
        assert_eq!(
            parse_lat_lon("45.52, -9.08"),
            Ok(GeoPoint::new(45.52, -9.08))
        );
        assert!(parse_lat_lon("45.52").is_err());
        assert!(parse_lat_lon("north,9.08").is_err());
        assert!(parse_lat_lon("nan,1").is_err());
        assert!(parse_lat_lon("1,NaN").is_err());
        assert!(parse_lat_lon("inf,1").is_err());
    }

    #[test]
    fn test_args_level_range() {
        let parse = |level: &str| {
            Args::try_parse_from([
                "quadtile", "--corner1", "1,1", "--corner2", "2,2", "--level", level, "--output",
                "out",
            ])
        };
        assert!(parse("0").is_ok());
        assert!(parse("23").is_ok());
        assert!(parse("24").is_err());
        assert!(parse("-1").is_err());
    }

    #[test]
    fn test_args_no_cell_limit() {
        let args = Args::try_parse_from([
            "quadtile",
            "--corner1",
            "1,1",
            "--corner2",
            "2,2",
            "--level",
            "3",
            "--output",
            "out",
            "--no-cell-limit",
        ]);
        assert!(matches!(args, Ok(ref a) if a.no_cell_limit));

        let both = Args::try_parse_from([
            "quadtile",
            "--corner1",
            "1,1",
            "--corner2",
            "2,2",
            "--level",
            "3",
            "--output",
            "out",
            "--no-cell-limit",
            "--max-cells",
            "10",
        ]);
        assert!(both.is_err());
    }

    #[test]
    fn test_args_corners() {
        let args = Args::try_parse_from([
            "quadtile",
            "--corner1",
            "-33.80,151.15",
            "--corner2",
            "-33.95,151.30",
            "--level",
            "12",
            "--output",
            "grid.csv",
            "--format",
            "csv",
        ]);
        assert!(args.is_ok());
        if let Ok(args) = args {
            assert_eq!(args.corner1, Some(GeoPoint::new(-33.80, 151.15)));
            assert_eq!(args.format, OutputFormat::Csv);
            assert_eq!(args.geometry_format, CsvGeometry::Wkt);
            assert_eq!(args.max_cells, DEFAULT_MAX_CELLS);
            assert!(!args.strict);
        }
    }

    #[test]
    fn test_args_require_an_extent() {
        let missing = Args::try_parse_from(["quadtile", "--level", "3", "--output", "out"]);
        assert!(missing.is_err());

        let both = Args::try_parse_from([
            "quadtile",
            "--corner1",
            "1,1",
            "--corner2",
            "2,2",
            "--geometry",
            "POINT(1 1)",
            "--level",
            "3",
            "--output",
            "out",
        ]);
        assert!(both.is_err());
    }

    #[test]
    fn test_run_geometry_to_geojson() -> Result<(), QuadtileError> {
        let dir = tempdir().map_err(|e| QuadtileError::IoError(e.to_string()))?;
        let output = dir.path().join("grid.geojson");
        let outline = dir.path().join("outline.geojson");

        let args = Args::try_parse_from([
            "quadtile",
            "--geometry",
            "LINESTRING(-0.15 51.52, -0.08 51.48)",
            "--level",
            "12",
            "--output",
            output.to_string_lossy().as_ref(),
            "--format",
            "geojson",
            "--outline",
            outline.to_string_lossy().as_ref(),
        ])
        .map_err(|e| QuadtileError::IoError(e.to_string()))?;

        let summary = run(&args)?;
        assert!(summary.cells > 0);
        assert_eq!(summary.cells as u64, summary.range.cell_count());
        assert!(output.exists());
        assert!(outline.exists());
        Ok(())
    }

    #[test]
    fn test_run_respects_max_cells() -> Result<(), QuadtileError> {
        let dir = tempdir().map_err(|e| QuadtileError::IoError(e.to_string()))?;
        let output = dir.path().join("grid.parquet");

        let args = Args::try_parse_from([
            "quadtile",
            "--corner1",
            "60,-10",
            "--corner2",
            "35,30",
            "--level",
            "10",
            "--output",
            output.to_string_lossy().as_ref(),
            "--max-cells",
            "100",
        ])
        .map_err(|e| QuadtileError::IoError(e.to_string()))?;

        assert!(matches!(
            run(&args),
            Err(QuadtileError::TooManyCells { limit: 100, .. })
        ));
        assert!(!output.exists());
        Ok(())
    }

    #[test]
    fn test_run_without_cell_limit() -> Result<(), QuadtileError> {
        let dir = tempdir().map_err(|e| QuadtileError::IoError(e.to_string()))?;
        let output = dir.path().join("grid.csv");

        let args = Args::try_parse_from([
            "quadtile",
            "--corner1",
            "85,-180",
            "--corner2",
            "-85,180",
            "--level",
            "3",
            "--output",
            output.to_string_lossy().as_ref(),
            "--format",
            "csv",
            "--no-cell-limit",
        ])
        .map_err(|e| QuadtileError::IoError(e.to_string()))?;

        let summary = run(&args)?;
        assert_eq!(summary.cells, 64);
        assert!(output.exists());
        Ok(())
    }
}

pub mod arrow;
pub mod csv;
pub mod geojson;
pub mod parquet;

pub use self::arrow::TileCellsToArrow;
pub use self::csv::{CsvGridConfig, GeometryFormat, write_grid_csv};
pub use self::geojson::{to_feature_collection, write_grid_geojson, write_outline_geojson};
pub use self::parquet::{TileCellsToGeoParquet, write_geoparquet};

/// Error type for quadtile-rs operations.
#[derive(Debug, PartialEq)]
pub enum QuadtileError {
    /// The level of detail is outside the supported range (0-23).
    InvalidLevel(u8),
    /// Latitude outside the Mercator band (strict mode only).
    LatitudeOutOfRange(f64),
    /// Longitude outside [-180, 180] (strict mode only).
    LongitudeOutOfRange(f64),
    /// Pixel coordinate outside the map at the given level (strict mode only).
    PixelOutOfRange { x: u32, y: u32, level: u8 },
    /// Tile index outside the grid at the given level (strict mode only).
    TileOutOfRange { x: u32, y: u32, level: u8 },
    /// The quadkey contains a character other than '0'-'3'.
    InvalidQuadkeyDigit(char),
    /// The quadkey is longer than the deepest supported level.
    QuadkeyTooLong(usize),
    /// The requested grid exceeds the configured cell limit.
    TooManyCells { count: u64, limit: u64 },
    /// A required builder field was not set.
    MissingParameter(&'static str),
    /// Grid generation was cancelled.
    Cancelled,
    /// File I/O or serialization error.
    IoError(String),
    /// CSV writing error.
    CsvError(String),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    GeometryParseError(String),
}

impl std::fmt::Display for QuadtileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuadtileError::InvalidLevel(l) => write!(f, "Invalid level of detail: {}", l),
            QuadtileError::LatitudeOutOfRange(lat) => write!(f, "Latitude out of range: {}", lat),
            QuadtileError::LongitudeOutOfRange(lon) => {
                write!(f, "Longitude out of range: {}", lon)
            }
            QuadtileError::PixelOutOfRange { x, y, level } => {
                write!(f, "Pixel ({}, {}) out of range at level {}", x, y, level)
            }
            QuadtileError::TileOutOfRange { x, y, level } => {
                write!(f, "Tile ({}, {}) out of range at level {}", x, y, level)
            }
            QuadtileError::InvalidQuadkeyDigit(c) => write!(f, "Invalid quadkey digit: '{}'", c),
            QuadtileError::QuadkeyTooLong(len) => write!(f, "Quadkey too long: {} digits", len),
            QuadtileError::TooManyCells { count, limit } => {
                write!(f, "Grid has {} cells, limit is {}", count, limit)
            }
            QuadtileError::MissingParameter(name) => write!(f, "Missing parameter: {}", name),
            QuadtileError::Cancelled => write!(f, "Grid generation cancelled"),
            QuadtileError::IoError(msg) => write!(f, "IO error: {}", msg),
            QuadtileError::CsvError(msg) => write!(f, "CSV error: {}", msg),
            QuadtileError::GeometryParseError(msg) => write!(f, "Geometry parse error: {}", msg),
        }
    }
}

impl std::error::Error for QuadtileError {}

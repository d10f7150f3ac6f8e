use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Elevation samples, indexed `[row, col]` with row 0 at the north edge.
/// Missing samples are `f64::NAN`.
pub type ElevationGrid = Array2<f64>;

/// Slope in degrees, same shape as the elevation grid
pub type SlopeRaster = Array2<f64>;

/// Aspect in degrees, same shape as the elevation grid
pub type AspectRaster = Array2<f64>;

/// Geospatial transformation parameters (GDAL ordering)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub top_left_x: f64,
    pub pixel_width: f64,
    pub rotation_x: f64,
    pub top_left_y: f64,
    pub rotation_y: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Build from GDAL's six-element array
    pub fn from_gdal(gt: [f64; 6]) -> Self {
        Self {
            top_left_x: gt[0],
            pixel_width: gt[1],
            rotation_x: gt[2],
            top_left_y: gt[3],
            rotation_y: gt[4],
            pixel_height: gt[5],
        }
    }

    /// Six-element array as expected by `Dataset::set_geo_transform`
    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.top_left_x,
            self.pixel_width,
            self.rotation_x,
            self.top_left_y,
            self.rotation_y,
            self.pixel_height,
        ]
    }

    /// North-up transform without rotation terms
    pub fn north_up(top_left_x: f64, top_left_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            top_left_x,
            pixel_width,
            rotation_x: 0.0,
            top_left_y,
            rotation_y: 0.0,
            pixel_height,
        }
    }

    /// Both pixel dimensions are non-zero and finite
    pub fn has_valid_pixel_size(&self) -> bool {
        self.pixel_width != 0.0
            && self.pixel_height != 0.0
            && self.pixel_width.is_finite()
            && self.pixel_height.is_finite()
    }
}

/// Coordinate reference system descriptor, usually WKT as reported by GDAL.
///
/// Slope computation never parses it. Whether horizontal units are degrees or
/// meters is inferred from the pixel width instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionHint(pub String);

impl ProjectionHint {
    pub fn new(wkt: impl Into<String>) -> Self {
        Self(wkt.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// Real-world cell dimensions in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSpacing {
    pub xsize: f64,
    pub ysize: f64,
}

/// East-west (dx) and north-south (dy) elevation gradients in
/// elevation units per meter
#[derive(Debug, Clone)]
pub struct GradientField {
    pub dx: Array2<f64>,
    pub dy: Array2<f64>,
}

impl GradientField {
    pub fn dim(&self) -> (usize, usize) {
        self.dx.dim()
    }
}

/// Error types for slope/aspect processing
#[derive(Debug, thiserror::Error)]
pub enum SlopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),
}

/// Result type for slope/aspect operations
pub type SlopeResult<T> = Result<T, SlopeError>;

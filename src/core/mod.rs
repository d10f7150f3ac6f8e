//! Core slope/aspect processing modules

pub mod border;
pub mod gradient;
pub mod pixel_metric;
pub mod slope_aspect;

// Re-export main types
pub use border::pad_edges;
pub use gradient::{compute_gradient, GradientKernel};
pub use pixel_metric::{pixel_size, PixelMetric, ANGULAR_PIXEL_THRESHOLD, METERS_PER_DEGREE};
pub use slope_aspect::{
    compute_slope_aspect, slope_aspect_at, SlopeAspectCalculator, SlopeAspectParams,
    SlopeAspectSummary,
};

use crate::core::border::pad_edges;
use crate::core::gradient::GradientKernel;
use crate::core::pixel_metric::{PixelMetric, ANGULAR_PIXEL_THRESHOLD, METERS_PER_DEGREE};
use crate::types::{
    AspectRaster, CellSpacing, ElevationGrid, GeoTransform, GradientField, ProjectionHint,
    SlopeError, SlopeRaster, SlopeResult,
};
use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

/// Parameters for slope/aspect computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlopeAspectParams {
    /// Pixel widths below this are treated as degrees
    pub angular_threshold: f64,
    /// Meters per degree used for angular grids
    pub meters_per_degree: f64,
    /// Use rayon when the `parallel` feature is compiled in
    pub enable_parallel: bool,
    /// Rows per parallel task
    pub chunk_size: usize,
}

impl Default for SlopeAspectParams {
    fn default() -> Self {
        Self {
            angular_threshold: ANGULAR_PIXEL_THRESHOLD,
            meters_per_degree: METERS_PER_DEGREE,
            enable_parallel: true,
            chunk_size: 64,
        }
    }
}

/// Slope/aspect processor
#[derive(Debug, Clone)]
pub struct SlopeAspectCalculator {
    params: SlopeAspectParams,
}

impl SlopeAspectCalculator {
    /// Create a new slope/aspect processor
    pub fn new(params: SlopeAspectParams) -> Self {
        Self { params }
    }

    /// Processor with default parameters
    pub fn standard() -> Self {
        Self::new(SlopeAspectParams::default())
    }

    pub fn params(&self) -> &SlopeAspectParams {
        &self.params
    }

    pub fn pixel_metric(&self) -> PixelMetric {
        PixelMetric::new(self.params.angular_threshold, self.params.meters_per_degree)
    }

    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    fn use_parallel(&self, rows: usize) -> bool {
        cfg!(feature = "parallel") && self.params.enable_parallel && rows > self.params.chunk_size
    }

    /// Gradient field of an elevation grid with known cell spacing
    pub fn compute_gradient(
        &self,
        elevation: &ElevationGrid,
        spacing: CellSpacing,
    ) -> SlopeResult<GradientField> {
        let padded = pad_edges(elevation);
        let kernel = GradientKernel::new(spacing);

        #[cfg(feature = "parallel")]
        {
            if self.use_parallel(elevation.nrows()) {
                return kernel.apply_parallel(&padded, self.params.chunk_size);
            }
        }

        kernel.apply(&padded)
    }

    /// Convert gradients to (slope, aspect) in degrees.
    ///
    /// slope = atan(hypot(dx, dy)), aspect = atan2(dy, -dx). NaN in either
    /// component gives NaN for both outputs.
    pub fn gradient_to_slope_aspect(
        &self,
        gradient: &GradientField,
    ) -> SlopeResult<(SlopeRaster, AspectRaster)> {
        let (dx, dy) = (&gradient.dx, &gradient.dy);
        if dx.dim() != dy.dim() {
            return Err(SlopeError::ShapeMismatch {
                expected: dx.dim(),
                found: dy.dim(),
            });
        }

        let mut slope = Array2::<f64>::zeros(dx.dim());
        let mut aspect = Array2::<f64>::zeros(dx.dim());

        let zip = Zip::from(&mut slope).and(&mut aspect).and(dx).and(dy);

        #[cfg(feature = "parallel")]
        {
            if self.use_parallel(dx.nrows()) {
                zip.par_for_each(|s, a, &gx, &gy| {
                    let (slope_deg, aspect_deg) = slope_aspect_at(gx, gy);
                    *s = slope_deg;
                    *a = aspect_deg;
                });
                return Ok((slope, aspect));
            }
        }

        zip.for_each(|s, a, &gx, &gy| {
            let (slope_deg, aspect_deg) = slope_aspect_at(gx, gy);
            *s = slope_deg;
            *a = aspect_deg;
        });

        Ok((slope, aspect))
    }

    /// Full pipeline: cell spacing, edge padding, gradient, trigonometry
    pub fn compute(
        &self,
        elevation: &ElevationGrid,
        geo_transform: &GeoTransform,
        projection: &ProjectionHint,
    ) -> SlopeResult<(SlopeRaster, AspectRaster)> {
        let (rows, cols) = elevation.dim();
        log::debug!("Calculating slope and aspect for {}x{} DEM", cols, rows);

        if rows < 3 || cols < 3 {
            log::warn!(
                "DEM is only {}x{}; every cell's neighbourhood touches the border",
                cols,
                rows
            );
        }

        if !geo_transform.has_valid_pixel_size() {
            return Err(SlopeError::InvalidFormat(format!(
                "geotransform has degenerate pixel size ({}, {})",
                geo_transform.pixel_width, geo_transform.pixel_height
            )));
        }

        let spacing = self.pixel_metric().cell_spacing(geo_transform, projection);
        let gradient = self.compute_gradient(elevation, spacing)?;
        self.gradient_to_slope_aspect(&gradient)
    }
}

/// Slope and aspect in degrees for one gradient vector.
///
/// Aspect lies in (-180, 180]; a -180 from `atan2(-0.0, ..)` is folded to 180.
/// Slope stays below 90 until the gradient magnitude passes roughly 1e16,
/// where `atan` rounds to exactly π/2.
#[inline]
pub fn slope_aspect_at(dx: f64, dy: f64) -> (f64, f64) {
    if dx.is_nan() || dy.is_nan() {
        return (f64::NAN, f64::NAN);
    }
    let slope = dx.hypot(dy).atan().to_degrees();
    let aspect = dy.atan2(-dx).to_degrees();
    let aspect = if aspect == -180.0 { 180.0 } else { aspect };
    (slope, aspect)
}

/// Slope and aspect in degrees using default parameters
pub fn compute_slope_aspect(
    elevation: &ElevationGrid,
    geo_transform: &GeoTransform,
    projection: &ProjectionHint,
) -> SlopeResult<(SlopeRaster, AspectRaster)> {
    SlopeAspectCalculator::standard().compute(elevation, geo_transform, projection)
}

/// Summary statistics over a slope raster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlopeAspectSummary {
    pub valid_cells: usize,
    pub missing_cells: usize,
    pub min_slope: f64,
    pub max_slope: f64,
    pub mean_slope: f64,
}

impl SlopeAspectSummary {
    /// Statistics over non-NaN cells. Min/max/mean are NaN when no cell is valid.
    pub fn from_slope(slope: &SlopeRaster) -> Self {
        let mut valid_cells = 0usize;
        let mut min_slope = f64::INFINITY;
        let mut max_slope = f64::NEG_INFINITY;
        let mut sum = 0.0;

        for &v in slope.iter().filter(|v| !v.is_nan()) {
            valid_cells += 1;
            min_slope = min_slope.min(v);
            max_slope = max_slope.max(v);
            sum += v;
        }

        let missing_cells = slope.len() - valid_cells;

        if valid_cells == 0 {
            return Self {
                valid_cells,
                missing_cells,
                min_slope: f64::NAN,
                max_slope: f64::NAN,
                mean_slope: f64::NAN,
            };
        }

        Self {
            valid_cells,
            missing_cells,
            min_slope,
            max_slope,
            mean_slope: sum / valid_cells as f64,
        }
    }

    pub fn missing_fraction(&self) -> f64 {
        let total = self.valid_cells + self.missing_cells;
        if total == 0 {
            0.0
        } else {
            self.missing_cells as f64 / total as f64
        }
    }
}

use crate::types::{CellSpacing, GeoTransform, ProjectionHint};

/// Pixel widths below this magnitude are taken to be in degrees
pub const ANGULAR_PIXEL_THRESHOLD: f64 = 0.2;

/// Length of one degree of latitude in meters
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Converts geotransform pixel dimensions into cell spacing in meters.
///
/// Angular grids are recognised by the magnitude of the pixel width alone; the
/// projection descriptor is not consulted. For angular grids the east-west
/// spacing is scaled by the cosine of the geotransform origin latitude, a single
/// reference latitude for the whole grid. Rows far from the top edge of a
/// large-extent grid get a slightly wrong east-west spacing as a result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelMetric {
    pub angular_threshold: f64,
    pub meters_per_degree: f64,
}

impl Default for PixelMetric {
    fn default() -> Self {
        Self {
            angular_threshold: ANGULAR_PIXEL_THRESHOLD,
            meters_per_degree: METERS_PER_DEGREE,
        }
    }
}

impl PixelMetric {
    pub fn new(angular_threshold: f64, meters_per_degree: f64) -> Self {
        Self {
            angular_threshold,
            meters_per_degree,
        }
    }

    /// Whether the horizontal units of the grid look like degrees
    pub fn is_angular(&self, geo_transform: &GeoTransform) -> bool {
        geo_transform.pixel_width.abs() < self.angular_threshold
    }

    /// Cell spacing (xsize, ysize) in meters
    pub fn cell_spacing(
        &self,
        geo_transform: &GeoTransform,
        _projection: &ProjectionHint,
    ) -> CellSpacing {
        let pixel_width = geo_transform.pixel_width.abs();
        let pixel_height = geo_transform.pixel_height.abs();

        let spacing = if self.is_angular(geo_transform) {
            let reference_latitude = geo_transform.top_left_y;
            CellSpacing {
                xsize: self.meters_per_degree * reference_latitude.to_radians().cos() * pixel_width,
                ysize: self.meters_per_degree * pixel_height,
            }
        } else {
            CellSpacing {
                xsize: pixel_width,
                ysize: pixel_height,
            }
        };

        log::debug!(
            "Cell spacing: {:.4} x {:.4} m (angular: {})",
            spacing.xsize,
            spacing.ysize,
            self.is_angular(geo_transform)
        );

        spacing
    }
}

/// Cell spacing in meters using the default threshold and degree length
pub fn pixel_size(geo_transform: &GeoTransform, projection: &ProjectionHint) -> CellSpacing {
    PixelMetric::default().cell_spacing(geo_transform, projection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_geographic_spacing_at_45_degrees() {
        let gt = GeoTransform::north_up(10.0, 45.0, 0.0008, -0.0008);
        let spacing = pixel_size(&gt, &ProjectionHint::default());

        let expected_x = 111_320.0 * 45.0_f64.to_radians().cos() * 0.0008;
        assert_abs_diff_eq!(spacing.xsize, expected_x, epsilon = 1e-9);
        assert_abs_diff_eq!(spacing.xsize, 62.98, epsilon = 0.01);
        assert_abs_diff_eq!(spacing.ysize, 111_320.0 * 0.0008, epsilon = 1e-9);
    }

    #[test]
    fn test_projected_spacing_passes_through() {
        let gt = GeoTransform::north_up(500_000.0, 4_200_000.0, 30.0, -30.0);
        let spacing = pixel_size(&gt, &ProjectionHint::new("PROJCS[\"UTM 33N\"]"));

        assert_eq!(spacing.xsize, 30.0);
        assert_eq!(spacing.ysize, 30.0);
    }

    #[test]
    fn test_threshold_boundary_is_exclusive() {
        let metric = PixelMetric::default();
        let at = GeoTransform::north_up(0.0, 0.0, 0.2, -0.2);
        let below = GeoTransform::north_up(0.0, 0.0, 0.19, -0.19);

        assert!(!metric.is_angular(&at));
        assert!(metric.is_angular(&below));
        assert_eq!(metric.cell_spacing(&at, &ProjectionHint::default()).xsize, 0.2);
    }

    #[test]
    fn test_negative_pixel_width_uses_magnitude() {
        let gt = GeoTransform::north_up(0.0, 0.0, -25.0, 25.0);
        let spacing = pixel_size(&gt, &ProjectionHint::default());

        assert_eq!(spacing.xsize, 25.0);
        assert_eq!(spacing.ysize, 25.0);
    }

    #[test]
    fn test_pixel_size_is_deterministic() {
        let gt = GeoTransform::north_up(-122.5, 37.7, 0.000277, -0.000277);
        let hint = ProjectionHint::new("GEOGCS[\"WGS 84\"]");

        let first = pixel_size(&gt, &hint);
        let second = pixel_size(&gt, &hint);

        assert_eq!(first.xsize.to_bits(), second.xsize.to_bits());
        assert_eq!(first.ysize.to_bits(), second.ysize.to_bits());
    }
}

//! Weighted 3x3 finite-difference gradient (Horn / Sobel weights).
//!
//! For a padded neighbourhood
//! ```text
//! a b c
//! d e f
//! g h i
//! ```
//! centred on each original cell:
//!
//! dx = ((c - a) + 2(f - d) + (i - g)) / (8 * xsize)
//! dy = ((g - a) + 2(h - b) + (i - c)) / (8 * ysize)
//!
//! Row 0 is north, so dy is positive when elevation increases southward.

use crate::types::{CellSpacing, GradientField, SlopeError, SlopeResult};
use ndarray::Array2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Gradient operator bound to a cell spacing
#[derive(Debug, Clone, Copy)]
pub struct GradientKernel {
    spacing: CellSpacing,
}

impl GradientKernel {
    pub fn new(spacing: CellSpacing) -> Self {
        Self { spacing }
    }

    pub fn spacing(&self) -> CellSpacing {
        self.spacing
    }

    /// Gradient at original-grid position (row, col) of an edge-padded grid.
    /// NaN anywhere in the 3x3 window gives NaN for both components.
    #[inline]
    pub fn at(&self, padded: &Array2<f64>, row: usize, col: usize) -> (f64, f64) {
        let a = padded[[row, col]];
        let b = padded[[row, col + 1]];
        let c = padded[[row, col + 2]];
        let d = padded[[row + 1, col]];
        let e = padded[[row + 1, col + 1]];
        let f = padded[[row + 1, col + 2]];
        let g = padded[[row + 2, col]];
        let h = padded[[row + 2, col + 1]];
        let i = padded[[row + 2, col + 2]];

        if [a, b, c, d, e, f, g, h, i].iter().any(|v| v.is_nan()) {
            return (f64::NAN, f64::NAN);
        }

        let dx = ((c - a) + 2.0 * (f - d) + (i - g)) / (8.0 * self.spacing.xsize);
        let dy = ((g - a) + 2.0 * (h - b) + (i - c)) / (8.0 * self.spacing.ysize);

        (dx, dy)
    }

    /// Compute one output row
    #[cfg(feature = "parallel")]
    fn row(&self, padded: &Array2<f64>, row: usize, cols: usize) -> (Vec<f64>, Vec<f64>) {
        let mut dx_row = Vec::with_capacity(cols);
        let mut dy_row = Vec::with_capacity(cols);

        for col in 0..cols {
            let (dx, dy) = self.at(padded, row, col);
            dx_row.push(dx);
            dy_row.push(dy);
        }

        (dx_row, dy_row)
    }

    /// Apply the operator to every cell, sequentially
    pub fn apply(&self, padded: &Array2<f64>) -> SlopeResult<GradientField> {
        let (rows, cols) = output_dim(padded)?;

        let mut dx = Array2::<f64>::zeros((rows, cols));
        let mut dy = Array2::<f64>::zeros((rows, cols));

        for i in 0..rows {
            for j in 0..cols {
                let (gx, gy) = self.at(padded, i, j);
                dx[[i, j]] = gx;
                dy[[i, j]] = gy;
            }
        }

        Ok(GradientField { dx, dy })
    }

    /// Apply the operator with rayon, `chunk_size` rows per task.
    /// Output is bit-identical to [`GradientKernel::apply`].
    #[cfg(feature = "parallel")]
    pub fn apply_parallel(&self, padded: &Array2<f64>, chunk_size: usize) -> SlopeResult<GradientField> {
        let (rows, cols) = output_dim(padded)?;
        let chunk_size = chunk_size.max(1);

        log::debug!(
            "Parallel gradient: {} rows in chunks of {} on {} threads",
            rows,
            chunk_size,
            rayon::current_num_threads()
        );

        let row_indices: Vec<usize> = (0..rows).collect();
        let results: Vec<(Vec<f64>, Vec<f64>)> = row_indices
            .par_chunks(chunk_size)
            .map(|row_chunk| {
                let mut dx_chunk = Vec::with_capacity(row_chunk.len() * cols);
                let mut dy_chunk = Vec::with_capacity(row_chunk.len() * cols);
                for &i in row_chunk {
                    let (dx_row, dy_row) = self.row(padded, i, cols);
                    dx_chunk.extend(dx_row);
                    dy_chunk.extend(dy_row);
                }
                (dx_chunk, dy_chunk)
            })
            .collect();

        let mut dx_data = Vec::with_capacity(rows * cols);
        let mut dy_data = Vec::with_capacity(rows * cols);
        for (dx_chunk, dy_chunk) in results {
            dx_data.extend(dx_chunk);
            dy_data.extend(dy_chunk);
        }

        let dx = Array2::from_shape_vec((rows, cols), dx_data)
            .map_err(|e| SlopeError::Processing(format!("Failed to assemble dx grid: {}", e)))?;
        let dy = Array2::from_shape_vec((rows, cols), dy_data)
            .map_err(|e| SlopeError::Processing(format!("Failed to assemble dy grid: {}", e)))?;

        Ok(GradientField { dx, dy })
    }
}

/// Shape of the unpadded grid behind a padded one
fn output_dim(padded: &Array2<f64>) -> SlopeResult<(usize, usize)> {
    let (rows, cols) = padded.dim();
    if rows < 2 || cols < 2 {
        return Err(SlopeError::ShapeMismatch {
            expected: (2, 2),
            found: (rows, cols),
        });
    }
    Ok((rows - 2, cols - 2))
}

/// Gradient of an edge-padded grid
pub fn compute_gradient(padded: &Array2<f64>, spacing: CellSpacing) -> SlopeResult<GradientField> {
    GradientKernel::new(spacing).apply(padded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::border::pad_edges;
    use approx::assert_abs_diff_eq;

    fn unit_spacing() -> CellSpacing {
        CellSpacing { xsize: 1.0, ysize: 1.0 }
    }

    #[test]
    fn test_flat_surface_has_zero_gradient() {
        let dem = Array2::<f64>::from_elem((4, 6), 123.5);
        let grad = compute_gradient(&pad_edges(&dem), unit_spacing()).unwrap();

        assert_eq!(grad.dim(), (4, 6));
        assert!(grad.dx.iter().all(|&v| v == 0.0));
        assert!(grad.dy.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_eastward_ramp() {
        let dem = Array2::from_shape_fn((5, 5), |(_, c)| c as f64);
        let grad = compute_gradient(&pad_edges(&dem), unit_spacing()).unwrap();

        for i in 0..5 {
            for j in 1..4 {
                assert_abs_diff_eq!(grad.dx[[i, j]], 1.0, epsilon = 1e-12);
                assert_eq!(grad.dy[[i, j]], 0.0);
            }
            // one-sided difference against the replicated edge
            assert_abs_diff_eq!(grad.dx[[i, 0]], 0.5, epsilon = 1e-12);
            assert_abs_diff_eq!(grad.dx[[i, 4]], 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_southward_ramp_and_spacing() {
        // elevation grows with row index (southward), 10 m rows
        let dem = Array2::from_shape_fn((5, 5), |(r, _)| 20.0 * r as f64);
        let spacing = CellSpacing { xsize: 30.0, ysize: 10.0 };
        let grad = compute_gradient(&pad_edges(&dem), spacing).unwrap();

        assert_abs_diff_eq!(grad.dy[[2, 2]], 2.0, epsilon = 1e-12);
        assert_eq!(grad.dx[[2, 2]], 0.0);
    }

    #[test]
    fn test_nan_in_window_propagates() {
        let mut dem = Array2::from_shape_fn((5, 5), |(r, c)| (r + c) as f64);
        dem[[2, 2]] = f64::NAN;
        let grad = compute_gradient(&pad_edges(&dem), unit_spacing()).unwrap();

        for i in 1..=3 {
            for j in 1..=3 {
                assert!(grad.dx[[i, j]].is_nan(), "dx at ({}, {})", i, j);
                assert!(grad.dy[[i, j]].is_nan(), "dy at ({}, {})", i, j);
            }
        }
        assert!(!grad.dx[[0, 0]].is_nan());
        assert!(!grad.dx[[4, 4]].is_nan());
        assert!(!grad.dy[[0, 4]].is_nan());
    }

    #[test]
    fn test_too_small_padded_grid_is_rejected() {
        let padded = Array2::<f64>::zeros((1, 5));
        let result = compute_gradient(&padded, unit_spacing());
        assert!(matches!(result, Err(SlopeError::ShapeMismatch { .. })));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let dem = Array2::from_shape_fn((37, 23), |(r, c)| {
            ((r as f64) * 0.7).sin() * 50.0 + (c as f64 * 1.3).cos() * 20.0
        });
        let padded = pad_edges(&dem);
        let kernel = GradientKernel::new(CellSpacing { xsize: 12.5, ysize: 9.0 });

        let sequential = kernel.apply(&padded).unwrap();
        let parallel = kernel.apply_parallel(&padded, 4).unwrap();

        for (a, b) in sequential.dx.iter().zip(parallel.dx.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        for (a, b) in sequential.dy.iter().zip(parallel.dy.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}

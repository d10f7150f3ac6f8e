use ndarray::Array2;

/// Edge-extend a grid by one cell on every side.
///
/// The result is `(rows + 2, cols + 2)`; the original occupies `[1..=rows, 1..=cols]`
/// and every border cell, corners included, copies the nearest edge cell.
/// An empty input has nothing to replicate and gives an all-NaN frame.
pub fn pad_edges(grid: &Array2<f64>) -> Array2<f64> {
    let (rows, cols) = grid.dim();

    if rows == 0 || cols == 0 {
        return Array2::from_elem((rows + 2, cols + 2), f64::NAN);
    }

    Array2::from_shape_fn((rows + 2, cols + 2), |(i, j)| {
        let src_row = clamp_index(i, rows);
        let src_col = clamp_index(j, cols);
        grid[[src_row, src_col]]
    })
}

/// Map a padded index back into `0..len`
#[inline]
fn clamp_index(padded: usize, len: usize) -> usize {
    padded.saturating_sub(1).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_corners_replicate_input_corners() {
        let grid = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let padded = pad_edges(&grid);

        assert_eq!(padded.dim(), (5, 5));
        assert_eq!(padded[[0, 0]], 1.0);
        assert_eq!(padded[[0, 4]], 3.0);
        assert_eq!(padded[[4, 0]], 7.0);
        assert_eq!(padded[[4, 4]], 9.0);
    }

    #[test]
    fn test_edges_replicate_and_interior_is_untouched() {
        let grid = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let padded = pad_edges(&grid);

        // top and bottom rows
        for j in 0..3 {
            assert_eq!(padded[[0, j + 1]], grid[[0, j]]);
            assert_eq!(padded[[4, j + 1]], grid[[2, j]]);
        }
        // left and right columns
        for i in 0..3 {
            assert_eq!(padded[[i + 1, 0]], grid[[i, 0]]);
            assert_eq!(padded[[i + 1, 4]], grid[[i, 2]]);
        }
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(padded[[i + 1, j + 1]], grid[[i, j]]);
            }
        }
    }

    #[test]
    fn test_single_cell_fills_whole_frame() {
        let grid = array![[42.0]];
        let padded = pad_edges(&grid);

        assert_eq!(padded.dim(), (3, 3));
        assert!(padded.iter().all(|&v| v == 42.0));
    }

    #[test]
    fn test_nan_edge_is_replicated() {
        let grid = array![[f64::NAN, 1.0], [2.0, 3.0]];
        let padded = pad_edges(&grid);

        assert!(padded[[0, 0]].is_nan());
        assert!(padded[[0, 1]].is_nan());
        assert!(padded[[1, 0]].is_nan());
        assert_eq!(padded[[3, 3]], 3.0);
    }

    #[test]
    fn test_input_is_not_modified() {
        let grid = array![[1.0, 2.0], [3.0, 4.0]];
        let before = grid.clone();
        let _ = pad_edges(&grid);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_empty_grid_gives_nan_frame() {
        let grid = Array2::<f64>::zeros((0, 4));
        let padded = pad_edges(&grid);

        assert_eq!(padded.dim(), (2, 6));
        assert!(padded.iter().all(|v| v.is_nan()));
    }
}

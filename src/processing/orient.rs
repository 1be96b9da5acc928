use ndarray::Array2;

use crate::types::{FixedPixelGrid, ReorientedGrid, GRID_SIDE};

/// Rotate the 28x28 grid a quarter turn clockwise by explicit index
/// permutation: source (r, c) lands on (c, 27 - r).
///
/// Every destination cell is written exactly once.
pub fn reorient(grid: &FixedPixelGrid) -> ReorientedGrid {
    let src = grid.view();
    let mut out = Array2::<u8>::zeros((GRID_SIDE, GRID_SIDE));

    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            // last value of a source column becomes the first of a row
            let new_row = col;
            let new_col = GRID_SIDE - 1 - row;
            out[[new_row, new_col]] = src[[row, col]];
        }
    }

    ReorientedGrid(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn indexed_grid() -> FixedPixelGrid {
        FixedPixelGrid::from_fn(|(r, c)| ((r * 28 + c) % 251) as u8)
    }

    #[test]
    fn test_corner_mapping() {
        let grid = FixedPixelGrid::from_fn(|(r, c)| if (r, c) == (0, 0) { 255 } else { 0 });
        let out = reorient(&grid);
        assert_eq!(out.view()[[0, 27]], 255);
        assert_eq!(out.view().iter().filter(|&&v| v == 255).count(), 1);

        let grid = FixedPixelGrid::from_fn(|(r, c)| if (r, c) == (27, 0) { 255 } else { 0 });
        assert_eq!(reorient(&grid).view()[[0, 0]], 255);
    }

    #[test]
    fn test_is_bijection() {
        let rows = FixedPixelGrid::from_fn(|(r, _)| r as u8);
        let cols = FixedPixelGrid::from_fn(|(_, c)| c as u8);
        let out_rows = reorient(&rows);
        let out_cols = reorient(&cols);

        let mut seen = HashSet::new();
        for i in 0..28 {
            for j in 0..28 {
                let src = (out_rows.view()[[i, j]], out_cols.view()[[i, j]]);
                assert_eq!(src, ((27 - j) as u8, i as u8));
                seen.insert(src);
            }
        }
        assert_eq!(seen.len(), 784);
    }

    #[test]
    fn test_four_turns_is_identity() {
        let grid = indexed_grid();
        let mut g = grid.clone();
        for _ in 0..4 {
            g = reorient(&g).into_fixed();
        }
        assert_eq!(g, grid);
        assert_ne!(reorient(&grid).into_fixed(), grid);
    }
}

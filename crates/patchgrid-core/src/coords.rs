/// Conversion between linear cell indices and (x, y) cell coordinates.
///
/// Coordinates are 0-indexed, `x` is the column and `y` is the row. Linear
/// indices run row-major: `index = y * width + x`.
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Width and height of a grid, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub width: usize,
    pub height: usize,
}

/// A cell addressed by column (`x`) and row (`y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellXY {
    pub x: usize,
    pub y: usize,
}

impl CellXY {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl GridShape {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn contains(&self, xy: CellXY) -> bool {
        xy.x < self.width && xy.y < self.height
    }

    /// Linear index to coordinates.
    pub fn cell_to_xy(&self, index: usize) -> Result<CellXY> {
        if index >= self.n_cells() {
            return Err(self.out_of_range(format!("cell index {index}")));
        }
        Ok(CellXY { x: index % self.width, y: index / self.width })
    }

    /// Coordinates to linear index.
    pub fn xy_to_cell(&self, xy: CellXY) -> Result<usize> {
        if !self.contains(xy) {
            return Err(self.out_of_range(format!("coordinate ({}, {})", xy.x, xy.y)));
        }
        Ok(xy.y * self.width + xy.x)
    }

    /// Bulk `cell_to_xy`. With `cells = None` every cell of the grid is
    /// converted in index order; otherwise output order follows `cells`.
    pub fn xy_from_cells(&self, cells: Option<&[usize]>) -> Result<Vec<CellXY>> {
        match cells {
            Some(cells) => cells.iter().map(|&i| self.cell_to_xy(i)).collect(),
            None => Ok((0..self.n_cells())
                .map(|i| CellXY { x: i % self.width, y: i / self.width })
                .collect()),
        }
    }

    /// Bulk `xy_to_cell`, preserving input order. Fails on the first
    /// coordinate outside the grid.
    pub fn cells_from_xy(&self, coords: &[CellXY]) -> Result<Vec<usize>> {
        coords.iter().map(|&xy| self.xy_to_cell(xy)).collect()
    }

    fn out_of_range(&self, what: String) -> GridError {
        GridError::OutOfRange { what, width: self.width, height: self.height }
    }
}

/// `cell_to_xy` for callers holding bare dimensions.
pub fn cell_to_xy(index: usize, height: usize, width: usize) -> Result<CellXY> {
    GridShape::new(width, height).cell_to_xy(index)
}

/// `xy_to_cell` for callers holding bare dimensions.
pub fn xy_to_cell(x: usize, y: usize, height: usize, width: usize) -> Result<usize> {
    GridShape::new(width, height).xy_to_cell(CellXY::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_every_cell() {
        for (w, h) in [(1, 1), (5, 3), (3, 5), (7, 1), (1, 7)] {
            for i in 0..w * h {
                let xy = cell_to_xy(i, h, w).unwrap();
                assert_eq!(xy_to_cell(xy.x, xy.y, h, w).unwrap(), i, "{w}x{h} cell {i}");
            }
        }
    }

    #[test]
    fn row_major_layout() {
        let shape = GridShape::new(4, 3);
        assert_eq!(shape.cell_to_xy(5).unwrap(), CellXY::new(1, 1));
        assert_eq!(shape.cell_to_xy(11).unwrap(), CellXY::new(3, 2));
        assert_eq!(shape.xy_to_cell(CellXY::new(3, 0)).unwrap(), 3);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let shape = GridShape::new(4, 3);
        assert!(matches!(shape.cell_to_xy(12), Err(GridError::OutOfRange { .. })));
        assert!(matches!(shape.xy_to_cell(CellXY::new(4, 0)), Err(GridError::OutOfRange { .. })));
        assert!(matches!(shape.xy_to_cell(CellXY::new(0, 3)), Err(GridError::OutOfRange { .. })));
    }

    #[test]
    fn bulk_variants_preserve_order() {
        let shape = GridShape::new(3, 2);
        let all = shape.xy_from_cells(None).unwrap();
        assert_eq!(all.len(), 6);
        assert_eq!(all[4], CellXY::new(1, 1));

        let picked = shape.xy_from_cells(Some(&[5, 0, 3])).unwrap();
        assert_eq!(picked, vec![CellXY::new(2, 1), CellXY::new(0, 0), CellXY::new(0, 1)]);
        assert_eq!(shape.cells_from_xy(&picked).unwrap(), vec![5, 0, 3]);

        assert!(shape.xy_from_cells(Some(&[0, 6])).is_err());
    }
}

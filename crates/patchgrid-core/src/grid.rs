use serde::{Deserialize, Serialize};

use crate::coords::GridShape;
use crate::error::{GridError, Result};

/// Sentinel marking a cell with no class.
pub const MISSING: i32 = i32::MIN;

/// A categorical raster: one integer class label per cell, row-major.
///
/// Serialised with missing cells as `null`, e.g.
/// `{"width": 2, "height": 1, "data": [1, null]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid", into = "RawGrid")]
pub struct Grid {
    data: Vec<i32>,
    width: usize,
    height: usize,
}

#[derive(Serialize, Deserialize)]
struct RawGrid {
    data: Vec<Option<i32>>,
    width: usize,
    height: usize,
}

impl TryFrom<RawGrid> for Grid {
    type Error = GridError;

    fn try_from(raw: RawGrid) -> Result<Self> {
        let data = raw.data.into_iter().map(|v| v.unwrap_or(MISSING)).collect();
        Grid::new(raw.width, raw.height, data)
    }
}

impl From<Grid> for RawGrid {
    fn from(grid: Grid) -> Self {
        let data = grid.data.into_iter().map(|v| (v != MISSING).then_some(v)).collect();
        RawGrid { data, width: grid.width, height: grid.height }
    }
}

/// `width * height`, or `InvalidShape` when it overflows. `len` only feeds
/// the error message.
fn cell_count(width: usize, height: usize, len: usize) -> Result<usize> {
    width.checked_mul(height).ok_or(GridError::InvalidShape { width, height, len })
}

impl Grid {
    /// Wrap row-major `data`; its length must equal `width * height`.
    pub fn new(width: usize, height: usize, data: Vec<i32>) -> Result<Self> {
        if cell_count(width, height, data.len())? != data.len() {
            return Err(GridError::InvalidShape { width, height, len: data.len() });
        }
        Ok(Self { data, width, height })
    }

    /// A grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: i32) -> Result<Self> {
        let n = cell_count(width, height, 0)?;
        Ok(Self { data: vec![value; n], width, height })
    }

    /// Build from rows of equal length, top row first.
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(cell_count(width, height, 0)?);
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::InvalidShape {
                    width,
                    height,
                    len: data.len() + row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Self::new(width, height, data)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn shape(&self) -> GridShape {
        GridShape::new(self.width, self.height)
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.data.len()
    }

    /// Row-major cell values, missing cells holding [`MISSING`].
    #[inline]
    pub fn values(&self) -> &[i32] {
        &self.data
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.data[row * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, val: i32) {
        self.data[row * self.width + col] = val;
    }

    /// Class at a linear index, `None` when missing.
    #[inline]
    pub fn class_at(&self, index: usize) -> Option<i32> {
        let v = self.data[index];
        (v != MISSING).then_some(v)
    }

    pub fn is_all_missing(&self) -> bool {
        self.data.iter().all(|&v| v == MISSING)
    }

    /// Distinct classes present, ascending.
    pub fn classes(&self) -> Vec<i32> {
        let mut classes: Vec<i32> = self.data.iter().copied().filter(|&v| v != MISSING).collect();
        classes.sort_unstable();
        classes.dedup();
        classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_is_row_major() {
        let g = Grid::from_rows(&[[1, 2, 3], [4, 5, 6]]).unwrap();
        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 2);
        assert_eq!(g.get(1, 0), 4);
        assert_eq!(g.values(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn ragged_rows_are_invalid_shape() {
        let rows: Vec<Vec<i32>> = vec![vec![1, 2], vec![3]];
        assert!(matches!(Grid::from_rows(&rows), Err(GridError::InvalidShape { .. })));
        assert!(Grid::new(2, 2, vec![1, 2, 3]).is_err());
    }

    #[test]
    fn classes_skip_missing_and_sort() {
        let g = Grid::from_rows(&[[3, MISSING, 1], [1, 3, 2]]).unwrap();
        assert_eq!(g.classes(), vec![1, 2, 3]);
        assert_eq!(g.class_at(1), None);
        assert_eq!(g.class_at(5), Some(2));
        assert!(!g.is_all_missing());
        assert!(Grid::filled(2, 2, MISSING).unwrap().is_all_missing());
    }

    #[test]
    fn json_nulls_are_missing_cells() {
        let g: Grid = serde_json::from_str(r#"{"width":2,"height":2,"data":[1,null,2,2]}"#).unwrap();
        assert_eq!(g.class_at(1), None);
        assert_eq!(g.get(1, 1), 2);

        let bad = serde_json::from_str::<Grid>(r#"{"width":3,"height":2,"data":[1,2]}"#);
        assert!(bad.is_err());

        let text = serde_json::to_string(&g).unwrap();
        assert!(text.contains("null"));
    }

    #[test]
    fn overflowing_dimensions_are_invalid_shape() {
        let huge = serde_json::from_str::<Grid>(r#"{"width":18446744073709551615,"height":2,"data":[]}"#);
        assert!(huge.is_err());

        assert!(matches!(Grid::new(usize::MAX, 2, vec![]), Err(GridError::InvalidShape { .. })));
        assert!(matches!(Grid::filled(usize::MAX, 3, 1), Err(GridError::InvalidShape { .. })));
        assert_eq!(Grid::filled(0, usize::MAX, 1).unwrap().n_cells(), 0);
    }
}

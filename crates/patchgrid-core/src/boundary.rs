//! Class boundary detection.
//!
//! A classified cell is on a boundary when any in-grid neighbor holds a
//! different class or is missing. Neighbors outside the grid are ignored,
//! so the grid edge alone does not make a boundary.
use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::neighborhood::Neighborhood;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryMap {
    pub width: usize,
    pub height: usize,
    /// Row-major; `None` on missing cells.
    pub cells: Vec<Option<bool>>,
}

impl BoundaryMap {
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        self.cells[row * self.width + col]
    }

    pub fn n_boundary(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Some(true)).count()
    }
}

pub fn boundary_map(grid: &Grid, neighborhood: &Neighborhood) -> BoundaryMap {
    let shape = grid.shape();
    let mut cells = vec![None; grid.n_cells()];

    for row in 0..shape.height {
        for col in 0..shape.width {
            let idx = row * shape.width + col;
            let Some(class) = grid.class_at(idx) else { continue };
            let edge = neighborhood
                .offsets()
                .iter()
                .filter_map(|&o| Neighborhood::step(shape, row, col, o))
                .any(|nb| grid.class_at(nb) != Some(class));
            cells[idx] = Some(edge);
        }
    }

    BoundaryMap { width: shape.width, height: shape.height, cells }
}

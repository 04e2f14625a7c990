//! Adjacency pair extraction.
//!
//! Focal cells are scanned row-major and each focal cell's neighbors in
//! direction-set order. Pairs touching a missing cell or leaving the grid
//! are dropped.
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::PairMode;
use crate::grid::Grid;
use crate::neighborhood::Neighborhood;

/// Two neighboring cells and their classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdjacencyPair {
    /// Focal cell (directed) or lower linear index (undirected).
    pub from: usize,
    pub to: usize,
    pub from_class: i32,
    pub to_class: i32,
}

impl AdjacencyPair {
    #[inline]
    pub fn classes(&self) -> (i32, i32) {
        (self.from_class, self.to_class)
    }
}

/// Every valid neighbor pair of `grid` under `neighborhood`.
///
/// In [`PairMode::Undirected`] each unordered cell pair appears once, at
/// the point of the scan where it is first reached, with the lower linear
/// index stored in `from`.
pub fn adjacency_pairs(grid: &Grid, neighborhood: &Neighborhood, mode: PairMode) -> Vec<AdjacencyPair> {
    let mut pairs = Vec::new();
    for_each_pair(grid, neighborhood, mode, |p| pairs.push(p));
    pairs
}

/// Class-only view of [`adjacency_pairs`]: `(from_class, to_class)`.
pub fn class_pairs(grid: &Grid, neighborhood: &Neighborhood, mode: PairMode) -> Vec<(i32, i32)> {
    let mut pairs = Vec::new();
    for_each_pair(grid, neighborhood, mode, |p| pairs.push(p.classes()));
    pairs
}

/// Streaming form used by the co-occurrence builder to avoid collecting
/// the pair list.
pub(crate) fn for_each_pair<F>(grid: &Grid, neighborhood: &Neighborhood, mode: PairMode, mut f: F)
where
    F: FnMut(AdjacencyPair),
{
    let shape = grid.shape();
    // A symmetric set reaches every relation from its lower endpoint first,
    // so `to > from` alone deduplicates. Otherwise remember what was seen.
    let symmetric = neighborhood.is_symmetric();
    let mut seen: HashSet<(usize, usize)> = HashSet::new();

    for row in 0..shape.height {
        for col in 0..shape.width {
            let focal = row * shape.width + col;
            let Some(focal_class) = grid.class_at(focal) else { continue };

            for &o in neighborhood.offsets() {
                let Some(nb) = Neighborhood::step(shape, row, col, o) else { continue };
                let Some(nb_class) = grid.class_at(nb) else { continue };

                match mode {
                    PairMode::Directed => f(AdjacencyPair {
                        from: focal,
                        to: nb,
                        from_class: focal_class,
                        to_class: nb_class,
                    }),
                    PairMode::Undirected => {
                        if symmetric {
                            if nb < focal {
                                continue;
                            }
                        } else if !seen.insert((focal.min(nb), focal.max(nb))) {
                            continue;
                        }
                        let pair = if focal < nb {
                            AdjacencyPair { from: focal, to: nb, from_class: focal_class, to_class: nb_class }
                        } else {
                            AdjacencyPair { from: nb, to: focal, from_class: nb_class, to_class: focal_class }
                        };
                        f(pair);
                    }
                }
            }
        }
    }
}

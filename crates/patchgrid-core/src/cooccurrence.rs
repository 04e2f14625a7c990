//! Class co-occurrence counts built from adjacency pairs.
//!
//! The counts live in one `K x K` row-major matrix over the classes present
//! in the grid (ascending). The packed triangular vector, the diagonal and
//! the off-diagonal vectors are views computed from that matrix.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::adjacency::for_each_pair;
use crate::config::PairMode;
use crate::grid::Grid;
use crate::neighborhood::Neighborhood;

/// Packed index of the unordered pair `{r, c}`.
///
/// Symmetric in its arguments and a bijection from the `K(K+1)/2`
/// unordered pairs over `0..K` onto `0..K(K+1)/2`.
#[inline]
pub fn triangular_index(r: usize, c: usize) -> usize {
    let (hi, lo) = if r >= c { (r, c) } else { (c, r) };
    hi * (hi + 1) / 2 + lo
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooccurrence {
    /// Row and column labels, ascending.
    pub classes: Vec<i32>,
    /// `counts[i * K + j]`: adjacencies from class `i` to class `j`.
    pub counts: Vec<u64>,
    pub mode: PairMode,
}

impl Cooccurrence {
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> u64 {
        self.counts[i * self.classes.len() + j]
    }

    /// Count for a pair of class labels; 0 if either is absent.
    pub fn count(&self, a: i32, b: i32) -> u64 {
        match (self.classes.binary_search(&a), self.classes.binary_search(&b)) {
            (Ok(i), Ok(j)) => self.get(i, j),
            _ => 0,
        }
    }

    /// Rows of the `K x K` matrix.
    pub fn matrix(&self) -> Vec<Vec<u64>> {
        let k = self.classes.len();
        if k == 0 {
            return Vec::new();
        }
        self.counts.chunks(k).map(<[u64]>::to_vec).collect()
    }

    /// Packed vector addressed by [`triangular_index`].
    ///
    /// Directed counts fold both directions of a class pair into one slot;
    /// undirected counts already hold each adjacency once per pair.
    pub fn to_vector(&self) -> Vec<u64> {
        let k = self.classes.len();
        let mut packed = vec![0u64; k * (k + 1) / 2];
        for i in 0..k {
            for j in 0..=i {
                packed[triangular_index(i, j)] = match (self.mode, i == j) {
                    (_, true) => self.get(i, i),
                    (PairMode::Directed, false) => self.get(i, j) + self.get(j, i),
                    (PairMode::Undirected, false) => self.get(i, j),
                };
            }
        }
        packed
    }

    /// Same-class adjacency count per class.
    pub fn diagonal(&self) -> Vec<u64> {
        (0..self.classes.len()).map(|i| self.get(i, i)).collect()
    }

    /// Entries of the packed vector with `i != j`, in triangular order.
    pub fn off_diagonal(&self) -> Vec<u64> {
        let packed = self.to_vector();
        let k = self.classes.len();
        (0..k)
            .flat_map(|i| (0..i).map(move |j| (i, j)))
            .map(|(i, j)| packed[triangular_index(i, j)])
            .collect()
    }

    pub fn total(&self) -> u64 {
        match self.mode {
            PairMode::Directed => self.counts.iter().sum(),
            PairMode::Undirected => self.to_vector().iter().sum(),
        }
    }
}

/// Count adjacencies by class pair.
///
/// [`PairMode::Directed`] adds one to `(focal, neighbor)` per directed pair.
/// [`PairMode::Undirected`] adds one per physical adjacency to both
/// `(a, b)` and `(b, a)` (once on the diagonal), so the matrix is symmetric.
pub fn cooccurrence(grid: &Grid, neighborhood: &Neighborhood, mode: PairMode) -> Cooccurrence {
    let classes = grid.classes();
    let k = classes.len();
    let slot: HashMap<i32, usize> = classes.iter().enumerate().map(|(i, &c)| (c, i)).collect();
    let mut counts = vec![0u64; k * k];

    for_each_pair(grid, neighborhood, mode, |p| {
        let (i, j) = (slot[&p.from_class], slot[&p.to_class]);
        counts[i * k + j] += 1;
        if mode == PairMode::Undirected && i != j {
            counts[j * k + i] += 1;
        }
    });

    log::debug!("co-occurrence over {k} classes ({mode:?})");

    Cooccurrence { classes, counts, mode }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MISSING;

    fn sample() -> Grid {
        Grid::from_rows(&[[1, 1, 2], [1, 3, 2], [MISSING, 3, 3]]).unwrap()
    }

    #[test]
    fn triangular_index_is_symmetric_and_dense() {
        let k = 7;
        let mut hit = vec![false; k * (k + 1) / 2];
        for r in 0..k {
            for c in 0..k {
                assert_eq!(triangular_index(r, c), triangular_index(c, r));
                let idx = triangular_index(r, c);
                assert!(idx < hit.len());
                if r >= c {
                    assert!(!hit[idx], "({r}, {c}) collides");
                    hit[idx] = true;
                }
            }
        }
        assert!(hit.iter().all(|&h| h));
    }

    #[test]
    fn undirected_matrix_is_symmetric() {
        let co = cooccurrence(&sample(), &Neighborhood::queen(), PairMode::Undirected);
        let k = co.n_classes();
        for i in 0..k {
            for j in 0..k {
                assert_eq!(co.get(i, j), co.get(j, i));
            }
        }
    }

    #[test]
    fn rook_counts_by_hand() {
        // 1 1 2
        // 1 3 2
        // . 3 3
        let co = cooccurrence(&sample(), &Neighborhood::rook(), PairMode::Undirected);
        assert_eq!(co.classes, vec![1, 2, 3]);
        assert_eq!(co.count(1, 1), 2);
        assert_eq!(co.count(1, 2), 1);
        assert_eq!(co.count(1, 3), 2);
        assert_eq!(co.count(2, 2), 1);
        assert_eq!(co.count(2, 3), 2);
        assert_eq!(co.count(3, 3), 2);
        assert_eq!(co.total(), 10);
        assert_eq!(co.count(1, 9), 0);

        let directed = cooccurrence(&sample(), &Neighborhood::rook(), PairMode::Directed);
        assert_eq!(directed.count(1, 1), 4);
        assert_eq!(directed.count(1, 3), 2);
        assert_eq!(directed.count(3, 1), 2);
        assert_eq!(directed.total(), 20);
    }

    #[test]
    fn views_share_counts() {
        for mode in [PairMode::Directed, PairMode::Undirected] {
            let co = cooccurrence(&sample(), &Neighborhood::rook(), mode);
            let packed = co.to_vector();
            assert_eq!(packed.len(), 6);
            assert_eq!(co.diagonal(), vec![
                packed[triangular_index(0, 0)],
                packed[triangular_index(1, 1)],
                packed[triangular_index(2, 2)],
            ]);
            assert_eq!(co.off_diagonal(), vec![
                packed[triangular_index(1, 0)],
                packed[triangular_index(2, 0)],
                packed[triangular_index(2, 1)],
            ]);
            assert_eq!(co.matrix().len(), 3);
        }

        let directed = cooccurrence(&sample(), &Neighborhood::rook(), PairMode::Directed).to_vector();
        let undirected = cooccurrence(&sample(), &Neighborhood::rook(), PairMode::Undirected).to_vector();
        // Off-diagonal slots agree up to the double count, diagonals double.
        for (d, u) in directed.iter().zip(&undirected) {
            assert!(*d == *u * 2, "{d} vs {u}");
        }
    }

    #[test]
    fn empty_grid_gives_empty_table() {
        let co = cooccurrence(&Grid::filled(2, 2, MISSING).unwrap(), &Neighborhood::rook(), PairMode::Directed);
        assert_eq!(co.n_classes(), 0);
        assert!(co.to_vector().is_empty());
        assert!(co.matrix().is_empty());
        assert_eq!(co.total(), 0);
    }
}

//! Direction sets: which relative offsets count as adjacent.
//!
//! A [`Neighborhood`] is an ordered list of distinct, non-zero
//! `(drow, dcol)` offsets. Expanding it around a focal cell yields one slot
//! per offset, in offset order; slots falling outside the grid are `None`
//! rather than wrapped or clamped.
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::coords::GridShape;
use crate::error::{GridError, Result};

/// A relative cell offset. Positive `drow` points down, positive `dcol` right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub drow: i32,
    pub dcol: i32,
}

impl Offset {
    pub const fn new(drow: i32, dcol: i32) -> Self {
        Self { drow, dcol }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        Self { drow: -self.drow, dcol: -self.dcol }
    }
}

const ROOK: [Offset; 4] = [
    Offset::new(-1, 0),
    Offset::new(0, -1),
    Offset::new(0, 1),
    Offset::new(1, 0),
];

const QUEEN: [Offset; 8] = [
    Offset::new(-1, -1),
    Offset::new(-1, 0),
    Offset::new(-1, 1),
    Offset::new(0, -1),
    Offset::new(0, 1),
    Offset::new(1, -1),
    Offset::new(1, 0),
    Offset::new(1, 1),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNeighborhood", into = "RawNeighborhood")]
pub struct Neighborhood {
    offsets: Vec<Offset>,
}

#[derive(Serialize, Deserialize)]
struct RawNeighborhood {
    offsets: Vec<Offset>,
}

impl TryFrom<RawNeighborhood> for Neighborhood {
    type Error = GridError;

    fn try_from(raw: RawNeighborhood) -> Result<Self> {
        Neighborhood::from_offsets(raw.offsets)
    }
}

impl From<Neighborhood> for RawNeighborhood {
    fn from(n: Neighborhood) -> Self {
        RawNeighborhood { offsets: n.offsets }
    }
}

impl Neighborhood {
    /// 4-connected (orthogonal) neighbors.
    pub fn rook() -> Self {
        Self { offsets: ROOK.to_vec() }
    }

    /// 8-connected (orthogonal and diagonal) neighbors.
    pub fn queen() -> Self {
        Self { offsets: QUEEN.to_vec() }
    }

    /// `4` for rook, `8` for queen.
    pub fn from_connectivity(n: u32) -> Result<Self> {
        match n {
            4 => Ok(Self::rook()),
            8 => Ok(Self::queen()),
            other => Err(GridError::InvalidDirectionSet(format!(
                "connectivity must be 4 or 8, got {other}"
            ))),
        }
    }

    /// Arbitrary caller-supplied offsets, order preserved.
    ///
    /// Components must lie in `-i32::MAX..=i32::MAX` so every offset has a
    /// representable reverse.
    pub fn from_offsets(offsets: Vec<Offset>) -> Result<Self> {
        if offsets.is_empty() {
            return Err(GridError::InvalidDirectionSet("no offsets".into()));
        }
        let mut seen = HashSet::with_capacity(offsets.len());
        for &o in &offsets {
            if o.drow == 0 && o.dcol == 0 {
                return Err(GridError::InvalidDirectionSet("zero offset".into()));
            }
            if o.drow == i32::MIN || o.dcol == i32::MIN {
                return Err(GridError::InvalidDirectionSet(format!(
                    "offset ({}, {}) has no reverse",
                    o.drow, o.dcol
                )));
            }
            if !seen.insert(o) {
                return Err(GridError::InvalidDirectionSet(format!(
                    "duplicate offset ({}, {})",
                    o.drow, o.dcol
                )));
            }
        }
        Ok(Self { offsets })
    }

    /// Build from a focal weight matrix (row-major, `rows x cols`).
    ///
    /// Exactly one cell must hold `0`, marking the focal cell; cells holding
    /// `1` become neighbors, scanned row-major; `None` cells are ignored.
    pub fn from_weights(rows: usize, cols: usize, weights: &[Option<u8>]) -> Result<Self> {
        if rows.checked_mul(cols) != Some(weights.len()) {
            return Err(GridError::InvalidDirectionSet(format!(
                "{rows}x{cols} weight matrix given {} cells",
                weights.len()
            )));
        }

        let mut focal = None;
        for (i, w) in weights.iter().enumerate() {
            match w {
                Some(0) if focal.is_some() => {
                    return Err(GridError::InvalidDirectionSet(
                        "weight matrix has more than one focal cell".into(),
                    ));
                }
                Some(0) => focal = Some(i),
                Some(1) | None => {}
                Some(v) => {
                    return Err(GridError::InvalidDirectionSet(format!(
                        "weight matrix value {v}, expected 0, 1 or empty"
                    )));
                }
            }
        }
        let focal = focal.ok_or_else(|| {
            GridError::InvalidDirectionSet("weight matrix has no focal cell".into())
        })?;
        let (frow, fcol) = ((focal / cols) as i32, (focal % cols) as i32);

        let offsets = weights
            .iter()
            .enumerate()
            .filter(|(_, w)| **w == Some(1))
            .map(|(i, _)| Offset::new((i / cols) as i32 - frow, (i % cols) as i32 - fcol))
            .collect();
        Self::from_offsets(offsets)
    }

    #[inline]
    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// True when every offset's reverse is also in the set, so each
    /// undirected relation is reached from both of its endpoints.
    pub fn is_symmetric(&self) -> bool {
        self.offsets.iter().all(|o| self.offsets.contains(&o.reversed()))
    }

    /// Neighbor of `(row, col)` along `o`, or `None` when outside the grid.
    #[inline]
    pub fn step(shape: GridShape, row: usize, col: usize, o: Offset) -> Option<usize> {
        let r = row as i64 + o.drow as i64;
        let c = col as i64 + o.dcol as i64;
        if r < 0 || c < 0 || r >= shape.height as i64 || c >= shape.width as i64 {
            return None;
        }
        Some(r as usize * shape.width + c as usize)
    }

    /// Absolute neighbor indices of `(row, col)`, one per offset.
    pub fn neighbors_of(&self, shape: GridShape, row: usize, col: usize) -> Vec<Option<usize>> {
        self.offsets.iter().map(|&o| Self::step(shape, row, col, o)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_have_expected_sizes_and_symmetry() {
        assert_eq!(Neighborhood::rook().len(), 4);
        assert_eq!(Neighborhood::queen().len(), 8);
        assert!(Neighborhood::rook().is_symmetric());
        assert!(Neighborhood::queen().is_symmetric());
        assert!(Neighborhood::from_connectivity(6).is_err());
    }

    #[test]
    fn zero_and_duplicate_offsets_are_rejected() {
        let zero = Neighborhood::from_offsets(vec![Offset::new(0, 1), Offset::new(0, 0)]);
        assert!(matches!(zero, Err(GridError::InvalidDirectionSet(_))));

        let dup = Neighborhood::from_offsets(vec![Offset::new(0, 1), Offset::new(0, 1)]);
        assert!(matches!(dup, Err(GridError::InvalidDirectionSet(_))));
    }

    #[test]
    fn out_of_bounds_neighbors_are_flagged_not_clamped() {
        let shape = GridShape::new(3, 3);
        let n = Neighborhood::rook().neighbors_of(shape, 0, 0);
        assert_eq!(n, vec![None, None, Some(1), Some(3)]);

        let n = Neighborhood::rook().neighbors_of(shape, 1, 1);
        assert_eq!(n, vec![Some(1), Some(3), Some(5), Some(7)]);
    }

    #[test]
    fn weight_matrix_offsets_are_relative_to_focal_cell() {
        // Knight-ish custom set around the centre of a 3x3 window.
        let w = [
            Some(1), None, None,
            None, Some(0), Some(1),
            None, None, None,
        ];
        let n = Neighborhood::from_weights(3, 3, &w).unwrap();
        assert_eq!(n.offsets(), &[Offset::new(-1, -1), Offset::new(0, 1)]);
        assert!(!n.is_symmetric());

        // Rook set written as a matrix matches the preset.
        let rook = [
            None, Some(1), None,
            Some(1), Some(0), Some(1),
            None, Some(1), None,
        ];
        assert_eq!(Neighborhood::from_weights(3, 3, &rook).unwrap(), Neighborhood::rook());
    }

    #[test]
    fn malformed_weight_matrices_are_rejected() {
        let no_focal = [Some(1), Some(1), Some(1), Some(1)];
        assert!(Neighborhood::from_weights(2, 2, &no_focal).is_err());

        let two_focal = [Some(0), Some(1), Some(0), Some(1)];
        assert!(Neighborhood::from_weights(2, 2, &two_focal).is_err());

        let bad_value = [Some(0), Some(2), None, None];
        assert!(Neighborhood::from_weights(2, 2, &bad_value).is_err());

        let only_focal = [None, Some(0), None, None];
        assert!(Neighborhood::from_weights(2, 2, &only_focal).is_err());

        assert!(Neighborhood::from_weights(2, 2, &[Some(0)]).is_err());
        assert!(Neighborhood::from_weights(usize::MAX, 2, &[Some(0)]).is_err());
    }

    #[test]
    fn offsets_without_a_reverse_are_rejected() {
        let min = Neighborhood::from_offsets(vec![Offset::new(i32::MIN, 0)]);
        assert!(matches!(min, Err(GridError::InvalidDirectionSet(_))));
        let min = Neighborhood::from_offsets(vec![Offset::new(1, 0), Offset::new(-1, i32::MIN)]);
        assert!(matches!(min, Err(GridError::InvalidDirectionSet(_))));

        let far = Neighborhood::from_offsets(vec![Offset::new(i32::MAX, 0), Offset::new(-i32::MAX, 0)]).unwrap();
        assert!(far.is_symmetric());
    }

    #[test]
    fn deserializing_validates_offsets() {
        let zero = r#"{"offsets":[{"drow":0,"dcol":0},{"drow":0,"dcol":0}]}"#;
        assert!(serde_json::from_str::<Neighborhood>(zero).is_err());

        let dup = r#"{"offsets":[{"drow":0,"dcol":1},{"drow":0,"dcol":1}]}"#;
        assert!(serde_json::from_str::<Neighborhood>(dup).is_err());

        assert!(serde_json::from_str::<Neighborhood>(r#"{"offsets":[]}"#).is_err());

        let text = serde_json::to_string(&Neighborhood::rook()).unwrap();
        assert_eq!(serde_json::from_str::<Neighborhood>(&text).unwrap(), Neighborhood::rook());
    }
}

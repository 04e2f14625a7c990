//! Shannon entropy, distinct values and class composition.
use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::LogBase;
use crate::error::{GridError, Result};
use crate::grid::{Grid, MISSING};

/// `-Σ pᵢ log(pᵢ)` over `x` normalised by its sum.
///
/// `x` may hold frequencies or probabilities. Zero entries contribute
/// nothing; negative, NaN or infinite entries are [`GridError::InvalidFrequency`].
pub fn entropy(x: &[f64], base: LogBase) -> Result<f64> {
    if let Some((index, &value)) = x.iter().enumerate().find(|(_, v)| !v.is_finite() || **v < 0.0) {
        return Err(GridError::InvalidFrequency { index, value });
    }
    let total: f64 = x.iter().sum();
    if total <= 0.0 {
        return Err(GridError::EmptyInput("entropy of an empty or all-zero distribution"));
    }
    let h = x
        .iter()
        .filter(|&&v| v > 0.0)
        .map(|&v| {
            let p = v / total;
            -p * base.log(p)
        })
        .sum::<f64>();
    // A one-hot input gives -0.0.
    Ok(h.max(0.0))
}

/// [`entropy`] with the base given as a token: `"log2"`, `"ln"` or `"log10"`.
pub fn entropy_with(x: &[f64], base: &str) -> Result<f64> {
    entropy(x, base.parse()?)
}

/// Distinct values in first-occurrence order.
pub fn unique_values(x: &[i32], omit_missing: bool) -> Vec<i32> {
    let mut seen = HashSet::with_capacity(x.len());
    x.iter()
        .copied()
        .filter(|&v| !(omit_missing && v == MISSING))
        .filter(|&v| seen.insert(v))
        .collect()
}

/// Cell count of one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCount {
    pub class: i32,
    pub cells: u64,
}

/// Cells per class, ascending by class, missing cells excluded.
pub fn class_composition(grid: &Grid) -> Vec<ClassCount> {
    let mut counts: BTreeMap<i32, u64> = BTreeMap::new();
    for &v in grid.values().iter().filter(|&&v| v != MISSING) {
        *counts.entry(v).or_default() += 1;
    }
    counts.into_iter().map(|(class, cells)| ClassCount { class, cells }).collect()
}

//! Connected-component (patch) labeling.
//!
//! One row-major scan assigns provisional labels. A cell looks only at its
//! already-visited neighbors (up and left for 4-connectivity, plus the two
//! upper diagonals for 8-connectivity), takes the smallest label among
//! those of its own class and unions the rest into it. Each class owns its
//! own union-find arena, so provisional labels of different classes never
//! mix. A second scan resolves every cell to its set root and numbers the
//! roots densely from 1 in order of first appearance.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::{Connectivity, LabelNumbering};
use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::neighborhood::{Neighborhood, Offset};

const UNLABELED: u32 = u32::MAX;

/// Previously visited neighbors in a row-major scan.
const PRIOR_4: [Offset; 2] = [Offset::new(-1, 0), Offset::new(0, -1)];
const PRIOR_8: [Offset; 4] = [
    Offset::new(-1, -1),
    Offset::new(-1, 0),
    Offset::new(-1, 1),
    Offset::new(0, -1),
];

// ── Union-find ────────────────────────────────────────────────────────────────

/// Disjoint sets over provisional labels `0..len`, with union by rank and
/// path halving.
#[derive(Debug, Default, Clone)]
pub struct UnionFind {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Add a singleton set and return its label.
    pub fn make_set(&mut self) -> u32 {
        let id = self.parent.len() as u32;
        self.parent.push(id);
        self.rank.push(0);
        id
    }

    pub fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grandparent = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grandparent;
            x = grandparent;
        }
        x
    }

    /// Merge the sets holding `a` and `b`; returns the surviving root.
    pub fn union(&mut self, a: u32, b: u32) -> u32 {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return ra;
        }
        let (hi, lo) = if self.rank[ra as usize] >= self.rank[rb as usize] { (ra, rb) } else { (rb, ra) };
        self.parent[lo as usize] = hi;
        if self.rank[hi as usize] == self.rank[lo as usize] {
            self.rank[hi as usize] += 1;
        }
        hi
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

/// Patch count for one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassPatches {
    pub class: i32,
    pub n_patches: u32,
}

/// One patch and its size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    pub class: i32,
    pub id: u32,
    pub n_cells: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentLabels {
    pub width: usize,
    pub height: usize,
    /// Row-major patch ids; `None` on missing cells.
    pub labels: Vec<Option<u32>>,
    /// Ascending by class.
    pub classes: Vec<ClassPatches>,
    /// Ascending by class, then id.
    pub patches: Vec<Patch>,
    pub numbering: LabelNumbering,
}

impl ComponentLabels {
    #[inline]
    pub fn label(&self, row: usize, col: usize) -> Option<u32> {
        self.labels[row * self.width + col]
    }

    pub fn total_patches(&self) -> u32 {
        self.classes.iter().map(|c| c.n_patches).sum()
    }

    pub fn n_patches(&self, class: i32) -> u32 {
        self.classes.iter().find(|c| c.class == class).map_or(0, |c| c.n_patches)
    }
}

// ── Labeling ──────────────────────────────────────────────────────────────────

/// Label every maximal connected region of same-class cells.
///
/// Fails with [`GridError::MissingValueOnly`] when the grid has cells but
/// none of them is classified. A zero-cell grid yields an empty result.
pub fn label_components(
    grid: &Grid,
    connectivity: Connectivity,
    numbering: LabelNumbering,
) -> Result<ComponentLabels> {
    let shape = grid.shape();
    let n = grid.n_cells();
    if n > 0 && grid.is_all_missing() {
        return Err(GridError::MissingValueOnly);
    }

    let classes = grid.classes();
    let class_slot: HashMap<i32, usize> = classes.iter().enumerate().map(|(i, &c)| (c, i)).collect();
    let prior: &[Offset] = match connectivity {
        Connectivity::Four => &PRIOR_4,
        Connectivity::Eight => &PRIOR_8,
    };

    // Pass 1: provisional labels, one arena per class.
    let mut arenas: Vec<UnionFind> = vec![UnionFind::new(); classes.len()];
    let mut provisional = vec![UNLABELED; n];
    for row in 0..shape.height {
        for col in 0..shape.width {
            let idx = row * shape.width + col;
            let Some(class) = grid.class_at(idx) else { continue };
            let uf = &mut arenas[class_slot[&class]];

            let mut label = UNLABELED;
            for &o in prior {
                let Some(nb) = Neighborhood::step(shape, row, col, o) else { continue };
                if grid.class_at(nb) != Some(class) {
                    continue;
                }
                let nb_label = provisional[nb];
                label = if label == UNLABELED {
                    nb_label
                } else {
                    // Diagonal and orthogonal neighbors can carry different
                    // labels for one region; merge them here in the scan.
                    uf.union(label, nb_label);
                    label.min(nb_label)
                };
            }
            provisional[idx] = if label == UNLABELED { uf.make_set() } else { label };
        }
    }

    // Pass 2: resolve roots, number them densely per class.
    let mut root_ids: Vec<Vec<u32>> = arenas.iter().map(|uf| vec![0; uf.len()]).collect();
    let mut counts = vec![0u32; classes.len()];
    let mut sizes: Vec<Vec<u32>> = vec![Vec::new(); classes.len()];
    let mut local = vec![None; n];
    for idx in 0..n {
        let Some(class) = grid.class_at(idx) else { continue };
        let slot = class_slot[&class];
        let root = arenas[slot].find(provisional[idx]) as usize;
        if root_ids[slot][root] == 0 {
            counts[slot] += 1;
            root_ids[slot][root] = counts[slot];
            sizes[slot].push(0);
        }
        let id = root_ids[slot][root];
        sizes[slot][id as usize - 1] += 1;
        local[idx] = Some((slot, id));
    }

    let offsets: Vec<u32> = match numbering {
        LabelNumbering::PerClass => vec![0; classes.len()],
        LabelNumbering::Global => counts
            .iter()
            .scan(0u32, |acc, &c| {
                let start = *acc;
                *acc += c;
                Some(start)
            })
            .collect(),
    };

    let labels = local.into_iter().map(|l| l.map(|(slot, id)| offsets[slot] + id)).collect();
    let patches = classes
        .iter()
        .enumerate()
        .flat_map(|(slot, &class)| {
            let base = offsets[slot];
            sizes[slot]
                .iter()
                .enumerate()
                .map(move |(i, &n_cells)| Patch { class, id: base + i as u32 + 1, n_cells })
        })
        .collect();
    let class_counts: Vec<ClassPatches> = classes
        .iter()
        .zip(&counts)
        .map(|(&class, &n_patches)| ClassPatches { class, n_patches })
        .collect();

    log::debug!(
        "labelled {}x{} grid: {} classes, {} patches ({:?})",
        shape.width,
        shape.height,
        classes.len(),
        counts.iter().sum::<u32>(),
        connectivity
    );

    Ok(ComponentLabels {
        width: shape.width,
        height: shape.height,
        labels,
        classes: class_counts,
        patches,
        numbering,
    })
}

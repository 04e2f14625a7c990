//! Analysis pipeline: runs every grid pass once and gathers the results a
//! landscape-metric layer consumes into one serialisable summary.
//!
//! Stages:
//! 1. Class composition and its Shannon entropy.
//! 2. Patch labeling (per-class counts, patch sizes).
//! 3. Co-occurrence over the configured direction set.
//! 4. Boundary cell count over the same direction set.
use serde::Serialize;

use crate::boundary::boundary_map;
use crate::config::{AnalysisConfig, Connectivity, LabelNumbering, LogBase, PairMode};
use crate::cooccurrence::{cooccurrence, Cooccurrence};
use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::labeling::{label_components, ClassPatches, Patch};
use crate::stats::{class_composition, entropy, ClassCount};

#[derive(Debug, Clone, Serialize)]
pub struct LandscapeSummary {
    pub width: usize,
    pub height: usize,
    /// Classified (non-missing) cells.
    pub n_cells: u64,
    pub composition: Vec<ClassCount>,
    /// Shannon entropy of `composition`.
    pub entropy: f64,
    pub entropy_base: LogBase,
    pub connectivity: Connectivity,
    pub numbering: LabelNumbering,
    pub patches_per_class: Vec<ClassPatches>,
    pub patches: Vec<Patch>,
    pub pair_mode: PairMode,
    pub cooccurrence: Cooccurrence,
    pub boundary_cells: usize,
}

/// Run the full pipeline on `grid`.
///
/// Fails with [`GridError::MissingValueOnly`] on a grid without classified
/// cells, including a zero-cell grid.
pub fn analyze(grid: &Grid, cfg: &AnalysisConfig) -> Result<LandscapeSummary> {
    let neighborhood = cfg.directions.build()?;

    // Stage 1: composition.
    let composition = class_composition(grid);
    if composition.is_empty() {
        return Err(GridError::MissingValueOnly);
    }
    let n_cells: u64 = composition.iter().map(|c| c.cells).sum();
    let freqs: Vec<f64> = composition.iter().map(|c| c.cells as f64).collect();
    let h = entropy(&freqs, cfg.entropy_base)?;

    // Stage 2: patches.
    let labels = label_components(grid, cfg.connectivity, cfg.numbering)?;

    // Stage 3: co-occurrence.
    let co = cooccurrence(grid, &neighborhood, cfg.pair_mode);

    // Stage 4: boundaries.
    let boundary_cells = boundary_map(grid, &neighborhood).n_boundary();

    log::debug!(
        "analysed {}x{} grid: {} classes, {} patches, {} boundary cells",
        grid.width(),
        grid.height(),
        composition.len(),
        labels.total_patches(),
        boundary_cells
    );

    Ok(LandscapeSummary {
        width: grid.width(),
        height: grid.height(),
        n_cells,
        composition,
        entropy: h,
        entropy_base: cfg.entropy_base,
        connectivity: cfg.connectivity,
        numbering: cfg.numbering,
        patches_per_class: labels.classes,
        patches: labels.patches,
        pair_mode: cfg.pair_mode,
        cooccurrence: co,
        boundary_cells,
    })
}

//! Grid algorithms behind landscape-ecology metrics.
//!
//! Input is a categorical [`Grid`]: one integer class per cell, or
//! [`MISSING`]. Everything here is a pure function of its arguments; no
//! I/O, no shared state.
//!
//! - [`coords`]: linear index <-> (x, y)
//! - [`neighborhood`]: direction sets (rook, queen, custom offsets, weight matrices)
//! - [`adjacency`]: neighbor pair extraction
//! - [`labeling`]: connected-component (patch) labeling
//! - [`cooccurrence`]: class-pair counts, matrix and packed views
//! - [`boundary`]: boundary cell map
//! - [`geometry`]: nearest-neighbor distance, diameter, circle buffers
//! - [`stats`]: entropy, unique values, composition
//! - [`analysis`]: all of the above in one pass over a config

pub mod adjacency;
pub mod analysis;
pub mod boundary;
pub mod config;
pub mod cooccurrence;
pub mod coords;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod labeling;
pub mod neighborhood;
pub mod stats;

pub use adjacency::{adjacency_pairs, class_pairs, AdjacencyPair};
pub use analysis::{analyze, LandscapeSummary};
pub use boundary::{boundary_map, BoundaryMap};
pub use config::{AnalysisConfig, Connectivity, DirectionSpec, LabelNumbering, LogBase, PairMode};
pub use cooccurrence::{cooccurrence, triangular_index, Cooccurrence};
pub use coords::{cell_to_xy, xy_to_cell, CellXY, GridShape};
pub use error::{GridError, Result};
pub use geometry::{
    circle_buffer, circumscribing_circles, max_distance, nearest_neighbor_distances, Circle,
    GroupedPoint, Point, Resolution,
};
pub use grid::{Grid, MISSING};
pub use labeling::{label_components, ClassPatches, ComponentLabels, Patch};
pub use neighborhood::{Neighborhood, Offset};
pub use stats::{class_composition, entropy, entropy_with, unique_values, ClassCount};

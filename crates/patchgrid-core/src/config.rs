//! Configuration shared by the extraction operations and the analysis
//! pipeline. All types are serde-(de)serialisable so callers can keep them
//! in JSON next to their grids.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::neighborhood::{Neighborhood, Offset};

/// How neighbor relations are emitted and counted.
///
/// There is no default: every caller states which convention it wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairMode {
    /// One pair per (focal cell, direction); a symmetric direction set
    /// reaches every physical adjacency twice, once from each end.
    Directed,
    /// Each physical adjacency once, lower linear index first.
    Undirected,
}

/// Patch identifier numbering in a component label map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelNumbering {
    /// Restart at 1 within every class.
    #[default]
    PerClass,
    /// Consecutive across classes, classes taken in ascending order.
    Global,
}

/// Logarithm base for entropy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogBase {
    #[default]
    Log2,
    Ln,
    Log10,
}

impl LogBase {
    #[inline]
    pub fn log(self, x: f64) -> f64 {
        match self {
            LogBase::Log2 => x.log2(),
            LogBase::Ln => x.ln(),
            LogBase::Log10 => x.log10(),
        }
    }
}

impl FromStr for LogBase {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "log2" => Ok(LogBase::Log2),
            "ln" | "log" => Ok(LogBase::Ln),
            "log10" => Ok(LogBase::Log10),
            other => Err(GridError::InvalidBase(other.to_string())),
        }
    }
}

impl fmt::Display for LogBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogBase::Log2 => "log2",
            LogBase::Ln => "ln",
            LogBase::Log10 => "log10",
        })
    }
}

/// Serialisable description of a [`Neighborhood`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionSpec {
    Rook,
    Queen,
    /// `[drow, dcol]` pairs.
    Offsets(Vec<[i32; 2]>),
    /// Focal weight matrix, see [`Neighborhood::from_weights`].
    Weights {
        rows: usize,
        cols: usize,
        weights: Vec<Option<u8>>,
    },
}

impl DirectionSpec {
    pub fn build(&self) -> Result<Neighborhood> {
        match self {
            DirectionSpec::Rook => Ok(Neighborhood::rook()),
            DirectionSpec::Queen => Ok(Neighborhood::queen()),
            DirectionSpec::Offsets(pairs) => {
                Neighborhood::from_offsets(pairs.iter().map(|&[r, c]| Offset::new(r, c)).collect())
            }
            DirectionSpec::Weights { rows, cols, weights } => {
                Neighborhood::from_weights(*rows, *cols, weights)
            }
        }
    }
}

/// Connectivity used for patch labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Connectivity {
    #[serde(rename = "4")]
    Four,
    #[default]
    #[serde(rename = "8")]
    Eight,
}

impl Connectivity {
    pub fn from_count(n: u32) -> Result<Self> {
        match n {
            4 => Ok(Connectivity::Four),
            8 => Ok(Connectivity::Eight),
            other => Err(GridError::InvalidDirectionSet(format!(
                "connectivity must be 4 or 8, got {other}"
            ))),
        }
    }

    pub fn neighborhood(self) -> Neighborhood {
        match self {
            Connectivity::Four => Neighborhood::rook(),
            Connectivity::Eight => Neighborhood::queen(),
        }
    }
}

/// Everything [`crate::analysis::analyze`] needs besides the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Neighborhood for co-occurrence and boundary detection.
    pub directions: DirectionSpec,
    /// Required; see [`PairMode`].
    pub pair_mode: PairMode,
    #[serde(default)]
    pub connectivity: Connectivity,
    #[serde(default)]
    pub numbering: LabelNumbering,
    #[serde(default)]
    pub entropy_base: LogBase,
}

impl AnalysisConfig {
    pub fn new(directions: DirectionSpec, pair_mode: PairMode) -> Self {
        Self {
            directions,
            pair_mode,
            connectivity: Connectivity::default(),
            numbering: LabelNumbering::default(),
            entropy_base: LogBase::default(),
        }
    }
}

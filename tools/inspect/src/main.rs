/// Run the patch / co-occurrence / boundary analysis on a serialised grid.
///
/// Input is a Grid JSON file (`{"width", "height", "data"}`, missing cells
/// as `null`). Output is a LandscapeSummary, or the raw label map / boundary
/// map with `--emit`, as JSON on stdout or in `--output`.

use std::fs;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use patchgrid_core::{
    analyze, boundary_map, label_components, AnalysisConfig, Connectivity, DirectionSpec, Grid,
    LabelNumbering, LogBase, PairMode,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    Summary,
    Labels,
    Boundary,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Directions {
    Rook,
    Queen,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Pairs {
    Directed,
    Undirected,
}

#[derive(Parser, Debug)]
#[command(name = "inspect", about = "Patch, co-occurrence and boundary analysis of a class grid")]
struct Args {
    /// Grid JSON file.
    #[arg(short, long)]
    input: String,

    /// AnalysisConfig JSON file; overrides the flags below.
    #[arg(short, long)]
    config: Option<String>,

    /// Direction set for co-occurrence and boundaries.
    #[arg(short, long, value_enum, default_value = "rook")]
    directions: Directions,

    /// Pair counting mode. Required unless --config is given.
    #[arg(short, long, value_enum)]
    pairs: Option<Pairs>,

    /// Patch connectivity, 4 or 8.
    #[arg(long, default_value_t = 8)]
    connectivity: u32,

    /// Number patches across classes instead of restarting per class.
    #[arg(long)]
    global_ids: bool,

    /// Entropy log base: log2, ln or log10.
    #[arg(long, default_value = "log2")]
    base: String,

    /// What to write.
    #[arg(short, long, value_enum, default_value = "summary")]
    emit: Emit,

    /// Output file; stdout when absent.
    #[arg(short, long)]
    output: Option<String>,
}

fn load_config(args: &Args) -> Result<AnalysisConfig> {
    if let Some(path) = &args.config {
        let text = fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
        return serde_json::from_str(&text).with_context(|| format!("parsing config {path}"));
    }

    let Some(pairs) = args.pairs else {
        bail!("--pairs directed|undirected is required without --config");
    };
    let directions = match args.directions {
        Directions::Rook => DirectionSpec::Rook,
        Directions::Queen => DirectionSpec::Queen,
    };
    let pair_mode = match pairs {
        Pairs::Directed => PairMode::Directed,
        Pairs::Undirected => PairMode::Undirected,
    };
    let mut cfg = AnalysisConfig::new(directions, pair_mode);
    cfg.connectivity = Connectivity::from_count(args.connectivity)?;
    cfg.numbering = if args.global_ids { LabelNumbering::Global } else { LabelNumbering::PerClass };
    cfg.entropy_base = args.base.parse::<LogBase>()?;
    Ok(cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = load_config(&args)?;

    let text = fs::read_to_string(&args.input).with_context(|| format!("reading grid {}", args.input))?;
    let grid: Grid = serde_json::from_str(&text).with_context(|| format!("parsing grid {}", args.input))?;
    eprintln!("Loaded {}x{} grid from {}", grid.width(), grid.height(), args.input);

    let json = match args.emit {
        Emit::Summary => {
            let summary = analyze(&grid, &cfg)?;
            eprintln!(
                "{} classes, {} patches, {} boundary cells",
                summary.composition.len(),
                summary.patches.len(),
                summary.boundary_cells
            );
            serde_json::to_string_pretty(&summary)?
        }
        Emit::Labels => {
            let labels = label_components(&grid, cfg.connectivity, cfg.numbering)?;
            serde_json::to_string(&labels)?
        }
        Emit::Boundary => {
            let neighborhood = cfg.directions.build()?;
            serde_json::to_string(&boundary_map(&grid, &neighborhood))?
        }
    };

    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {path}"))?;
            eprintln!("  -> {path}");
        }
        None => println!("{json}"),
    }
    Ok(())
}

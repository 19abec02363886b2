use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dungeon_core::{
    DungeonLayout, LayoutParams, SeededRng, WallSegment, WallVisual, generate_layout,
    generate_wall_visuals, generate_walls,
};
use log::{LevelFilter, debug};
use serde::Serialize;

mod config;

use config::{LayoutSection, RunConfig};

const DEFAULT_SEED: &str = "dungeon";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Summary,
    Ascii,
    Json,
}

#[derive(Parser)]
#[command(author, version, about = "Generate a seeded dungeon layout", long_about = None)]
struct Args {
    /// Seed text; numeric text is used as the seed value directly
    #[arg(short, long)]
    seed: Option<String>,

    /// TOML file with `seed`, `[layout]` and `[walls]` settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    rooms: Option<u32>,

    #[arg(long)]
    density: Option<f64>,

    #[arg(long, conflicts_with = "branching")]
    linearity: Option<f64>,

    #[arg(long)]
    branching: Option<f64>,

    #[arg(long)]
    size_bias: Option<f64>,

    #[arg(long)]
    symmetry: Option<bool>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,

    /// Log walker activity to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn layout_overrides(&self) -> LayoutSection {
        LayoutSection {
            room_count: self.rooms,
            density: self.density,
            linearity: self.linearity,
            branching: self.branching,
            room_size_bias: self.size_bias,
            symmetry: self.symmetry,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    seed: &'a str,
    fingerprint: String,
    params: &'a LayoutParams,
    layout: &'a DungeonLayout,
    walls: &'a [WallSegment],
    wall_visuals: &'a [WallVisual],
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose { LevelFilter::Debug } else { LevelFilter::Warn })
        .parse_default_env()
        .init();

    let config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    let params = config.layout.merged_with(&args.layout_overrides()).to_params()?;
    let seed = args.seed.as_deref().or(config.seed.as_deref()).unwrap_or(DEFAULT_SEED);
    debug!("generating with seed {seed:?} and {params:?}");

    let layout = generate_layout(&params, &mut SeededRng::from_text(seed))
        .context("Layout generation failed")?;
    let geometry = &config.walls.geometry;
    let walls = generate_walls(&layout.floors, &layout.entrance_edges, geometry);
    let style = &config.walls.style;
    let wall_visuals =
        generate_wall_visuals(&layout.floors, &layout.entrance_edges, geometry, style);

    match args.format {
        OutputFormat::Summary => print_summary(seed, &layout, &walls, &wall_visuals),
        OutputFormat::Ascii => print!("{}", layout.to_ascii()),
        OutputFormat::Json => {
            let report = Report {
                seed,
                fingerprint: format!("{:016x}", layout.fingerprint()),
                params: &params,
                layout: &layout,
                walls: &walls,
                wall_visuals: &wall_visuals,
            };
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize layout")?;
            println!("{json}");
        }
    }

    Ok(())
}

fn print_summary(
    seed: &str,
    layout: &DungeonLayout,
    walls: &[WallSegment],
    visuals: &[WallVisual],
) {
    println!("Seed: {seed}");
    println!("Fingerprint: {:016x}", layout.fingerprint());
    println!("Rooms: {}", layout.rooms.len());
    println!("Floor cells: {}", layout.floors.len());
    println!("Corridor cells: {}", layout.corridors.len());
    println!("Doors: {}", layout.doors.len());
    println!("Entrance edges: {}", layout.entrance_edges.len());
    println!("Wall segments: {}", walls.len());
    println!("Wall visuals: {}", visuals.len());
    if let Some((min, max)) = layout.bounds() {
        println!("Bounds: ({}, {}) .. ({}, {})", min.x, min.y, max.x, max.y);
    }
    if let Some(start) = layout.start_room() {
        println!("Start room: {}x{} at ({}, {})", start.w, start.h, start.x, start.y);
    }
}

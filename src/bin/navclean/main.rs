//! navclean CLI - blocks or bakes navigation mesh patches.
//!
//! Usage: navclean <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `navclean --help` for available commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use nalgebra::Point3;

use navclean::algo::{self, CleanOptions, Mode, Progress};
use navclean::io;
use navclean::mesh::OutputMesh;

#[derive(Parser)]
#[command(name = "navclean")]
#[command(author, version, about = "Navigation mesh cleaner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display triangulation statistics
    Info {
        /// Input triangulation file
        input: PathBuf,

        /// Vertex weld tolerance
        #[arg(short = 't', long, default_value_t = algo::weld::DEFAULT_WELD_TOLERANCE)]
        weld_tolerance: f64,
    },

    /// Cover every patch without a sample point with a blocking slab
    Block {
        #[command(flatten)]
        common: CommonArgs,

        /// Slab thickness
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        height: f64,

        /// Vertical offset applied before extrusion
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        offset: f64,

        /// Intermediate cap layers between top and bottom
        #[arg(long, default_value_t = 3)]
        mid_layers: usize,
    },

    /// Emit every patch that contains a sample point as its own mesh
    Bake {
        #[command(flatten)]
        common: CommonArgs,

        /// Depth of the skirt below the floor
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        height: f64,

        /// Vertical offset applied before extrusion
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        offset: f64,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Input triangulation file (.obj or .stl)
    input: PathBuf,

    /// Output mesh file; extra meshes get a `_<n>` suffix
    output: PathBuf,

    /// Walkable sample point as `x,y,z` (repeatable)
    #[arg(short, long = "point", value_parser = parse_point)]
    points: Vec<Point3<f64>>,

    /// JSON file holding an array of `[x, y, z]` sample points
    #[arg(long = "points")]
    points_file: Option<PathBuf>,

    /// Vertex weld tolerance
    #[arg(short = 't', long, default_value_t = algo::weld::DEFAULT_WELD_TOLERANCE)]
    weld_tolerance: f64,
}

fn parse_point(s: &str) -> Result<Point3<f64>, String> {
    let coords = s
        .split(',')
        .map(|c| c.trim().parse::<f64>().map_err(|e| format!("'{}': {}", c, e)))
        .collect::<Result<Vec<f64>, String>>()?;
    match coords.as_slice() {
        &[x, y, z] => Ok(Point3::new(x, y, z)),
        _ => Err(format!("expected x,y,z but got {} values", coords.len())),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info {
            input,
            weld_tolerance,
        } => {
            cmd_info(&input, weld_tolerance)?;
        }

        Commands::Block {
            common,
            height,
            offset,
            mid_layers,
        } => {
            let options = CleanOptions::default()
                .with_mode(Mode::BlockNonWalkable)
                .with_height(height)
                .with_offset(offset)
                .with_mid_layers(mid_layers)
                .with_weld_tolerance(common.weld_tolerance);
            cmd_clean(&common, &options)?;
        }

        Commands::Bake {
            common,
            height,
            offset,
        } => {
            let options = CleanOptions::default()
                .with_mode(Mode::BakeWalkable)
                .with_height(height)
                .with_offset(offset)
                .with_weld_tolerance(common.weld_tolerance);
            cmd_clean(&common, &options)?;
        }
    }

    Ok(())
}

/// Create a progress bar that writes to stderr.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Keep the bar monotonic across stage changes.
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous && raw_percent != 100 {
            return;
        }
        let percent = raw_percent.max(previous);

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {:<24}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn load_points(common: &CommonArgs) -> Result<Vec<Point3<f64>>, Box<dyn std::error::Error>> {
    let mut points = common.points.clone();
    if let Some(path) = &common.points_file {
        let text = std::fs::read_to_string(path)?;
        let raw: Vec<[f64; 3]> = serde_json::from_str(&text)
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        points.extend(raw.into_iter().map(Point3::from));
    }
    Ok(points)
}

/// Path for the `index`-th of `count` output meshes.
fn output_path(output: &Path, index: usize, count: usize) -> PathBuf {
    if count <= 1 {
        return output.to_path_buf();
    }
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh");
    let name = match output.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, index, ext),
        None => format!("{}_{}", stem, index),
    };
    output.with_file_name(name)
}

fn cmd_info(input: &Path, weld_tolerance: f64) -> Result<(), Box<dyn std::error::Error>> {
    let triangulation = io::load_triangulation(input)?;
    let options = CleanOptions::default().with_weld_tolerance(weld_tolerance);
    let summary = algo::summarize(&triangulation, &options)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", summary.vertices);
    println!(
        "Unique vertices: {} (tolerance {})",
        summary.unique_vertices, weld_tolerance
    );
    println!("Triangles: {}", summary.triangles);
    if summary.degenerate_triangles > 0 {
        println!("Degenerate triangles: {}", summary.degenerate_triangles);
    }
    println!("Groups: {}", summary.groups);
    println!("Boundary edges: {}", summary.boundary_edges);

    let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
    let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
    for v in triangulation.vertices() {
        min = min.inf(v);
        max = max.sup(v);
    }
    if !triangulation.vertices().is_empty() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    Ok(())
}

fn cmd_clean(common: &CommonArgs, options: &CleanOptions) -> Result<(), Box<dyn std::error::Error>> {
    let triangulation = io::load_triangulation(&common.input)?;
    let points = load_points(common)?;

    println!(
        "Loaded: {} vertices, {} triangles, {} sample points",
        triangulation.num_vertices(),
        triangulation.num_triangles(),
        points.len()
    );

    let progress = create_progress();
    let start = Instant::now();
    let meshes: Vec<OutputMesh> =
        algo::clean_with_progress(&triangulation, &points, options, &progress)?;
    let elapsed = start.elapsed();

    if meshes.is_empty() {
        println!("Nothing to write ({:.2?})", elapsed);
        return Ok(());
    }

    for (i, mesh) in meshes.iter().enumerate() {
        let path = output_path(&common.output, i, meshes.len());
        io::save(mesh, &path)?;
        println!(
            "Saved: {} ({} vertices, {} triangles)",
            path.display(),
            mesh.num_vertices(),
            mesh.num_triangles()
        );
    }
    println!("Done: {} meshes ({:.2?})", meshes.len(), elapsed);

    Ok(())
}

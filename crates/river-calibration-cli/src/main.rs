use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::info;
use river_calibration_core::{Cell, Distances, PixelTransform, Pt2, points_from_table};
use river_calibration_pipeline::ipcam::{
    IpcamPoint, IpcamResponse, SolveMode, merge_camera_solution,
};
use serde_json::json;

/// Offline helpers for river footage calibration.
#[derive(Debug, Parser)]
#[command(author, version, about = "River footage calibration helpers")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Six corner distances from four ordered corners or a distance table.
    Distances {
        /// JSON array of four `[x, y]` corners (top-left, top-right,
        /// bottom-right, bottom-left).
        #[arg(long, conflicts_with = "table", required_unless_present = "table")]
        corners: Option<String>,

        /// JSON rows of an imported distance sheet.
        #[arg(long)]
        table: Option<String>,
    },

    /// Map a pixel position to real-world coordinates.
    Transform {
        /// JSON file holding a 3x3 row-major matrix.
        #[arg(long)]
        matrix: String,

        /// Pixel position as `X,Y`.
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        point: Pt2,
    },

    /// Normalize an imported control point sheet.
    ImportPoints {
        /// JSON rows `[label, X, Y, Z, (x, y)]`.
        #[arg(long)]
        table: String,
    },

    /// Fold a camera solver response into control points.
    MergeCamera {
        /// JSON array of control points as sent to the solver.
        #[arg(long)]
        points: String,

        /// JSON camera solver response.
        #[arg(long)]
        response: String,

        #[arg(long, default_value = "direct-solve")]
        mode: SolveMode,
    },
}

fn parse_point(s: &str) -> std::result::Result<Pt2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let x: f64 = x.trim().parse().map_err(|_| format!("invalid X in '{s}'"))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("invalid Y in '{s}'"))?;
    Ok(Pt2::new(x, y))
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
}

fn distances_from_files(corners: Option<&str>, table: Option<&str>) -> Result<Distances> {
    match (corners, table) {
        (Some(path), _) => {
            let corners: [Pt2; 4] = load_json_file(Path::new(path))?;
            Ok(Distances::from_corners(&corners))
        }
        (None, Some(path)) => {
            let rows: Vec<Vec<Cell>> = load_json_file(Path::new(path))?;
            Ok(Distances::from_table(&rows)?)
        }
        (None, None) => bail!("either --corners or --table is required"),
    }
}

fn transform_from_file(matrix_path: &str, point: Pt2) -> Result<Pt2> {
    let transform: PixelTransform = load_json_file(Path::new(matrix_path))?;
    Ok(transform.pixel_to_real_world(&point))
}

fn merge_camera_from_files(
    points_path: &str,
    response_path: &str,
    mode: SolveMode,
) -> Result<serde_json::Value> {
    let points: Vec<IpcamPoint> = load_json_file(Path::new(points_path))?;
    let response: IpcamResponse = load_json_file(Path::new(response_path))?;
    let merged = merge_camera_solution(&points, &response, mode);
    info!(
        "{mode}: {} of {} points used, mean error {}",
        merged.num_points,
        merged.points.len(),
        response.mean_error
    );
    Ok(json!({
        "points": merged.points,
        "numPoints": merged.num_points,
    }))
}

fn run(command: Command) -> Result<String> {
    let value = match command {
        Command::Distances { corners, table } => {
            serde_json::to_value(distances_from_files(corners.as_deref(), table.as_deref())?)?
        }
        Command::Transform { matrix, point } => {
            serde_json::to_value(transform_from_file(&matrix, point)?)?
        }
        Command::ImportPoints { table } => {
            let rows: Vec<Vec<Cell>> = load_json_file(Path::new(&table))?;
            serde_json::to_value(points_from_table(&rows)?)?
        }
        Command::MergeCamera {
            points,
            response,
            mode,
        } => merge_camera_from_files(&points, &response, mode)?,
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

fn main() {
    env_logger::init();
    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    let json = run(args.command)?;
    println!("{json}");
    Ok(())
}

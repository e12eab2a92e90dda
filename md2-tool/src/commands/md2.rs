//! MD2 model command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use log::info;
use serde::Serialize;
use std::{fs, path::Path, path::PathBuf};

use q2_md2::{AnimationTable, Md2Model, PlaybackMode};

/// Default rate for animations grouped from frame names
const FRAME_NAME_FPS: f32 = 10.0;

#[derive(Subcommand)]
pub enum Md2Commands {
    /// Display information about an MD2 model file
    Info {
        /// Path to the MD2 file
        file: PathBuf,

        /// Show the raw header fields
        #[arg(short, long)]
        detailed: bool,
    },

    /// Check that an MD2 model file loads cleanly
    Validate {
        /// Path to the MD2 file
        file: PathBuf,
    },

    /// List frame names and bounds
    Frames {
        /// Path to the MD2 file
        file: PathBuf,
    },

    /// Print the interpolated vertex positions of an animation at a time
    Pose {
        /// Path to the MD2 file
        file: PathBuf,

        /// Animation to play
        #[arg(short, long)]
        animation: String,

        /// Seconds of playback before sampling
        #[arg(short, long, default_value = "0")]
        time: f32,

        /// Group animations from frame names instead of the standard table
        #[arg(long)]
        frame_names: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the animations a model can play
    Animations {
        /// Path to the MD2 file
        file: PathBuf,

        /// Group animations from frame names instead of the standard table
        #[arg(long)]
        frame_names: bool,
    },
}

pub fn execute(cmd: Md2Commands) -> Result<()> {
    match cmd {
        Md2Commands::Info { file, detailed } => handle_info(&file, detailed),
        Md2Commands::Validate { file } => handle_validate(&file),
        Md2Commands::Frames { file } => handle_frames(&file),
        Md2Commands::Pose {
            file,
            animation,
            time,
            frame_names,
            json,
        } => handle_pose(&file, &animation, time, frame_names, json),
        Md2Commands::Animations { file, frame_names } => handle_animations(&file, frame_names),
    }
}

fn load_model(path: &Path, frame_names: bool) -> Result<Md2Model> {
    info!("Loading MD2 model: {}", path.display());
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let model = Md2Model::load(&data)
        .with_context(|| format!("Failed to load MD2 model from {}", path.display()))?;
    if !frame_names {
        return Ok(model);
    }

    let table = AnimationTable::from_frame_names(model.frames(), FRAME_NAME_FPS);
    Md2Model::load_with_animations(&data, table)
        .with_context(|| format!("Failed to load MD2 model from {}", path.display()))
}

fn handle_info(path: &Path, detailed: bool) -> Result<()> {
    let model = load_model(path, false)?;

    println!("=== MD2 Model Information ===");
    println!("File: {}", path.display());
    println!("{}", model.summary());

    if !model.skins().is_empty() {
        println!("\nSkins:");
        for (i, skin) in model.skins().iter().enumerate() {
            println!("  [{i}] {}", skin.name());
        }
    }

    if detailed {
        println!("\n=== Header ===");
        println!("{:#?}", model.header());
    }

    Ok(())
}

fn handle_validate(path: &Path) -> Result<()> {
    let model = load_model(path, false)?;
    let summary = model.summary();
    println!(
        "OK: {} frames, {} vertices, {} triangles",
        summary.num_frames, summary.num_vertices, summary.num_triangles
    );
    Ok(())
}

fn handle_frames(path: &Path) -> Result<()> {
    let model = load_model(path, false)?;

    for (i, frame) in model.frames().iter().enumerate() {
        match frame.bounds() {
            Some((min, max)) => println!(
                "{i:4} {:16} ({:.2}, {:.2}, {:.2}) - ({:.2}, {:.2}, {:.2})",
                frame.name(), min.x, min.y, min.z, max.x, max.y, max.z
            ),
            None => println!("{i:4} {:16} (no vertices)", frame.name()),
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct PoseReport {
    animation: String,
    time: f32,
    frame: usize,
    next_frame: usize,
    interpolation: f32,
    vertices: Vec<[f32; 3]>,
}

fn handle_pose(path: &Path, animation: &str, time: f32, frame_names: bool, json: bool) -> Result<()> {
    let mut model = load_model(path, frame_names)?;
    model
        .set_animation(animation)
        .with_context(|| format!("Available animations: {}", model.animation_names().join(", ")))?;
    model.tick(time);

    let state = model.state();
    let report = PoseReport {
        animation: animation.to_string(),
        time,
        frame: state.current_frame(),
        next_frame: state.next_frame(),
        interpolation: state.interpolation(),
        vertices: model
            .vertex_positions()
            .iter()
            .map(|p| p.to_array())
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        info!(
            "Frame {} -> {} at {:.3}",
            report.frame, report.next_frame, report.interpolation
        );
        for [x, y, z] in &report.vertices {
            println!("{x} {y} {z}");
        }
    }

    Ok(())
}

fn handle_animations(path: &Path, frame_names: bool) -> Result<()> {
    let model = load_model(path, frame_names)?;

    if model.animations().is_empty() {
        println!("No playable animations");
        return Ok(());
    }

    for animation in model.animations().iter() {
        let mode = match animation.mode {
            PlaybackMode::Loop => "loop",
            PlaybackMode::Once => "once",
        };
        println!(
            "{:24} frames {:3}-{:3} @ {:4.1} fps ({mode})",
            animation.name, animation.first_frame, animation.last_frame, animation.fps
        );
    }

    Ok(())
}

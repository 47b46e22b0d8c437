//! dal - DAL model container tool
//!
//! Inspects `.dmd` containers and runs the optimization passes over them.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dal_model::{Model, export_model_with_level, modifier, parse_model};
use std::path::{Path, PathBuf};
use std::time::Instant;

use config::PipelineConfig;

#[derive(Parser)]
#[command(name = "dal")]
#[command(about = "DAL model container tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize a model and write it back out
    Optimize {
        /// Input .dmd file
        input: PathBuf,

        /// Output .dmd file (default: <input>.opt.dmd)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Convert flat units to indexed units
        #[arg(short, long)]
        index: bool,

        /// Merge units that share a material
        #[arg(short, long)]
        merge: bool,

        /// Drop joints without keyframes
        #[arg(short, long)]
        reduce_joints: bool,

        /// Recompute the bounding box from mesh positions
        #[arg(long)]
        recompute_aabb: bool,

        /// DEFLATE level 0-9 (overrides the config file)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=9))]
        level: Option<u32>,

        /// Pipeline config file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print a summary of a model
    Info {
        /// Input .dmd file
        input: PathBuf,

        /// Print the summary as JSON on stdout
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging. Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Optimize {
            input,
            output,
            index,
            merge,
            reduce_joints,
            recompute_aabb,
            level,
            config,
        } => {
            let mut pipeline = match config {
                Some(path) => config::load_config(&path)?,
                None => PipelineConfig::default(),
            };
            pipeline.index |= index;
            pipeline.merge_by_material |= merge;
            pipeline.reduce_joints |= reduce_joints;
            pipeline.recompute_aabb |= recompute_aabb;
            if let Some(level) = level {
                pipeline.compression_level = level;
            }

            let output = output.unwrap_or_else(|| input.with_extension("opt.dmd"));
            tracing::info!("Optimizing {:?} -> {:?}", input, output);
            optimize(&input, &output, &pipeline)?;
            tracing::info!("Done!");
        }

        Commands::Info { input, json } => {
            let model = load_model(&input)?;
            let stats = model.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                tracing::info!("{:?}", input);
                tracing::info!(
                    "  units: {} straight, {} straight joint, {} indexed, {} indexed joint",
                    stats.units_straight,
                    stats.units_straight_joint,
                    stats.units_indexed,
                    stats.units_indexed_joint
                );
                tracing::info!(
                    "  vertices: {}, indices: {}",
                    stats.vertex_count,
                    stats.index_count
                );
                tracing::info!(
                    "  joints: {}, animations: {}",
                    stats.joint_count,
                    stats.animation_count
                );
                tracing::info!("  aabb: {:?} .. {:?}", stats.aabb_min, stats.aabb_max);
            }
        }
    }

    Ok(())
}

fn load_model(path: &Path) -> Result<Model> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read model: {:?}", path))?;
    let model = parse_model(&bytes).with_context(|| format!("Failed to parse model: {:?}", path))?;
    Ok(model)
}

fn optimize(input: &Path, output: &Path, pipeline: &PipelineConfig) -> Result<()> {
    let start = Instant::now();
    let mut model = load_model(input)?;
    tracing::info!("Loaded in {:.2?}", start.elapsed());

    if pipeline.is_passthrough() {
        tracing::info!("No passes selected, re-encoding only");
    }

    if pipeline.index {
        let start = Instant::now();
        modifier::index_model(&mut model);
        tracing::info!("Indexed vertices in {:.2?}", start.elapsed());
    }

    if pipeline.merge_by_material {
        let start = Instant::now();
        let before = model.unit_count();
        modifier::merge_model_by_material(&mut model);
        tracing::info!(
            "Merged units {} -> {} in {:.2?}",
            before,
            model.unit_count(),
            start.elapsed()
        );
    }

    if pipeline.reduce_joints {
        let start = Instant::now();
        let before = model.skeleton.len();
        let reduced = modifier::reduce_joints(&mut model)
            .with_context(|| format!("Failed to reduce joints of {:?}", input))?;
        if reduced {
            tracing::info!(
                "Reduced joints {} -> {} in {:.2?}",
                before,
                model.skeleton.len(),
                start.elapsed()
            );
        } else {
            tracing::info!("Model has no animations, joints left as they are");
        }
    }

    if pipeline.recompute_aabb {
        model.aabb = model.compute_aabb();
    }

    let start = Instant::now();
    let bytes = export_model_with_level(&model, pipeline.compression())
        .with_context(|| format!("Failed to export model: {:?}", output))?;
    std::fs::write(output, &bytes)
        .with_context(|| format!("Failed to write model: {:?}", output))?;
    tracing::info!("Wrote {} bytes in {:.2?}", bytes.len(), start.elapsed());

    Ok(())
}

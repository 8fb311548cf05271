//! linework CLI - hidden-line rendering of 3D wireframe diagrams
//!
//! Reads a JSON scene, removes hidden lines, and writes SVG, TeX or PDF.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use linework_export::{EmitOptions, Format};
use linework_hlr::{render, Scene};

mod config;

use config::{Config, Overrides};

#[derive(Parser)]
#[command(name = "linework")]
#[command(about = "Hidden-line renderer for 3D wireframe diagrams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene to SVG, TeX or PDF
    Render {
        /// Input scene (.json)
        scene: PathBuf,
        /// Output file (format determined by extension: .svg, .tex, .pdf), or - for stdout
        output: PathBuf,
        /// Output format, overriding the extension (svg, tex, pdf)
        #[arg(short, long)]
        format: Option<String>,
        /// Render configuration (.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Gap width where a nearer line crosses in front
        #[arg(long, conflicts_with = "no_gap")]
        gap: Option<f64>,
        /// Do not notch crossing lines
        #[arg(long)]
        no_gap: bool,
        /// Thickness of face intersection lines (0 disables them)
        #[arg(long)]
        intersection_width: Option<f64>,
        /// Do not draw polygon edges
        #[arg(long)]
        no_edges: bool,
        /// Omit hidden lines instead of dashing them
        #[arg(long)]
        no_hidden: bool,
        /// SVG view box and PDF page size
        #[arg(long)]
        size: Option<f64>,
    },
    /// Display information about a scene
    Info {
        /// Input scene (.json)
        scene: PathBuf,
        /// Render configuration (.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            scene,
            output,
            format,
            config,
            gap,
            no_gap,
            intersection_width,
            no_edges,
            no_hidden,
            size,
        } => {
            let flags = Overrides {
                gap,
                no_gap,
                intersection_width,
                no_edges,
                no_hidden,
                size,
            };
            let config = Config::load(config.as_deref())?.with_overrides(&flags);
            render_file(&scene, &output, format.as_deref(), &config)?;
        }
        Commands::Info { scene, config } => {
            let config = Config::load(config.as_deref())?.with_overrides(&Overrides::default());
            show_info(&scene, &config)?;
        }
    }

    Ok(())
}

fn load_scene(path: &Path) -> Result<Scene> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Scene::from_json(&json).with_context(|| format!("parsing scene {}", path.display()))
}

fn output_format(output: &Path, requested: Option<&str>) -> Result<Format> {
    let name = match requested {
        Some(name) => name,
        None => output.extension().and_then(|e| e.to_str()).unwrap_or(""),
    };
    match Format::from_extension(name) {
        Some(format) => Ok(format),
        None => bail!("Unknown output format: {}", name),
    }
}

fn render_file(
    input: &Path,
    output: &Path,
    requested: Option<&str>,
    config: &Config,
) -> Result<()> {
    let format = output_format(output, requested)?;

    let scene = load_scene(input)?;
    let assembly = scene.assemble(&config.render)?;
    let result = render(&assembly, &scene.camera, &config.render)?;
    info!(
        "{} visible, {} hidden pieces",
        result.num_visible(),
        result.num_hidden()
    );

    if format == Format::Tex && result.is_empty() {
        bail!("nothing visible to write to {}", output.display());
    }

    let emit_options = EmitOptions {
        draw_hidden: config.render.draw_hidden,
        size: config.size,
    };
    if output == Path::new("-") {
        let stdout = io::stdout().lock();
        linework_export::emit(format, &result, scene.camera.scale, &emit_options, stdout)
            .context("writing to stdout")?;
        return Ok(());
    }
    linework_export::write_to_path(output, format, &result, scene.camera.scale, &emit_options)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Wrote {:?} to {}", format, output.display());
    Ok(())
}

fn show_info(file: &Path, config: &Config) -> Result<()> {
    let scene = load_scene(file)?;

    println!("linework scene: {}", file.display());
    println!("  Points: {}", scene.points.len());
    println!("  Polygons: {}", scene.polygons.len());
    println!("  Segments: {}", scene.segments.len());
    println!(
        "  Camera: eye x={}, screen x={}, angles ({}, {}), scale {}",
        scene.camera.eye_x,
        scene.camera.screen_x,
        scene.camera.x_angle,
        scene.camera.z_angle,
        scene.camera.scale
    );

    let assembly = scene.assemble(&config.render)?;
    println!("\nAssembled:");
    println!("  Segments: {}", assembly.segments.len());
    println!("  Face intersection lines: {}", assembly.intersection_count);

    match render(&assembly, &scene.camera, &config.render) {
        Ok(result) => {
            println!("\nVisibility:");
            println!("  Visible pieces: {}", result.num_visible());
            println!("  Hidden pieces: {}", result.num_hidden());
            println!("  Labels: {}", result.labels.len());
        }
        Err(e) => {
            println!("\nFailed to render: {}", e);
        }
    }

    Ok(())
}

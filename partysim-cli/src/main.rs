use clap::{Parser, Subcommand};
use partysim_core::{run_scene, SceneConfig, SceneKind, SimulationSummary};
use std::path::{Path, PathBuf};

mod vel_app;

#[derive(Parser)]
#[command(name = "partysim")]
#[command(about = "Partysim - particle, cloth and octree sandbox", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scene headless and print a summary
    Run {
        /// Scene to run: flag, fall or swarm
        scene: SceneKind,
        /// TOML scene file; stock parameters are used when omitted
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of frames to simulate
        #[arg(long, default_value_t = 300)]
        steps: usize,
        /// Frame length in seconds
        #[arg(long, default_value_t = 1.0 / 30.0)]
        dt: f32,
    },
    /// Open the interactive viewer
    View {
        /// Scene to show: flag, fall or swarm
        scene: SceneKind,
        /// TOML scene file, reloaded whenever it changes
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            scene,
            config,
            steps,
            dt,
        } => run(scene, config.as_deref(), steps, dt),
        Commands::View { scene, config } => vel_app::run_viewer(scene, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<SceneConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(SceneConfig::load(path)?),
        None => Ok(SceneConfig::default()),
    }
}

fn run(scene: SceneKind, config: Option<&Path>, steps: usize, dt: f32) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let summary = run_scene(scene, &config, steps, dt)?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &SimulationSummary) {
    println!("scene = {}", summary.scene);
    println!("steps = {}", summary.steps);
    println!("time = {:.3}", summary.time);
    println!("particles = {}", summary.particle_count);
    println!(
        "centroid = ({:.4}, {:.4}, {:.4})",
        summary.centroid.x, summary.centroid.y, summary.centroid.z
    );
    println!("max_speed = {:.4}", summary.max_speed);
    if !summary.finite {
        println!("warning: state is no longer finite");
    }
}

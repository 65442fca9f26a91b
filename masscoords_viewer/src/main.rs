//! masscoords viewer CLI
//!
//! Loads a static point cloud (ASCII PLY), a reference camera pose (JSON
//! metadata) and per-agent trajectories (CSV), aligns the cloud into the
//! camera's frame, logs the scene to Rerun, and drives playback plus manual
//! alignment from a terminal dashboard.

mod dashboard;

use std::path::PathBuf;
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use masscoords_core::visualization::SceneVisualizer;
use masscoords_core::{CameraPose, PointCloud, SceneState, TrajectorySet};

use dashboard::Dashboard;

const APP_ID: &str = "masscoords_viewer";

/// Point-cloud / trajectory viewer with interactive alignment
#[derive(Parser, Debug)]
#[command(name = "masscoords-viewer")]
#[command(about = "Overlay agent trajectories on a camera-aligned point cloud", long_about = None)]
struct Args {
    /// Point-cloud file (ASCII PLY)
    #[arg(long, default_value = "0000000.ply")]
    cloud: PathBuf,

    /// Camera-pose metadata file (JSON with a `poses` array)
    #[arg(long, default_value = "metadata.json")]
    poses: PathBuf,

    /// Agent trajectory file (CSV with agent_<i>_{x,y,z} columns)
    #[arg(long, default_value = "agents_trajectory.csv")]
    trajectories: PathBuf,

    /// Playback speed in frames per tick
    #[arg(long, default_value = "1.0")]
    speed: f64,

    /// Dashboard tick rate in Hz
    #[arg(long, default_value = "30")]
    tick_rate: u64,

    /// Record the scene to an .rrd file instead of spawning the viewer
    #[arg(long)]
    save: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    // The three inputs are independent; load them in parallel and join
    // before anything depends on them.
    let pose_path = args.poses.clone();
    let cloud_path = args.cloud.clone();
    let traj_path = args.trajectories.clone();
    let pose_handle = thread::spawn(move || CameraPose::load(&pose_path));
    let cloud_handle = thread::spawn(move || PointCloud::load(&cloud_path));
    let traj_handle = thread::spawn(move || TrajectorySet::load(&traj_path));

    let pose = join(pose_handle).with_context(|| format!("loading {}", args.poses.display()))?;
    let cloud = join(cloud_handle).with_context(|| format!("loading {}", args.cloud.display()))?;
    let trajectories =
        join(traj_handle).with_context(|| format!("loading {}", args.trajectories.display()))?;

    info!(
        "Loaded {} cloud points ({}), {} agents, max frame {:?}",
        cloud.len(),
        if cloud.has_colors() { "colored" } else { "flat gray" },
        trajectories.agent_count(),
        trajectories.max_frame(),
    );

    let mut scene = SceneState::new(args.speed);
    scene.cloud = Some(cloud);
    scene.camera_pose = Some(pose);
    scene.trajectories = trajectories;

    let viz = match &args.save {
        Some(path) => SceneVisualizer::save(APP_ID, path),
        None => SceneVisualizer::spawn(APP_ID),
    };

    viz.log_world_frame();
    if let Some(cloud) = &scene.cloud {
        viz.log_cloud(cloud);
    }
    viz.log_trajectory_paths(&scene.trajectories);
    if let Some(placement) = scene.try_align() {
        viz.log_cloud_transform(&placement);
    }

    let mut dashboard = Dashboard::new(args.tick_rate);
    dashboard.run(&mut scene, &viz)?;

    info!("Viewer closed");
    Ok(())
}

fn join<T>(handle: thread::JoinHandle<Result<T, masscoords_core::LoadError>>) -> Result<T> {
    handle
        .join()
        .map_err(|_| anyhow!("load thread panicked"))?
        .map_err(Into::into)
}

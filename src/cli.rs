//! Command-line arguments for the headless driver.

use std::path::PathBuf;

use clap::Parser;
use meadow_world::WorldGenParams;

/// CLI values override settings loaded from `--config`.
#[derive(Parser, Debug)]
#[command(name = "meadow", about = "Headless lawn-mowing world simulation")]
pub struct Args {
    /// World seed.
    #[arg(long, default_value_t = 1337)]
    pub seed: i32,

    /// Worldgen TOML file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Ticks to simulate.
    #[arg(long, default_value_t = 3000)]
    pub ticks: u64,

    /// Mower travel per tick, in world units.
    #[arg(long, default_value_t = 0.5)]
    pub speed: f32,

    /// Length of one serpentine lane.
    #[arg(long, default_value_t = 120.0)]
    pub lane_length: f32,

    /// Load radius in chunks.
    #[arg(long)]
    pub load_radius: Option<i32>,

    /// Mow radius override.
    #[arg(long)]
    pub mow_radius: Option<f32>,

    /// Write the session record here when done.
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Also log to this file (debug level).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn apply_overrides(&self, params: &mut WorldGenParams) {
        if let Some(r) = self.load_radius {
            params.load_radius = r.max(0);
        }
        if let Some(r) = self.mow_radius {
            if r.is_finite() && r >= 0.0 {
                params.mow_radius = r;
            }
        }
    }

    /// Lanes overlap slightly so the swath leaves no uncut strip.
    pub fn lane_spacing(&self, params: &WorldGenParams) -> f32 {
        (params.mow_radius * 1.8).max(0.1)
    }
}

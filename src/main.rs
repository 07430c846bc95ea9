use std::error::Error;
use std::fs::File;
use std::path::Path;

use clap::Parser;
use meadow::cli::Args;
use meadow::geom::Vec3;
use meadow::world::{WorldGenParams, worldgen::load_params_from_path};
use meadow::{SerpentinePath, Simulation};
use simplelog::{ColorChoice, CombinedLogger, LevelFilter, TermLogger, TerminalMode, WriteLogger};

fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match log_file {
        Some(path) => {
            CombinedLogger::init(vec![
                TermLogger::new(
                    LevelFilter::Info,
                    simplelog::Config::default(),
                    TerminalMode::Mixed,
                    ColorChoice::Auto,
                ),
                WriteLogger::new(
                    LevelFilter::Debug,
                    simplelog::Config::default(),
                    File::create(path)?,
                ),
            ])?;
        }
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let mut params = match &args.config {
        Some(path) => load_params_from_path(path)?,
        None => WorldGenParams::default(),
    };
    args.apply_overrides(&mut params);

    let path = SerpentinePath::new(
        Vec3::ZERO,
        args.lane_length,
        args.lane_spacing(&params),
        args.speed,
    );
    let mut sim = Simulation::new(args.seed, params);

    let progress_every = (args.ticks / 10).max(1);
    for t in 0..args.ticks {
        let report = sim.tick(path.sample(t));
        if !report.evicted.is_empty() || !report.loaded.is_empty() {
            log::debug!(
                "tick {}: -{} +{} chunks",
                report.tick,
                report.evicted.len(),
                report.loaded.len()
            );
        }
        while let Some(d) = sim.poll_notification() {
            println!("[tick {}] discovered {}", t, d.label);
        }
        if (t + 1) % progress_every == 0 {
            let s = sim.stream_stats();
            log::info!(
                "tick {}: coverage {:.3}% ({} chunks loaded, {} live blades)",
                t + 1,
                sim.coverage_percent(),
                s.loaded,
                sim.coverage().live_blades()
            );
        }
    }

    let record = sim.session_record();
    println!("seed:        {}", record.seed);
    println!("area mowed:  {:.1}", record.area_mowed);
    println!("coverage:    {:.3}%", record.coverage_percent);
    println!("discovered:  {}", record.discovered.len());
    for label in &record.discovered {
        println!("  - {}", label);
    }

    if let Some(out) = &args.save {
        record.save(out)?;
        log::info!("session written to {}", out.display());
    }
    Ok(())
}

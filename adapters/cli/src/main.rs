#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a bridge crew headless until it reaches
//! the goal or runs out of ticks.

mod ascii;
mod config;
mod map_file;

use std::path::PathBuf;

use anyhow::Result;
use bridge_crew_core::Event;
use bridge_crew_system_simulation::Simulation;
use bridge_crew_world::{query, MapSource, World};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "bridge-crew",
    version,
    about = "Watch gatherers, builders and managers bridge a river"
)]
struct Args {
    /// TOML file overriding simulation parameters.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Text map to play on instead of the generated river.
    #[arg(long)]
    map: Option<PathBuf>,
    /// Seed for map generation and agent wandering.
    #[arg(long)]
    seed: Option<u64>,
    /// Initial vision radius (clamped to 1..=20).
    #[arg(long)]
    vision: Option<u32>,
    /// Upper bound on simulated ticks.
    #[arg(long, default_value_t = 2000)]
    max_ticks: u64,
    /// Print a frame every N ticks; 0 prints only the final frame.
    #[arg(long, default_value_t = 0)]
    render_every: u64,
}

/// Running totals of notable events over a run.
#[derive(Debug, Default)]
struct Tally {
    harvested: usize,
    deposited: usize,
    sections: usize,
    hints: usize,
    recoveries: usize,
}

impl Tally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::ResourceHarvested { .. } => self.harvested += 1,
                Event::WoodDeposited { .. } => self.deposited += 1,
                Event::BridgeSectionCompleted { .. } => self.sections += 1,
                Event::HintIssued { .. } => self.hints += 1,
                Event::RecoveryStarted { .. } => self.recoveries += 1,
                _ => {}
            }
        }
    }
}

/// Entry point for the bridge crew command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let mut config = config::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(vision) = args.vision {
        config.vision_radius = vision;
    }

    let source = match args.map.as_deref() {
        Some(path) => match map_file::load(path) {
            Ok(layout) => MapSource::Loaded(layout),
            Err(error) => {
                warn!(%error, "falling back to the default map");
                MapSource::Generated
            }
        },
        None => MapSource::Generated,
    };

    let mut simulation = Simulation::new(config, source);
    println!("{}", simulation.banner());
    if args.render_every > 0 {
        print!("{}", ascii::frame(simulation.world()));
    }

    let mut tally = Tally::default();
    let mut events = Vec::new();
    for tick in 1..=args.max_ticks {
        events.clear();
        simulation.tick(&mut events);
        tally.record(&events);

        if args.render_every > 0 && tick % args.render_every == 0 {
            println!();
            print!("{}", ascii::frame(simulation.world()));
        }
        if query::goal_reached(simulation.world()) {
            break;
        }
    }

    println!();
    print!("{}", ascii::frame(simulation.world()));
    print_summary(simulation.world(), &tally);
    Ok(())
}

fn print_summary(world: &World, tally: &Tally) {
    println!();
    println!("ticks run:        {}", query::tick_index(world));
    println!("wood harvested:   {}", tally.harvested);
    println!("wood deposited:   {}", tally.deposited);
    println!("depot stock:      {}", query::resource_stock(world));
    println!("hints issued:     {}", tally.hints);
    println!("recoveries:       {}", tally.recoveries);
    println!(
        "bridge sections:  {} completed this run, {} total, {} in progress",
        tally.sections,
        query::completed_sections(world),
        query::sections_in_progress(world)
    );
    println!("bridge complete:  {}", query::bridge_complete(world));
    println!("goal reached:     {}", query::goal_reached(world));
}

//! Kilo swarm simulator
//!
//! Run a swarm and print which robots decided they are on the boundary.
//!
//! Usage: `kilo-sim [config.json] [cycles]`

use std::env;
use std::fs;

use kilo_sim::{border_timeline, Simulation, SimulationConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kilo_sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut config = match args.get(1) {
        Some(path) => serde_json::from_str::<SimulationConfig>(&fs::read_to_string(path)?)?,
        None => SimulationConfig::default(),
    };
    if let Some(cycles) = args.get(2).and_then(|s| s.parse().ok()) {
        config.cycles = cycles;
    }

    eprintln!("Kilo swarm simulator");
    eprintln!("====================");
    eprintln!("  Robots: {}", config.robot_count());
    eprintln!("  Cycles: {}", config.cycles);
    eprintln!("  Seed:   {}", config.seed);
    eprintln!();

    let mut sim = Simulation::new(config)?;
    let snapshot = sim.run();

    eprintln!("Run complete:");
    eprintln!("  Localized: {}/{}", snapshot.localized_count, snapshot.robots.len());
    eprintln!("  Border:    {}", snapshot.border_count);
    eprintln!("  Frames:    {} sent, {} lost", snapshot.traffic.sent, snapshot.traffic.lost);
    for (cycle, count) in border_timeline(sim.events()) {
        eprintln!("    cycle {:>4}: {} border", cycle, count);
    }

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use intersection_sim::simulation::{self, SimConfig, SimWorld};

#[derive(Parser)]
#[command(name = "intersection_sim")]
#[command(about = "Adaptive traffic signal simulation with optional UI")]
struct Cli {
    /// Run with the Bevy viewer
    #[arg(long)]
    ui: bool,

    /// Number of simulation ticks to run in headless mode
    #[arg(long, default_value = "3600")]
    ticks: u64,

    /// Simulation speed multiplier
    #[arg(long, default_value = "1.0")]
    speed: f32,

    /// Seed for reproducible arrivals
    #[arg(long)]
    seed: Option<u64>,

    /// Chance of an arrival per spawn attempt at 1x speed
    #[arg(long, default_value_t = simulation::SPAWN_PROBABILITY)]
    spawn_probability: f32,

    /// Ticks between spawn attempts
    #[arg(long, default_value_t = simulation::SPAWN_INTERVAL_TICKS)]
    spawn_interval: u64,

    /// Stop spawning while this many vehicles are active
    #[arg(long)]
    max_vehicles: Option<usize>,

    /// Ticks between printed reports (0 disables them)
    #[arg(long, default_value = "600")]
    report_every: u64,

    /// Milliseconds to pause after each report
    #[arg(long, default_value = "0")]
    report_delay_ms: u64,
}

impl Cli {
    fn sim_config(&self) -> SimConfig {
        SimConfig {
            spawn_interval: self.spawn_interval,
            spawn_probability: self.spawn_probability,
            max_vehicles: self.max_vehicles,
            ..SimConfig::default()
        }
    }

    fn build_world(&self) -> Result<SimWorld> {
        let config = self.sim_config();
        let mut world = match self.seed {
            Some(seed) => SimWorld::with_config_and_seed(config, seed),
            None => SimWorld::with_config(config),
        };
        world
            .set_speed_multiplier(self.speed)
            .context("Invalid --speed")?;
        Ok(world)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.ui {
        #[cfg(feature = "ui")]
        {
            run_with_ui(cli.build_world()?);
            return Ok(());
        }
        #[cfg(not(feature = "ui"))]
        {
            eprintln!("Error: UI feature is not enabled. Rebuild with --features ui");
            std::process::exit(1);
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run_headless(&cli)
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli) -> Result<()> {
    let mut world = cli.build_world()?;

    info!("Running intersection simulation in headless mode...");
    info!(
        "Ticks: {}, speed x{}, seed: {}",
        cli.ticks,
        world.speed_multiplier,
        cli.seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "random".to_string())
    );

    for tick in 1..=cli.ticks {
        world.tick();

        if cli.report_every > 0 && tick % cli.report_every == 0 {
            println!("--- After tick {} ({:.1}s simulated time) ---", tick, world.time);
            world.print_summary();
            world.draw_map();

            if cli.report_delay_ms > 0 && tick < cli.ticks {
                std::thread::sleep(std::time::Duration::from_millis(cli.report_delay_ms));
            }
        }
    }

    println!("=== Final State ===");
    world.print_summary();
    world.draw_map();

    info!("=== SIMULATION COMPLETE ===");
    info!("Simulated time: {:.2}s", world.time);
    info!("Total vehicles spawned: {}", world.spawned_vehicles);
    info!("Total vehicles completed: {}", world.completed_vehicles);
    info!("Active vehicles: {}", world.vehicles.len());
    info!("Phase switches: {}", world.phase_switches);
    info!(
        "Completion rate: {:.1}%",
        if world.spawned_vehicles > 0 {
            (world.completed_vehicles as f32 / world.spawned_vehicles as f32) * 100.0
        } else {
            0.0
        }
    );

    Ok(())
}

#[cfg(feature = "ui")]
fn run_with_ui(world: SimWorld) {
    use bevy::log::LogPlugin;
    use bevy::prelude::*;

    println!("Starting Intersection Sim UI...");
    println!();
    println!("Controls:");
    println!("  Space       - Play / pause");
    println!("  +/-         - Double / halve speed");
    println!("  R           - Reset");
    println!("  A           - Add a vehicle at a random corner");
    println!("  ESC         - Exit");
    println!();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: "warn,intersection_sim=debug".to_string(),
                    level: bevy::log::Level::DEBUG,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Intersection Sim".into(),
                        resolution: (1280, 720).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .insert_resource(intersection_sim::ui::SimWorldResource(world))
        .add_plugins(intersection_sim::ui::IntersectionSimUIPlugin)
        .run();
}

use clap::Parser;
use hexfire_core::{
    FireSimulation, FireType, GameConfig, HexCoord, HexRecord, PathSpec, SimulationMode,
    SuppressionOutcome,
};
use std::path::PathBuf;

/// Hex fire simulation demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "hexfire-demo")]
#[command(about = "Headless hex-grid fire propagation demo", long_about = None)]
struct Args {
    /// Simulation duration in seconds
    #[arg(short, long, default_value_t = 300.0)]
    duration: f32,

    /// Tick length in seconds
    #[arg(long, default_value_t = 1.0)]
    dt: f32,

    /// RNG seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Simulation mode (standard, random-tiers, burn-all)
    #[arg(short, long, default_value = "standard")]
    mode: String,

    /// JSON game config; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map radius in hexes (overrides the config)
    #[arg(long)]
    map_size: Option<u32>,

    /// Wave length in seconds
    #[arg(short, long, default_value_t = 60.0)]
    wave_length: f32,

    /// Suppression crews; each works the fire closest to town
    #[arg(long, default_value_t = 3)]
    crews: usize,

    /// Suppression per crew per second
    #[arg(long, default_value_t = 2.0)]
    crew_rate: f32,

    /// Report interval in seconds
    #[arg(short, long, default_value_t = 15.0)]
    report_interval: f32,

    /// Print final stats as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = match load_config(args.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };
    if let Some(map_size) = args.map_size {
        config.map_size = map_size;
    }

    let mode = SimulationMode::from_name(&args.mode).unwrap_or_else(|| {
        println!("Unknown mode '{}', using standard", args.mode);
        SimulationMode::Standard
    });

    let mut sim = match FireSimulation::new(config, mode, args.seed) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Invalid config: {e}");
            std::process::exit(1);
        }
    };

    println!("=== Hex Fire Simulation Demo ===\n");
    println!(
        "Map radius {} ({} hexes), mode {:?}, seed {}",
        sim.grid().map_size(),
        sim.grid().len(),
        mode,
        args.seed
    );
    println!(
        "{} crew(s) at {:.1}/s, waves every {:.0}s\n",
        args.crews, args.crew_rate, args.wave_length
    );

    let mut wave = 0;
    let mut next_wave = 0.0;
    let mut next_report = 0.0;
    let mut total_xp = 0u32;
    let mut extinguished = 0usize;
    let mut burned_out = 0usize;

    println!("Time(s) | Wave | Burning | Path | Town HP | Wave Dmg | XP");
    println!("--------|------|---------|------|---------|----------|------");

    while sim.simulation_time() < args.duration && !sim.is_town_destroyed() {
        if sim.simulation_time() >= next_wave {
            wave += 1;
            start_wave(&mut sim, wave, args.seed);
            next_wave += args.wave_length;
        }

        for (hex, amount) in crew_targets(&sim, args.crews, args.crew_rate * args.dt) {
            if let SuppressionOutcome::Extinguished { xp_reward, .. } = sim.suppress(hex, amount) {
                total_xp += xp_reward;
                extinguished += 1;
            }
        }

        let summary = sim.tick(args.dt);
        burned_out += summary.burned_out;
        sim.drain_events();

        if sim.simulation_time() >= next_report {
            println!(
                "{:7.1} | {:4} | {:7} | {:4} | {:7.1} | {:8.1} | {:5}",
                sim.simulation_time(),
                wave,
                summary.burning,
                sim.grid().get_path().len(),
                sim.town_health(),
                sim.town_damage_this_wave(),
                total_xp
            );
            next_report += args.report_interval;
        }
    }

    println!("\n=== Simulation Complete ===");
    println!("Final time: {:.1}s over {} ticks", sim.simulation_time(), sim.tick_count());
    println!("Waves started: {wave}");
    println!("Fires extinguished: {extinguished} ({total_xp} XP)");
    println!("Fires burned out: {burned_out}");
    println!(
        "Town: {:.1}/{:.1}{}",
        sim.town_health(),
        sim.town_max_health(),
        if sim.is_town_destroyed() { " (destroyed)" } else { "" }
    );

    let mut tiers = [0usize; FireType::ALL.len()];
    for record in sim.grid().burning_records() {
        if let Some(fire_type) = record.fire_type() {
            tiers[fire_type.as_u8() as usize] += 1;
        }
    }
    println!("\nStill burning by tier:");
    for fire_type in FireType::ALL {
        println!("  {:<10} {}", fire_type.name(), tiers[fire_type.as_u8() as usize]);
    }

    if args.json {
        match serde_json::to_string_pretty(&sim.get_stats()) {
            Ok(json) => println!("\n{json}"),
            Err(e) => eprintln!("Failed to serialize stats: {e}"),
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let json = std::fs::read_to_string(path)?;
    Ok(GameConfig::from_json_str(&json)?)
}

/// Reset wave damage and lay straight paths out from town toward the map edge
fn start_wave(sim: &mut FireSimulation, wave: u32, seed: u64) {
    sim.reset_town_damage_this_wave();

    let count = sim.path_count_for_wave(wave) as usize;
    let center = sim.grid().town_center();
    let map_size = sim.grid().map_size() as i32;

    let paths: Vec<PathSpec> = (0..count.min(6))
        .map(|i| {
            let direction = path_direction(seed, wave, i);
            let mut hex = center;
            let mut hexes = Vec::new();
            for _ in 0..map_size {
                hex = hex.neighbor(direction);
                hexes.push(hex);
            }
            PathSpec::new(hexes, None)
        })
        .collect();

    let laid = sim.set_path_hexes(&paths);
    println!("-- wave {wave}: {} path(s), {laid} path hexes --", paths.len());
}

/// Direction index of the `i`th path in a wave; rotates with seed and wave
fn path_direction(seed: u64, wave: u32, i: usize) -> usize {
    ((seed % 6) as usize + (wave % 6) as usize + i % 6) % 6
}

/// Burning hexes closest to town, one per crew
fn crew_targets(sim: &FireSimulation, crews: usize, amount: f32) -> Vec<(HexCoord, f32)> {
    let center = sim.grid().town_center();
    let mut burning: Vec<&HexRecord> = sim.grid().burning_records().collect();
    burning.sort_by_key(|record| (record.coord().distance(center), record.coord()));
    burning
        .into_iter()
        .take(crews)
        .map(|record| (record.coord(), amount))
        .collect()
}

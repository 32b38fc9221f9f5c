//! Microgrid simulator entry point — CLI wiring and config-driven runs.

use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use microgrid_sim::config::ScenarioConfig;
use microgrid_sim::dataset::PlantDataset;
use microgrid_sim::io::export::export_csv;
use microgrid_sim::runner::run_with_interval;
use microgrid_sim::sim::engine::Simulator;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    ticks_override: Option<usize>,
    interval_override: Option<u64>,
    hour_override: Option<f32>,
    dataset_override: Option<String>,
    json: bool,
    telemetry_out: Option<String>,
}

fn print_help() {
    eprintln!("microgrid-sim — demo telemetry generator for a simulated microgrid dashboard");
    eprintln!();
    eprintln!("Usage: microgrid-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline, overcast, low_reserve)");
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --ticks <n>              Override number of ticks to run");
    eprintln!("  --interval-ms <n>        Override pause between ticks (0 = flat out)");
    eprintln!("  --hour <0..24>           Pin the hour of day instead of the wall clock");
    eprintln!("  --dataset <path>         Load a generation-data CSV for weather/solar");
    eprintln!("  --json                   Print one JSON snapshot per line");
    eprintln!("  --telemetry-out <path>   Export run telemetry to CSV");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        ticks_override: None,
        interval_override: None,
        hour_override: None,
        dataset_override: None,
        json: false,
        telemetry_out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--ticks" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --ticks requires a count argument");
                    process::exit(1);
                }
                if let Ok(t) = args[i].parse::<usize>() {
                    cli.ticks_override = Some(t);
                } else {
                    eprintln!("error: --ticks value \"{}\" is not a valid count", args[i]);
                    process::exit(1);
                }
            }
            "--interval-ms" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --interval-ms requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(ms) = args[i].parse::<u64>() {
                    cli.interval_override = Some(ms);
                } else {
                    eprintln!(
                        "error: --interval-ms value \"{}\" is not a valid u64",
                        args[i]
                    );
                    process::exit(1);
                }
            }
            "--hour" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --hour requires an hour argument");
                    process::exit(1);
                }
                if let Ok(h) = args[i].parse::<f32>() {
                    cli.hour_override = Some(h);
                } else {
                    eprintln!("error: --hour value \"{}\" is not a valid hour", args[i]);
                    process::exit(1);
                }
            }
            "--dataset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --dataset requires a path argument");
                    process::exit(1);
                }
                cli.dataset_override = Some(args[i].clone());
            }
            "--json" => {
                cli.json = true;
            }
            "--telemetry-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --telemetry-out requires a path argument");
                    process::exit(1);
                }
                cli.telemetry_out = Some(args[i].clone());
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Loads the dataset named in the config, if any. A missing or malformed
/// file is a warning, never a failure: the simulator falls back to its
/// self-contained formulas with the same output shape.
fn load_dataset(config: &ScenarioConfig) -> Option<Arc<PlantDataset>> {
    let path = config.dataset.path.as_deref()?;
    match PlantDataset::from_csv_path(Path::new(path)) {
        Ok(dataset) => {
            eprintln!(
                "Loaded {} time-of-day slots from \"{path}\"",
                dataset.len()
            );
            Some(Arc::new(dataset))
        }
        Err(e) => {
            eprintln!("warning: {e}; falling back to synthetic weather/solar");
            None
        }
    }
}

fn main() {
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline default
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    // Apply CLI overrides
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }
    if let Some(ticks) = cli.ticks_override {
        scenario.simulation.ticks = ticks;
    }
    if let Some(ms) = cli.interval_override {
        scenario.simulation.interval_ms = ms;
    }
    if let Some(hour) = cli.hour_override {
        scenario.simulation.fixed_hour = Some(hour);
    }
    if let Some(ref path) = cli.dataset_override {
        scenario.dataset.path = Some(path.clone());
    }

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let dataset = load_dataset(&scenario);
    let mut simulator = Simulator::from_config(&scenario, dataset);

    let interval = Duration::from_millis(scenario.simulation.interval_ms);
    let json = cli.json;
    let snapshots = run_with_interval(
        &mut simulator,
        scenario.simulation.ticks,
        interval,
        |t, snapshot| {
            if json {
                match serde_json::to_string(snapshot) {
                    Ok(line) => println!("{line}"),
                    Err(e) => {
                        eprintln!("error: failed to serialize snapshot: {e}");
                        process::exit(1);
                    }
                }
            } else {
                println!("Tick {t:>4} {snapshot}");
            }
        },
    );

    // Export CSV if requested
    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&snapshots, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {path}");
    }
}

//! PV yield simulator entry point — CLI wiring and config-driven runs.

use std::path::{Path, PathBuf};
use std::process;

use pv_sim::config::ScenarioConfig;
use pv_sim::io::export::{export_daily_csv, export_hourly_csv, export_sweep_csv};
use pv_sim::io::{load_measured_daily_csv, load_weather_csv};
use pv_sim::sim::aggregate::EnergySeries;
use pv_sim::sim::pipeline::simulate;
use pv_sim::sim::report::YieldReport;
use pv_sim::sim::sweep::run_sweep;
use pv_sim::sim::validate::compare_daily;
use pv_sim::weather::{WeatherSeries, synthetic_series};

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<PathBuf>,
    preset: Option<String>,
    weather_path: Option<PathBuf>,
    measured_path: Option<PathBuf>,
    hourly_out: Option<PathBuf>,
    daily_out: Option<PathBuf>,
    sweep: bool,
    sweep_out: Option<PathBuf>,
    seed_override: Option<u64>,
}

fn print_help() {
    eprintln!("pv-sim — fixed-tilt PV energy-yield simulator");
    eprintln!();
    eprintln!("Usage: pv-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>     Load scenario from TOML config file");
    eprintln!("  --preset <name>       Use a built-in preset (baseline, rooftop_clipped,");
    eprintln!("                        desert_highref)");
    eprintln!("  --weather <path>      Load weather series from CSV instead of synthesizing");
    eprintln!("  --measured <path>     Validate against a measured daily-energy CSV");
    eprintln!("  --hourly-out <path>   Export hourly energy series to CSV");
    eprintln!("  --daily-out <path>    Export daily energy series to CSV");
    eprintln!("  --sweep               Run the orientation grid search");
    eprintln!("  --sweep-out <path>    Export sweep cells to CSV (implies --sweep)");
    eprintln!("  --seed <u64>          Override the synthetic weather seed");
    eprintln!("  --help                Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        weather_path: None,
        measured_path: None,
        hourly_out: None,
        daily_out: None,
        sweep: false,
        sweep_out: None,
        seed_override: None,
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
                cli.scenario_path = Some(path_value(&args, i, "--scenario"));
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--weather" => {
                i += 1;
                cli.weather_path = Some(path_value(&args, i, "--weather"));
            }
            "--measured" => {
                i += 1;
                cli.measured_path = Some(path_value(&args, i, "--measured"));
            }
            "--hourly-out" => {
                i += 1;
                cli.hourly_out = Some(path_value(&args, i, "--hourly-out"));
            }
            "--daily-out" => {
                i += 1;
                cli.daily_out = Some(path_value(&args, i, "--daily-out"));
            }
            "--sweep" => {
                cli.sweep = true;
            }
            "--sweep-out" => {
                i += 1;
                cli.sweep_out = Some(path_value(&args, i, "--sweep-out"));
                cli.sweep = true;
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

fn path_value(args: &[String], i: usize, flag: &str) -> PathBuf {
    let Some(value) = args.get(i) else {
        eprintln!("error: {flag} requires a path argument");
        process::exit(1);
    };
    PathBuf::from(value)
}

/// Loads the weather series from CSV when given, else synthesizes one
/// from the scenario's weather section.
fn load_weather(cli: &CliArgs, scenario: &ScenarioConfig) -> WeatherSeries {
    if let Some(ref path) = cli.weather_path {
        match load_weather_csv(path) {
            Ok(import) => {
                if import.report.is_degraded() {
                    let r = &import.report;
                    eprintln!(
                        "warning: degraded weather input — zero-filled columns: {:?}, \
                         coerced cells: {}, dropped rows: {}",
                        r.zero_filled_columns, r.coerced_cells, r.dropped_rows
                    );
                }
                import.series
            }
            Err(e) => {
                eprintln!("error: failed to load weather from {}: {e}", path.display());
                process::exit(1);
            }
        }
    } else {
        match synthetic_series(&scenario.weather, scenario.weather.seed) {
            Ok(series) => series,
            Err(e) => {
                eprintln!("error: failed to synthesize weather: {e}");
                process::exit(1);
            }
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("error: failed to load scenario: {e}");
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

    if let Some(seed) = cli.seed_override {
        scenario.weather.seed = seed;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let weather = load_weather(&cli, &scenario);

    // Single-orientation run
    let power = simulate(&weather, &scenario.array);
    let energy = EnergySeries::from_power(&power);
    let report = YieldReport::from_run(&power, &energy, &scenario.array);
    println!("{report}");

    if let Some(ref path) = cli.hourly_out {
        if let Err(e) = export_hourly_csv(&energy, path) {
            eprintln!("error: failed to write hourly CSV: {e}");
            process::exit(1);
        }
        eprintln!("Hourly energy written to {}", path.display());
    }
    if let Some(ref path) = cli.daily_out {
        if let Err(e) = export_daily_csv(&energy, path) {
            eprintln!("error: failed to write daily CSV: {e}");
            process::exit(1);
        }
        eprintln!("Daily energy written to {}", path.display());
    }

    if cli.sweep {
        let result = run_sweep(&weather, &scenario.array, &scenario.sweep);
        println!();
        println!("--- Orientation Sweep ---");
        println!(
            "Best:  tilt={:5.1}°  azimuth={:5.1}°  energy={:.2} kWh",
            result.best.tilt_deg, result.best.azimuth_deg, result.best.total_kwh
        );
        println!(
            "Worst: tilt={:5.1}°  azimuth={:5.1}°  energy={:.2} kWh",
            result.worst.tilt_deg, result.worst.azimuth_deg, result.worst.total_kwh
        );

        if let Some(ref path) = cli.sweep_out {
            if let Err(e) = export_sweep_csv(&result, path) {
                eprintln!("error: failed to write sweep CSV: {e}");
                process::exit(1);
            }
            eprintln!("Sweep cells written to {}", path.display());
        }
    }

    if let Some(ref path) = cli.measured_path {
        let measured = match load_measured_daily_csv(path) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("error: failed to load measured series: {e}");
                process::exit(1);
            }
        };
        match compare_daily(
            energy.daily(),
            &measured,
            scenario.validation.max_offset_days,
        ) {
            Ok(metrics) => {
                println!();
                println!("--- Validation ---");
                println!("MSE:  {:.4} kWh²", metrics.mse);
                println!("RMSE: {:.4} kWh", metrics.rmse);
                println!("MAE:  {:.4} kWh", metrics.mae);
                println!("R²:   {:.4}", metrics.r_squared);
            }
            Err(e) => {
                eprintln!("error: validation failed: {e}");
                process::exit(1);
            }
        }
    }
}

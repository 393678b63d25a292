//! Simulator entry point. CLI wiring and config-driven engine construction.

use std::path::Path;
use std::process;

use p2a_sim::config::ScenarioConfig;
use p2a_sim::io::export::export_csv;
use p2a_sim::profile::WindProfile;
use p2a_sim::sim::{Engine, RunOptions};

/// Base profile length when generating a synthetic wind year.
const SYNTHETIC_HOURS: usize = 8760;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    profile_path: Option<String>,
    rated_wind_mw: Option<f64>,
    years_override: Option<usize>,
    seed_override: Option<u64>,
    wind_scale_override: Option<f64>,
    trace_out: Option<String>,
    debug: bool,
}

fn print_help() {
    eprintln!("p2a-sim — wind-powered hydrogen-to-ammonia plant simulator");
    eprintln!();
    eprintln!("Usage: p2a-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>     Load scenario from TOML config file");
    eprintln!("  --preset <name>       Use a built-in preset (ael, pem)");
    eprintln!("  --profile <path>      Hourly wind profile CSV (MW, one value per row)");
    eprintln!("  --rated-wind <mw>     Park rating for the synthetic profile");
    eprintln!("  --years <n>           Override simulated profile years");
    eprintln!("  --seed <u64>          Override random seed");
    eprintln!("  --wind-scale <f64>    Override the wind scaling factor");
    eprintln!("  --trace-out <path>    Export the per-hour trace to CSV");
    eprintln!("  --debug               Print every hour while running");
    eprintln!("  --help                Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the ael preset is used.");
    eprintln!("Without --profile a synthetic seeded wind year is generated.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        profile_path: None,
        rated_wind_mw: None,
        years_override: None,
        seed_override: None,
        wind_scale_override: None,
        trace_out: None,
        debug: false,
    };

    fn take_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> &'a str {
        *i += 1;
        if *i >= args.len() {
            eprintln!("error: {flag} requires a value argument");
            process::exit(1);
        }
        &args[*i]
    }

    fn parse_value<T: std::str::FromStr>(value: &str, flag: &str, kind: &str) -> T {
        match value.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                eprintln!("error: {flag} value \"{value}\" is not a valid {kind}");
                process::exit(1);
            }
        }
    }

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                cli.scenario_path = Some(take_value(&args, &mut i, "--scenario").to_string());
            }
            "--preset" => {
                cli.preset = Some(take_value(&args, &mut i, "--preset").to_string());
            }
            "--profile" => {
                cli.profile_path = Some(take_value(&args, &mut i, "--profile").to_string());
            }
            "--rated-wind" => {
                let v = take_value(&args, &mut i, "--rated-wind");
                cli.rated_wind_mw = Some(parse_value(v, "--rated-wind", "f64"));
            }
            "--years" => {
                let v = take_value(&args, &mut i, "--years");
                cli.years_override = Some(parse_value(v, "--years", "usize"));
            }
            "--seed" => {
                let v = take_value(&args, &mut i, "--seed");
                cli.seed_override = Some(parse_value(v, "--seed", "u64"));
            }
            "--wind-scale" => {
                let v = take_value(&args, &mut i, "--wind-scale");
                cli.wind_scale_override = Some(parse_value(v, "--wind-scale", "f64"));
            }
            "--trace-out" => {
                cli.trace_out = Some(take_value(&args, &mut i, "--trace-out").to_string());
            }
            "--debug" => {
                cli.debug = true;
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

fn main() {
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then the ael default
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
        ScenarioConfig::ael()
    };

    // Apply CLI overrides
    if let Some(years) = cli.years_override {
        scenario.simulation.years = years;
    }
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }
    if let Some(scale) = cli.wind_scale_override {
        scenario.simulation.wind_scale = scale;
    }

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Build the wind profile: measured CSV year or seeded synthetic year,
    // tiled over the simulated horizon
    let base_profile = if let Some(ref path) = cli.profile_path {
        match WindProfile::from_csv_file(path) {
            Ok(p) if !p.is_empty() => p,
            Ok(_) => {
                eprintln!("error: profile \"{path}\" holds no samples");
                process::exit(1);
            }
            Err(e) => {
                eprintln!("error: failed to read profile \"{path}\": {e}");
                process::exit(1);
            }
        }
    } else {
        let rated_mw = cli
            .rated_wind_mw
            .unwrap_or(2.0 * scenario.electrolyzer.p_max_mw);
        WindProfile::synthetic(rated_mw, SYNTHETIC_HOURS, scenario.simulation.seed)
    };
    let profile = base_profile.repeat_years(scenario.simulation.years.max(1));

    // Build and run
    let mut engine = Engine::new(&scenario);
    let output = engine.run(
        &profile,
        &RunOptions {
            keep_trace: cli.trace_out.is_some() || cli.debug,
            debug: cli.debug,
        },
    );

    println!("{}", output.kpi);

    // Export CSV if requested
    if let Some(ref path) = cli.trace_out {
        let trace = output.trace.as_deref().unwrap_or(&[]);
        if let Err(e) = export_csv(trace, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Trace written to {path}");
    }
}

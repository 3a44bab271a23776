// Elevator Column Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/elevator-column-simulator
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/elevator-column-simulator --scenario scenario2 --seed 7 --events-output events.jsonl --verbose
// ```

use anyhow::{bail, Context};
use clap::Parser;
use elevator_column_simulator::events::{FanoutSink, JsonLinesSink, TracingSink};
use elevator_column_simulator::simulation::{
    builtin_scenarios, find_builtin, LoggingConfig, RunStatistics, Scenario, ScenarioOrchestrator,
};
use elevator_column_simulator::types::config::CliArgs;
use elevator_column_simulator::types::ColumnConfig;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::process;
use tracing::{error, info, warn};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        match ColumnConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    if args.list_scenarios {
        for scenario in builtin_scenarios() {
            println!("{:<12} {}", scenario.name, scenario.description);
        }
        return;
    }

    // Initialize logging based on CLI flags
    let logging_result = if args.debug {
        LoggingConfig::init_debug()
    } else if args.verbose {
        LoggingConfig::init_verbose()
    } else {
        // Default: minimal logging for normal users
        LoggingConfig::new().with_level(tracing::Level::WARN).init()
    };

    if let Err(e) = logging_result {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Starting Elevator Column Simulator");

    // Load configuration from CLI arguments and optional config file
    let config = match ColumnConfig::from_cli_args(args.clone()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        process::exit(1);
    }

    info!("Configuration loaded and validated successfully");

    let scenarios = match resolve_scenarios(&args.scenario) {
        Ok(scenarios) => scenarios,
        Err(e) => {
            error!("Failed to load scenarios: {:#}", e);
            process::exit(1);
        }
    };

    // Handle dry run mode
    if args.dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - {} scenario(s) will not be executed.", scenarios.len());
        print_configuration_summary(&config);
        return;
    }

    print_startup_banner(&config);

    match run_scenarios(config, &scenarios, args.events_output.as_deref()) {
        Ok(true) => info!("Elevator Column Simulator completed successfully"),
        Ok(false) => {
            warn!("One or more scenario steps did not meet expectations");
            process::exit(1);
        }
        Err(e) => {
            error!("Simulation failed: {:#}", e);
            process::exit(1);
        }
    }
}

/// Turn the --scenario argument into scenarios to run
fn resolve_scenarios(selector: &str) -> anyhow::Result<Vec<Scenario>> {
    if selector.eq_ignore_ascii_case("all") {
        return Ok(builtin_scenarios());
    }
    if let Some(scenario) = find_builtin(selector) {
        return Ok(vec![scenario]);
    }
    let path = Path::new(selector);
    if !path.exists() {
        bail!("'{}' is neither a built-in scenario nor a scenario file", selector);
    }
    let scenario = Scenario::from_file(path)
        .with_context(|| format!("Failed to load scenario file {}", path.display()))?;
    Ok(vec![scenario])
}

/// Run every scenario; returns whether all of them passed
fn run_scenarios(
    config: ColumnConfig,
    scenarios: &[Scenario],
    events_output: Option<&str>,
) -> anyhow::Result<bool> {
    let events_file = events_output
        .map(|path| File::create(path).with_context(|| format!("Failed to create {}", path)))
        .transpose()?;

    let orchestrator = ScenarioOrchestrator::new(config);
    let mut totals = RunStatistics::new();
    let mut all_passed = true;

    for scenario in scenarios {
        let mut sink = FanoutSink::new().with(TracingSink);
        if let Some(file) = &events_file {
            let writer = BufWriter::new(file.try_clone().context("Failed to share events file")?);
            sink = sink.with(JsonLinesSink::new(writer));
        }

        let report = orchestrator
            .run(scenario, Box::new(sink))
            .with_context(|| format!("Scenario {} failed", scenario.name))?;

        println!("{}", report);
        all_passed &= report.passed();
        totals.merge(&report.statistics);
    }

    if let Some(path) = events_output {
        info!("Status events written to: {}", path);
        eprintln!("Status events written to: {}", path);
    }

    eprintln!("{}", totals);
    Ok(all_passed)
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &ColumnConfig) {
    eprintln!("Elevator Column Simulator");
    eprintln!("=========================");
    eprintln!("Dispatch and motion simulation for a column of elevators");
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &ColumnConfig) {
    eprintln!("Configuration:");
    eprintln!("  Column: {} ({})", config.column_id, config.column_status);
    eprintln!(
        "  Floors: {} to {} ({} floors)",
        config.min_floor,
        config.max_floor,
        config.floor_count()
    );
    eprintln!("  Elevators: {} starting at floor {}", config.elevator_count, config.home_floor());
    eprintln!("  Door Dwell: {}s", config.door_dwell_seconds);
    eprintln!("  Floor Travel: {}s", config.floor_travel_seconds);
    eprintln!("  Max Weight: {} kg", config.max_weight_kg);
    eprintln!("  Obstruction Threshold: {}", config.obstruction_threshold);
    eprintln!(
        "  Sensor Retries: {} (backoff {}ms x{}, max {}ms)",
        config.sensor_max_retries,
        config.sensor_backoff_ms,
        config.sensor_backoff_multiplier,
        config.sensor_max_backoff_ms
    );
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    eprintln!();
}

//! Game balance simulator CLI.
//!
//! Run Monte Carlo simulations to analyze game balance.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                     # Default: 100 runs, 3 rebirths
//!   cargo run --bin simulate -- -n 20 -r 1       # 20 runs up to the first rebirth
//!   cargo run --bin simulate -- --seed 42        # Reproducible run

use chronicle::character::class::CharacterClass;
use chronicle::simulator::{run_simulation, SimConfig};
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let (config, show_level_curve, json) = parse_args(&args);

    let report = match run_simulation(&config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if json {
        return match report.to_json() {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              CHRONICLE BALANCE SIMULATOR                      ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Target Rebirth: {}", config.target_rebirths);
    println!("  Max Ticks:      {}", config.max_ticks_per_run);
    match config.class {
        Some(class) => println!("  Class:          {:?}", class),
        None => println!("  Class:          rotating"),
    }
    if !config.fight_bosses {
        println!("  Bosses:         skipped");
    }
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();

    println!("{}", report.to_text());

    if show_level_curve {
        println!("{}", report.level_curve_text());
    }

    ExitCode::SUCCESS
}

fn parse_class(arg: &str) -> Option<CharacterClass> {
    CharacterClass::all()
        .into_iter()
        .find(|class| format!("{:?}", class).eq_ignore_ascii_case(arg))
}

fn parse_args(args: &[String]) -> (SimConfig, bool, bool) {
    let mut config = SimConfig::default();
    let mut show_level_curve = false;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(100);
                    i += 1;
                }
            }
            "-r" | "--rebirths" => {
                if i + 1 < args.len() {
                    config.target_rebirths = args[i + 1].parse().unwrap_or(3);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-t" | "--ticks" => {
                if i + 1 < args.len() {
                    config.max_ticks_per_run = args[i + 1].parse().unwrap_or(200_000);
                    i += 1;
                }
            }
            "-c" | "--class" => {
                if i + 1 < args.len() {
                    config.class = parse_class(&args[i + 1]);
                    i += 1;
                }
            }
            "--no-bosses" => {
                config.fight_bosses = false;
            }
            "--level-curve" => {
                show_level_curve = true;
            }
            "--json" => {
                json = true;
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--quick" => {
                config = SimConfig::quick_check();
            }
            "--cycles" => {
                config = SimConfig::rebirth_cycle_test(5);
            }
            _ => {}
        }
        i += 1;
    }

    (config, show_level_curve, json)
}

fn print_help() {
    println!("Chronicle Balance Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>      Number of simulation runs (default: 100)");
    println!("    -r, --rebirths <R>  Stop a run after R rebirths (default: 3)");
    println!("    -s, --seed <S>      Random seed for reproducibility");
    println!("    -t, --ticks <T>     Max ticks per run (default: 200,000)");
    println!("    -c, --class <C>     Play only warrior, mage or rogue");
    println!("    --no-bosses         Never enter the boss arena");
    println!("    --level-curve       Show peak level distribution");
    println!("    -v, --verbose       Verbose output");
    println!("    --json              Print the report as JSON");
    println!("    --quick             Quick check (20 short runs)");
    println!("    --cycles            Long runs through 5 rebirths");
    println!("    -h, --help          Show this help");
    println!();
    println!("EXAMPLES:");
    println!("    cargo run --bin simulate                      # Default run");
    println!("    cargo run --bin simulate -- -c mage -n 50     # Mage only");
    println!("    cargo run --bin simulate -- --seed 42 --json  # Reproducible JSON");
    println!("    cargo run --bin simulate -- --quick --level-curve");
}

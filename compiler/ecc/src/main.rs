//! EC Interpreter CLI

use ecc::commands::{run_file, RunOptions};

fn main() {
    ecc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "run" => {
            let (file_path, options) = parse_run_args(&args[2..]);
            let Some(path) = file_path else {
                eprintln!("error: missing file path");
                eprintln!("Usage: ec run <file.ec> [--profile] [--shared-params] [--color=<mode>]");
                std::process::exit(1);
            };
            run_file(path, &options);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("EC Interpreter {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            // A bare script path is shorthand for `run`
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("ec"))
            {
                let (_, options) = parse_run_args(&args[2..]);
                run_file(command, &options);
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

/// Split `run` arguments into the script path and flags.
///
/// Exits with status 1 on an unknown flag.
fn parse_run_args(args: &[String]) -> (Option<&str>, RunOptions) {
    let mut options = RunOptions::default();
    let mut file_path = None;

    for arg in args {
        if arg.starts_with("--") {
            if let Err(message) = options.apply_flag(arg) {
                eprintln!("error: {message}");
                std::process::exit(1);
            }
        } else if file_path.is_none() {
            file_path = Some(arg.as_str());
        }
    }

    (file_path, options)
}

fn print_usage() {
    println!("EC Interpreter");
    println!();
    println!("Usage: ec <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.ec>        Run an EC script");
    println!("  <file.ec>            Shorthand for `run <file.ec>`");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Run options:");
    println!("  --profile            Print evaluation counters to stderr");
    println!("  --shared-params      Bind parameters as globals (no per-call scope)");
    println!("  --color=<mode>       Error colors: auto (default), always, never");
    println!();
    println!("Environment:");
    println!("  RUST_LOG             Enable interpreter tracing (e.g. RUST_LOG=ec_eval=debug)");
    println!();
    println!("Examples:");
    println!("  ec run main.ec");
    println!("  ec main.ec --profile");
    println!("  RUST_LOG=debug ec run main.ec");
}

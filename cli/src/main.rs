//! # waitcheck
//!
//! Lints testing-library test files for async utilities and queries whose
//! promises are never handled, misuse of `waitFor` callbacks and imports of
//! DOM Testing Library from framework tests.
//!
//! ## Usage
//!
//! ```bash
//! # Lint the current directory
//! waitcheck check
//!
//! # Rewrite DOM imports to the React package
//! waitcheck check src/ --framework react --fix
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use waitcheck::commands;
use waitcheck::config::ConfigOverrides;
use waitcheck::output::OutputFormat;

/// Initialize logger based on verbose flag
fn init_logger(verbose: bool) {
    let mut log_builder = env_logger::Builder::from_default_env();
    if verbose {
        log_builder.filter_level(log::LevelFilter::Debug);
    } else {
        log_builder.filter_level(log::LevelFilter::Warn);
    }
    log_builder.init();
}

/// Main CLI structure
#[derive(Parser)]
#[command(name = "waitcheck")]
#[command(about = "Lint testing-library tests for unhandled async utilities", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Lint files or directories
    Check {
        /// Files or directories to lint (defaults to the current directory)
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,
        /// Configuration file (defaults to ./waitcheck.toml when present)
        #[arg(long, short = 'c', value_name = "FILE")]
        config: Option<PathBuf>,
        /// Module treated as a re-export of Testing Library (e.g. test-utils)
        #[arg(long, value_name = "MODULE")]
        utils_module: Option<String>,
        /// Framework package suggested in place of DOM Testing Library
        #[arg(long, value_name = "FRAMEWORK")]
        framework: Option<String>,
        /// Rules to run (can be specified multiple times; default: all)
        #[arg(long = "rule", short = 'r', value_name = "RULE_ID")]
        rules: Vec<String>,
        /// Output format
        #[arg(long, value_name = "OUTPUT", default_value = "basic")]
        output: OutputFormat,
        /// Apply fixes to the files
        #[arg(long)]
        fix: bool,
        /// Enable verbose output
        #[arg(long, short = 'v')]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let exit_code = run_command(cli.command).await;
    std::process::exit(exit_code);
}

async fn run_command(command: Commands) -> i32 {
    use waitcheck::exit_codes::*;

    match command {
        Commands::Check {
            paths,
            config,
            utils_module,
            framework,
            rules,
            output,
            fix,
            verbose,
        } => {
            init_logger(verbose);
            let args = commands::check::CheckArgs {
                paths,
                config,
                overrides: ConfigOverrides {
                    utils_module,
                    framework,
                    rules,
                },
                output,
                fix,
                verbose,
            };
            match commands::check::execute(args).await {
                Ok(exit_code) => exit_code,
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    EXIT_ERROR
                }
            }
        }
    }
}

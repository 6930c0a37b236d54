// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Nowgo - cost-aware routing of AI queries to language models.
//!
//! This is the binary entry point for the Nowgo service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nowgo_config::model::NowgoConfig;

/// Nowgo - cost-aware routing of AI queries to language models.
#[derive(Parser, Debug)]
#[command(name = "nowgo", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve,
    /// Route a single query and print the decision as JSON.
    Decide {
        /// Query text.
        query: String,
        /// cost, speed, quality, or balanced.
        #[arg(long, short)]
        priority: Option<String>,
        /// Cost ceiling per 1K tokens.
        #[arg(long)]
        max_cost: Option<f64>,
    },
    /// List the model catalog.
    Models,
    /// List subscription plans.
    Plans,
    /// Validate configuration and exit.
    Check,
}

fn load_config(path: Option<&PathBuf>) -> NowgoConfig {
    let loaded = match path {
        Some(path) => nowgo_config::load_and_validate_path(path),
        None => nowgo_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            nowgo_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Decide {
            query,
            priority,
            max_cost,
        }) => match commands::decide(&config, query, priority, max_cost) {
            Ok(output) => match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(if e.is_client_error() { 2 } else { 1 });
            }
        },
        Some(Commands::Models) => print!("{}", commands::models_table(&config)),
        Some(Commands::Plans) => print!("{}", commands::plans_table(&config)),
        Some(Commands::Check) => println!("{}", commands::check_summary(&config)),
        None => {
            println!("nowgo: use --help for available commands");
        }
    }
}

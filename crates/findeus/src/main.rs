// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! FinDeus - AI query router for financial questions.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use findeus_config::FinDeusConfig;
use findeus_core::types::ProviderKind;

/// FinDeus - AI query router for financial questions.
#[derive(Parser, Debug)]
#[command(name = "findeus", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server (default).
    Serve,
    /// Validate configuration and print a summary.
    CheckConfig,
}

fn presence(key: &Option<String>) -> &'static str {
    if key.as_deref().is_some_and(|k| !k.trim().is_empty()) {
        "configured"
    } else {
        "missing"
    }
}

/// Like [`presence`], but flags a keyed provider missing from `router.order`.
fn provider_presence(config: &FinDeusConfig, key: &Option<String>, kind: ProviderKind) -> String {
    match presence(key) {
        "configured" if !config.router.order.contains(&kind) => {
            "configured, not in router.order".to_string()
        }
        label => label.to_string(),
    }
}

fn print_summary(config: &FinDeusConfig) {
    println!("findeus: configuration OK");
    println!("  listen:    {}:{}", config.server.host, config.server.port);
    println!(
        "  openai:    {} ({})",
        provider_presence(config, &config.openai.api_key, ProviderKind::OpenAi),
        config.openai.model
    );
    println!(
        "  anthropic: {} ({})",
        provider_presence(config, &config.anthropic.api_key, ProviderKind::Anthropic),
        config.anthropic.model
    );
    println!("  pinecone:  {}", presence(&config.pinecone.api_key));
    let order: Vec<String> = config.router.order.iter().map(|k| k.to_string()).collect();
    println!("  order:     {}", order.join(" -> "));
    println!("  timeout:   {}s", config.router.timeout_secs);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => findeus_config::load_and_validate_path(path),
        None => findeus_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            findeus_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if let Err(e) = findeus::serve::run_serve(config).await {
                eprintln!("findeus: {e}");
                std::process::exit(1);
            }
        }
        Commands::CheckConfig => print_summary(&config),
    }
}

// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attache - a chat-attachment archiving bot.
//!
//! This is the binary entry point for the Attache server.

use clap::{Parser, Subcommand};

mod serve;

/// Attache - archives chat attachments to local and cloud storage.
#[derive(Parser, Debug)]
#[command(name = "attache", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server.
    Serve,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match attache_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            attache_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("attache serve: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("attache config: failed to render configuration: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("attache: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Default config (no file, no env) must be valid.
        let config = attache_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "attache");
        assert_eq!(config.server.port, 5000);
    }
}

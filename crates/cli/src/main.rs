//! supportbot CLI: the main entry point.
//!
//! Commands:
//! - `init`   : Write a default config file
//! - `serve`  : Start the HTTP gateway
//! - `ask`    : Route a single message and print the reply
//! - `faqs`   : List the loaded FAQ corpus
//! - `status` : Show the effective configuration
//! - `doctor` : Diagnose config, corpus, storage, and AI availability

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "supportbot",
    about = "supportbot: FAQ-first customer support with an AI fallback",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file to ~/.supportbot/config.toml
    Init,

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Send one message through the FAQ matcher and AI fallback
    Ask {
        /// The message to route
        message: String,

        /// Session to append the turn to (a fresh one if omitted)
        #[arg(short, long)]
        session: Option<String>,
    },

    /// List the loaded FAQ questions
    Faqs,

    /// Show the effective configuration
    Status,

    /// Diagnose system health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Ask { message, session } => commands::ask::run(message, session).await?,
        Commands::Faqs => commands::faqs::run().await?,
        Commands::Status => commands::status::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use huddle_cli::app;
use huddle_core::Settings;

#[derive(Parser)]
#[command(name = "huddle")]
#[command(about = "Huddle - a team of role-specialized model calls, streamed")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Model to use for every role
    #[arg(short, long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the streaming collaboration endpoint
    Serve {
        /// Address to bind, e.g. 127.0.0.1:3000
        #[arg(long)]
        bind: Option<String>,
    },
    /// Send a request to a running server and print the discussion
    Ask {
        /// The request for the team
        request: String,

        #[arg(long, default_value = "http://127.0.0.1:3000")]
        server: String,
    },
    /// Run one session in-process and write raw frames to stdout
    Run {
        /// The request for the team
        request: String,
    },
    /// List the team roster
    Roster,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.command {
        Command::Serve { .. } => "info",
        _ => "warn",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut settings = match cli.config {
        Some(ref path) => Settings::load_from(path)?,
        None => Settings::load(),
    };
    if let Some(ref model) = cli.model {
        settings.llm.model = model.clone();
    }

    match cli.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                settings.server.bind = bind;
            }
            app::run_server(&settings).await?;
        }
        Command::Ask { request, server } => app::run_ask(&server, &request).await?,
        Command::Run { request } => app::run_single_request(&settings, &request).await?,
        Command::Roster => app::print_roster(),
    }

    Ok(())
}

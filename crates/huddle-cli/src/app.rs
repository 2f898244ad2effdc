use anyhow::{Context, Result};
use huddle_core::{RoleRegistry, SessionOrchestrator, Settings, WriterSink};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::client;
use crate::server;

/// Orchestrator over the standard team and the configured Claude client.
pub fn build_orchestrator(settings: &Settings) -> SessionOrchestrator {
    let llm = settings.build_llm_client();
    SessionOrchestrator::new(Arc::new(RoleRegistry::standard()), Arc::new(llm))
}

// ── Server mode ─────────────────────────────────────────────────────────

pub async fn run_server(settings: &Settings) -> Result<()> {
    let listener = TcpListener::bind(&settings.server.bind)
        .await
        .with_context(|| format!("could not bind {}", settings.server.bind))?;
    server::serve(listener, build_orchestrator(settings)).await
}

// ── Single-request mode ─────────────────────────────────────────────────

/// Run one session in-process, writing raw frames to stdout.
pub async fn run_single_request(settings: &Settings, request: &str) -> Result<()> {
    let orchestrator = build_orchestrator(settings);
    let report = orchestrator
        .run(request, WriterSink::new(std::io::stdout()))
        .await;

    if report.fallbacks > 0 {
        eprintln!(
            "[{} of {} invocations used the fallback message]",
            report.fallbacks, report.invocations
        );
    }
    Ok(())
}

// ── Client mode ─────────────────────────────────────────────────────────

pub async fn run_ask(server: &str, request: &str) -> Result<()> {
    let count = client::ask(server, request, |frame| {
        println!("{}", client::render_frame(frame));
    })
    .await?;
    eprintln!("[{count} messages]");
    Ok(())
}

pub fn print_roster() {
    for entry in RoleRegistry::standard().roster() {
        println!("{}. {} - {}", entry.priority, entry.name, entry.title);
        for capability in &entry.capabilities {
            println!("     • {capability}");
        }
    }
}

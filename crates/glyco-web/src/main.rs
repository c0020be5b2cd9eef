//! Glyco Web Dashboard - Diabetes status prediction in the browser.

use anyhow::{Context, Result};
use clap::Parser;
use glyco_core::explain::AttributionLayout;
use glyco_web::{routes, AppState};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "glyco-web")]
#[command(about = "Glyco Web Dashboard - Diabetes status prediction with explanations")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Model artifact to serve
    #[arg(short, long, default_value = "random_forest_model.json")]
    model: PathBuf,

    /// Attribution layout the explainer emits (per-class or stacked)
    #[arg(long, default_value = "per_class")]
    layout: AttributionLayout,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "glyco_web=info,glyco_core=info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let addr = format!("{}:{}", cli.host, cli.port);

    // A missing or incompatible model is fatal.
    let state = AppState::load(&cli.model, cli.layout)
        .with_context(|| format!("Failed to load model: {}", cli.model.display()))?;

    println!("Starting Glyco Web Dashboard...");
    println!("Open http://{} in your browser", addr);

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! Browser UI server - JSON and SSE interface over one browsing session.

mod fetch;
mod routes;
mod sse;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use browser::io::config::{DEFAULT_CONFIG_PATH, load_config};
use browser::session::BrowseSession;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use crate::fetch::{PageFetcher, spawn_fetch};
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "browser-ui")]
#[command(about = "Web API for browsing the artwork catalog with persistent selection")]
struct Args {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, default_value = "3001")]
    port: u16,

    /// Path to the TOML config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory containing UI static files
    #[arg(long)]
    ui_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("browser_ui=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let cfg = load_config(&args.config)?;
    info!(api_base = %cfg.api_base, rows_per_page = cfg.rows_per_page, "starting browser-ui");

    let fetcher = PageFetcher::new(&cfg).context("build catalog client")?;
    let session = BrowseSession::from_config(&cfg)?;
    let state = AppState::new(session, fetcher, cfg.rows_per_page_options.clone());

    // Load the first page
    {
        let mut shared = state.shared.lock().await;
        let ticket = shared.session.refresh();
        spawn_fetch(&state, &mut shared, ticket);
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .nest("/api", routes::api_router())
        .route("/events", get(sse::events_handler))
        .layer(cors)
        .with_state(state);

    if let Some(ui_dir) = args.ui_dir {
        if ui_dir.exists() {
            info!(ui_dir = %ui_dir.display(), "serving static UI files");
            app = app.fallback_service(
                ServeDir::new(ui_dir).append_index_html_on_directories(true),
            );
        } else {
            info!(ui_dir = %ui_dir.display(), "UI directory not found, API-only mode");
        }
    }

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

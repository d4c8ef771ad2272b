//! Terminal browser for the artwork catalog.
//!
//! Pages through the catalog API one server page at a time while keeping row
//! selection across pages.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use browser::browse::{Browser, render_page};
use browser::core::pagination::{PageWindow, is_offered_page_size};
use browser::exit_codes;
use browser::io::api::ArticClient;
use browser::io::config::{BrowserConfig, DEFAULT_CONFIG_PATH, load_config, write_config};
use browser::io::source::DataSource;
use browser::logging;
use browser::session::{BrowseSession, FetchOutcome};
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "browser",
    version,
    about = "Browse the artwork catalog with selection kept across pages"
)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the default config file if missing.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Interactive browser reading commands from stdin.
    Browse {
        /// Page to open first.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Fetch one page and print it.
    Page {
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Rows per page (defaults to the configured size).
        #[arg(long)]
        rows: Option<u32>,
        /// Print the page view as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(&cli.config, force),
        Command::Browse { page } => cmd_browse(&cli.config, page),
        Command::Page { page, rows, json } => cmd_page(&cli.config, page, rows, json),
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<i32> {
    if !force && path.exists() {
        info!(path = %path.display(), "config already exists");
        return Ok(exit_codes::OK);
    }
    write_config(path, &BrowserConfig::default())
        .with_context(|| format!("write {}", path.display()))?;
    Ok(exit_codes::OK)
}

fn cmd_browse(path: &Path, page: u32) -> Result<i32> {
    let cfg = load_config(path)?;
    let client = ArticClient::new(&cfg).context("build catalog client")?;
    let mut session = BrowseSession::from_config(&cfg)?;
    session.navigate(PageWindow::new(page, cfg.rows_per_page));

    let mut browser = Browser::new(session, &client, cfg.rows_per_page_options.clone());
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    browser.run(stdin.lock(), &mut stdout)?;
    stdout.flush().context("flush stdout")?;
    Ok(exit_codes::OK)
}

fn cmd_page(path: &Path, page: u32, rows: Option<u32>, json: bool) -> Result<i32> {
    let cfg = load_config(path)?;
    let rows = rows.unwrap_or(cfg.rows_per_page);
    if !is_offered_page_size(rows, &cfg.rows_per_page_options) {
        bail!(
            "rows per page must be one of {:?}",
            cfg.rows_per_page_options
        );
    }

    let client = ArticClient::new(&cfg).context("build catalog client")?;
    let session = fetch_single_page(&cfg, &client, PageWindow::new(page, rows))?;
    if let Some(message) = session.error() {
        eprintln!("error: {message}");
        return Ok(exit_codes::FETCH_FAILED);
    }

    let mut stdout = io::stdout();
    if json {
        let mut payload =
            serde_json::to_string_pretty(&session.view()).context("serialize page view")?;
        payload.push('\n');
        stdout.write_all(payload.as_bytes()).context("write stdout")?;
    } else {
        render_page(&session, &mut stdout)?;
    }
    Ok(exit_codes::OK)
}

fn fetch_single_page<S: DataSource>(
    cfg: &BrowserConfig,
    source: &S,
    window: PageWindow,
) -> Result<BrowseSession> {
    let mut session = BrowseSession::from_config(cfg)?;
    let ticket = session.navigate(window);
    let outcome = session.complete_fetch(ticket, source.fetch_page(&window));
    info!(?outcome, "page fetched");
    if outcome == FetchOutcome::Superseded {
        bail!("page request was cancelled");
    }
    Ok(session)
}

//! # Memory Sidebar CLI (`msb`)
//!
//! Renders narrative-analysis annotations the way the editor's memory
//! sidebar does, and replays sidebar interactions for inspection.
//!
//! ## Usage
//!
//! ```bash
//! msb --config ./config/msb.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `msb show <file>` | Render the overview and annotation groups |
//! | `msb stats <file>` | Print per-type counts |
//! | `msb navigate <file>` | Replay scroll/click/toggle events and report effects |
//! | `msb auth check` | Verify the session against the identity endpoint |
//!
//! ## Examples
//!
//! ```bash
//! # Show a chapter with one annotation highlighted
//! msb show chapter.json --active a12
//!
//! # Show only the rows around a card, as the editor scrolls to it
//! msb show chapter.json --scroll-to a40 --expand character_event
//!
//! # Stats as JSON
//! msb stats chapter.json --json
//!
//! # Replay a scripted session from stdin
//! printf 'scroll a40\nclick a40\n' | msb navigate chapter.json --progress json
//! ```
//!
//! Logs go to stderr and are filtered with `RUST_LOG`.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memory_sidebar::auth::{AuthGate, GateDecision};
use memory_sidebar::config::{self, Config};
use memory_sidebar::loader::load_annotations;
use memory_sidebar::navigate::{parse_events, run_navigate};
use memory_sidebar::report::ReportMode;
use memory_sidebar::show::{run_show, ShowOptions};
use memory_sidebar::stats::run_stats;

/// Route the sidebar lives under in the editor; used for login redirects.
const EDITOR_PATH: &str = "/editor";

/// Memory Sidebar CLI: inspect narrative-analysis annotations from the
/// terminal.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the file does not exist, built-in defaults are used.
#[derive(Parser)]
#[command(
    name = "msb",
    about = "Memory Sidebar: grouped, ranked narrative annotations in the terminal",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/msb.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the sidebar for an annotations file.
    ///
    /// The file is either a JSON array of annotations or an analysis
    /// response object with an `annotations` field.
    Show {
        /// Annotations JSON file.
        file: PathBuf,

        /// Highlight the annotation with this id.
        #[arg(long)]
        active: Option<String>,

        /// Scroll this card into view and print only the visible rows.
        #[arg(long)]
        scroll_to: Option<String>,

        /// Expand a group (repeatable): hook, foreshadow, plot_point, character_event.
        #[arg(long)]
        expand: Vec<String>,

        /// Collapse a group (repeatable).
        #[arg(long)]
        collapse: Vec<String>,

        /// Print the view model as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print annotation counts per type.
    Stats {
        /// Annotations JSON file.
        file: PathBuf,

        /// Print the stats record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Replay navigation events through the sidebar.
    ///
    /// One event per line: `scroll ID`, `active ID`, `clear-active`,
    /// `click ID`, `toggle TYPE`, `render`. Lines starting with `#` are
    /// comments.
    Navigate {
        /// Annotations JSON file.
        file: PathBuf,

        /// Event script; read from stdin when omitted.
        #[arg(long)]
        events: Option<PathBuf>,

        /// Effect report: human, json, or off. Defaults to human on a TTY
        /// and json otherwise.
        #[arg(long)]
        progress: Option<String>,
    },

    /// Session commands.
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Check the session and print `authenticated` or the login redirect.
    Check {
        /// Path the user was trying to reach.
        #[arg(long, default_value = EDITOR_PATH)]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("msb=info".parse()?)
                .add_directive("memory_sidebar=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = config::load_or_minimal(&cli.config)?;

    if let Commands::Auth {
        action: AuthAction::Check { path },
    } = &cli.command
    {
        return auth_check(&cfg, path).await;
    }

    if !pass_gate(&cfg).await? {
        return Ok(());
    }

    match cli.command {
        Commands::Show {
            file,
            active,
            scroll_to,
            expand,
            collapse,
            json,
        } => {
            let annotations = load_annotations(&file)?;
            let opts = ShowOptions {
                active,
                scroll_to,
                expand,
                collapse,
                json,
            };
            run_show(annotations, &cfg, &opts)?;
        }
        Commands::Stats { file, json } => {
            let annotations = load_annotations(&file)?;
            run_stats(&annotations, json)?;
        }
        Commands::Navigate {
            file,
            events,
            progress,
        } => {
            let annotations = load_annotations(&file)?;
            let script = read_events(events.as_deref())?;
            let events = parse_events(&script)?;
            let mode = match progress {
                Some(p) => ReportMode::parse(&p)?,
                None => ReportMode::default_for_tty(),
            };
            let reporter = mode.reporter();
            run_navigate(annotations, &cfg, &events, &*reporter)?;
        }
        Commands::Auth { .. } => {
            // Handled above (before the gate)
        }
    }

    Ok(())
}

/// Run the auth gate when `[auth]` is configured. Returns false after
/// printing the login redirect.
async fn pass_gate(cfg: &Config) -> Result<bool> {
    let Some(auth) = &cfg.auth else {
        return Ok(true);
    };

    let gate = AuthGate::from_config(auth)?;
    gate.check().await;
    match gate.decision(EDITOR_PATH)? {
        GateDecision::Allow => Ok(true),
        GateDecision::Redirect(url) => {
            println!("Not signed in. Continue at {}", url);
            Ok(false)
        }
        GateDecision::Pending => Ok(false),
    }
}

async fn auth_check(cfg: &Config, path: &str) -> Result<()> {
    let Some(auth) = &cfg.auth else {
        println!("authenticated (no [auth] configured)");
        return Ok(());
    };

    let gate = AuthGate::from_config(auth)?;
    gate.check().await;
    match gate.decision(path)? {
        GateDecision::Allow => println!("authenticated"),
        GateDecision::Redirect(url) => println!("{}", url),
        GateDecision::Pending => println!("pending"),
    }
    gate.keepalive().stop();
    Ok(())
}

fn read_events(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read events file: {}", p.display())),
        None => {
            let mut script = String::new();
            std::io::stdin()
                .read_to_string(&mut script)
                .context("Failed to read events from stdin")?;
            Ok(script)
        }
    }
}

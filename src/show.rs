//! `msb show`: render a snapshot to the terminal.
//!
//! Without `--scroll-to` the whole layout is printed. With it, the sidebar
//! is rendered into a viewport of `sidebar.viewport_height` rows, the card is
//! scrolled into view exactly as the editor would do it, and only the rows
//! inside the viewport are printed.

use anyhow::{Context, Result};
use memory_sidebar_core::{Annotation, AnnotationType, ScrollOutcome, Sidebar};
use tracing::warn;

use crate::config::Config;
use crate::terminal::TerminalSidebar;

/// Options collected from the command line.
#[derive(Debug, Default, Clone)]
pub struct ShowOptions {
    pub active: Option<String>,
    pub scroll_to: Option<String>,
    /// Groups to expand in addition to the configured ones, by wire name.
    pub expand: Vec<String>,
    pub collapse: Vec<String>,
    /// Print the view model as JSON instead of text.
    pub json: bool,
}

pub fn run_show(annotations: Vec<Annotation>, config: &Config, opts: &ShowOptions) -> Result<()> {
    let term = prepare(annotations, config, opts)?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&term.sidebar().view())?);
        return Ok(());
    }

    let lines = match &opts.scroll_to {
        Some(_) => term.window(),
        None => term.layout().lines(),
    };
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

/// Build, render, and scroll the terminal sidebar for `opts`.
pub fn prepare(
    annotations: Vec<Annotation>,
    config: &Config,
    opts: &ShowOptions,
) -> Result<TerminalSidebar> {
    let mut expansion = config.sidebar.expansion();
    for name in &opts.expand {
        expansion.set(parse_type(name)?, true);
    }
    for name in &opts.collapse {
        expansion.set(parse_type(name)?, false);
    }

    let mut sidebar = Sidebar::new(annotations)
        .with_options(config.sidebar.view_options())
        .with_expansion(expansion);
    sidebar.set_active(opts.active.as_deref());

    let mut term = TerminalSidebar::new(sidebar, config.sidebar.viewport_height);
    term.render();

    if let Some(id) = &opts.scroll_to {
        if term.sidebar_mut().set_scroll_to(Some(id.as_str())) != Some(ScrollOutcome::Scrolled) {
            warn!(id = %id, "card is not rendered; showing the top of the sidebar");
        }
    }
    Ok(term)
}

fn parse_type(name: &str) -> Result<AnnotationType> {
    name.parse::<AnnotationType>()
        .with_context(|| format!("Invalid group '{}'", name))
}

//! Replaying navigation events through a terminal sidebar.
//!
//! An event script has one event per line:
//!
//! | Line | Effect |
//! |------|--------|
//! | `scroll <id>` | scroll request for the card |
//! | `active <id>` | set the active annotation |
//! | `clear-active` | clear the active annotation |
//! | `click <id>` | click a card; the host makes it active |
//! | `toggle <type>` | collapse or expand a group |
//! | `render` | re-render and report the layout size |
//!
//! Blank lines and lines starting with `#` are ignored. After every event
//! that changes what is on screen the sidebar is re-rendered, so the card
//! registrations always match the current layout.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use memory_sidebar_core::{Annotation, AnnotationType, ScrollOutcome, Sidebar};

use crate::config::Config;
use crate::report::{NavEffect, NavReporter};
use crate::terminal::TerminalSidebar;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    Scroll(String),
    Active(String),
    ClearActive,
    Click(String),
    Toggle(AnnotationType),
    Render,
}

impl std::str::FromStr for NavEvent {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or_default();
        let arg = parts.next();
        if parts.next().is_some() {
            bail!("too many arguments in '{}'", line);
        }

        let require = |arg: Option<&str>| -> Result<String> {
            arg.map(str::to_string)
                .with_context(|| format!("'{}' needs an argument", verb))
        };

        Ok(match verb {
            "scroll" => NavEvent::Scroll(require(arg)?),
            "active" => NavEvent::Active(require(arg)?),
            "clear-active" => NavEvent::ClearActive,
            "click" => NavEvent::Click(require(arg)?),
            "toggle" => NavEvent::Toggle(require(arg)?.parse()?),
            "render" => NavEvent::Render,
            other => bail!(
                "Unknown event '{}'. Use scroll, active, clear-active, click, toggle, or render.",
                other
            ),
        })
    }
}

/// Parse an event script, reporting the offending line number on error.
pub fn parse_events(script: &str) -> Result<Vec<NavEvent>> {
    script
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| {
            line.parse::<NavEvent>()
                .with_context(|| format!("Invalid event on line {}", n))
        })
        .collect()
}

/// A terminal sidebar whose clicks are captured for reporting.
pub struct Navigator {
    term: TerminalSidebar,
    clicks: Rc<RefCell<Vec<(String, String)>>>,
}

impl Navigator {
    pub fn new(annotations: Vec<Annotation>, config: &Config) -> Self {
        let clicks = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&clicks);
        let sidebar = Sidebar::new(annotations)
            .with_options(config.sidebar.view_options())
            .with_expansion(config.sidebar.expansion())
            .with_selection_handler(move |a: &Annotation| {
                sink.borrow_mut().push((a.id.clone(), a.title.clone()));
            });

        let mut term = TerminalSidebar::new(sidebar, config.sidebar.viewport_height);
        term.render();
        Self { term, clicks }
    }

    pub fn terminal(&self) -> &TerminalSidebar {
        &self.term
    }

    /// Apply one event and return its effects.
    pub fn apply(&mut self, event: &NavEvent) -> Vec<NavEffect> {
        match event {
            NavEvent::Scroll(id) => vec![self.scroll(id)],
            NavEvent::Active(id) => {
                self.term.sidebar_mut().set_active(Some(id));
                self.term.render();
                vec![NavEffect::ActiveChanged {
                    id: Some(id.clone()),
                }]
            }
            NavEvent::ClearActive => {
                self.term.sidebar_mut().set_active(None);
                self.term.render();
                vec![NavEffect::ActiveChanged { id: None }]
            }
            NavEvent::Click(id) => self.click(id),
            NavEvent::Toggle(kind) => {
                let expanded = self.term.sidebar_mut().toggle_group(*kind);
                self.term.render();
                vec![NavEffect::GroupToggled {
                    kind: *kind,
                    expanded,
                }]
            }
            NavEvent::Render => {
                let lines = self.term.render().lines().len();
                let visible_cards = self.term.sidebar().view().visible_cards().count();
                vec![NavEffect::Rendered {
                    lines,
                    visible_cards,
                }]
            }
        }
    }

    fn scroll(&mut self, id: &str) -> NavEffect {
        match self.term.request_scroll_to(id) {
            ScrollOutcome::Scrolled => {
                let viewport = self.term.viewport();
                NavEffect::Scrolled {
                    id: id.to_string(),
                    line: viewport.last_scroll().map(|s| s.line).unwrap_or_default(),
                    top: viewport.top(),
                }
            }
            ScrollOutcome::NotRendered | ScrollOutcome::Ignored => NavEffect::ScrollSkipped {
                id: id.to_string(),
            },
        }
    }

    fn click(&mut self, id: &str) -> Vec<NavEffect> {
        if !self.term.sidebar_mut().click(id) {
            return vec![NavEffect::ClickMissed { id: id.to_string() }];
        }

        let selected: Vec<(String, String)> = self.clicks.borrow_mut().drain(..).collect();
        let mut effects: Vec<NavEffect> = selected
            .into_iter()
            .map(|(id, title)| NavEffect::Selected { id, title })
            .collect();

        // The host treats a selection as activation.
        self.term.sidebar_mut().set_active(Some(id));
        self.term.render();
        effects.push(NavEffect::ActiveChanged {
            id: Some(id.to_string()),
        });
        effects
    }
}

/// Replay `events` and report every effect.
pub fn run_navigate(
    annotations: Vec<Annotation>,
    config: &Config,
    events: &[NavEvent],
    reporter: &dyn NavReporter,
) -> Result<()> {
    let mut nav = Navigator::new(annotations, config);
    for event in events {
        for effect in nav.apply(event) {
            reporter.report(&effect);
        }
    }
    Ok(())
}

//! Navigation effect reporting.
//!
//! `msb navigate` replays events through a sidebar session and reports what
//! each one did: which card scrolled into view, which request found nothing
//! rendered, which annotation a click selected. Reports go to **stdout**,
//! either as human-readable lines or one JSON object per line; logs stay on
//! stderr.

use std::io::Write;

use memory_sidebar_core::AnnotationType;

/// One observable effect of a navigation event.
#[derive(Clone, Debug, PartialEq)]
pub enum NavEffect {
    /// The card's handle scrolled; `top` is the new first visible line.
    Scrolled { id: String, line: usize, top: usize },
    /// No card is mounted for the id.
    ScrollSkipped { id: String },
    /// A click was relayed to the selection handler.
    Selected { id: String, title: String },
    /// A click hit no card.
    ClickMissed { id: String },
    ActiveChanged { id: Option<String> },
    GroupToggled { kind: AnnotationType, expanded: bool },
    Rendered { lines: usize, visible_cards: usize },
}

/// Receives navigation effects.
pub trait NavReporter {
    fn report(&self, effect: &NavEffect);
}

/// `scroll  p10  line 33, top 28`
pub struct HumanReport;

impl NavReporter for HumanReport {
    fn report(&self, effect: &NavEffect) {
        let line = match effect {
            NavEffect::Scrolled { id, line, top } => {
                format!("scroll    {}  line {}, top {}", id, line, top)
            }
            NavEffect::ScrollSkipped { id } => format!("scroll    {}  not rendered", id),
            NavEffect::Selected { id, title } => format!("select    {}  {}", id, title),
            NavEffect::ClickMissed { id } => format!("click     {}  no card", id),
            NavEffect::ActiveChanged { id } => {
                format!("active    {}", id.as_deref().unwrap_or("(none)"))
            }
            NavEffect::GroupToggled { kind, expanded } => format!(
                "toggle    {}  {}",
                kind,
                if *expanded { "expanded" } else { "collapsed" }
            ),
            NavEffect::Rendered {
                lines,
                visible_cards,
            } => format!("render    {} lines, {} cards", lines, visible_cards),
        };
        let _ = writeln!(std::io::stdout().lock(), "{}", line);
    }
}

/// Machine-readable effects: one JSON object per line.
pub struct JsonReport;

impl NavReporter for JsonReport {
    fn report(&self, effect: &NavEffect) {
        let obj = effect_json(effect);
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stdout().lock(), "{}", line);
            let _ = std::io::stdout().lock().flush();
        }
    }
}

fn effect_json(effect: &NavEffect) -> serde_json::Value {
    match effect {
        NavEffect::Scrolled { id, line, top } => serde_json::json!({
            "event": "scroll",
            "id": id,
            "outcome": "scrolled",
            "line": line,
            "top": top
        }),
        NavEffect::ScrollSkipped { id } => serde_json::json!({
            "event": "scroll",
            "id": id,
            "outcome": "not_rendered"
        }),
        NavEffect::Selected { id, title } => serde_json::json!({
            "event": "select",
            "id": id,
            "title": title
        }),
        NavEffect::ClickMissed { id } => serde_json::json!({
            "event": "click",
            "id": id,
            "outcome": "missed"
        }),
        NavEffect::ActiveChanged { id } => serde_json::json!({
            "event": "active",
            "id": id
        }),
        NavEffect::GroupToggled { kind, expanded } => serde_json::json!({
            "event": "toggle",
            "group": kind,
            "expanded": expanded
        }),
        NavEffect::Rendered {
            lines,
            visible_cards,
        } => serde_json::json!({
            "event": "render",
            "lines": lines,
            "visible_cards": visible_cards
        }),
    }
}

/// Discards everything.
pub struct NoReport;

impl NavReporter for NoReport {
    fn report(&self, _effect: &NavEffect) {}
}

/// Report mode for the CLI: off, human, or JSON.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReportMode {
    Off,
    Human,
    Json,
}

impl ReportMode {
    /// Default: human lines on a TTY, JSON when piped.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stdout) {
            ReportMode::Human
        } else {
            ReportMode::Json
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "off" => Ok(ReportMode::Off),
            "human" => Ok(ReportMode::Human),
            "json" => Ok(ReportMode::Json),
            other => anyhow::bail!("Unknown report mode: '{}'. Use off, human, or json.", other),
        }
    }

    pub fn reporter(&self) -> Box<dyn NavReporter> {
        match self {
            ReportMode::Off => Box::new(NoReport),
            ReportMode::Human => Box::new(HumanReport),
            ReportMode::Json => Box::new(JsonReport),
        }
    }
}

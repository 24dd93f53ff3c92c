//! Terminal front end for the sidebar.
//!
//! Renders a [`SidebarView`] as plain text lines and plays the part of the
//! element tree: every visible card gets a [`LineAnchor`] pointing at its
//! header line, and scrolling an anchor moves a shared [`Viewport`] so that
//! line lands where the scroll options ask.
//!
//! ```text
//! Analysis overview
//!   Hook               2    Foreshadow         1
//!   Plot point         0    Character event    1
//!
//! [-] Hook (2)
//!   * [9.0] The stranger's letter        <- active card
//!         Someone slid an envelope under the door...
//!         #mystery #letter
//!         strength 8/10
//! [+] Character event (1)
//! ```

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Range;
use std::rc::Rc;

use memory_sidebar_core::{
    AnnotationType, CardView, ScrollBlock, ScrollHandle, ScrollOptions, ScrollOutcome, Sidebar,
    SidebarView,
};

/// The visible window over the rendered lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    top: usize,
    height: usize,
    total: usize,
    last_scroll: Option<ScrollRecord>,
}

/// The most recent scroll applied to a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRecord {
    pub line: usize,
    pub options: ScrollOptions,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self {
            top: 0,
            height: height.max(1),
            total: 0,
            last_scroll: None,
        }
    }

    pub fn top(&self) -> usize {
        self.top
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn last_scroll(&self) -> Option<ScrollRecord> {
        self.last_scroll
    }

    /// Update the document length after a render.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.clamp();
    }

    /// Move so that `line` sits where `options.block` asks.
    pub fn scroll_to_line(&mut self, line: usize, options: ScrollOptions) {
        self.top = match options.block {
            ScrollBlock::Start => line,
            ScrollBlock::Center => line.saturating_sub(self.height / 2),
            ScrollBlock::End => (line + 1).saturating_sub(self.height),
            ScrollBlock::Nearest => {
                if line < self.top {
                    line
                } else if line >= self.top + self.height {
                    (line + 1).saturating_sub(self.height)
                } else {
                    self.top
                }
            }
        };
        self.clamp();
        self.last_scroll = Some(ScrollRecord { line, options });
    }

    /// Line indices currently on screen.
    pub fn range(&self) -> Range<usize> {
        self.top..(self.top + self.height).min(self.total)
    }

    fn clamp(&mut self) {
        let max_top = self.total.saturating_sub(self.height);
        self.top = self.top.min(max_top);
    }
}

/// Handle for one mounted card: its header line in the shared viewport.
#[derive(Debug, Clone)]
pub struct LineAnchor {
    line: usize,
    viewport: Rc<RefCell<Viewport>>,
}

impl LineAnchor {
    pub fn line(&self) -> usize {
        self.line
    }
}

impl ScrollHandle for LineAnchor {
    fn scroll_into_view(&mut self, options: ScrollOptions) {
        self.viewport.borrow_mut().scroll_to_line(self.line, options);
    }
}

/// Rendered text plus the header line of every visible card.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    lines: Vec<String>,
    anchors: HashMap<String, usize>,
}

impl Layout {
    pub fn of(view: &SidebarView) -> Self {
        let mut layout = Layout::default();

        let (stats, groups) = match view {
            SidebarView::Empty { message } => {
                layout.lines.push((*message).to_string());
                return layout;
            }
            SidebarView::Populated { stats, groups } => (stats, groups),
        };

        layout.lines.push("Analysis overview".to_string());
        for pair in AnnotationType::ALL.chunks(2) {
            let cells: Vec<String> = pair
                .iter()
                .map(|kind| format!("{:<18} {:>2}", kind.info().label, stats.count(*kind)))
                .collect();
            layout.lines.push(format!("  {}", cells.join("    ")));
        }
        layout.lines.push(String::new());

        for group in groups {
            let marker = if group.expanded { "[-]" } else { "[+]" };
            layout
                .lines
                .push(format!("{} {} ({})", marker, group.label, group.count));
            for card in group.visible_cards() {
                layout.push_card(card);
            }
        }

        layout
    }

    fn push_card(&mut self, card: &CardView) {
        self.anchors.insert(card.id.clone(), self.lines.len());

        let marker = if card.active { '*' } else { '-' };
        self.lines.push(format!(
            "  {} [{}] {}",
            marker,
            card.importance_badge,
            single_line(&card.title)
        ));
        if !card.excerpt.is_empty() {
            self.lines.push(format!("        {}", single_line(&card.excerpt)));
        }
        if !card.tags.is_empty() {
            let tags: Vec<String> = card
                .tags
                .iter()
                .map(|t| format!("#{}", single_line(t)))
                .collect();
            self.lines.push(format!("        {}", tags.join(" ")));
        }

        let mut extras = Vec::new();
        if let Some(strength) = &card.strength {
            extras.push(format!("strength {}", strength));
        }
        if let Some(badge) = &card.foreshadow {
            extras.push(format!("[{}]", badge.label));
        }
        if !extras.is_empty() {
            self.lines.push(format!("        {}", extras.join("  ")));
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_of(&self, id: &str) -> Option<usize> {
        self.anchors.get(id).copied()
    }
}

/// One layout entry must be one terminal row.
fn single_line(text: &str) -> Cow<'_, str> {
    if text.contains(['\n', '\r']) {
        Cow::Owned(
            text.split(['\n', '\r'])
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        )
    } else {
        Cow::Borrowed(text)
    }
}

/// A [`Sidebar`] wired to the terminal layout and viewport.
pub struct TerminalSidebar {
    sidebar: Sidebar<LineAnchor>,
    viewport: Rc<RefCell<Viewport>>,
    layout: Layout,
}

impl TerminalSidebar {
    pub fn new(sidebar: Sidebar<LineAnchor>, height: usize) -> Self {
        Self {
            sidebar,
            viewport: Rc::new(RefCell::new(Viewport::new(height))),
            layout: Layout::default(),
        }
    }

    /// Lay out the current view and remount visible cards.
    pub fn render(&mut self) -> &Layout {
        let layout = Layout::of(&self.sidebar.view());
        let viewport = Rc::clone(&self.viewport);
        self.sidebar.present(|card| LineAnchor {
            line: layout.line_of(&card.id).unwrap_or_default(),
            viewport: Rc::clone(&viewport),
        });
        viewport.borrow_mut().set_total(layout.lines.len());
        self.layout = layout;
        &self.layout
    }

    pub fn sidebar(&self) -> &Sidebar<LineAnchor> {
        &self.sidebar
    }

    pub fn sidebar_mut(&mut self) -> &mut Sidebar<LineAnchor> {
        &mut self.sidebar
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.borrow().clone()
    }

    pub fn request_scroll_to(&mut self, id: &str) -> ScrollOutcome {
        self.sidebar.request_scroll_to(id)
    }

    /// Lines inside the viewport.
    pub fn window(&self) -> &[String] {
        let range = self.viewport.borrow().range();
        let end = range.end.min(self.layout.lines.len());
        let start = range.start.min(end);
        &self.layout.lines[start..end]
    }
}

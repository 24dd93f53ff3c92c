//! Sidebar session: props in, presentation model and side effects out.
//!
//! A [`Sidebar`] holds the current annotation snapshot and the two external
//! signals (active id, scroll-to id), plus the UI state it owns itself: which
//! groups are expanded and which cards are mounted. The presentation layer
//! drives it in passes:
//!
//! 1. push new props (`set_annotations`, `set_active`);
//! 2. call [`Sidebar::present`] with a mount callback that creates a handle
//!    per visible card;
//! 3. push the scroll prop (`set_scroll_to`) so the request sees the cards
//!    mounted in step 2.
//!
//! Clicks come back through [`Sidebar::click`] and are relayed unchanged to
//! the selection handler; deciding what a selection means is up to the host.

use std::collections::HashSet;

use crate::classify::{classify, Classification};
use crate::models::Annotation;
use crate::registry::AnnotationType;
use crate::scroll::{ScrollHandle, ScrollOutcome, ScrollSyncController};
use crate::stats::{aggregate_stats, Stats};
use crate::view::{build_view, CardView, Expansion, SidebarView, ViewOptions};

type SelectionHandler = Box<dyn FnMut(&Annotation)>;

pub struct Sidebar<H> {
    annotations: Vec<Annotation>,
    active_id: Option<String>,
    scroll_prop: Option<String>,
    expansion: Expansion,
    options: ViewOptions,
    scroll: ScrollSyncController<H>,
    presented: HashSet<String>,
    on_select: Option<SelectionHandler>,
}

impl<H: ScrollHandle> Sidebar<H> {
    pub fn new(annotations: Vec<Annotation>) -> Self {
        Self {
            annotations,
            active_id: None,
            scroll_prop: None,
            expansion: Expansion::default(),
            options: ViewOptions::default(),
            scroll: ScrollSyncController::new(),
            presented: HashSet::new(),
            on_select: None,
        }
    }

    pub fn with_options(mut self, options: ViewOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_expansion(mut self, expansion: Expansion) -> Self {
        self.expansion = expansion;
        self
    }

    /// Install the handler that receives clicked annotations.
    pub fn with_selection_handler<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&Annotation) + 'static,
    {
        self.on_select = Some(Box::new(handler));
        self
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Replace the snapshot. Groups and stats are re-derived on next read.
    pub fn set_annotations(&mut self, annotations: Vec<Annotation>) {
        self.annotations = annotations;
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn set_active(&mut self, active_id: Option<&str>) {
        self.active_id = active_id.map(str::to_string);
    }

    pub fn expansion(&self) -> &Expansion {
        &self.expansion
    }

    /// Flip a group open or closed. Takes effect on the next `present`.
    pub fn toggle_group(&mut self, kind: AnnotationType) -> bool {
        self.expansion.toggle(kind)
    }

    pub fn set_expanded(&mut self, kind: AnnotationType, expanded: bool) {
        self.expansion.set(kind, expanded);
    }

    pub fn classification(&self) -> Classification<'_> {
        classify(&self.annotations)
    }

    pub fn stats(&self) -> Stats {
        aggregate_stats(&self.classification())
    }

    pub fn view(&self) -> SidebarView {
        build_view(
            &self.classification(),
            self.active_id(),
            &self.expansion,
            &self.options,
        )
    }

    /// Run one presentation pass.
    ///
    /// `mount` is called for every visible card, in display order, and its
    /// handle replaces whatever was registered for that id. Cards presented
    /// last pass but not this one are removed from the registry.
    pub fn present<F>(&mut self, mut mount: F) -> SidebarView
    where
        F: FnMut(&CardView) -> H,
    {
        let view = self.view();
        let mut now = HashSet::new();

        for card in view.visible_cards() {
            let handle = mount(card);
            self.scroll.register_card_element(&card.id, handle);
            now.insert(card.id.clone());
        }

        // Stale cards are dropped from the registry, not just cleared, so it
        // never outgrows the current presentation.
        for stale in self.presented.difference(&now) {
            self.scroll.remove_card_element(stale);
        }
        self.presented = now;

        view
    }

    /// Ids mounted by the last `present`.
    pub fn is_presented(&self, id: &str) -> bool {
        self.presented.contains(id)
    }

    pub fn register_card(&mut self, annotation_id: &str, handle: H) {
        self.scroll.register_card_element(annotation_id, handle);
    }

    pub fn unregister_card(&mut self, annotation_id: &str) {
        self.scroll.unregister_card_element(annotation_id);
    }

    /// Observe the scroll-to prop.
    ///
    /// Only a change of value triggers a request, so re-pushing the same prop
    /// on an unrelated re-render does nothing. Returns `None` when nothing was
    /// requested.
    pub fn set_scroll_to(&mut self, scroll_to: Option<&str>) -> Option<ScrollOutcome> {
        if self.scroll_prop.as_deref() == scroll_to {
            return None;
        }
        self.scroll_prop = scroll_to.map(str::to_string);
        scroll_to.map(|id| self.scroll.request_scroll_to(id))
    }

    /// Issue a scroll request directly. Always acts, even for a repeated id.
    pub fn request_scroll_to(&mut self, id: &str) -> ScrollOutcome {
        self.scroll.request_scroll_to(id)
    }

    /// Relay a clicked annotation to the selection handler.
    pub fn on_annotation_selected(&mut self, annotation: &Annotation) {
        if let Some(handler) = self.on_select.as_mut() {
            handler(annotation);
        }
    }

    /// Click the card for `id`. Returns false when no card exists for it
    /// (unknown id or unknown type).
    pub fn click(&mut self, id: &str) -> bool {
        let Some(annotation) = self
            .annotations
            .iter()
            .find(|a| a.id == id && a.kind.known().is_some())
        else {
            return false;
        };
        if let Some(handler) = self.on_select.as_mut() {
            handler(annotation);
        }
        true
    }
}

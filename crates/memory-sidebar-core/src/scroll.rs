//! Scroll-to-card synchronization.
//!
//! A presentation layer registers one opaque handle per rendered card in a
//! [`CardRegistry`]. When a scroll request arrives, the
//! [`ScrollSyncController`] resolves the id through the registry and asks the
//! handle to bring itself into view, smoothly and vertically centered.
//!
//! # State machine
//!
//! ```text
//!            request_scroll_to(id), id non-empty
//!   ┌──────┐ ─────────────────────────────────▶ ┌────────────────────┐
//!   │ Idle │                                    │ ScrollPending(id)  │
//!   └──────┘ ◀───────────────────────────────── └────────────────────┘
//!            handle found: scroll_into_view
//!            handle missing: no-op
//! ```
//!
//! Every request is a new arrival: asking for the same id twice scrolls
//! twice. The controller never waits on the animation; a later request just
//! issues a new scroll call on top of whatever is still moving.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

/// How the viewport moves to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Where the target lands vertically inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBlock {
    Start,
    Center,
    End,
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

impl ScrollOptions {
    /// Smooth scroll that centers the card. Used for every sync scroll.
    pub const CENTERED: ScrollOptions = ScrollOptions {
        behavior: ScrollBehavior::Smooth,
        block: ScrollBlock::Center,
    };
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self::CENTERED
    }
}

/// A rendered card that can bring itself into view.
///
/// Implemented by the presentation layer: a DOM element wrapper, a terminal
/// line anchor, a widget id. Handles are owned by the registry and replaced
/// whenever the card is mounted again.
pub trait ScrollHandle {
    fn scroll_into_view(&mut self, options: ScrollOptions);
}

/// Annotation id → handle of its currently rendered card.
///
/// Unregistering clears the slot but keeps the id around; a cleared slot
/// behaves exactly like a missing one. [`CardRegistry::remove`] forgets the
/// id altogether.
#[derive(Debug)]
pub struct CardRegistry<H> {
    slots: HashMap<String, Option<H>>,
}

impl<H> CardRegistry<H> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Register (or replace) the handle for `id`.
    pub fn register(&mut self, id: &str, handle: H) {
        match self.slots.get_mut(id) {
            Some(slot) => *slot = Some(handle),
            None => {
                self.slots.insert(id.to_string(), Some(handle));
            }
        }
    }

    /// Clear the handle for `id`. Unknown ids are ignored.
    pub fn unregister(&mut self, id: &str) {
        if let Some(slot) = self.slots.get_mut(id) {
            *slot = None;
        }
    }

    /// Forget `id` entirely, slot included.
    pub fn remove(&mut self, id: &str) {
        self.slots.remove(id);
    }

    /// Number of ids known to the registry, cleared slots included.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, id: &str) -> Option<&H> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut H> {
        self.slots.get_mut(id).and_then(Option::as_mut)
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of ids that currently hold a handle.
    pub fn len(&self) -> usize {
        self.slots.values().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every slot, registered or cleared.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<H> Default for CardRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollState {
    Idle,
    ScrollPending(String),
}

/// What a scroll request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollOutcome {
    /// The registered handle was asked to scroll.
    Scrolled,
    /// No card is rendered for the id; nothing happened.
    NotRendered,
    /// The id was empty; nothing happened.
    Ignored,
}

/// Drives scroll requests against a [`CardRegistry`].
#[derive(Debug)]
pub struct ScrollSyncController<H> {
    registry: CardRegistry<H>,
    state: ScrollState,
}

impl<H: ScrollHandle> ScrollSyncController<H> {
    pub fn new() -> Self {
        Self {
            registry: CardRegistry::new(),
            state: ScrollState::Idle,
        }
    }

    pub fn register_card_element(&mut self, annotation_id: &str, handle: H) {
        self.registry.register(annotation_id, handle);
    }

    pub fn unregister_card_element(&mut self, annotation_id: &str) {
        self.registry.unregister(annotation_id);
    }

    /// Drop the slot for a card that is gone for good.
    pub fn remove_card_element(&mut self, annotation_id: &str) {
        self.registry.remove(annotation_id);
    }

    pub fn registry(&self) -> &CardRegistry<H> {
        &self.registry
    }

    /// Current state. Requests complete synchronously, so this is `Idle`
    /// whenever the caller can observe it.
    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    /// Handle one scroll request.
    pub fn request_scroll_to(&mut self, id: &str) -> ScrollOutcome {
        if id.is_empty() {
            return ScrollOutcome::Ignored;
        }

        self.state = ScrollState::ScrollPending(id.to_string());

        let outcome = match self.registry.get_mut(id) {
            Some(handle) => {
                handle.scroll_into_view(ScrollOptions::CENTERED);
                ScrollOutcome::Scrolled
            }
            None => {
                debug!(id, "scroll target not rendered; skipping");
                ScrollOutcome::NotRendered
            }
        };

        self.state = ScrollState::Idle;
        outcome
    }
}

impl<H: ScrollHandle> Default for ScrollSyncController<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Handle that appends `(label, options)` to a shared log on scroll.
    #[derive(Debug, Clone)]
    pub(crate) struct RecordingHandle {
        pub label: String,
        pub log: Rc<RefCell<Vec<(String, ScrollOptions)>>>,
    }

    impl RecordingHandle {
        pub(crate) fn new(label: &str, log: &Rc<RefCell<Vec<(String, ScrollOptions)>>>) -> Self {
            Self {
                label: label.to_string(),
                log: Rc::clone(log),
            }
        }
    }

    impl ScrollHandle for RecordingHandle {
        fn scroll_into_view(&mut self, options: ScrollOptions) {
            self.log.borrow_mut().push((self.label.clone(), options));
        }
    }

    #[test]
    fn test_scroll_registered_card() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut ctl = ScrollSyncController::new();
        ctl.register_card_element("x", RecordingHandle::new("x-card", &log));

        assert_eq!(ctl.request_scroll_to("x"), ScrollOutcome::Scrolled);
        assert_eq!(
            log.borrow().as_slice(),
            &[("x-card".to_string(), ScrollOptions::CENTERED)]
        );
        assert_eq!(ctl.state(), &ScrollState::Idle);
    }

    #[test]
    fn test_repeated_request_scrolls_each_time() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut ctl = ScrollSyncController::new();
        ctl.register_card_element("x", RecordingHandle::new("x", &log));

        ctl.request_scroll_to("x");
        ctl.request_scroll_to("x");
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_unregistered_id_is_noop() {
        let log: Rc<RefCell<Vec<(String, ScrollOptions)>>> = Rc::new(RefCell::new(Vec::new()));
        let mut ctl: ScrollSyncController<RecordingHandle> = ScrollSyncController::new();

        assert_eq!(ctl.request_scroll_to("missing"), ScrollOutcome::NotRendered);
        assert!(log.borrow().is_empty());
        assert_eq!(ctl.state(), &ScrollState::Idle);
    }

    #[test]
    fn test_empty_id_ignored() {
        let mut ctl: ScrollSyncController<RecordingHandle> = ScrollSyncController::new();
        assert_eq!(ctl.request_scroll_to(""), ScrollOutcome::Ignored);
    }

    #[test]
    fn test_unregister_clears_slot() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut ctl = ScrollSyncController::new();
        ctl.register_card_element("x", RecordingHandle::new("x", &log));
        ctl.unregister_card_element("x");

        assert_eq!(ctl.request_scroll_to("x"), ScrollOutcome::NotRendered);
        assert!(log.borrow().is_empty());
        assert!(ctl.registry().is_empty());
    }

    #[test]
    fn test_reregister_replaces_handle() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut ctl = ScrollSyncController::new();
        ctl.register_card_element("x", RecordingHandle::new("first", &log));
        ctl.unregister_card_element("x");
        ctl.register_card_element("x", RecordingHandle::new("second", &log));
        ctl.register_card_element("x", RecordingHandle::new("third", &log));

        ctl.request_scroll_to("x");
        let labels: Vec<String> = log.borrow().iter().map(|(l, _)| l.clone()).collect();
        assert_eq!(labels, vec!["third"]);
        assert_eq!(ctl.registry().len(), 1);
    }

    #[test]
    fn test_registry_unregister_unknown_is_ignored() {
        let mut reg: CardRegistry<u32> = CardRegistry::new();
        reg.unregister("nope");
        reg.register("a", 1);
        assert_eq!(reg.get("a"), Some(&1));
        reg.clear();
        assert!(!reg.is_registered("a"));
    }

    #[test]
    fn test_remove_drops_slot() {
        let mut reg: CardRegistry<u32> = CardRegistry::new();
        reg.register("a", 1);
        reg.register("b", 2);
        reg.unregister("a");
        assert_eq!(reg.slot_count(), 2);

        reg.remove("a");
        reg.remove("missing");
        assert_eq!(reg.slot_count(), 1);
        assert!(!reg.is_registered("a"));
        assert_eq!(reg.get("b"), Some(&2));
    }
}

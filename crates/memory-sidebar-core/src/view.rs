//! Presentation model for the sidebar.
//!
//! [`build_view`] turns a [`Classification`] into plain data that any front
//! end can draw: an overview of counts, one header per non-empty group, and
//! one card per annotation with its excerpt, badges and highlight flag.
//! Nothing here knows about pixels or widgets.

use std::borrow::Cow;

use serde::Serialize;

use crate::classify::Classification;
use crate::models::{Annotation, ForeshadowType};
use crate::registry::AnnotationType;
use crate::selection::is_active;
use crate::stats::{aggregate_stats, Stats};

/// Default excerpt length, in characters.
pub const EXCERPT_CHARS: usize = 100;

/// Marker appended to truncated excerpts.
pub const ELLIPSIS: &str = "...";

/// Message shown when there is nothing to display.
pub const EMPTY_MESSAGE: &str = "No analysis data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub excerpt_chars: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            excerpt_chars: EXCERPT_CHARS,
        }
    }
}

/// Which groups are expanded.
///
/// Defaults to every group except character events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Expansion([bool; 4]);

impl Expansion {
    pub fn none() -> Self {
        Self([false; 4])
    }

    pub fn all() -> Self {
        Self([true; 4])
    }

    /// Expand exactly the given types.
    pub fn only<I: IntoIterator<Item = AnnotationType>>(kinds: I) -> Self {
        let mut e = Self::none();
        for kind in kinds {
            e.set(kind, true);
        }
        e
    }

    pub fn is_expanded(&self, kind: AnnotationType) -> bool {
        self.0[kind.index()]
    }

    pub fn set(&mut self, kind: AnnotationType, expanded: bool) {
        self.0[kind.index()] = expanded;
    }

    /// Flip one group; returns the new state.
    pub fn toggle(&mut self, kind: AnnotationType) -> bool {
        let slot = &mut self.0[kind.index()];
        *slot = !*slot;
        *slot
    }
}

impl Default for Expansion {
    fn default() -> Self {
        Self::only([
            AnnotationType::Hook,
            AnnotationType::Foreshadow,
            AnnotationType::PlotPoint,
        ])
    }
}

/// Badge for a foreshadowing thread's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeshadowBadge {
    pub label: &'static str,
    pub color: &'static str,
}

/// One annotation card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: String,
    pub kind: AnnotationType,
    pub title: String,
    pub excerpt: String,
    /// `importance × 10` with one decimal, e.g. `"8.5"`.
    pub importance_badge: String,
    pub color: &'static str,
    pub icon: &'static str,
    pub tags: Vec<String>,
    /// `"7/10"` when a non-zero strength is present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreshadow: Option<ForeshadowBadge>,
    pub active: bool,
}

/// Header plus cards for one non-empty type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView {
    pub kind: AnnotationType,
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub count: usize,
    pub expanded: bool,
    pub cards: Vec<CardView>,
}

impl GroupView {
    /// Cards that are actually on screen: all of them when expanded, none
    /// when collapsed.
    pub fn visible_cards(&self) -> &[CardView] {
        if self.expanded {
            &self.cards[..]
        } else {
            &[]
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SidebarView {
    /// The snapshot had no annotations at all.
    Empty { message: &'static str },
    Populated {
        stats: Stats,
        groups: Vec<GroupView>,
    },
}

impl SidebarView {
    pub fn groups(&self) -> &[GroupView] {
        match self {
            SidebarView::Empty { .. } => &[],
            SidebarView::Populated { groups, .. } => groups,
        }
    }

    pub fn stats(&self) -> Stats {
        match self {
            SidebarView::Empty { .. } => Stats::default(),
            SidebarView::Populated { stats, .. } => *stats,
        }
    }

    /// Cards in expanded groups, in display order.
    pub fn visible_cards(&self) -> impl Iterator<Item = &CardView> {
        self.groups().iter().flat_map(GroupView::visible_cards)
    }

    pub fn card(&self, id: &str) -> Option<&CardView> {
        self.groups()
            .iter()
            .flat_map(|g| g.cards.iter())
            .find(|c| c.id == id)
    }
}

/// Build the presentation model.
///
/// The empty state is keyed on the input snapshot, not on the classified
/// count: a snapshot holding only unknown types still shows the (all-zero)
/// overview.
pub fn build_view(
    classification: &Classification<'_>,
    active_id: Option<&str>,
    expansion: &Expansion,
    options: &ViewOptions,
) -> SidebarView {
    if classification.input_len() == 0 {
        return SidebarView::Empty {
            message: EMPTY_MESSAGE,
        };
    }

    let groups = classification
        .iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(kind, items)| {
            let info = kind.info();
            GroupView {
                kind,
                label: info.label,
                icon: info.icon,
                color: info.color,
                count: items.len(),
                expanded: expansion.is_expanded(kind),
                cards: items
                    .iter()
                    .map(|a| card_view(kind, a, active_id, options))
                    .collect(),
            }
        })
        .collect();

    SidebarView::Populated {
        stats: aggregate_stats(classification),
        groups,
    }
}

fn card_view(
    kind: AnnotationType,
    annotation: &Annotation,
    active_id: Option<&str>,
    options: &ViewOptions,
) -> CardView {
    let info = kind.info();
    CardView {
        id: annotation.id.clone(),
        kind,
        title: annotation.title.clone(),
        excerpt: excerpt(&annotation.content, options.excerpt_chars).into_owned(),
        importance_badge: importance_badge(annotation.importance),
        color: info.color,
        icon: info.icon,
        tags: annotation.tags.clone(),
        strength: annotation
            .metadata
            .strength
            .filter(|s| *s != 0.0 && !s.is_nan())
            .map(|s| format!("{}/10", s)),
        foreshadow: annotation
            .metadata
            .foreshadow_type
            .as_ref()
            .and_then(foreshadow_badge),
        active: is_active(active_id, &annotation.id),
    }
}

/// Shorten `content` to `max_chars` characters plus [`ELLIPSIS`].
///
/// Content at or under the limit is returned unchanged.
pub fn excerpt(content: &str, max_chars: usize) -> Cow<'_, str> {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}{}", &content[..cut], ELLIPSIS)),
        None => Cow::Borrowed(content),
    }
}

/// `importance × 10` with one decimal.
///
/// Halves round away from zero (`0.125` → `"1.3"`), and negative zero
/// prints as `"0.0"`.
pub fn importance_badge(importance: f64) -> String {
    let scaled = importance * 10.0;
    if scaled.is_infinite() {
        return if scaled > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    // Sign goes on the magnitude, so -0.0 never reaches the formatter.
    let sign = if scaled < 0.0 { "-" } else { "" };
    let magnitude = (scaled.abs() * 10.0).round() / 10.0;
    format!("{}{:.1}", sign, magnitude)
}

fn foreshadow_badge(kind: &ForeshadowType) -> Option<ForeshadowBadge> {
    match kind {
        ForeshadowType::Planted => Some(ForeshadowBadge {
            label: "Planted",
            color: "blue",
        }),
        ForeshadowType::Resolved => Some(ForeshadowBadge {
            label: "Resolved",
            color: "green",
        }),
        ForeshadowType::Other(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::models::AnnotationMetadata;

    fn view_of(input: &[Annotation], active: Option<&str>) -> SidebarView {
        build_view(
            &classify(input),
            active,
            &Expansion::default(),
            &ViewOptions::default(),
        )
    }

    #[test]
    fn test_excerpt_truncates_long_content() {
        let content = "x".repeat(150);
        let ex = excerpt(&content, EXCERPT_CHARS);
        assert_eq!(ex, format!("{}...", "x".repeat(100)));
        assert_eq!(content.chars().count(), 150);
    }

    #[test]
    fn test_excerpt_keeps_short_content() {
        let content = "y".repeat(100);
        assert!(matches!(excerpt(&content, 100), Cow::Borrowed(_)));
        assert_eq!(excerpt("", 100), "");
    }

    #[test]
    fn test_excerpt_counts_characters_not_bytes() {
        let content = "伏".repeat(101);
        let ex = excerpt(&content, 100);
        assert_eq!(ex.chars().count(), 103);
        assert!(ex.ends_with("伏..."));
    }

    #[test]
    fn test_card_keeps_full_content_on_annotation() {
        let input = vec![Annotation::new("a", "hook", 0.5).with_content("z".repeat(150))];
        let view = view_of(&input, None);
        assert_eq!(view.card("a").unwrap().excerpt.chars().count(), 103);
        assert_eq!(input[0].content.len(), 150);
    }

    #[test]
    fn test_importance_badge() {
        assert_eq!(importance_badge(0.85), "8.5");
        assert_eq!(importance_badge(1.0), "10.0");
        assert_eq!(importance_badge(0.0), "0.0");
    }

    #[test]
    fn test_importance_badge_rounds_half_up() {
        assert_eq!(importance_badge(0.125), "1.3");
        assert_eq!(importance_badge(0.025), "0.3");
        assert_eq!(importance_badge(-0.125), "-1.3");
        assert_eq!(importance_badge(-0.0), "0.0");
        assert_eq!(importance_badge(f64::NAN), "NaN");
    }

    #[test]
    fn test_empty_snapshot_is_empty_state() {
        assert_eq!(
            view_of(&[], None),
            SidebarView::Empty {
                message: EMPTY_MESSAGE
            }
        );
    }

    #[test]
    fn test_only_unknown_types_shows_zero_overview() {
        let input = vec![Annotation::new("u", "unknown_type", 0.5)];
        let view = view_of(&input, None);
        assert!(matches!(view, SidebarView::Populated { .. }));
        assert_eq!(view.stats().total, 0);
        assert!(view.groups().is_empty());
    }

    #[test]
    fn test_empty_groups_omitted_in_registry_order() {
        let input = vec![
            Annotation::new("c", "character_event", 0.5),
            Annotation::new("h", "hook", 0.5),
        ];
        let view = view_of(&input, None);
        let kinds: Vec<AnnotationType> = view.groups().iter().map(|g| g.kind).collect();
        assert_eq!(
            kinds,
            vec![AnnotationType::Hook, AnnotationType::CharacterEvent]
        );
    }

    #[test]
    fn test_character_events_collapsed_by_default() {
        let input = vec![
            Annotation::new("c", "character_event", 0.5),
            Annotation::new("h", "hook", 0.5),
        ];
        let view = view_of(&input, None);
        let visible: Vec<&str> = view.visible_cards().map(|c| c.id.as_str()).collect();
        assert_eq!(visible, vec!["h"]);
        assert!(view.card("c").is_some());
    }

    #[test]
    fn test_active_flag_set_on_one_card() {
        let input = vec![
            Annotation::new("a", "hook", 0.5),
            Annotation::new("b", "hook", 0.4),
        ];
        let view = view_of(&input, Some("b"));
        let active: Vec<&str> = view
            .groups()
            .iter()
            .flat_map(|g| g.cards.iter())
            .filter(|c| c.active)
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(active, vec!["b"]);

        let none = view_of(&input, Some("deleted"));
        assert!(none.visible_cards().all(|c| !c.active));
    }

    #[test]
    fn test_metadata_badges() {
        let input = vec![
            Annotation::new("s", "hook", 0.5).with_metadata(AnnotationMetadata {
                strength: Some(7.0),
                foreshadow_type: None,
            }),
            Annotation::new("z", "hook", 0.4).with_metadata(AnnotationMetadata {
                strength: Some(0.0),
                foreshadow_type: Some(ForeshadowType::Resolved),
            }),
        ];
        let view = view_of(&input, None);
        let s = view.card("s").unwrap();
        assert_eq!(s.strength.as_deref(), Some("7/10"));
        assert!(s.foreshadow.is_none());
        let z = view.card("z").unwrap();
        assert!(z.strength.is_none());
        assert_eq!(z.foreshadow.as_ref().unwrap().label, "Resolved");
        assert_eq!(z.foreshadow.as_ref().unwrap().color, "green");
    }

    #[test]
    fn test_tags_order_preserved() {
        let input = vec![Annotation::new("t", "plot_point", 0.5).with_tags(["b", "a", "b"])];
        let view = view_of(&input, None);
        assert_eq!(view.card("t").unwrap().tags, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_expansion_toggle() {
        let mut e = Expansion::default();
        assert!(!e.is_expanded(AnnotationType::CharacterEvent));
        assert!(e.toggle(AnnotationType::CharacterEvent));
        assert!(!e.toggle(AnnotationType::Hook));
        assert!(Expansion::all().is_expanded(AnnotationType::Hook));
    }
}

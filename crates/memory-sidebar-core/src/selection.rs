//! Active-card highlighting.
//!
//! The active id is owned by the caller (usually the editor's current
//! selection). Matching is exact string identity; an id that is not in the
//! current snapshot simply highlights nothing.

use crate::classify::Classification;
use crate::models::Annotation;

/// Whether the card for `annotation_id` is the active one.
pub fn is_active(active_id: Option<&str>, annotation_id: &str) -> bool {
    active_id == Some(annotation_id)
}

/// Resolve the active annotation, if it is part of the classification.
pub fn active_in<'a>(
    active_id: Option<&str>,
    classification: &Classification<'a>,
) -> Option<&'a Annotation> {
    active_id.and_then(|id| classification.find(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use proptest::prelude::*;

    #[test]
    fn test_absent_active_id() {
        assert!(!is_active(None, "a"));
        assert!(!is_active(None, ""));
    }

    #[test]
    fn test_no_normalization() {
        assert!(!is_active(Some("A"), "a"));
        assert!(!is_active(Some(" a"), "a"));
        assert!(is_active(Some(""), ""));
    }

    #[test]
    fn test_active_in_missing_id() {
        let input = vec![
            Annotation::new("a", "hook", 0.5),
            Annotation::new("u", "unknown_type", 0.5),
        ];
        let c = classify(&input);
        assert_eq!(active_in(Some("a"), &c).map(|a| a.id.as_str()), Some("a"));
        assert!(active_in(Some("gone"), &c).is_none());
        // Filtered out of every group, so never active.
        assert!(active_in(Some("u"), &c).is_none());
        assert!(active_in(None, &c).is_none());
    }

    proptest! {
        #[test]
        fn prop_identity_is_active(id in ".*") {
            prop_assert!(is_active(Some(&id), &id));
        }

        #[test]
        fn prop_different_ids_not_active(x in ".*", y in ".*") {
            prop_assume!(x != y);
            prop_assert!(!is_active(Some(&x), &y));
        }
    }
}

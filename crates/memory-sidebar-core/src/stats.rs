//! Per-type counts derived from a [`Classification`].

use serde::Serialize;

use crate::classify::Classification;
use crate::registry::AnnotationType;

/// Overview counts shown above the groups.
///
/// `total` only counts known-type annotations, so it always equals the sum
/// of the four per-type counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub hooks: usize,
    pub foreshadows: usize,
    pub plot_points: usize,
    pub character_events: usize,
}

impl Stats {
    pub fn count(&self, kind: AnnotationType) -> usize {
        match kind {
            AnnotationType::Hook => self.hooks,
            AnnotationType::Foreshadow => self.foreshadows,
            AnnotationType::PlotPoint => self.plot_points,
            AnnotationType::CharacterEvent => self.character_events,
        }
    }
}

pub fn aggregate_stats(classification: &Classification<'_>) -> Stats {
    let len = |kind| classification.group(kind).len();
    Stats {
        total: classification.len(),
        hooks: len(AnnotationType::Hook),
        foreshadows: len(AnnotationType::Foreshadow),
        plot_points: len(AnnotationType::PlotPoint),
        character_events: len(AnnotationType::CharacterEvent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::models::Annotation;
    use proptest::prelude::*;

    #[test]
    fn test_stats_scenario() {
        let input = vec![
            Annotation::new("a", "hook", 0.9),
            Annotation::new("b", "hook", 0.9),
            Annotation::new("c", "foreshadow", 0.5),
        ];
        let stats = aggregate_stats(&classify(&input));
        assert_eq!(
            stats,
            Stats {
                total: 3,
                hooks: 2,
                foreshadows: 1,
                plot_points: 0,
                character_events: 0,
            }
        );
    }

    #[test]
    fn test_stats_exclude_unknown_from_total() {
        let input = vec![
            Annotation::new("a", "hook", 0.4),
            Annotation::new("b", "unknown_type", 0.4),
        ];
        let stats = aggregate_stats(&classify(&input));
        assert_eq!(stats.total, 1);
    }

    #[test]
    fn test_stats_empty() {
        assert_eq!(aggregate_stats(&classify(&[])), Stats::default());
    }

    #[test]
    fn test_stats_json_keys() {
        let v = serde_json::to_value(Stats::default()).unwrap();
        assert!(v.get("plotPoints").is_some());
        assert!(v.get("characterEvents").is_some());
    }

    proptest! {
        #[test]
        fn prop_total_is_sum_of_counts(kinds in prop::collection::vec(0usize..6, 0..50)) {
            let names = ["hook", "foreshadow", "plot_point", "character_event", "scene", ""];
            let input: Vec<Annotation> = kinds
                .iter()
                .enumerate()
                .map(|(i, k)| Annotation::new(i.to_string(), names[*k], 0.5))
                .collect();
            let stats = aggregate_stats(&classify(&input));
            let per_type: usize = AnnotationType::ALL.iter().map(|k| stats.count(*k)).sum();
            prop_assert_eq!(stats.total, per_type);
        }
    }
}

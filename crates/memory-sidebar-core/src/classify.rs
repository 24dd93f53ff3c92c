//! Grouping annotations by type and ranking them by importance.
//!
//! # Algorithm
//!
//! 1. Start with one empty group per known type, in registry order.
//! 2. Append each annotation to the group of its type; drop unknown types.
//! 3. Sort every group by `importance`, descending, with a stable sort so
//!    equal scores keep their input order.
//!
//! The result borrows the input slice. It is rebuilt from scratch whenever the
//! snapshot changes; volumes are tens to low hundreds per document.

use std::cmp::Ordering;

use tracing::debug;

use crate::models::Annotation;
use crate::registry::AnnotationType;

/// Annotations partitioned by type, each group ranked by importance.
#[derive(Debug, Clone, Default)]
pub struct Classification<'a> {
    groups: [Vec<&'a Annotation>; 4],
    input_len: usize,
}

impl<'a> Classification<'a> {
    /// The ranked group for one type.
    pub fn group(&self, kind: AnnotationType) -> &[&'a Annotation] {
        &self.groups[kind.index()]
    }

    /// All four groups in display order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (AnnotationType, &[&'a Annotation])> + '_ {
        AnnotationType::ALL
            .into_iter()
            .map(move |kind| (kind, self.group(kind)))
    }

    /// Number of classified (known-type) annotations.
    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the snapshot that was classified, unknown types included.
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    /// Number of annotations dropped for having an unknown type.
    pub fn dropped(&self) -> usize {
        self.input_len - self.len()
    }

    /// Find a classified annotation by id.
    pub fn find(&self, id: &str) -> Option<&'a Annotation> {
        self.groups
            .iter()
            .flat_map(|g| g.iter())
            .find(|a| a.id == id)
            .copied()
    }
}

/// Partition `annotations` by type and rank each partition.
pub fn classify(annotations: &[Annotation]) -> Classification<'_> {
    let mut groups: [Vec<&Annotation>; 4] = Default::default();

    for annotation in annotations {
        match annotation.kind.known() {
            Some(kind) => groups[kind.index()].push(annotation),
            None => debug!(
                id = %annotation.id,
                kind = annotation.kind.as_str(),
                "skipping annotation with unknown type"
            ),
        }
    }

    for group in &mut groups {
        group.sort_by(|a, b| by_importance_desc(a.importance, b.importance));
    }

    Classification {
        groups,
        input_len: annotations.len(),
    }
}

/// Descending order on importance.
///
/// NaN ranks below every number and `-0.0` equals `0.0`, which keeps the
/// comparison a total order so the stable sort holds its guarantees.
fn by_importance_desc(a: f64, b: f64) -> Ordering {
    sort_key(b).total_cmp(&sort_key(a))
}

fn sort_key(importance: f64) -> f64 {
    if importance.is_nan() {
        f64::NEG_INFINITY
    } else if importance == 0.0 {
        0.0
    } else {
        importance
    }
}

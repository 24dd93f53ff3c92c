//! Annotation data model.
//!
//! Annotations are produced by the document editor and handed to the sidebar
//! as an immutable snapshot. Field names on the wire are camelCase. Fields the
//! sidebar does not use (document offsets, chapter ids, ...) are accepted and
//! ignored.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::registry::AnnotationType;

/// The `type` field of an annotation.
///
/// Raw type strings outside the registry land in [`AnnotationKind::Unknown`]
/// instead of failing deserialization, so an unfamiliar type never fails
/// the whole snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnnotationKind {
    Known(AnnotationType),
    Unknown(String),
}

impl AnnotationKind {
    pub fn known(&self) -> Option<AnnotationType> {
        match self {
            AnnotationKind::Known(t) => Some(*t),
            AnnotationKind::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AnnotationKind::Known(t) => t.as_str(),
            AnnotationKind::Unknown(s) => s,
        }
    }
}

impl From<String> for AnnotationKind {
    fn from(s: String) -> Self {
        match AnnotationType::parse(&s) {
            Some(t) => AnnotationKind::Known(t),
            None => AnnotationKind::Unknown(s),
        }
    }
}

impl From<&str> for AnnotationKind {
    fn from(s: &str) -> Self {
        AnnotationKind::from(s.to_string())
    }
}

impl From<AnnotationType> for AnnotationKind {
    fn from(t: AnnotationType) -> Self {
        AnnotationKind::Known(t)
    }
}

impl From<AnnotationKind> for String {
    fn from(kind: AnnotationKind) -> Self {
        match kind {
            AnnotationKind::Known(t) => t.as_str().to_string(),
            AnnotationKind::Unknown(s) => s,
        }
    }
}

/// Whether a foreshadowing thread has been planted or paid off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ForeshadowType {
    Planted,
    Resolved,
    /// Any other value; not displayed.
    Other(String),
}

impl From<String> for ForeshadowType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "planted" => ForeshadowType::Planted,
            "resolved" => ForeshadowType::Resolved,
            _ => ForeshadowType::Other(s),
        }
    }
}

impl From<ForeshadowType> for String {
    fn from(t: ForeshadowType) -> Self {
        match t {
            ForeshadowType::Planted => "planted".to_string(),
            ForeshadowType::Resolved => "resolved".to_string(),
            ForeshadowType::Other(s) => s,
        }
    }
}

/// Recognized optional metadata fields. Everything else is ignored, and a
/// recognized field holding a value of the wrong shape reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationMetadata {
    /// Hook strength on a 1–10 scale.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub strength: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub foreshadow_type: Option<ForeshadowType>,
}

/// A single narrative note attached to a document span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    /// Score in `[0, 1]`; drives ordering within a group.
    pub importance: f64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: AnnotationMetadata,
}

impl Annotation {
    pub fn new(id: impl Into<String>, kind: impl Into<AnnotationKind>, importance: f64) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            importance,
            title: String::new(),
            content: String::new(),
            tags: Vec::new(),
            metadata: AnnotationMetadata::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_metadata(mut self, metadata: AnnotationMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `T` when the value has the right shape, `None` otherwise.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose<T> {
        Value(Option<T>),
        Ignored(IgnoredAny),
    }

    Ok(match Loose::<T>::deserialize(deserializer)? {
        Loose::Value(v) => v,
        Loose::Ignored(_) => None,
    })
}

//! Annotation type registry.
//!
//! The four annotation types form a closed domain. Each type maps to static
//! display metadata (label, color, icon name) that presentation layers use
//! for group headers, card borders and stat tiles. The registry is the only
//! place that decides whether a raw type string is known: anything it does
//! not recognize is excluded from display.
//!
//! | Type | Label | Color | Icon |
//! |------|-------|-------|------|
//! | `hook` | Hook | `#ff6b6b` | fire |
//! | `foreshadow` | Foreshadow | `#6b7bff` | star |
//! | `plot_point` | Plot point | `#51cf66` | thunderbolt |
//! | `character_event` | Character event | `#ffd93d` | user |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A known annotation type.
///
/// Declaration order is the display order of groups and stat tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationType {
    Hook,
    Foreshadow,
    PlotPoint,
    CharacterEvent,
}

/// Display metadata for one annotation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeInfo {
    pub kind: AnnotationType,
    pub label: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

const REGISTRY: [TypeInfo; 4] = [
    TypeInfo {
        kind: AnnotationType::Hook,
        label: "Hook",
        color: "#ff6b6b",
        icon: "fire",
    },
    TypeInfo {
        kind: AnnotationType::Foreshadow,
        label: "Foreshadow",
        color: "#6b7bff",
        icon: "star",
    },
    TypeInfo {
        kind: AnnotationType::PlotPoint,
        label: "Plot point",
        color: "#51cf66",
        icon: "thunderbolt",
    },
    TypeInfo {
        kind: AnnotationType::CharacterEvent,
        label: "Character event",
        color: "#ffd93d",
        icon: "user",
    },
];

impl AnnotationType {
    /// All known types in display order.
    pub const ALL: [AnnotationType; 4] = [
        AnnotationType::Hook,
        AnnotationType::Foreshadow,
        AnnotationType::PlotPoint,
        AnnotationType::CharacterEvent,
    ];

    /// The wire name of this type (`"plot_point"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            AnnotationType::Hook => "hook",
            AnnotationType::Foreshadow => "foreshadow",
            AnnotationType::PlotPoint => "plot_point",
            AnnotationType::CharacterEvent => "character_event",
        }
    }

    /// Resolve a wire name. Returns `None` for anything outside the domain.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Display metadata. Total over the enum.
    pub fn info(self) -> &'static TypeInfo {
        &REGISTRY[self.index()]
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a type name outside the known domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownType(pub String);

impl fmt::Display for UnknownType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown annotation type '{}' (expected hook, foreshadow, plot_point or character_event)",
            self.0
        )
    }
}

impl std::error::Error for UnknownType {}

impl FromStr for AnnotationType {
    type Err = UnknownType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownType(s.to_string()))
    }
}

/// Look up display metadata by raw type name.
///
/// Unknown names yield `None`; callers treat that as "exclude from display".
pub fn lookup(kind: &str) -> Option<&'static TypeInfo> {
    AnnotationType::parse(kind).map(AnnotationType::info)
}

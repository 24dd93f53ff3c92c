//! # Memory Sidebar Core
//!
//! UI-framework-agnostic logic for the memory annotation sidebar: the
//! annotation model, the type registry, classification and ranking, stats,
//! active-card highlighting, scroll-to-card synchronization and the
//! presentation model.
//!
//! This crate does no I/O and pulls in no async runtime, so it compiles for
//! native targets and `wasm32-unknown-unknown` alike.
//!
//! ```rust
//! use memory_sidebar_core::{aggregate_stats, classify, Annotation, AnnotationType};
//!
//! let anns = vec![
//!     Annotation::new("a", "hook", 0.9),
//!     Annotation::new("b", "hook", 0.9),
//!     Annotation::new("c", "foreshadow", 0.5),
//! ];
//! let groups = classify(&anns);
//! let hooks: Vec<&str> = groups
//!     .group(AnnotationType::Hook)
//!     .iter()
//!     .map(|a| a.id.as_str())
//!     .collect();
//! assert_eq!(hooks, ["a", "b"]);
//! assert_eq!(aggregate_stats(&groups).total, 3);
//! ```

pub mod classify;
pub mod models;
pub mod registry;
pub mod scroll;
pub mod selection;
pub mod sidebar;
pub mod stats;
pub mod view;

pub use classify::{classify, Classification};
pub use models::{Annotation, AnnotationKind, AnnotationMetadata, ForeshadowType};
pub use registry::{lookup, AnnotationType, TypeInfo};
pub use scroll::{
    CardRegistry, ScrollBehavior, ScrollBlock, ScrollHandle, ScrollOptions, ScrollOutcome,
    ScrollSyncController,
};
pub use selection::is_active;
pub use sidebar::Sidebar;
pub use stats::{aggregate_stats, Stats};
pub use view::{build_view, CardView, Expansion, GroupView, SidebarView, ViewOptions};

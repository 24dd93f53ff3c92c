//! # Memory Sidebar
//!
//! The narrative-memory sidebar of a manuscript editor, as a library and a
//! terminal front end.
//!
//! An analysis service annotates a chapter with hooks, foreshadowing,
//! plot points and character events. The sidebar groups those annotations
//! by type, orders each group by importance, shows overview counts, marks
//! the active annotation, and scrolls a requested card into view. The pure
//! logic lives in [`memory_sidebar_core`]; this crate adds configuration,
//! snapshot loading, a terminal renderer, the authentication gate, and the
//! `msb` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌────────────┐
//! │ annotations  │──▶│ memory-sidebar-  │──▶│  terminal   │──▶ stdout
//! │ .json        │   │ core (classify,  │   │  layout +   │
//! └──────────────┘   │ stats, scroll)   │   │  viewport   │
//!                    └──────────────────┘   └────────────┘
//!        ▲
//!   ┌────┴─────┐
//!   │ auth gate │◀── identity endpoint (+ keepalive)
//!   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! msb show chapter.json --active a12
//! msb show chapter.json --scroll-to a40
//! msb stats chapter.json --json
//! msb navigate chapter.json --events session.txt
//! msb auth check --path /editor/42
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`loader`] | Annotation snapshot loading |
//! | [`terminal`] | Text layout, viewport, and card anchors |
//! | [`show`] | `msb show` |
//! | [`stats`] | `msb stats` |
//! | [`navigate`] | Navigation event replay |
//! | [`report`] | Navigation effect reporting |
//! | [`auth`] | Authentication gate and identity verifier |
//! | [`session`] | Session keepalive |

pub mod auth;
pub mod config;
pub mod loader;
pub mod navigate;
pub mod report;
pub mod session;
pub mod show;
pub mod stats;
pub mod terminal;

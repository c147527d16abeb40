//! Fortune Row Synthesizer
//!
//! Turns a source descriptor and a capture timestamp into normalized
//! interpretation records.
//!
//! # Overview
//!
//! Each fortune system has one synthesis rule. A rule walks the system's
//! entity catalogue and emits one record per entity with the system's
//! defaults for keys, context and reliability. Rules are plain functions
//! registered in a map keyed by [`FortuneSystem`](fortune_domain::FortuneSystem);
//! adding a system means registering a new rule, nothing else changes.
//!
//! ```text
//! SourceDescriptor + captured_at → Synthesizer → rule(system) → Vec<InterpretationRecord>
//! ```
//!
//! # Example Usage
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use fortune_domain::{FortuneSystem, SourceDescriptor};
//! use fortune_synthesizer::Synthesizer;
//!
//! let synthesizer = Synthesizer::standard();
//! let source = SourceDescriptor::new("https://x/western", FortuneSystem::Western);
//! let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//!
//! let records = synthesizer.synthesize(&source, at);
//! assert_eq!(records.len(), 2);
//! ```

#![warn(missing_docs)]

pub mod catalogue;
mod synthesizer;


pub use catalogue::Catalogue;
pub use synthesizer::{Rule, Synthesizer};

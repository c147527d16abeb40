//! Fortune Domain Layer
//!
//! Core vocabulary shared by every crate of the collector: which fortune
//! systems exist, where their content comes from, and the shape of the
//! interpretation records that end up in the warehouse.
//!
//! ## Key Concepts
//!
//! - **Fortune system**: closed set of divination methodologies (Western,
//!   Animal-sign, Shukuyo lunar mansions, Zi Wei purple star)
//! - **Source descriptor**: a locator paired with the system it serves
//! - **Interpretation record**: one interpretation of one entity, with
//!   provenance and a reliability score
//! - **Capture batch**: all records of one run, sharing one `captured_at`
//!
//! ## Architecture
//!
//! Pure data and trait definitions only. Network and storage implementations
//! live in `fortune-fetcher` and `fortune-warehouse`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod record;
pub mod score;
pub mod source;
pub mod system;
pub mod traits;

// Re-exports for convenience
pub use error::DomainError;
pub use record::{InterpretationRecord, RecordId};
pub use score::ReliabilityScore;
pub use source::SourceDescriptor;
pub use system::FortuneSystem;

//! Interpretation records - the unit of output of a collection run

use crate::{FortuneSystem, ReliabilityScore};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Namespace for content-derived record identifiers
const RECORD_NAMESPACE: Uuid = Uuid::from_u128(0x3f9c_2a71_5d0e_5b8a_9c41_7e2d_6b13_f0a4);

/// Field separator inside the identifier key (ASCII unit separator)
const KEY_SEPARATOR: char = '\u{1f}';

/// Deterministic identifier of an interpretation record
///
/// A UUIDv5 over `fortune_system + primary_key + secondary_key + source_ref +
/// captured_at`, so re-running the same capture batch produces the same ids
/// and the warehouse can deduplicate on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Derive the id of a record from its identifying fields
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use fortune_domain::{FortuneSystem, RecordId};
    ///
    /// let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    /// let src = "https://example.com/western";
    /// let a = RecordId::derive(FortuneSystem::Western, "SUN_CONJ_MOON", None, src, at);
    /// let b = RecordId::derive(FortuneSystem::Western, "SUN_CONJ_MOON", None, src, at);
    /// assert_eq!(a, b);
    /// ```
    pub fn derive(
        system: FortuneSystem,
        primary_key: &str,
        secondary_key: Option<&str>,
        source_ref: &str,
        captured_at: DateTime<Utc>,
    ) -> Self {
        let mut key = String::new();
        key.push_str(system.as_str());
        key.push(KEY_SEPARATOR);
        key.push_str(primary_key);
        key.push(KEY_SEPARATOR);
        // None and Some("") must not collide
        match secondary_key {
            Some(secondary) => {
                key.push('+');
                key.push_str(secondary);
            }
            None => key.push('-'),
        }
        key.push(KEY_SEPARATOR);
        key.push_str(source_ref);
        key.push(KEY_SEPARATOR);
        key.push_str(&captured_at.to_rfc3339_opts(SecondsFormat::AutoSi, true));

        Self(Uuid::new_v5(&RECORD_NAMESPACE, key.as_bytes()))
    }

    /// Parse a RecordId from its hyphenated string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid record id: {}", e))
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// A single interpretation of one entity within one fortune system
///
/// Field names match the warehouse columns. Records are read-only once
/// synthesized and are consumed exactly once by the ingestion sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretationRecord {
    /// Content-derived identifier
    pub id: RecordId,

    /// System the interpreted entity belongs to
    pub fortune_system: FortuneSystem,

    /// Entity inside the system (aspect name, animal sign, ...)
    pub primary_key: String,

    /// Optional sub-grouping (e.g., colour group)
    pub secondary_key: Option<String>,

    /// Category label (e.g., "Personality", "Daily")
    pub context: String,

    /// Interpretation body
    pub content_text: String,

    /// Source confidence
    pub reliability_score: ReliabilityScore,

    /// Originating locator
    pub source_ref: String,

    /// Capture time shared by the whole batch
    pub captured_at: DateTime<Utc>,
}

impl InterpretationRecord {
    /// Create a record, deriving its id from the identifying fields
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fortune_system: FortuneSystem,
        primary_key: String,
        secondary_key: Option<String>,
        context: String,
        content_text: String,
        reliability_score: ReliabilityScore,
        source_ref: String,
        captured_at: DateTime<Utc>,
    ) -> Self {
        let id = RecordId::derive(
            fortune_system,
            &primary_key,
            secondary_key.as_deref(),
            &source_ref,
            captured_at,
        );
        Self {
            id,
            fortune_system,
            primary_key,
            secondary_key,
            context,
            content_text,
            reliability_score,
            source_ref,
            captured_at,
        }
    }
}

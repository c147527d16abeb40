//! Source descriptors

use crate::FortuneSystem;

/// Where raw content for one fortune system nominally comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// URI-like locator (e.g., "https://example.com/western")
    pub locator: String,

    /// System whose content lives at the locator
    pub system: FortuneSystem,
}

impl SourceDescriptor {
    /// Create a new source descriptor
    pub fn new(locator: impl Into<String>, system: FortuneSystem) -> Self {
        Self {
            locator: locator.into(),
            system,
        }
    }
}

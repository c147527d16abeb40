//! Source registry.
//!
//! The ordered list of sources a run visits. The built-in list covers one
//! source per fortune system; a TOML file can replace it:
//!
//! ```toml
//! [[sources]]
//! locator = "https://example.com/western"
//! system = "WESTERN"
//! ```

use fortune_domain::{FortuneSystem, SourceDescriptor};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Registry loading error
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Failed to read registry file
    #[error("Failed to read registry file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse registry TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// An entry is unusable
    #[error("Invalid source #{index} ('{locator}'): {reason}")]
    InvalidSource {
        /// Position of the entry (0-based)
        index: usize,
        /// Locator as written
        locator: String,
        /// What is wrong with it
        reason: String,
    },

    /// No sources at all
    #[error("Registry contains no sources")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    sources: Vec<SourceEntry>,
}

#[derive(Debug, Deserialize)]
struct SourceEntry {
    locator: String,
    system: String,
}

/// Ordered, read-only list of sources
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRegistry {
    sources: Vec<SourceDescriptor>,
}

impl SourceRegistry {
    /// One example source per fortune system
    pub fn builtin() -> Self {
        Self {
            sources: vec![
                SourceDescriptor::new("https://example.com/western", FortuneSystem::Western),
                SourceDescriptor::new("https://example.com/animal", FortuneSystem::Animal),
                SourceDescriptor::new("https://example.com/shukuyo", FortuneSystem::Shukuyo),
                SourceDescriptor::new("https://example.com/ziwei", FortuneSystem::Ziwei),
            ],
        }
    }

    /// Build a registry from descriptors, validating every entry
    pub fn new(sources: Vec<SourceDescriptor>) -> Result<Self, RegistryError> {
        if sources.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::new();
        for (index, source) in sources.iter().enumerate() {
            check_locator(index, &source.locator)?;
            if !seen.insert((source.locator.as_str(), source.system)) {
                return Err(invalid(
                    index,
                    &source.locator,
                    format!("duplicate {} source", source.system),
                ));
            }
        }

        Ok(Self { sources })
    }

    /// Parse a registry from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::from_str(contents)?;

        let sources = file
            .sources
            .into_iter()
            .enumerate()
            .map(|(index, entry)| match FortuneSystem::parse(&entry.system) {
                Some(system) => Ok(SourceDescriptor::new(entry.locator, system)),
                None => Err(invalid(
                    index,
                    &entry.locator,
                    format!("unknown fortune system '{}'", entry.system),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(sources)
    }

    /// Load a registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Sources in registry order
    pub fn iter(&self) -> std::slice::Iter<'_, SourceDescriptor> {
        self.sources.iter()
    }

    /// Number of sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Always false for a validated registry
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl<'a> IntoIterator for &'a SourceRegistry {
    type Item = &'a SourceDescriptor;
    type IntoIter = std::slice::Iter<'a, SourceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn invalid(index: usize, locator: &str, reason: String) -> RegistryError {
    RegistryError::InvalidSource {
        index,
        locator: locator.to_string(),
        reason,
    }
}

/// Locators must be non-blank and carry a URI scheme (`scheme:...`)
fn check_locator(index: usize, locator: &str) -> Result<(), RegistryError> {
    if locator.trim().is_empty() {
        return Err(invalid(index, locator, "locator is blank".to_string()));
    }

    let has_scheme = match locator.split_once(':') {
        Some((scheme, rest)) => {
            !rest.is_empty()
                && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    };
    if !has_scheme {
        return Err(invalid(index, locator, "locator has no URI scheme".to_string()));
    }

    Ok(())
}

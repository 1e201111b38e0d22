//! Configuration options for MODS mapping.
//!
//! This module provides the [`MapperConfig`] struct which controls how MODS XML
//! is read and how malformed records in a collection are handled.

use crate::recovery::RecoveryMode;

/// Configuration for a [`ModsMapper`](crate::ModsMapper).
///
/// # Examples
///
/// ```
/// use modsmap::{MapperConfig, RecoveryMode};
///
/// // Default configuration (strict, whitespace trimmed)
/// let config = MapperConfig::default();
/// assert_eq!(config.recovery_mode, RecoveryMode::Strict);
///
/// // Skip malformed records when mapping a collection
/// let config = MapperConfig::new().with_recovery_mode(RecoveryMode::Skip);
/// assert!(config.trim_whitespace);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperConfig {
    /// How malformed records inside a `modsCollection` are handled.
    pub recovery_mode: RecoveryMode,

    /// Trim leading and trailing whitespace from element text.
    ///
    /// When true (default), a whitespace-only element counts as empty and is
    /// left out of the output. When false, text is kept exactly as written.
    pub trim_whitespace: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            recovery_mode: RecoveryMode::default(),
            trim_whitespace: true,
        }
    }
}

impl MapperConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the recovery mode used for collections.
    #[must_use]
    pub const fn with_recovery_mode(mut self, mode: RecoveryMode) -> Self {
        self.recovery_mode = mode;
        self
    }

    /// Enables or disables whitespace trimming of element text.
    #[must_use]
    pub const fn with_trim_whitespace(mut self, enabled: bool) -> Self {
        self.trim_whitespace = enabled;
        self
    }
}

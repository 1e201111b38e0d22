//! Recovery strategies for malformed records inside a collection.
//!
//! A `modsCollection` harvested from a repository often contains a handful of
//! records that lack substructures the mapping relies on. The recovery context
//! decides whether such a record aborts the whole batch or is skipped and noted.

use log::warn;

use crate::error::{ModsError, Result};

/// Strategy for handling malformed records in a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryMode {
    /// Strict mode: the first malformed record aborts the batch (default)
    #[default]
    Strict,
    /// Skip mode: malformed records are left out and reported
    Skip,
}

/// A record that was left out of a collection because it could not be mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Zero-based position of the `mods` element within the collection
    pub position: usize,
    /// Why the record was skipped
    pub reason: String,
}

/// Recovery context for a single collection run.
#[derive(Debug, Default)]
pub struct RecoveryContext {
    /// Current recovery mode
    pub mode: RecoveryMode,
    /// Records skipped so far, in document order
    pub skipped: Vec<SkippedRecord>,
}

impl RecoveryContext {
    /// Create a new recovery context with the given mode
    #[must_use]
    pub fn new(mode: RecoveryMode) -> Self {
        RecoveryContext {
            mode,
            skipped: Vec::new(),
        }
    }

    /// Try to recover from a mapping error based on the recovery mode.
    ///
    /// # Errors
    ///
    /// Returns the error unchanged in strict mode. In skip mode only
    /// [`ModsError::MalformedRecord`] is recoverable; other errors still propagate.
    pub fn recover<T>(&mut self, error: ModsError, position: usize) -> Result<Option<T>> {
        match (self.mode, error) {
            (RecoveryMode::Skip, ModsError::MalformedRecord(reason)) => {
                warn!("skipping record {position}: {reason}");
                self.skipped.push(SkippedRecord { position, reason });
                Ok(None)
            },
            (_, error) => Err(error),
        }
    }

    /// Whether any record was skipped
    #[must_use]
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_mode_propagates() {
        let mut ctx = RecoveryContext::default();
        let result: Result<Option<()>> =
            ctx.recover(ModsError::MalformedRecord("missing originInfo".into()), 0);
        assert!(matches!(result, Err(ModsError::MalformedRecord(_))));
        assert!(!ctx.has_skipped());
    }

    #[test]
    fn test_skip_mode_records_position() {
        let mut ctx = RecoveryContext::new(RecoveryMode::Skip);
        let result: Result<Option<()>> =
            ctx.recover(ModsError::MalformedRecord("missing title".into()), 3);
        assert!(matches!(result, Ok(None)));
        assert_eq!(
            ctx.skipped,
            vec![SkippedRecord {
                position: 3,
                reason: "missing title".to_string(),
            }]
        );
    }

    #[test]
    fn test_skip_mode_keeps_parse_errors_fatal() {
        let mut ctx = RecoveryContext::new(RecoveryMode::Skip);
        let result: Result<Option<()>> = ctx.recover(ModsError::ParseError("bad".into()), 0);
        assert!(matches!(result, Err(ModsError::ParseError(_))));
        assert!(!ctx.has_skipped());
    }
}

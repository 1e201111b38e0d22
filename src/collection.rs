//! Mapping whole documents and `modsCollection` batches.
//!
//! [`ModsMapper`] ties a [`MapperConfig`] to the parsing and mapping steps.
//! Harvested batches arrive as a `modsCollection` wrapping many `mods`
//! records; under [`RecoveryMode::Skip`](crate::RecoveryMode::Skip) a record
//! missing a required substructure is left out and reported instead of failing
//! the batch.

use std::path::Path;

use log::{debug, info};

use crate::config::MapperConfig;
use crate::document::{Element, ModsDocument};
use crate::error::{ModsError, Result};
use crate::mapper::map_record;
use crate::record::RecordDictionary;
use crate::recovery::{RecoveryContext, SkippedRecord};

/// Result of mapping a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionOutcome {
    /// Mapped records in document order
    pub records: Vec<RecordDictionary>,
    /// Records left out under skip mode
    pub skipped: Vec<SkippedRecord>,
}

/// Maps MODS documents according to a [`MapperConfig`].
///
/// The mapper holds no state between calls and can be shared across threads.
///
/// # Examples
///
/// ```
/// use modsmap::{MapperConfig, ModsMapper, RecoveryMode};
///
/// let xml = r#"<modsCollection xmlns="http://www.loc.gov/mods/v3">
///   <mods><originInfo/><physicalDescription/>
///     <location><url>http://example.org/123</url></location></mods>
///   <mods><titleInfo><title>No origin info</title></titleInfo></mods>
/// </modsCollection>"#;
///
/// let mapper = ModsMapper::new(MapperConfig::new().with_recovery_mode(RecoveryMode::Skip));
/// let outcome = mapper.map_collection_str(xml)?;
/// assert_eq!(outcome.records.len(), 1);
/// assert_eq!(outcome.records[0].get_text("handle"), Some("http://example.org/123"));
/// assert_eq!(outcome.skipped[0].position, 1);
/// # Ok::<(), modsmap::ModsError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModsMapper {
    config: MapperConfig,
}

impl ModsMapper {
    /// Create a mapper with the given configuration.
    #[must_use]
    pub fn new(config: MapperConfig) -> Self {
        ModsMapper { config }
    }

    /// The mapper's configuration.
    #[must_use]
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Parse XML text using this mapper's whitespace setting.
    ///
    /// # Errors
    ///
    /// Returns [`ModsError::ParseError`] for malformed XML.
    pub fn parse(&self, xml: &str) -> Result<ModsDocument> {
        ModsDocument::parse_with(xml, self.config.trim_whitespace)
    }

    /// Map a single `mods` element.
    ///
    /// # Errors
    ///
    /// See [`map_record`].
    pub fn map_element(&self, mods: &Element) -> Result<RecordDictionary> {
        map_record(mods)
    }

    /// Map a document whose root is a single `mods` record.
    ///
    /// # Errors
    ///
    /// See [`map_record`].
    pub fn map_document(&self, document: &ModsDocument) -> Result<RecordDictionary> {
        map_record(document.root())
    }

    /// Parse and map a single `mods` record.
    ///
    /// # Errors
    ///
    /// Returns parse errors from [`ModsMapper::parse`] and mapping errors from
    /// [`map_record`].
    pub fn map_str(&self, xml: &str) -> Result<RecordDictionary> {
        self.map_document(&self.parse(xml)?)
    }

    /// Map every record in a document.
    ///
    /// A `modsCollection` root yields one record per child `mods` element; a
    /// `mods` root is a collection of one.
    ///
    /// # Errors
    ///
    /// Returns [`ModsError::MalformedRecord`] if the root is neither, or, in
    /// strict mode, the first record's mapping error.
    pub fn map_collection(&self, document: &ModsDocument) -> Result<CollectionOutcome> {
        let root = document.root();
        let records: Vec<&Element> = if root.is_mods_named("modsCollection") {
            root.find_all("mods")
        } else if root.is_mods_named("mods") {
            vec![root]
        } else {
            return Err(ModsError::MalformedRecord(format!(
                "expected <mods> or <modsCollection> root, found <{}>",
                root.name()
            )));
        };
        debug!("mapping {} record(s)", records.len());

        let mut ctx = RecoveryContext::new(self.config.recovery_mode);
        let mut outcome = CollectionOutcome::default();
        for (position, mods) in records.into_iter().enumerate() {
            match map_record(mods) {
                Ok(record) => outcome.records.push(record),
                Err(error) => {
                    ctx.recover::<()>(error, position)?;
                },
            }
        }
        if ctx.has_skipped() {
            info!(
                "mapped {} record(s), skipped {}",
                outcome.records.len(),
                ctx.skipped.len()
            );
        }
        outcome.skipped = ctx.skipped;
        Ok(outcome)
    }

    /// Parse and map every record in XML text.
    ///
    /// # Errors
    ///
    /// See [`ModsMapper::parse`] and [`ModsMapper::map_collection`].
    pub fn map_collection_str(&self, xml: &str) -> Result<CollectionOutcome> {
        self.map_collection(&self.parse(xml)?)
    }

    /// Read, parse and map every record in a file.
    ///
    /// # Errors
    ///
    /// Returns [`ModsError::IoError`] if the file cannot be read, otherwise see
    /// [`ModsDocument::from_bytes`] and [`ModsMapper::map_collection`].
    pub fn map_path<P: AsRef<Path>>(&self, path: P) -> Result<CollectionOutcome> {
        let document = ModsDocument::from_path(path, self.config.trim_whitespace)?;
        self.map_collection(&document)
    }
}

#![warn(missing_docs)]

//! # modsmap: MODS record mapping for search indexing
//!
//! Maps MODS v3 (Metadata Object Description Schema) bibliographic records
//! into flat field dictionaries ready to be serialized to JSON and indexed by
//! a document-oriented search engine.
//!
//! ## Quick Start
//!
//! ```
//! use modsmap::ModsMapper;
//!
//! let xml = r#"<mods:mods xmlns:mods="http://www.loc.gov/mods/v3">
//!   <mods:titleInfo><mods:title>Geology of Pikes Peak</mods:title></mods:titleInfo>
//!   <mods:name>
//!     <mods:namePart>Smith, Jane</mods:namePart>
//!     <mods:role><mods:roleTerm>Thesis Advisor</mods:roleTerm></mods:role>
//!   </mods:name>
//!   <mods:originInfo><mods:dateIssued>2014</mods:dateIssued></mods:originInfo>
//!   <mods:physicalDescription><mods:extent>45 p.</mods:extent></mods:physicalDescription>
//!   <mods:location><mods:url>http://hdl.handle.net/10176/1</mods:url></mods:location>
//! </mods:mods>"#;
//!
//! let record = ModsMapper::default().map_str(xml)?;
//! assert_eq!(record.get_text("titlePrincipal"), Some("Geology of Pikes Peak"));
//! assert_eq!(record.get_list("thesisAdvisor").unwrap(), ["Smith, Jane"]);
//! assert_eq!(record.get_text("handle"), Some("http://hdl.handle.net/10176/1"));
//! println!("{}", record.to_json()?);
//! # Ok::<(), modsmap::ModsError>(())
//! ```
//!
//! ## Modules
//!
//! - [`document`] — Namespace-aware MODS element tree with optional lookups
//! - [`field_name`] — Camel-case field names from role terms and labels
//! - [`mapper`] — Per-area extraction rules and the record merge
//! - [`record`] — The record dictionary and its JSON form
//! - [`collection`] — `modsCollection` batches and the configured mapper
//! - [`parallel`] — Mapping many documents on a Rayon pool
//! - [`config`] — Mapper configuration
//! - [`recovery`] — Skip-or-fail handling of malformed records
//! - [`error`] — Error types and result type

pub mod collection;
pub mod config;
pub mod document;
pub mod error;
pub mod field_name;
pub mod mapper;
pub mod parallel;
pub mod record;
pub mod recovery;

pub use collection::{CollectionOutcome, ModsMapper};
pub use config::MapperConfig;
pub use document::{Element, ModsDocument, MAX_DEPTH, MODS_NS};
pub use error::{ModsError, Result};
pub use field_name::generate_field_name;
pub use mapper::map_record;
pub use record::{FieldValue, RecordDictionary};
pub use recovery::{RecoveryContext, RecoveryMode, SkippedRecord};

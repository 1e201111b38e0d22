//! Common test helpers shared across the integration suite.

use modsmap::{ModsMapper, RecordDictionary};

/// Wrap MODS body elements in a `mods:mods` root with the namespace declared.
pub fn wrap_mods(body: &str) -> String {
    format!(r#"<mods:mods xmlns:mods="http://www.loc.gov/mods/v3">{body}</mods:mods>"#)
}

/// Wrap body elements in a record that also carries the required substructures.
#[allow(dead_code)]
pub fn wrap_complete(body: &str) -> String {
    wrap_mods(&format!(
        "{body}<mods:originInfo/><mods:physicalDescription/>"
    ))
}

/// Map a single record with the default mapper, panicking on failure.
pub fn map(xml: &str) -> RecordDictionary {
    ModsMapper::default()
        .map_str(xml)
        .unwrap_or_else(|e| panic!("mapping failed: {e}"))
}

/// Owned strings for comparing list fields.
#[allow(dead_code)]
pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}

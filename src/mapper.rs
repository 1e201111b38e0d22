//! MODS-to-dictionary field mapping.
//!
//! Each semantic area of a MODS record (titles, names, notes, subjects, ...) is
//! handled by its own extraction rule. A rule looks only at its own elements
//! and returns a partial [`RecordDictionary`]; [`map_record`] runs the rules in
//! a fixed order and merges the partial results, last writer wins.
//!
//! Mapping crosswalk:
//! - `abstract`, `genre`, `typeOfResource` → sequences under the same name
//! - `accessCondition[@type^="useAnd"]` → `useAndReproduction`
//! - `language/languageTerm` → `language`
//! - `name/namePart` → camel-cased `name/role/roleTerm` (`creator`, `thesisAdvisor`)
//! - `note` → `adminNote`, `thesis`, `degree*` or `note` depending on type and label
//! - `originInfo/*` → `place`, `publisher`, `copyrightDate`, `dateCreated`, `dateIssued`
//! - `physicalDescription/*` → `extent`, `digitalOrigin`
//! - `subject/*` → nested `subject.{genre,geographic,name,temporal,topic}`
//! - `titleInfo/title` → `titlePrincipal` or `titleAlternative`
//! - `location/url` → `handle`
//!
//! # Examples
//!
//! ```
//! use modsmap::document::ModsDocument;
//! use modsmap::mapper::map_record;
//!
//! let xml = r#"<mods xmlns="http://www.loc.gov/mods/v3">
//!   <titleInfo><title>Walden</title></titleInfo>
//!   <name><namePart>Thoreau, Henry David</namePart>
//!     <role><roleTerm>Creator</roleTerm></role></name>
//!   <originInfo><dateIssued>1854</dateIssued></originInfo>
//!   <physicalDescription><extent>357 p.</extent></physicalDescription>
//! </mods>"#;
//!
//! let doc = ModsDocument::parse(xml)?;
//! let record = map_record(doc.root())?;
//! assert_eq!(record.get_text("titlePrincipal"), Some("Walden"));
//! assert_eq!(record.get_list("creator").unwrap()[0], "Thoreau, Henry David");
//! assert_eq!(record.get_text("dateIssued"), Some("1854"));
//! # Ok::<(), modsmap::ModsError>(())
//! ```

use indexmap::IndexMap;
use log::debug;

use crate::document::Element;
use crate::error::{ModsError, Result};
use crate::field_name::generate_field_name;
use crate::record::{push_distinct, RecordDictionary};

/// An extraction rule: one semantic area of a MODS record.
type Rule = fn(&Element) -> Result<RecordDictionary>;

/// Extraction rules in merge order.
const RULES: [(&str, Rule); 12] = [
    ("abstract", abstract_field),
    ("accessCondition", access_condition),
    ("genre", genre),
    ("language", language),
    ("name", names),
    ("note", notes),
    ("originInfo", origin_info),
    ("physicalDescription", physical_description),
    ("subject", subject),
    ("titleInfo", title),
    ("typeOfResource", type_of_resource),
    ("location", url),
];

/// Map a single `mods` element into a [`RecordDictionary`].
///
/// # Errors
///
/// Returns [`ModsError::MalformedRecord`] if `mods` is not a MODS `mods`
/// element, or if a substructure the mapping relies on is missing: the
/// `originInfo` or `physicalDescription` element, a `namePart` or role term on
/// a `name`, or the `title` of a `titleInfo`.
pub fn map_record(mods: &Element) -> Result<RecordDictionary> {
    if !mods.is_mods_named("mods") {
        return Err(ModsError::MalformedRecord(format!(
            "expected a MODS <mods> element, found <{}>",
            mods.name()
        )));
    }

    let mut record = RecordDictionary::new();
    for (area, rule) in RULES {
        let partial = rule(mods)?;
        debug!("{area}: {} field(s)", partial.len());
        record.merge(partial);
    }
    Ok(record)
}

/// Distinct texts of every direct child named `element_name`, under that name.
fn singleton(mods: &Element, element_name: &str) -> RecordDictionary {
    let mut output = RecordDictionary::new();
    for text in mods.find_all(element_name).into_iter().filter_map(Element::text) {
        output.push_unique(element_name, text);
    }
    output
}

fn abstract_field(mods: &Element) -> Result<RecordDictionary> {
    Ok(singleton(mods, "abstract"))
}

fn genre(mods: &Element) -> Result<RecordDictionary> {
    Ok(singleton(mods, "genre"))
}

fn type_of_resource(mods: &Element) -> Result<RecordDictionary> {
    Ok(singleton(mods, "typeOfResource"))
}

/// Only the first `accessCondition` is considered.
fn access_condition(mods: &Element) -> Result<RecordDictionary> {
    let mut output = RecordDictionary::new();
    if let Some(condition) = mods.find("accessCondition") {
        let is_use = condition
            .attr("type")
            .is_some_and(|kind| kind.starts_with("useAnd"));
        if let Some(text) = condition.text().filter(|_| is_use) {
            output.set_text("useAndReproduction", text);
        }
    }
    Ok(output)
}

fn language(mods: &Element) -> Result<RecordDictionary> {
    let mut output = RecordDictionary::new();
    for term in mods
        .find_all("language/languageTerm")
        .into_iter()
        .filter_map(Element::text)
    {
        output.push_unique("language", term);
    }
    Ok(output)
}

fn names(mods: &Element) -> Result<RecordDictionary> {
    let mut output = RecordDictionary::new();
    for name in mods.find_all("name") {
        let name_part = name
            .find("namePart")
            .ok_or_else(|| ModsError::missing("namePart", "name"))?;
        let Some(text) = name_part.text() else {
            continue;
        };
        let role = name
            .find_text("role/roleTerm")
            .ok_or_else(|| ModsError::missing("role/roleTerm", &format!("name '{text}'")))?;
        let field = generate_field_name(role);
        if field.is_empty() {
            return Err(ModsError::missing("role/roleTerm", &format!("name '{text}'")));
        }
        output.push_unique(&field, text);
    }
    Ok(output)
}

fn notes(mods: &Element) -> Result<RecordDictionary> {
    let mut output = RecordDictionary::new();
    for note in mods.find_all("note") {
        let Some(text) = note.text() else {
            continue;
        };
        let note_type = note.attr("type").unwrap_or_default();
        if note_type.starts_with("admin") {
            output.push_unique("adminNote", text);
        } else if note_type.starts_with("thesis") {
            match note.attr("displayLabel") {
                Some(label) if label.starts_with("Degree") => {
                    output.push_unique(&generate_field_name(label), text);
                },
                _ => output.push_unique("thesis", text),
            }
        } else {
            output.push_unique("note", text);
        }
    }
    Ok(output)
}

fn origin_info(mods: &Element) -> Result<RecordDictionary> {
    let origin = mods
        .find("originInfo")
        .ok_or_else(|| ModsError::missing("originInfo", "mods"))?;

    let mut output = RecordDictionary::new();
    for (path, field) in [
        ("place/placeTerm", "place"),
        ("publisher", "publisher"),
        ("copyrightDate", "copyrightDate"),
        ("dateCreated", "dateCreated"),
        ("dateIssued", "dateIssued"),
    ] {
        if let Some(text) = origin.find_text(path) {
            output.set_text(field, text);
        }
    }
    Ok(output)
}

fn physical_description(mods: &Element) -> Result<RecordDictionary> {
    let description = mods
        .find("physicalDescription")
        .ok_or_else(|| ModsError::missing("physicalDescription", "mods"))?;

    let mut output = RecordDictionary::new();
    if let Some(extent) = description.find_text("extent") {
        output.set_text("extent", extent);
    }
    if let Some(origin) = description.find_text("digitalOrigin") {
        output.set_text("digitalOrigin", origin);
    }
    Ok(output)
}

fn subject(mods: &Element) -> Result<RecordDictionary> {
    fn add(subject: &mut IndexMap<String, Vec<String>>, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            push_distinct(subject.entry(key.to_string()).or_default(), value);
        }
    }

    let mut nested: IndexMap<String, Vec<String>> = IndexMap::new();
    for row in mods.find_all("subject") {
        add(&mut nested, "genre", row.find_text("genre"));
        add(&mut nested, "geographic", row.find_text("geographic"));
        for name in row.find_all("name") {
            add(&mut nested, "name", name.find_text("namePart"));
        }
        add(&mut nested, "temporal", row.find_text("temporal"));
        add(&mut nested, "topic", row.find_text("topic"));
    }

    let mut output = RecordDictionary::new();
    output.set_nested("subject", nested);
    Ok(output)
}

/// The last `titleInfo` of each kind wins.
fn title(mods: &Element) -> Result<RecordDictionary> {
    let mut output = RecordDictionary::new();
    for title_info in mods.find_all("titleInfo") {
        let title = title_info
            .find("title")
            .ok_or_else(|| ModsError::missing("title", "titleInfo"))?;
        let Some(text) = title.text() else {
            continue;
        };
        let is_alternative = title_info
            .attr("type")
            .is_some_and(|kind| kind.starts_with("alt"));
        let field = if is_alternative {
            "titleAlternative"
        } else {
            "titlePrincipal"
        };
        output.set_text(field, text);
    }
    Ok(output)
}

/// The first `location/url` is stored as the record's handle.
fn url(mods: &Element) -> Result<RecordDictionary> {
    let mut output = RecordDictionary::new();
    if let Some(handle) = mods.find_text("location/url") {
        output.set_text("handle", handle);
    }
    Ok(output)
}

//! Namespace-aware element tree for MODS XML.
//!
//! MODS records arrive as XML text in the `http://www.loc.gov/mods/v3`
//! namespace, usually with a `mods:` prefix but sometimes as the default
//! namespace. This module parses that text once into an immutable [`Element`]
//! tree so the mapping rules can perform optional lookups instead of probing
//! for attributes on possibly-absent nodes.
//!
//! # Examples
//!
//! ```
//! use modsmap::document::ModsDocument;
//!
//! let xml = r#"<mods xmlns="http://www.loc.gov/mods/v3">
//!   <titleInfo><title>Walden</title></titleInfo>
//! </mods>"#;
//!
//! let doc = ModsDocument::parse(xml)?;
//! let title = doc.root().find("titleInfo/title").and_then(|e| e.text());
//! assert_eq!(title, Some("Walden"));
//! # Ok::<(), modsmap::ModsError>(())
//! ```

use std::borrow::Cow;
use std::fs;
use std::io::Read;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::error::{ModsError, Result};

/// The MODS v3 namespace URI.
pub const MODS_NS: &str = "http://www.loc.gov/mods/v3";

/// Deepest element nesting accepted by the parser.
///
/// MODS records are a handful of levels deep; anything past this is refused
/// before the tree grows deep enough to overflow the stack when dropped.
pub const MAX_DEPTH: usize = 256;

/// A single XML element with its attributes, leading text, and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    namespace: Option<String>,
    name: String,
    attributes: IndexMap<String, String>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// Local name of the element, without any namespace prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace URI the element is bound to, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Whether this element belongs to the MODS v3 namespace.
    #[must_use]
    pub fn is_mods(&self) -> bool {
        self.namespace.as_deref() == Some(MODS_NS)
    }

    /// Whether this is a MODS element with the given local name.
    #[must_use]
    pub fn is_mods_named(&self, name: &str) -> bool {
        self.is_mods() && self.name == name
    }

    /// Attribute value by qualified name (`type`, `displayLabel`, `xlink:href`).
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Text directly inside this element before its first child, or `None`
    /// when there is none.
    ///
    /// Text of child elements, and text following a child, is not included.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Child elements in document order.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First element matching a `/`-separated path of MODS local names.
    ///
    /// Each step matches direct children only, so `"originInfo/place/placeTerm"`
    /// walks three levels down from this element.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Element> {
        self.find_all(path).into_iter().next()
    }

    /// All elements matching a `/`-separated path, in document order.
    #[must_use]
    pub fn find_all(&self, path: &str) -> Vec<&Element> {
        let mut current = vec![self];
        for step in path.split('/') {
            current = current
                .into_iter()
                .flat_map(|element| {
                    element
                        .children
                        .iter()
                        .filter(move |child| child.is_mods_named(step))
                })
                .collect();
            if current.is_empty() {
                break;
            }
        }
        current
    }

    /// Text of the first element matching `path`, if both exist.
    #[must_use]
    pub fn find_text(&self, path: &str) -> Option<&str> {
        self.find(path).and_then(Element::text)
    }

    fn from_start(
        start: &BytesStart<'_>,
        namespace: Option<String>,
        reader: &NsReader<&[u8]>,
    ) -> Result<Self> {
        let name = reader
            .decoder()
            .decode(start.local_name().as_ref())
            .map_err(|e| parse_error(reader, &e))?
            .into_owned();

        let mut attributes = IndexMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| parse_error(reader, &quick_xml::Error::from(e)))?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = reader
                .decoder()
                .decode(attr.key.as_ref())
                .map_err(|e| parse_error(reader, &e))?
                .into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| parse_error(reader, &e))?
                .into_owned();
            attributes.insert(key, value);
        }

        Ok(Element {
            namespace,
            name,
            attributes,
            text: None,
            children: Vec::new(),
        })
    }

    fn push_text(&mut self, text: &str) {
        if self.children.is_empty() {
            self.text.get_or_insert_with(String::new).push_str(text);
        }
    }

    fn finish(&mut self, trim_whitespace: bool) {
        if let Some(text) = self.text.take() {
            let text = if trim_whitespace {
                text.trim().to_string()
            } else {
                text
            };
            if !text.is_empty() {
                self.text = Some(text);
            }
        }
    }
}

/// A parsed MODS XML document.
///
/// The root is either a single `mods` record or a `modsCollection`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModsDocument {
    root: Element,
}

impl ModsDocument {
    /// Parse MODS XML text, trimming whitespace around element text.
    ///
    /// # Errors
    ///
    /// Returns [`ModsError::ParseError`] if the XML is not well-formed or has
    /// no root element.
    pub fn parse(xml: &str) -> Result<Self> {
        Self::parse_with(xml, true)
    }

    /// Parse MODS XML text, optionally keeping element text exactly as written.
    ///
    /// # Errors
    ///
    /// Returns [`ModsError::ParseError`] if the XML is not well-formed, has
    /// no root element, or nests elements deeper than [`MAX_DEPTH`].
    pub fn parse_with(xml: &str, trim_whitespace: bool) -> Result<Self> {
        let mut reader = NsReader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let (namespace, event) = match reader.read_resolved_event() {
                Ok((resolved, event)) => (owned_namespace(&resolved)?, event),
                Err(e) => return Err(ModsError::ParseError(format!("XML error: {e}"))),
            };
            match event {
                Event::Start(start) => {
                    check_depth(stack.len() + 1)?;
                    let element = Element::from_start(&start, namespace, &reader)?;
                    stack.push(element);
                },
                Event::Empty(start) => {
                    check_depth(stack.len() + 1)?;
                    let mut element = Element::from_start(&start, namespace, &reader)?;
                    element.finish(trim_whitespace);
                    attach(&mut stack, &mut root, element)?;
                },
                Event::End(_) => {
                    let mut element = stack.pop().ok_or_else(|| {
                        ModsError::ParseError("closing tag without opening tag".to_string())
                    })?;
                    element.finish(trim_whitespace);
                    attach(&mut stack, &mut root, element)?;
                },
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        let text = text.unescape().map_err(|e| parse_error(&reader, &e))?;
                        current.push_text(&text);
                    }
                },
                Event::CData(cdata) => {
                    if let Some(current) = stack.last_mut() {
                        let text = reader
                            .decoder()
                            .decode(&cdata)
                            .map_err(|e| parse_error(&reader, &e))?;
                        current.push_text(&text);
                    }
                },
                Event::Eof => break,
                _ => {},
            }
        }

        if let Some(open) = stack.last() {
            return Err(ModsError::ParseError(format!(
                "unexpected end of input inside <{}>",
                open.name
            )));
        }
        let root = root.ok_or_else(|| ModsError::ParseError("document has no root element".into()))?;
        Ok(ModsDocument { root })
    }

    /// Parse raw MODS XML bytes in the encoding they declare.
    ///
    /// A byte order mark wins over the `encoding` of the XML declaration;
    /// without either the bytes are read as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`ModsError::ParseError`] if the declared encoding is unknown or
    /// the bytes are not valid in it, otherwise the errors of
    /// [`ModsDocument::parse_with`].
    pub fn from_bytes(bytes: &[u8], trim_whitespace: bool) -> Result<Self> {
        let xml = decode_xml(bytes)?;
        Self::parse_with(&xml, trim_whitespace)
    }

    /// Read and parse MODS XML from any reader.
    ///
    /// # Errors
    ///
    /// Returns [`ModsError::IoError`] if reading fails, otherwise the errors of
    /// [`ModsDocument::from_bytes`].
    pub fn from_reader<R: Read>(mut reader: R, trim_whitespace: bool) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes, trim_whitespace)
    }

    /// Read and parse a MODS XML file.
    ///
    /// # Errors
    ///
    /// Returns [`ModsError::IoError`] if the file cannot be read, otherwise the
    /// errors of [`ModsDocument::from_bytes`].
    pub fn from_path<P: AsRef<Path>>(path: P, trim_whitespace: bool) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes, trim_whitespace)
    }

    /// The document's root element.
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }
}

fn check_depth(depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(ModsError::ParseError(format!(
            "elements nested deeper than {MAX_DEPTH} levels"
        )));
    }
    Ok(())
}

/// Decode XML bytes using the BOM, then the declared encoding, then UTF-8.
fn decode_xml(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => {
            let encoding = match declared_encoding(bytes) {
                Some(label) => Encoding::for_label(label.as_bytes()).ok_or_else(|| {
                    ModsError::ParseError(format!("unsupported encoding '{label}'"))
                })?,
                None => UTF_8,
            };
            (encoding, bytes)
        },
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| {
            ModsError::ParseError(format!("input is not valid {}", encoding.name()))
        })
}

/// The `encoding` pseudo-attribute of a leading `<?xml ...?>` declaration.
fn declared_encoding(bytes: &[u8]) -> Option<&str> {
    let rest = bytes.strip_prefix(b"<?xml")?;
    let end = rest.windows(2).position(|w| w == b"?>")?;
    let decl = std::str::from_utf8(&rest[..end]).ok()?;
    let after = decl.split_once("encoding")?.1.trim_start();
    let value = after.strip_prefix('=')?.trim_start();
    let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &value[1..];
    value.find(quote).map(|close| &value[..close])
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(ModsError::ParseError(format!(
            "second root element <{}>",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

fn owned_namespace(resolved: &ResolveResult<'_>) -> Result<Option<String>> {
    match resolved {
        ResolveResult::Bound(ns) => std::str::from_utf8(ns.as_ref())
            .map(|uri| Some(uri.to_string()))
            .map_err(|e| ModsError::ParseError(format!("namespace URI is not UTF-8: {e}"))),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(ModsError::ParseError(format!(
            "unknown namespace prefix '{}'",
            String::from_utf8_lossy(prefix)
        ))),
    }
}

fn parse_error(reader: &NsReader<&[u8]>, error: &quick_xml::Error) -> ModsError {
    ModsError::ParseError(format!(
        "XML error at byte {}: {error}",
        reader.buffer_position()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mods:mods xmlns:mods="http://www.loc.gov/mods/v3" xmlns:xlink="http://www.w3.org/1999/xlink">
  <mods:titleInfo type="alternative">
    <mods:title>  Other Title  </mods:title>
  </mods:titleInfo>
  <mods:language>
    <mods:languageTerm type="code">eng</mods:languageTerm>
    <mods:languageTerm type="code">fre</mods:languageTerm>
  </mods:language>
  <mods:language>
    <mods:languageTerm>ger</mods:languageTerm>
  </mods:language>
  <mods:note/>
  <mods:abstract><![CDATA[Fish & chips]]></mods:abstract>
  <mods:location><mods:url xlink:href="ignored">http://hdl.example.org/1</mods:url></mods:location>
</mods:mods>"#;

    #[test]
    fn test_parse_prefixed_namespace() {
        let doc = ModsDocument::parse(SAMPLE).unwrap();
        let root = doc.root();
        assert!(root.is_mods_named("mods"));
        assert_eq!(root.namespace(), Some(MODS_NS));
        assert_eq!(root.children().len(), 6);
    }

    #[test]
    fn test_find_trims_text() {
        let doc = ModsDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.root().find_text("titleInfo/title"), Some("Other Title"));
    }

    #[test]
    fn test_parse_with_keeps_whitespace() {
        let doc = ModsDocument::parse_with(SAMPLE, false).unwrap();
        assert_eq!(
            doc.root().find_text("titleInfo/title"),
            Some("  Other Title  ")
        );
    }

    #[test]
    fn test_find_all_document_order() {
        let doc = ModsDocument::parse(SAMPLE).unwrap();
        let terms: Vec<_> = doc
            .root()
            .find_all("language/languageTerm")
            .into_iter()
            .filter_map(Element::text)
            .collect();
        assert_eq!(terms, vec!["eng", "fre", "ger"]);
    }

    #[test]
    fn test_attributes_and_namespace_bindings() {
        let doc = ModsDocument::parse(SAMPLE).unwrap();
        let title_info = doc.root().find("titleInfo").unwrap();
        assert_eq!(title_info.attr("type"), Some("alternative"));
        assert_eq!(doc.root().attr("xmlns:mods"), None);

        let url = doc.root().find("location/url").unwrap();
        assert_eq!(url.attr("xlink:href"), Some("ignored"));
        assert_eq!(url.text(), Some("http://hdl.example.org/1"));
    }

    #[test]
    fn test_empty_element_has_no_text() {
        let doc = ModsDocument::parse(SAMPLE).unwrap();
        let note = doc.root().find("note").unwrap();
        assert_eq!(note.text(), None);
    }

    #[test]
    fn test_cdata_text() {
        let doc = ModsDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.root().find_text("abstract"), Some("Fish & chips"));
    }

    #[test]
    fn test_missing_path_is_none() {
        let doc = ModsDocument::parse(SAMPLE).unwrap();
        assert!(doc.root().find("originInfo/place").is_none());
        assert!(doc.root().find_all("subject").is_empty());
        assert!(doc.root().find("").is_none());
    }

    #[test]
    fn test_foreign_namespace_ignored() {
        let xml = r#"<mods xmlns="http://www.loc.gov/mods/v3" xmlns:x="urn:other">
            <x:title>Not MODS</x:title>
            <title>MODS</title>
        </mods>"#;
        let doc = ModsDocument::parse(xml).unwrap();
        assert_eq!(doc.root().find_text("title"), Some("MODS"));
        assert_eq!(doc.root().find_all("title").len(), 1);
    }

    #[test]
    fn test_unqualified_document_does_not_match() {
        let doc = ModsDocument::parse("<mods><title>Plain</title></mods>").unwrap();
        assert!(!doc.root().is_mods());
        assert!(doc.root().find("title").is_none());
    }

    #[test]
    fn test_entities_unescaped() {
        let xml = r#"<mods xmlns="http://www.loc.gov/mods/v3"><note type="a&amp;b">Smith &amp; Sons</note></mods>"#;
        let doc = ModsDocument::parse(xml).unwrap();
        let note = doc.root().find("note").unwrap();
        assert_eq!(note.text(), Some("Smith & Sons"));
        assert_eq!(note.attr("type"), Some("a&b"));
    }

    #[test]
    fn test_mismatched_tags_rejected() {
        let result = ModsDocument::parse("<mods><title></mods>");
        assert!(matches!(result, Err(ModsError::ParseError(_))));
    }

    #[test]
    fn test_empty_input_rejected() {
        let result = ModsDocument::parse("   ");
        assert!(matches!(result, Err(ModsError::ParseError(_))));
    }

    #[test]
    fn test_unclosed_root_rejected() {
        let result = ModsDocument::parse(r#"<mods xmlns="http://www.loc.gov/mods/v3"><title>x</title>"#);
        assert!(matches!(result, Err(ModsError::ParseError(_))));
    }

    #[test]
    fn test_nesting_past_limit_rejected() {
        let depth = 20_000;
        let xml = format!(
            r#"<mods xmlns="http://www.loc.gov/mods/v3"><extension>{}{}</extension></mods>"#,
            "<a>".repeat(depth),
            "</a>".repeat(depth)
        );
        let result = ModsDocument::parse(&xml);
        assert!(matches!(result, Err(ModsError::ParseError(msg)) if msg.contains("nested")));
    }

    #[test]
    fn test_self_closing_past_limit_rejected() {
        let xml = format!("{}<a/>{}", "<a>".repeat(MAX_DEPTH), "</a>".repeat(MAX_DEPTH));
        assert!(matches!(
            ModsDocument::parse(&xml),
            Err(ModsError::ParseError(_))
        ));
    }

    #[test]
    fn test_nesting_at_limit_accepted() {
        let xml = format!("{}{}", "<a>".repeat(MAX_DEPTH), "</a>".repeat(MAX_DEPTH));
        assert!(ModsDocument::parse(&xml).is_ok());
    }

    #[test]
    fn test_text_after_child_ignored() {
        let xml = r#"<mods xmlns="http://www.loc.gov/mods/v3"><note>Head<extension/>Tail</note></mods>"#;
        let doc = ModsDocument::parse(xml).unwrap();
        assert_eq!(doc.root().find_text("note"), Some("Head"));
    }

    #[test]
    fn test_text_only_after_child_is_none() {
        let xml = r#"<mods xmlns="http://www.loc.gov/mods/v3"><note><extension/>Tail</note></mods>"#;
        let doc = ModsDocument::parse(xml).unwrap();
        assert_eq!(doc.root().find("note").and_then(Element::text), None);
    }

    #[test]
    fn test_from_bytes_declared_latin1() {
        let mut bytes = br#"<?xml version="1.0" encoding="ISO-8859-1"?>
<mods xmlns="http://www.loc.gov/mods/v3"><note>Caf"#
            .to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"</note></mods>");
        let doc = ModsDocument::from_bytes(&bytes, true).unwrap();
        assert_eq!(doc.root().find_text("note"), Some("Caf\u{e9}"));
    }

    #[test]
    fn test_from_bytes_invalid_utf8_is_parse_error() {
        let bytes = b"<mods xmlns=\"http://www.loc.gov/mods/v3\"><note>\xFF</note></mods>";
        assert!(matches!(
            ModsDocument::from_bytes(bytes, true),
            Err(ModsError::ParseError(_))
        ));
    }

    #[test]
    fn test_from_bytes_unknown_encoding() {
        let bytes = br#"<?xml version="1.0" encoding="x-klingon"?><mods/>"#;
        let err = ModsDocument::from_bytes(bytes, true).unwrap_err();
        assert!(err.to_string().contains("x-klingon"));
    }

    #[test]
    fn test_from_bytes_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(SAMPLE.as_bytes());
        let doc = ModsDocument::from_bytes(&bytes, true).unwrap();
        assert!(doc.root().is_mods_named("mods"));
    }

    #[test]
    fn test_declared_encoding() {
        assert_eq!(
            declared_encoding(br#"<?xml version="1.0" encoding='UTF-8'?><a/>"#),
            Some("UTF-8")
        );
        assert_eq!(declared_encoding(br#"<?xml version="1.0"?><a/>"#), None);
        assert_eq!(declared_encoding(b"<a/>"), None);
    }

    #[test]
    fn test_from_reader() {
        let doc = ModsDocument::from_reader(SAMPLE.as_bytes(), true).unwrap();
        assert_eq!(doc.root().find_text("location/url"), Some("http://hdl.example.org/1"));
    }
}

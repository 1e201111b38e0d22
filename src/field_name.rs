//! Field name generation for the search index.
//!
//! Role terms and display labels are free text such as `"Thesis Advisor"` or
//! `"Degree Name"`. The index wants camel-case keys, so `"Thesis Advisor"`
//! becomes `thesisAdvisor`.

/// Build a camel-case field name from a whitespace-separated phrase.
///
/// The first word is lowercased. Every following word is title-cased: a letter
/// that follows another letter is lowercased, any other letter is uppercased.
/// Words are joined without a separator. Empty or whitespace-only input yields
/// an empty string.
///
/// # Examples
///
/// ```
/// use modsmap::field_name::generate_field_name;
///
/// assert_eq!(generate_field_name("Creator"), "creator");
/// assert_eq!(generate_field_name("Thesis Advisor"), "thesisAdvisor");
/// assert_eq!(generate_field_name("DEGREE  grantor"), "degreeGrantor");
/// ```
#[must_use]
pub fn generate_field_name(text: &str) -> String {
    let mut words = text.split_whitespace();
    let mut field = match words.next() {
        Some(first) => first.to_lowercase(),
        None => return String::new(),
    };
    for word in words {
        field.push_str(&title_case(word));
    }
    field
}

fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut previous_is_letter = false;
    for c in word.chars() {
        if previous_is_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_is_letter = c.is_alphabetic();
    }
    out
}

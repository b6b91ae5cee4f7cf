//! Email address detection

use super::dedup_in_order;
use crate::pdf::Page;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // local-part@domain.tld, no semantic validation
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap();
}

/// Email-shaped substrings of `text`, in order of appearance
pub fn emails_in_text(text: &str) -> impl Iterator<Item = &str> {
    EMAIL_REGEX.find_iter(text).map(|m| m.as_str())
}

/// Unique email addresses on a page.
///
/// Page text is scanned first, then annotation contents and form field
/// values. Order is first occurrence across all sources.
pub fn extract_emails(page: &Page) -> Vec<String> {
    let from_text = emails_in_text(&page.text);

    let from_annotations = page
        .annotations
        .iter()
        .filter_map(|annotation| annotation.contents.as_deref())
        .flat_map(emails_in_text);

    let from_fields = page
        .form_fields
        .iter()
        .filter_map(|field| field.value.as_deref())
        .flat_map(emails_in_text);

    dedup_in_order(from_text.chain(from_annotations).chain(from_fields))
}

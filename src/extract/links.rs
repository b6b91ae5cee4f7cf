//! URL detection

use super::dedup_in_order;
use crate::pdf::Page;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Scheme, host made of word chars or percent-escapes, then an optional path
    static ref URL_REGEX: Regex =
        Regex::new(r"https?://(?:[-\w.]|(?:%[\da-fA-F]{2}))+[/\w .-]*/?").unwrap();
}

/// URL-shaped substrings of `text`, in order of appearance
pub fn links_in_text(text: &str) -> impl Iterator<Item = &str> {
    URL_REGEX.find_iter(text).map(|m| m.as_str())
}

/// Unique links on a page.
///
/// Order is page text, then each annotation (its action URI followed by
/// links in its contents), then form field values. The URI of a hyperlink
/// annotation is taken as-is; it is a typed field rather than free text and
/// may use schemes the text pattern does not cover.
pub fn extract_links(page: &Page) -> Vec<String> {
    let mut links: Vec<&str> = links_in_text(&page.text).collect();

    for annotation in &page.annotations {
        if annotation.is_link() {
            if let Some(uri) = annotation.action_uri() {
                links.push(uri);
            }
        }
        if let Some(contents) = annotation.contents.as_deref() {
            links.extend(links_in_text(contents));
        }
    }

    for value in page.form_fields.iter().filter_map(|f| f.value.as_deref()) {
        links.extend(links_in_text(value));
    }

    dedup_in_order(links)
}

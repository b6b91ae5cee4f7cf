//! Pattern-based extraction
//!
//! Deterministic detection of emails, links and tables across a page's text,
//! its annotations and its form fields. Every function here is pure: results
//! depend only on the [`Page`] passed in.

mod emails;
mod links;
mod tables;

pub use emails::{emails_in_text, extract_emails};
pub use links::{extract_links, links_in_text};
pub use tables::{
    extract_tables, is_table_like, tables_from_form_fields, tables_from_text, Table, TableSource,
    MIN_FORM_ROWS, WIDE_TOKEN_LEN,
};

use crate::pdf::Page;
use serde::Serialize;
use std::collections::HashSet;

/// Everything the pattern extractors found on one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub emails: Vec<String>,
    pub links: Vec<String>,
    pub tables: Vec<Table>,
}

/// Run all pattern extractors over a page
pub fn extract_page(page: &Page) -> ExtractionResult {
    ExtractionResult {
        emails: extract_emails(page),
        links: extract_links(page),
        tables: extract_tables(page),
    }
}

/// Drop repeated values, keeping the first occurrence of each
fn dedup_in_order<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for value in values {
        let value = value.into();
        if seen.insert(value.clone()) {
            unique.push(value);
        }
    }
    unique
}

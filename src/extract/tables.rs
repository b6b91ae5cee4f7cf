//! Table detection
//!
//! Two strategies run over a page:
//! - text heuristic: runs of "dense" lines in free text, split into cells on
//!   wide spacing
//! - form fields: tab-separated values of text fields, one row per field

use crate::pdf::{FormField, Page};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// A line is table-like only if some token is longer than this
pub const WIDE_TOKEN_LEN: usize = 20;

/// Fewer text-field rows than this are not considered a table
pub const MIN_FORM_ROWS: usize = 2;

lazy_static! {
    static ref CELL_SEPARATOR: Regex = Regex::new(r" {2,}").unwrap();
}

/// Strategy that produced a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableSource {
    TextHeuristic,
    FormField,
}

/// Detected table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Row-major cells
    pub data: Vec<Vec<String>>,
    pub row_count: usize,
    /// Cells in the first row
    pub column_count: usize,
    pub source: TableSource,
    /// Page number (1-indexed)
    pub page_number: u32,
}

impl Table {
    /// Build a table from its rows; `None` when there are no rows
    fn from_rows(data: Vec<Vec<String>>, source: TableSource) -> Option<Self> {
        let column_count = data.first()?.len();
        Some(Self {
            row_count: data.len(),
            column_count,
            data,
            source,
            page_number: 0,
        })
    }
}

/// Whether a line looks like a row of packed data
pub fn is_table_like(line: &str) -> bool {
    let mut tokens = 0;
    let mut has_wide_token = false;
    for token in line.split_whitespace() {
        tokens += 1;
        has_wide_token |= token.chars().count() > WIDE_TOKEN_LEN;
    }
    tokens > 1 && has_wide_token
}

/// Split a line on wide spacing, trimming cells and dropping empty ones
fn split_cells(line: &str) -> Vec<String> {
    CELL_SEPARATOR
        .split(line)
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

fn close_run(run: &mut Vec<&str>) -> Option<Table> {
    let rows: Vec<Vec<String>> = run
        .drain(..)
        .map(split_cells)
        .filter(|row| !row.is_empty())
        .collect();
    Table::from_rows(rows, TableSource::TextHeuristic)
}

/// Tables found in free text by the line heuristic
pub fn tables_from_text(text: &str) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut run = Vec::new();

    for line in text.lines() {
        if is_table_like(line) {
            run.push(line);
        } else {
            tables.extend(close_run(&mut run));
        }
    }
    // A run reaching the end of the text still counts
    tables.extend(close_run(&mut run));

    tables
}

/// Table formed by the tab-separated values of the page's text fields
pub fn tables_from_form_fields(fields: &[FormField]) -> Option<Table> {
    let rows: Vec<Vec<String>> = fields
        .iter()
        .filter(|field| field.is_text())
        .filter_map(|field| field.value.as_deref())
        .map(|value| {
            value
                .split('\t')
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect();

    if rows.len() < MIN_FORM_ROWS {
        return None;
    }
    Table::from_rows(rows, TableSource::FormField)
}

/// All tables on a page, stamped with the page number.
///
/// Page text is scanned first, then annotation contents, then form fields.
pub fn extract_tables(page: &Page) -> Vec<Table> {
    let mut tables = tables_from_text(&page.text);

    for contents in page
        .annotations
        .iter()
        .filter_map(|annotation| annotation.contents.as_deref())
    {
        tables.extend(tables_from_text(contents));
    }

    tables.extend(tables_from_form_fields(&page.form_fields));

    for table in &mut tables {
        table.page_number = page.index;
    }

    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::Annotation;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const WIDE_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaa";
    const WIDE_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbb";

    fn text_field(value: &str) -> FormField {
        FormField {
            field_type: "text".to_string(),
            value: Some(value.to_string()),
        }
    }

    fn cells(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[rstest]
    #[case(21, true)]
    // exactly WIDE_TOKEN_LEN characters is not wide enough
    #[case(20, false)]
    fn test_wide_token_threshold(#[case] width: usize, #[case] expected: bool) {
        let line = format!("{} b", "a".repeat(width));
        assert_eq!(is_table_like(&line), expected);
    }

    #[rstest]
    // a single token is never a row, however wide
    #[case("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")]
    #[case("short words only here")]
    #[case("")]
    fn test_not_table_like(#[case] line: &str) {
        assert!(!is_table_like(line));
    }

    #[test]
    fn test_wide_token_counts_characters() {
        // 21 characters, 42 bytes
        let line = format!("{} x", "é".repeat(21));
        assert!(is_table_like(&line));
        let line = format!("{} x", "é".repeat(20));
        assert!(!is_table_like(&line));
    }

    #[test]
    fn test_two_dense_lines_then_short_line() {
        let line = format!("{WIDE_A}  {WIDE_B}");
        let text = format!("{line}\n{line}\nshort");

        let tables = tables_from_text(&text);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].row_count, 2);
        assert_eq!(tables[0].column_count, 2);
        assert_eq!(tables[0].source, TableSource::TextHeuristic);
        assert_eq!(tables[0].data, cells(&[&[WIDE_A, WIDE_B], &[WIDE_A, WIDE_B]]));
    }

    #[test]
    fn test_run_at_end_of_text_is_emitted() {
        let text = format!("intro\n{WIDE_A}  x    y");
        let tables = tables_from_text(&text);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].data, cells(&[&[WIDE_A, "x", "y"]]));
        assert_eq!(tables[0].column_count, 3);
    }

    #[test]
    fn test_single_spaces_do_not_split_cells() {
        let text = format!("  {WIDE_A} one   two three  ");
        let first = format!("{WIDE_A} one");
        let tables = tables_from_text(&text);
        assert_eq!(tables[0].data, cells(&[&[first.as_str(), "two three"]]));
    }

    #[test]
    fn test_separate_runs_make_separate_tables() {
        let text = format!("{WIDE_A}  1\n\n{WIDE_B}  2\n{WIDE_B}  3  4");
        let tables = tables_from_text(&text);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].row_count, 1);
        assert_eq!(tables[1].row_count, 2);
        // column count follows the first row
        assert_eq!(tables[1].column_count, 2);
    }

    #[test]
    fn test_no_tables_in_plain_prose() {
        assert!(tables_from_text("Dear reader,\nthis is a letter.\n").is_empty());
        assert!(tables_from_text("").is_empty());
    }

    #[test]
    fn test_form_fields_make_one_table() {
        let fields = vec![text_field("a\tb"), text_field("c\td"), text_field("e")];
        let table = tables_from_form_fields(&fields).unwrap();
        assert_eq!(table.source, TableSource::FormField);
        assert_eq!(table.data, cells(&[&["a", "b"], &["c", "d"], &["e"]]));
        assert_eq!(table.row_count, 3);
        assert_eq!(table.column_count, 2);
    }

    #[test]
    fn test_form_fields_drop_empty_rows_and_cells() {
        let fields = vec![
            text_field(" a \t\t b "),
            text_field(" \t "),
            FormField {
                field_type: "text".to_string(),
                value: None,
            },
            FormField {
                field_type: "combo_box".to_string(),
                value: Some("x\ty".to_string()),
            },
            text_field("c"),
        ];
        let table = tables_from_form_fields(&fields).unwrap();
        assert_eq!(table.data, cells(&[&["a", "b"], &["c"]]));
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![text_field("only\trow")])]
    #[case(vec![text_field("only\trow"), text_field("\t")])]
    fn test_single_form_row_is_not_a_table(#[case] fields: Vec<FormField>) {
        assert!(tables_from_form_fields(&fields).is_none());
    }

    #[test]
    fn test_extract_tables_stamps_page_number() {
        let line = format!("{WIDE_A}  {WIDE_B}");
        let page = Page {
            index: 4,
            text: line.clone(),
            annotations: vec![Annotation {
                contents: Some(format!("{line}\n{line}")),
                ..Annotation::default()
            }],
            form_fields: vec![text_field("a\tb"), text_field("c\td")],
        };

        let tables = extract_tables(&page);
        assert_eq!(tables.len(), 3);
        assert!(tables.iter().all(|t| t.page_number == 4));
        assert_eq!(tables[0].row_count, 1);
        assert_eq!(tables[1].row_count, 2);
        assert_eq!(tables[2].source, TableSource::FormField);
    }

    #[test]
    fn test_table_json_shape() {
        let mut table =
            Table::from_rows(cells(&[&["a", "b"]]), TableSource::TextHeuristic).unwrap();
        table.page_number = 1;
        assert_eq!(
            serde_json::to_value(&table).unwrap(),
            serde_json::json!({
                "data": [["a", "b"]],
                "row_count": 1,
                "column_count": 2,
                "source": "text-heuristic",
                "page_number": 1
            })
        );
        assert!(Table::from_rows(vec![], TableSource::FormField).is_none());
    }
}

//! PDF processing layer
//!
//! Decodes documents with PDFium into owned page records and resolves the
//! page ranges requested by callers.

mod range;
mod reader;

pub use range::{parse_page_range, PageRange};
pub use reader::{
    check_pdf_header, Annotation, AnnotationAction, DocumentLoader, FormField, Page, PdfReader,
    PdfiumLoader, LINK_SUBTYPE, TEXT_FIELD_TYPE,
};

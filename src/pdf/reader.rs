//! PDF reader wrapper for PDFium

use crate::error::{Error, Result};
use pdfium_render::prelude::*;

/// Annotation subtype tag PDFium reports for hyperlink annotations
pub const LINK_SUBTYPE: &str = "link";

/// Form field type tag for plain text fields
pub const TEXT_FIELD_TYPE: &str = "text";

/// Action attached to an annotation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationAction {
    /// Target URI for URI actions
    pub uri: Option<String>,
}

/// Annotation attached to a page (comment, hyperlink, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    /// Text content (comment, note)
    pub contents: Option<String>,
    /// Annotation subtype (e.g., "link", "text", "highlight")
    pub subtype: Option<String>,
    /// Action triggered by the annotation
    pub action: Option<AnnotationAction>,
}

impl Annotation {
    /// Whether this is a hyperlink annotation
    pub fn is_link(&self) -> bool {
        self.subtype.as_deref() == Some(LINK_SUBTYPE)
    }

    /// URI of the annotation's action, if any
    pub fn action_uri(&self) -> Option<&str> {
        self.action.as_ref()?.uri.as_deref()
    }
}

/// Interactive form field found on a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormField {
    /// Field type (e.g., "text", "checkbox", "radio_button", "combo_box", "list_box", "push_button", "signature", "unknown")
    pub field_type: String,
    /// Current value (text fields, selected combo box or list box option)
    pub value: Option<String>,
}

impl FormField {
    /// Whether this is a plain text field
    pub fn is_text(&self) -> bool {
        self.field_type == TEXT_FIELD_TYPE
    }
}

/// A decoded page, owned independently of the PDFium document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Page number (1-indexed)
    pub index: u32,
    /// Plain text content
    pub text: String,
    pub annotations: Vec<Annotation>,
    pub form_fields: Vec<FormField>,
}

impl Page {
    pub fn new(index: u32, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Turns raw document bytes into decoded pages.
///
/// Implementations are called from the blocking thread pool.
pub trait DocumentLoader: Send + Sync {
    fn load(&self, data: &[u8]) -> Result<Vec<Page>>;
}

/// [`DocumentLoader`] backed by PDFium
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfiumLoader;

impl DocumentLoader for PdfiumLoader {
    fn load(&self, data: &[u8]) -> Result<Vec<Page>> {
        PdfReader::open_bytes(data).map(PdfReader::into_pages)
    }
}

/// Get PDFium instance (creates new instance each time - PDFium is not thread-safe)
fn create_pdfium() -> Result<Pdfium> {
    // Try to bind to a bundled library first, then the system one
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "/opt/pdfium/lib",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Error::Pdfium {
            reason: format!("Failed to initialize PDFium: {}", e),
        })?;

    Ok(Pdfium::new(bindings))
}

/// Reject data that does not start with a PDF header
pub fn check_pdf_header(data: &[u8]) -> Result<()> {
    if data.len() < 4 || &data[0..4] != b"%PDF" {
        return Err(Error::InvalidPdf {
            reason: "Not a valid PDF file".to_string(),
        });
    }
    Ok(())
}

/// PDF reader using PDFium
pub struct PdfReader {
    pages: Vec<Page>,
}

impl PdfReader {
    /// Open a PDF from bytes, decoding every page upfront
    pub fn open_bytes(data: &[u8]) -> Result<Self> {
        check_pdf_header(data)?;

        let pdfium = create_pdfium()?;
        let document = pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(Self::map_pdfium_error)?;

        let pages = Self::extract_pages(&document)?;
        tracing::debug!(page_count = pages.len(), "Decoded PDF document");

        Ok(Self { pages })
    }

    fn extract_pages(document: &PdfDocument) -> Result<Vec<Page>> {
        let pages = document.pages();
        let mut decoded = Vec::with_capacity(pages.len() as usize);

        for index in 0..pages.len() {
            let page = pages.get(index).map_err(|e| Error::Pdfium {
                reason: format!("Failed to get page {}: {}", index + 1, e),
            })?;

            // Pages without a text layer read as empty
            let text = page.text().map(|t| t.all()).unwrap_or_default();
            let (annotations, form_fields) = Self::extract_annotations(&page);

            decoded.push(Page {
                index: index as u32 + 1,
                text,
                annotations,
                form_fields,
            });
        }

        Ok(decoded)
    }

    /// Split the page's annotations into plain annotations and form field widgets
    fn extract_annotations(page: &PdfPage) -> (Vec<Annotation>, Vec<FormField>) {
        let mut annotations = Vec::new();
        let mut form_fields = Vec::new();

        for annotation in page.annotations().iter() {
            if let Some(field) = annotation.as_form_field() {
                form_fields.push(Self::convert_form_field(field));
                continue;
            }

            let ann_type = annotation.annotation_type();

            // Popups repeat the contents of their parent annotation
            if ann_type == PdfPageAnnotationType::Popup {
                continue;
            }

            let subtype = match ann_type {
                PdfPageAnnotationType::Unknown => None,
                other => Some(format!("{:?}", other).to_lowercase()),
            };

            let action = annotation
                .as_link_annotation()
                .and_then(|link_annotation| link_annotation.link().ok())
                .and_then(|link| link.action())
                .map(|action| AnnotationAction {
                    uri: action
                        .as_uri_action()
                        .and_then(|uri_action| uri_action.uri().ok()),
                });

            annotations.push(Annotation {
                contents: annotation.contents().filter(|s| !s.is_empty()),
                subtype,
                action,
            });
        }

        (annotations, form_fields)
    }

    /// Choice fields report the label of their selected option as the value
    fn convert_form_field(field: &PdfFormField) -> FormField {
        let (field_type, value) = if let Some(text_field) = field.as_text_field() {
            (TEXT_FIELD_TYPE, text_field.value())
        } else if field.as_checkbox_field().is_some() {
            ("checkbox", None)
        } else if field.as_radio_button_field().is_some() {
            ("radio_button", None)
        } else if let Some(combo) = field.as_combo_box_field() {
            ("combo_box", combo.value())
        } else if let Some(list) = field.as_list_box_field() {
            ("list_box", list.value())
        } else if field.as_push_button_field().is_some() {
            ("push_button", None)
        } else if field.as_signature_field().is_some() {
            ("signature", None)
        } else {
            ("unknown", None)
        };

        FormField {
            field_type: field_type.to_string(),
            value,
        }
    }

    /// Map PDFium errors to our error type
    fn map_pdfium_error(err: PdfiumError) -> Error {
        match err {
            PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
                Error::InvalidPdf {
                    reason: "PDF is password protected".to_string(),
                }
            }
            _ => Error::Pdfium {
                reason: format!("{}", err),
            },
        }
    }

    /// Decoded pages in document order
    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}

//! PDF Extraction Server Library
//!
//! This crate turns uploaded PDFs into structured JSON:
//! - `extract`: pattern-based detection of emails, links and tables per page
//! - `gemini`: the same extraction delegated to a Gemini model
//! - `pdf`: PDFium-backed page decoding and page range selection
//! - `server`: the axum HTTP surface tying them together

pub mod config;
pub mod error;
pub mod extract;
pub mod gemini;
pub mod pdf;
pub mod server;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use server::{
    create_router, process_parse_pdf, process_parse_pdf_gemini, run_server, AppState,
    ParsePdfGeminiResponse, ParsePdfResponse, Upload,
};

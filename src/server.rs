//! HTTP server implementation using axum
//!
//! Endpoints:
//! - `GET /` - usage message
//! - `POST /parse-pdf/` - page text plus pattern-extracted emails, links and tables
//! - `POST /parse-pdf-gemini/?page_range=all|start-end` - page text plus
//!   Gemini-extracted emails, links and tables

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::extract::{extract_page, ExtractionResult};
use crate::gemini::{GeminiClient, GeminiExtraction, SemanticExtractor};
use crate::pdf::{parse_page_range, DocumentLoader, Page, PageRange, PdfiumLoader};
use axum::{
    extract::{
        multipart::MultipartRejection, rejection::QueryRejection, DefaultBodyLimit, Multipart,
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

const WELCOME_MESSAGE: &str = "Welcome to PDF Parser API. Use POST /parse-pdf/ to upload and parse PDF files, or POST /parse-pdf-gemini/?page_range=1-3 to extract with Gemini.";

/// Shared handles used by every request
#[derive(Clone)]
pub struct AppState {
    loader: Arc<dyn DocumentLoader>,
    extractor: Arc<dyn SemanticExtractor>,
}

impl AppState {
    pub fn new(loader: Arc<dyn DocumentLoader>, extractor: Arc<dyn SemanticExtractor>) -> Self {
        Self { loader, extractor }
    }

    /// PDFium decoding backed by the given Gemini client
    pub fn with_gemini(client: GeminiClient) -> Self {
        Self::new(Arc::new(PdfiumLoader), Arc::new(client))
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

/// Uploaded document
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiParams {
    /// "all" or "start-end" (1-indexed, inclusive)
    #[serde(default = "default_page_range")]
    pub page_range: String,
}

fn default_page_range() -> String {
    "all".to_string()
}

#[derive(Debug, Serialize)]
pub struct PageContent {
    pub page_number: u32,
    pub content: String,
    pub metadata: ExtractionResult,
}

#[derive(Debug, Serialize)]
pub struct ParsePdfResponse {
    pub filename: Option<String>,
    pub total_pages: usize,
    pub pages: Vec<PageContent>,
}

#[derive(Debug, Serialize)]
pub struct GeminiPageContent {
    pub page_number: u32,
    pub content: String,
    #[serde(flatten)]
    pub extraction: GeminiExtraction,
}

#[derive(Debug, Serialize)]
pub struct ParsePdfGeminiResponse {
    pub filename: Option<String>,
    pub total_pages: usize,
    pub processed_pages: usize,
    pub pages: Vec<GeminiPageContent>,
}

/// Error envelope returned to clients: `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn parse_pdf(err: Error) -> Self {
        tracing::warn!(error = %err, "parse_pdf failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Error processing PDF: {}", err),
        }
    }

    fn parse_pdf_gemini(err: Error) -> Self {
        tracing::warn!(error = %err, "parse_pdf_gemini failed");
        if err.is_client_error() {
            Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            }
        } else {
            Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("Error processing PDF with Gemini: {}", err),
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ============================================================================
// Router and handlers
// ============================================================================

/// Build the application router
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/parse-pdf/", post(parse_pdf))
        .route("/parse-pdf-gemini/", post(parse_pdf_gemini))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": WELCOME_MESSAGE }))
}

async fn parse_pdf(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> std::result::Result<Json<ParsePdfResponse>, ApiError> {
    let upload = read_upload(multipart).await.map_err(ApiError::parse_pdf)?;
    process_parse_pdf(state.loader.clone(), upload)
        .await
        .map(Json)
        .map_err(ApiError::parse_pdf)
}

async fn parse_pdf_gemini(
    State(state): State<AppState>,
    query: std::result::Result<Query<GeminiParams>, QueryRejection>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> std::result::Result<Json<ParsePdfGeminiResponse>, ApiError> {
    // Reject a bad range before touching the upload
    let range = page_range_from_query(query).map_err(ApiError::parse_pdf_gemini)?;
    let upload = read_upload(multipart)
        .await
        .map_err(ApiError::parse_pdf_gemini)?;
    process_parse_pdf_gemini(state.loader.clone(), state.extractor.as_ref(), upload, range)
        .await
        .map(Json)
        .map_err(ApiError::parse_pdf_gemini)
}

/// Parse `page_range`, treating an unreadable query string as a malformed range
fn page_range_from_query(
    query: std::result::Result<Query<GeminiParams>, QueryRejection>,
) -> Result<PageRange> {
    let Query(params) = query.map_err(|e| Error::InvalidPageRange {
        range: e.body_text(),
    })?;
    parse_page_range(&params.page_range)
}

/// Take the first file field of a multipart body
pub async fn read_upload(
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Upload> {
    let mut multipart = multipart.map_err(|e| Error::Multipart {
        reason: e.body_text(),
    })?;

    while let Some(field) = multipart.next_field().await.map_err(|e| Error::Multipart {
        reason: e.body_text(),
    })? {
        if field.file_name().is_none() && field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let data = field.bytes().await.map_err(|e| Error::Multipart {
            reason: e.body_text(),
        })?;

        return Ok(Upload {
            filename,
            data: data.to_vec(),
        });
    }

    Err(Error::MissingUpload)
}

// ============================================================================
// Request processing
// ============================================================================

/// Decode every page and run the pattern extractors over each one
pub async fn process_parse_pdf(
    loader: Arc<dyn DocumentLoader>,
    upload: Upload,
) -> Result<ParsePdfResponse> {
    let Upload { filename, data } = upload;

    // Move CPU-heavy PDF work to blocking thread pool
    let pages = tokio::task::spawn_blocking(move || {
        let pages = loader.load(&data)?;
        let contents: Vec<PageContent> = pages
            .into_iter()
            .map(|page| PageContent {
                page_number: page.index,
                metadata: extract_page(&page),
                content: page.text,
            })
            .collect();
        Ok::<_, Error>(contents)
    })
    .await??;

    tracing::info!(
        filename = filename.as_deref().unwrap_or("<unnamed>"),
        total_pages = pages.len(),
        "Parsed PDF"
    );

    Ok(ParsePdfResponse {
        filename,
        total_pages: pages.len(),
        pages,
    })
}

/// Decode the document and send each page in `range` to the semantic extractor
pub async fn process_parse_pdf_gemini(
    loader: Arc<dyn DocumentLoader>,
    extractor: &dyn SemanticExtractor,
    upload: Upload,
    range: PageRange,
) -> Result<ParsePdfGeminiResponse> {
    let Upload { filename, data } = upload;

    let pages: Vec<Page> = tokio::task::spawn_blocking(move || loader.load(&data)).await??;
    let total_pages = pages.len();
    let selected = range.resolve(total_pages);

    tracing::debug!(
        total_pages,
        first = selected.start,
        end = selected.end,
        "Resolved page range"
    );

    let mut results = Vec::with_capacity(selected.len());
    for page in pages.into_iter().skip(selected.start).take(selected.len()) {
        let extraction = extractor.extract(&page.text).await?;
        results.push(GeminiPageContent {
            page_number: page.index,
            content: page.text,
            extraction,
        });
    }

    tracing::info!(
        filename = filename.as_deref().unwrap_or("<unnamed>"),
        total_pages,
        processed_pages = results.len(),
        "Parsed PDF with Gemini"
    );

    Ok(ParsePdfGeminiResponse {
        filename,
        total_pages,
        processed_pages: results.len(),
        pages: results,
    })
}

/// Run the HTTP server until it fails
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let client = GeminiClient::new(config.gemini.clone());
    let model = client.model().to_string();
    let router = create_router(AppState::with_gemini(client), config.max_upload_bytes);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, model = %model, "PDF extraction server listening");

    axum::serve(listener, router).await?;

    Ok(())
}

//! Gemini-backed semantic extraction
//!
//! Sends page text to the Gemini `generateContent` endpoint with a fixed
//! response schema and parses the JSON the model returns. Errors from the
//! service and malformed model output are returned as-is; there is no retry.

mod types;

pub use types::{GeminiExtraction, GeminiTable};

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const SYSTEM_INSTRUCTION: &str =
    "You are an AI assistant which helps in extracting structured information from PDF files";

/// Extracts structured content from a page of text
#[async_trait]
pub trait SemanticExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<GeminiExtraction>;
}

/// Connection settings for the Gemini API
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Gemini REST client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: Client,
    config: GeminiConfig,
    response_schema: serde_json::Value,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http_client: Client::new(),
            config,
            response_schema: response_schema(),
        }
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Ask the model for emails, links and tables found in `text`
    pub async fn extract_with_gemini(&self, text: &str) -> Result<GeminiExtraction> {
        let prompt = build_prompt(text);
        let request = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: self.response_schema.clone(),
            },
        };

        tracing::debug!(
            model = %self.config.model,
            text_len = text.len(),
            "Sending page to Gemini"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Gemini {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        parse_response(&body)
    }
}

#[async_trait]
impl SemanticExtractor for GeminiClient {
    async fn extract(&self, text: &str) -> Result<GeminiExtraction> {
        self.extract_with_gemini(text).await
    }
}

fn parse_response(body: &GenerateContentResponse) -> Result<GeminiExtraction> {
    let text = body.text().ok_or(Error::GeminiResponse)?;
    Ok(serde_json::from_str(&text)?)
}

/// Instructional prompt wrapping one page of text
pub fn build_prompt(text: &str) -> String {
    format!(
        r#"
Analyze the following text and extract, in JSON format:
1. Email addresses
2. URLs/links
3. Tables (if any), each with a header row and data rows

Text to analyze:
{text}

Return the response in this exact JSON format:
{{
    "emails": ["email1@example.com", "email2@example.com"],
    "links": ["https://example1.com", "https://example2.com"],
    "tables": [
        {{
            "header": ["header1", "header2"],
            "rows": [["content1", "content2"], ["content3", "content4"]]
        }}
    ]
}}
"#
    )
}

/// Response schema the model output is constrained to
pub fn response_schema() -> serde_json::Value {
    let strings = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    json!({
        "type": "OBJECT",
        "properties": {
            "emails": strings,
            "links": strings,
            "tables": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "header": strings,
                        "rows": { "type": "ARRAY", "items": strings },
                    },
                },
            },
        },
    })
}

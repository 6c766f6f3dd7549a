use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::Date;

use super::dto::{ExtractedItem, StockEntry};
use super::AiModel;
use crate::error::{Error, Result};
use crate::profile::TransportMode;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
// Vision-capable model for receipt photos, plain flash for text prompts.
const VISION_MODEL: &str = "gemini-2.5-flash-image";
const TEXT_MODEL: &str = "gemini-2.5-flash";

const RECEIPT_INSTRUCTION: &str = "Analyze this image (receipt or product). Return a JSON \
array of products identified. Each object must have: name (string), quantity (number), \
expiry_date (string YYYY-MM-DD, estimate 1 week from now if not visible), category (string).";

const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    time::macros::format_description!("[year]-[month]-[day]");

pub struct Gemini {
    http: reqwest::Client,
    api_key: String,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

    /// One generateContent round trip; returns the first candidate's text.
    async fn generate(
        &self,
        model: &str,
        parts: Vec<Part>,
        response_schema: serde_json::Value,
    ) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema,
            },
        };
        let resp = self
            .http
            .post(format!("{BASE_URL}/models/{model}:generateContent"))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Service {
                status: status.as_u16(),
                message,
            });
        }
        let body: GenerateResponse = resp.json().await?;
        first_text(body)
    }
}

#[async_trait]
impl AiModel for Gemini {
    async fn extract_receipt_items(
        &self,
        image: Bytes,
        content_type: &str,
    ) -> Result<Vec<ExtractedItem>> {
        let parts = vec![
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: content_type.to_string(),
                    data: BASE64.encode(&image),
                },
            },
            Part::Text {
                text: RECEIPT_INSTRUCTION.to_string(),
            },
        ];
        let text = self
            .generate(VISION_MODEL, parts, receipt_schema())
            .await?;
        parse_extracted_items(&text)
    }

    async fn suggest_purchases(
        &self,
        stock: &[StockEntry],
        mode: TransportMode,
    ) -> Result<Vec<String>> {
        let parts = vec![Part::Text {
            text: suggestion_prompt(stock, mode),
        }];
        let text = self.generate(TEXT_MODEL, parts, suggestion_schema()).await?;
        parse_suggestion_names(&text)
    }
}

// --- wire types ---

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// What the model actually emits inside the JSON text; normalized before use
/// because quantities come back as numbers of either kind and dates as text.
#[derive(Debug, Deserialize)]
struct RawExtractedItem {
    name: String,
    quantity: Option<f64>,
    expiry_date: Option<String>,
    category: Option<String>,
}

fn receipt_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "quantity": { "type": "NUMBER" },
                "expiry_date": { "type": "STRING" },
                "category": { "type": "STRING" }
            }
        }
    })
}

fn suggestion_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": { "type": "STRING" }
    })
}

fn suggestion_prompt(stock: &[StockEntry], mode: TransportMode) -> String {
    let inventory_list = stock
        .iter()
        .map(|e| format!("{} ({})", e.name, e.quantity))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Current Inventory: {inventory_list}.\n\
         Transport Mode: {mode}.\n\n\
         Suggest 5 items to buy. Consider the transport mode (e.g., if 'bike' or 'walk', \
         avoid heavy items like large water packs unless necessary).\n\
         Return ONLY a JSON array of strings (product names).",
        mode = mode.as_str()
    )
}

fn first_text(resp: GenerateResponse) -> Result<String> {
    resp.candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .find_map(|p| p.text)
        .ok_or_else(|| Error::MalformedModelResponse("no text candidate in response".into()))
}

fn parse_extracted_items(text: &str) -> Result<Vec<ExtractedItem>> {
    let raw: Vec<RawExtractedItem> = serde_json::from_str(text)
        .map_err(|e| Error::MalformedModelResponse(format!("expected array of objects: {e}")))?;
    Ok(raw.into_iter().map(normalize).collect())
}

fn parse_suggestion_names(text: &str) -> Result<Vec<String>> {
    serde_json::from_str(text)
        .map_err(|e| Error::MalformedModelResponse(format!("expected array of strings: {e}")))
}

fn normalize(raw: RawExtractedItem) -> ExtractedItem {
    let quantity = match raw.quantity {
        Some(q) if q >= 1.0 => q.round() as i64,
        _ => 1,
    };
    let expiry_date = raw
        .expiry_date
        .as_deref()
        .and_then(|s| Date::parse(s, DATE_FORMAT).ok());
    ExtractedItem {
        name: raw.name,
        quantity,
        expiry_date,
        category: raw.category,
    }
}

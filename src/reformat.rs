//! Optional AI cleanup of messy text into Markdown.
//!
//! Not part of the rendering path. One-shot exports call it when asked to,
//! and fall back to the raw text if the provider fails.

use serde::{Deserialize, Serialize};

/// Model used by [`GeminiReformatter`].
pub const GEMINI_MODEL: &str = "gemini-2.5-flash";

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const TIMEOUT_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum ReformatError {
    #[error("no API key: set GEMINI_API_KEY or API_KEY")]
    MissingKey,
    #[error("request failed: {0}")]
    Transport(#[from] minreq::Error),
    #[error("provider returned HTTP {status}: {body}")]
    Provider { status: i32, body: String },
}

/// Turns raw text into clean Markdown.
pub trait Reformatter {
    /// # Errors
    /// Any provider or transport failure. The caller decides the fallback.
    fn reformat(&self, raw: &str) -> Result<String, ReformatError>;
}

/// The instruction sent to the model, with `raw` appended.
pub fn build_prompt(raw: &str) -> String {
    format!(
        "You are an expert Markdown formatter.
Take the following raw text, which may be messy, unorganized, or lack proper Markdown syntax,
and convert it into clean, well-structured, professional Github-flavored Markdown.

Rules:
1. Fix indentation and spacing.
2. Format code blocks with correct language tags if detected.
3. Format tables properly.
4. Use headers (H1, H2, H3) to structure the content logically.
5. Fix lists (bullet/numbered).
6. Do NOT add any preamble or \"Here is the markdown\" text. ONLY return the markdown content.

Raw Text:
{raw}"
    )
}

/// Reformat `raw`, returning it unchanged when the reformatter fails.
pub fn reformat_or_original(reformatter: &dyn Reformatter, raw: &str) -> String {
    match reformatter.reformat(raw) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(error = %err, "reformat failed, keeping original text");
            raw.to_string()
        }
    }
}

/// Google Gemini over its REST API.
#[derive(Debug, Clone)]
pub struct GeminiReformatter {
    api_key: String,
    model: String,
}

impl GeminiReformatter {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: GEMINI_MODEL.to_string(),
        }
    }

    /// Build from `GEMINI_API_KEY`, falling back to `API_KEY`.
    ///
    /// # Errors
    /// [`ReformatError::MissingKey`] when neither variable is set.
    pub fn from_env() -> Result<Self, ReformatError> {
        key_from(|name| std::env::var(name).ok()).map(Self::new)
    }
}

fn key_from(lookup: impl Fn(&str) -> Option<String>) -> Result<String, ReformatError> {
    ["GEMINI_API_KEY", "API_KEY"]
        .into_iter()
        .filter_map(lookup)
        .find(|key| !key.trim().is_empty())
        .ok_or(ReformatError::MissingKey)
}

impl Reformatter for GeminiReformatter {
    fn reformat(&self, raw: &str) -> Result<String, ReformatError> {
        let _span = tracing::info_span!("reformat.gemini", model = %self.model).entered();
        let url = format!("{GEMINI_ENDPOINT}/{}:generateContent", self.model);
        let response = minreq::post(url)
            .with_header("x-goog-api-key", &self.api_key)
            .with_json(&request_body(raw))?
            .with_timeout(TIMEOUT_SECS)
            .send()?;
        if !(200..300).contains(&response.status_code) {
            return Err(ReformatError::Provider {
                status: response.status_code,
                body: response.as_str().unwrap_or_default().to_string(),
            });
        }
        let parsed: GenerateResponse = response.json()?;
        Ok(reply_or_raw(&parsed, raw))
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

fn request_body(raw: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: build_prompt(raw),
            }],
        }],
    }
}

/// The model's text, or `raw` when the reply is empty.
fn reply_or_raw(response: &GenerateResponse, raw: &str) -> String {
    let text: String = response
        .candidates
        .first()
        .map(|candidate| {
            candidate
                .content
                .parts
                .iter()
                .map(|part| part.text.as_str())
                .collect()
        })
        .unwrap_or_default();
    if text.is_empty() { raw.to_string() } else { text }
}

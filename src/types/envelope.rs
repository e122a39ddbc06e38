//! `generateContent` envelopes.
//!
//! Request: `{"contents":[{"parts":[{"text":"..."}]}]}`.
//! Response: `candidates[0].content.parts[0].text`.
//!
//! Response fields are all optional at the serde level so that a missing field surfaces as a
//! [`Error::MalformedResponse`] naming that field, instead of a generic decode error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::error::Category;

const ROOT_FIELD: &str = "$";

/// Outbound request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

impl GenerateContentRequest {
    /// Wrap the whole prompt in a single content block with a single text part.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.into(),
                }],
            }],
        }
    }
}

/// Inbound response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<CandidateContent>,
    #[serde(
        rename = "finishReason",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<ResponsePart>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Convenience constructor for a single-candidate, single-part response.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            candidates: Some(vec![Candidate {
                content: Some(CandidateContent {
                    parts: Some(vec![ResponsePart {
                        text: Some(text.into()),
                    }]),
                    role: Some("model".to_string()),
                }),
                finish_reason: None,
            }]),
        }
    }
}

/// Decode a response body.
///
/// Bodies that are not JSON are reported against the root (`$`). A JSON body whose field has
/// the wrong type is reported against that field, e.g. `candidates[0].content.parts`.
pub fn parse_response(body: &str) -> Result<GenerateContentResponse> {
    let mut de = serde_json::Deserializer::from_str(body);
    let response = serde_path_to_error::deserialize(&mut de).map_err(|e| {
        let field = match e.inner().classify() {
            Category::Data if e.path().iter().next().is_some() => e.path().to_string(),
            _ => ROOT_FIELD.to_string(),
        };
        Error::malformed(
            field,
            format!("body is not a generateContent envelope: {}", e.inner()),
        )
    })?;
    de.end().map_err(|e| {
        Error::malformed(ROOT_FIELD, format!("trailing data after envelope: {}", e))
    })?;
    Ok(response)
}

/// Pull `candidates[0].content.parts[0].text` out of a decoded response.
///
/// Checks run in order and each reports the first field that is missing or empty.
/// The text is returned exactly as received.
pub fn extract_interpretation_text(response: &GenerateContentResponse) -> Result<&str> {
    let candidates = response
        .candidates
        .as_deref()
        .ok_or_else(|| Error::malformed("candidates", "response has no candidates field"))?;
    let first = candidates
        .first()
        .ok_or_else(|| Error::malformed("candidates", "candidates list is empty"))?;

    let content = first.content.as_ref().ok_or_else(|| {
        Error::malformed(
            "candidates[0].content",
            "first candidate has no content field",
        )
    })?;

    let parts = content.parts.as_deref().ok_or_else(|| {
        Error::malformed(
            "candidates[0].content.parts",
            "candidate content has no parts field",
        )
    })?;
    let part = parts.first().ok_or_else(|| {
        Error::malformed(
            "candidates[0].content.parts",
            "candidate content parts list is empty",
        )
    })?;

    part.text.as_deref().ok_or_else(|| {
        Error::malformed(
            "candidates[0].content.parts[0].text",
            "first part has no text field",
        )
    })
}

//! HTML extraction modules
//!
//! - `selector_extractor`: records from a CSS selector and an extraction mode
//! - `class_scanner`: ranked image-class selector candidates
//! - `dom`: element helpers shared by both

mod class_scanner;
mod dom;
mod selector_extractor;

pub use class_scanner::*;
pub use dom::*;
pub use selector_extractor::*;

use serde::{Deserialize, Serialize};

/// Default record cap when a request omits `limit`
pub const DEFAULT_LIMIT: usize = 10;

/// How a matched element is turned into a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExtractionMode {
    /// Text, first link and first image of each match
    #[default]
    Auto,
    /// First `<a>` of each match
    Links,
    /// First `<img>` of each match
    Images,
    /// Visible text of each match, one record per match
    Text,
}

/// Extraction request from the host
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRequest {
    /// Raw markup; the FFI passes it out of band
    #[serde(default)]
    pub html: String,
    /// CSS selector; blank means the mode's default
    #[serde(default)]
    pub selector: String,
    #[serde(default)]
    pub mode: ExtractionMode,
    /// Maximum number of records to emit
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Opt in to data-src/srcset fallback when `src` is empty or a placeholder
    #[serde(default)]
    pub resolve_lazy_images: bool,
}

impl ExtractionRequest {
    pub fn new(html: impl Into<String>, selector: impl Into<String>, mode: ExtractionMode, limit: usize) -> Self {
        Self {
            html: html.into(),
            selector: selector.into(),
            mode,
            limit,
            resolve_lazy_images: false,
        }
    }
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// One extracted record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// 1-based emission index
    pub id: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

/// Extraction result returned to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub items: Vec<ExtractedRecord>,
    /// Elements matched by the selector, before the limit
    pub total_found: usize,
    /// Echo of the request limit
    pub requested: usize,
    pub message: String,
}

impl ExtractionResult {
    /// Result with no records and an explanatory message
    pub fn empty(requested: usize, message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            total_found: 0,
            requested,
            message: message.into(),
        }
    }
}

/// Which element carried the class a candidate was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    /// Class on the `<img>` itself: `img.<class>`
    Img,
    /// Class on the image's parent: `.<class> img`
    Parent,
}

/// Scanner-proposed selector ranked by frequency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSelector {
    pub selector: String,
    pub count: usize,
    #[serde(rename = "type")]
    pub kind: CandidateKind,
    /// Image source from one matching occurrence
    pub example: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: ExtractionRequest = serde_json::from_str(r#"{"html": "<p>x</p>"}"#).unwrap();
        assert_eq!(request.selector, "");
        assert_eq!(request.mode, ExtractionMode::Auto);
        assert_eq!(request.limit, DEFAULT_LIMIT);
        assert!(!request.resolve_lazy_images);

        let request: ExtractionRequest = serde_json::from_str(
            r#"{"selector": "img", "mode": "IMAGES", "limit": 3, "resolveLazyImages": true}"#,
        )
        .unwrap();
        assert_eq!(request.html, "");
        assert_eq!(request.mode, ExtractionMode::Images);
        assert_eq!(request.limit, 3);
        assert!(request.resolve_lazy_images);

        let built = ExtractionRequest::new("<p>x</p>", "", ExtractionMode::Auto, 1);
        assert!(!built.resolve_lazy_images);
    }

    #[test]
    fn test_result_omits_absent_fields() {
        let result = ExtractionResult {
            items: vec![ExtractedRecord { id: 1, name: Some(String::new()), href: None, src: None }],
            total_found: 4,
            requested: 1,
            message: "Successfully extracted 1 items.".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["totalFound"], 4);
        assert_eq!(json["items"][0], serde_json::json!({"id": 1, "name": ""}));
    }
}

//! CSS selector-based record extraction
//!
//! Uses the scraper crate to select elements, then maps each match (or its
//! first relevant descendant) to a record according to the extraction mode.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::dom::{attr_or_empty, clean_text, find_first_tag, image_source};
use super::{ExtractedRecord, ExtractionMode, ExtractionRequest, ExtractionResult};
use crate::error::{HarvestError, Result};

const NO_HTML_MESSAGE: &str = "No HTML provided.";

/// Name given to images whose alt text is blank
pub const IMAGE_FALLBACK_NAME: &str = "Image";

/// Selector used when the request leaves it blank
pub fn default_selector(mode: ExtractionMode) -> &'static str {
    match mode {
        ExtractionMode::Links => "a",
        ExtractionMode::Images => "img",
        ExtractionMode::Auto | ExtractionMode::Text => "body *",
    }
}

/// The trimmed user selector, or the mode default when blank
pub fn effective_selector(selector: &str, mode: ExtractionMode) -> &str {
    let trimmed = selector.trim();
    if trimmed.is_empty() {
        default_selector(mode)
    } else {
        trimmed
    }
}

/// Compile a selector, keeping the parser's reason for the log.
///
/// The CSS tokenizer closes open blocks and strings at end of input, so
/// `[foo` would parse; those are rejected before parsing.
pub fn compile_selector(selector_str: &str) -> Result<Selector> {
    let invalid = |reason: String| HarvestError::InvalidSelector {
        selector: selector_str.to_string(),
        reason,
    };

    if let Some(reason) = unbalanced_reason(selector_str) {
        return Err(invalid(reason.to_string()));
    }

    Selector::parse(selector_str).map_err(|e| invalid(e.to_string()))
}

/// Why brackets, parentheses or quotes do not pair up, ignoring escaped
/// characters and anything inside quoted strings.
fn unbalanced_reason(selector_str: &str) -> Option<&'static str> {
    let mut open: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut chars = selector_str.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
            continue;
        }
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' | '(' => open.push(c),
            ']' | ')' => {
                let expected = if c == ']' { '[' } else { '(' };
                if open.pop() != Some(expected) {
                    return Some("unmatched closing bracket");
                }
            }
            _ => {}
        }
    }

    if quote.is_some() {
        Some("unterminated string")
    } else if !open.is_empty() {
        Some("unclosed bracket")
    } else {
        None
    }
}

/// Extract records from HTML.
///
/// Never fails: blank input and invalid selectors come back as an empty
/// result carrying an explanatory message.
pub fn extract(request: &ExtractionRequest) -> ExtractionResult {
    let limit = request.limit;

    if request.html.trim().is_empty() {
        return ExtractionResult::empty(limit, NO_HTML_MESSAGE);
    }

    let document = Html::parse_document(&request.html);

    let selector_str = effective_selector(&request.selector, request.mode);
    let selector = match compile_selector(selector_str) {
        Ok(s) => s,
        Err(err) => {
            if let HarvestError::InvalidSelector { reason, .. } = &err {
                warn!(selector = selector_str, reason = %reason, "rejected CSS selector");
            }
            return ExtractionResult::empty(limit, err.to_string());
        }
    };

    let matched: Vec<ElementRef> = document.select(&selector).collect();
    let mut items: Vec<ExtractedRecord> = Vec::new();

    for element in &matched {
        if items.len() >= limit {
            break;
        }
        let id = items.len() + 1;
        let record = match request.mode {
            ExtractionMode::Links => link_record(*element, id),
            ExtractionMode::Images => image_record(*element, id, request.resolve_lazy_images),
            ExtractionMode::Text => Some(text_record(*element, id)),
            ExtractionMode::Auto => auto_record(*element, id, request.resolve_lazy_images),
        };
        if let Some(record) = record {
            items.push(record);
        }
    }

    debug!(
        selector = selector_str,
        mode = ?request.mode,
        matched = matched.len(),
        emitted = items.len(),
        limit,
        "extracted records"
    );

    let message = summary_message(items.len(), limit);
    ExtractionResult {
        items,
        total_found: matched.len(),
        requested: limit,
        message,
    }
}

fn summary_message(emitted: usize, limit: usize) -> String {
    if emitted < limit {
        format!("Found {emitted} items, fewer than the requested {limit}.")
    } else {
        format!("Successfully extracted {emitted} items.")
    }
}

fn link_record(element: ElementRef<'_>, id: usize) -> Option<ExtractedRecord> {
    let anchor = find_first_tag(element, "a")?;
    Some(ExtractedRecord {
        id,
        name: Some(clean_text(anchor)),
        href: Some(attr_or_empty(anchor, "href")),
        src: None,
    })
}

fn image_record(element: ElementRef<'_>, id: usize, resolve_lazy: bool) -> Option<ExtractedRecord> {
    let img = find_first_tag(element, "img")?;
    let alt = img.value().attr("alt").unwrap_or("").trim();
    let name = if alt.is_empty() { IMAGE_FALLBACK_NAME } else { alt };

    Some(ExtractedRecord {
        id,
        name: Some(name.to_string()),
        href: None,
        src: Some(image_source(img, resolve_lazy)),
    })
}

fn text_record(element: ElementRef<'_>, id: usize) -> ExtractedRecord {
    ExtractedRecord {
        id,
        name: Some(clean_text(element)),
        href: None,
        src: None,
    }
}

fn auto_record(element: ElementRef<'_>, id: usize, resolve_lazy: bool) -> Option<ExtractedRecord> {
    let href = find_first_tag(element, "a").map(|anchor| attr_or_empty(anchor, "href"));
    let src = find_first_tag(element, "img").map(|img| image_source(img, resolve_lazy));
    let text = clean_text(element);

    let has_value = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
    if text.is_empty() && !has_value(&href) && !has_value(&src) {
        return None;
    }

    Some(ExtractedRecord {
        id,
        name: Some(text),
        href,
        src,
    })
}

//! Image class frequency scanning
//!
//! Counts the classes found on `<img>` tags and on their immediate parents,
//! and ranks the resulting selectors so the most common product-image
//! pattern comes first.

use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dom::image_source;
use super::{CandidateKind, CandidateSelector};

/// Scanner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanOptions {
    /// Shortest class token kept; shorter ones are utility noise
    pub min_class_len: usize,
    /// Keep only the most frequent candidates; `None` keeps all
    pub max_candidates: Option<usize>,
    /// Resolve lazy-load attributes when picking the example URL
    pub resolve_lazy_images: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            min_class_len: 3,
            max_candidates: Some(10),
            resolve_lazy_images: true,
        }
    }
}

/// Rank image-class selectors by frequency using default options
pub fn scan_image_classes(html: &str) -> Vec<CandidateSelector> {
    scan_image_classes_with(html, &ScanOptions::default())
}

/// Rank image-class selectors by frequency, most frequent first
pub fn scan_image_classes_with(html: &str, options: &ScanOptions) -> Vec<CandidateSelector> {
    if html.trim().is_empty() {
        return Vec::new();
    }

    let document = Html::parse_document(html);

    let selector = match Selector::parse("img") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut tally = CandidateTally::default();
    let mut images = 0usize;

    for img in document.select(&selector) {
        images += 1;
        let example = image_source(img, options.resolve_lazy_images);

        for class in class_tokens(img.value().attr("class"), options.min_class_len) {
            let key = format!("img.{}", escape_css_ident(class));
            tally.upsert(key, CandidateKind::Img, &example);
        }

        if let Some(parent) = img.parent().and_then(ElementRef::wrap) {
            for class in class_tokens(parent.value().attr("class"), options.min_class_len) {
                let key = format!(".{} img", escape_css_ident(class));
                tally.upsert(key, CandidateKind::Parent, &example);
            }
        }
    }

    let ranked = tally.into_ranked(options.max_candidates);
    debug!(images, candidates = ranked.len(), "scanned image classes");
    ranked
}

/// Selector string → slot in `candidates`; the vec keeps discovery order
#[derive(Default)]
struct CandidateTally {
    index: HashMap<String, usize>,
    candidates: Vec<CandidateSelector>,
}

impl CandidateTally {
    fn upsert(&mut self, selector: String, kind: CandidateKind, example: &str) {
        if let Some(&slot) = self.index.get(&selector) {
            let candidate = &mut self.candidates[slot];
            candidate.count += 1;
            if candidate.example.is_empty() {
                candidate.example = example.to_string();
            }
            return;
        }

        self.index.insert(selector.clone(), self.candidates.len());
        self.candidates.push(CandidateSelector {
            selector,
            count: 1,
            kind,
            example: example.to_string(),
        });
    }

    /// Descending by count; ties stay in discovery order. Keeps the head.
    fn into_ranked(mut self, max_candidates: Option<usize>) -> Vec<CandidateSelector> {
        self.candidates.sort_by(|a, b| b.count.cmp(&a.count));
        if let Some(max) = max_candidates {
            self.candidates.truncate(max);
        }
        self.candidates
    }
}

/// Distinct class tokens of at least `min_len` characters, in attribute order
fn class_tokens(class_attr: Option<&str>, min_len: usize) -> Vec<&str> {
    let mut tokens: Vec<&str> = Vec::new();
    for token in class_attr.unwrap_or("").split_ascii_whitespace() {
        if token.chars().count() >= min_len && !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

/// Serialize a class name as a CSS identifier, escaping what a selector
/// parser would reject (`md:w-1/2`, leading digits, ...).
pub fn escape_css_ident(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let first = ident.chars().next();
    let lone_hyphen = ident == "-";

    for (i, c) in ident.chars().enumerate() {
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => out.push_str(&format!("\\{:x} ", c as u32)),
            '0'..='9' if i == 0 || (i == 1 && first == Some('-')) => {
                out.push_str(&format!("\\{:x} ", c as u32));
            }
            '-' if lone_hyphen => out.push_str("\\-"),
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

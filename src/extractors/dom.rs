//! Element helpers shared by the selector engine and the class scanner.

use scraper::ElementRef;

/// Subtrees whose text never counts as visible content
const HIDDEN_TEXT_TAGS: &[&str] = &["script", "style", "noscript"];

/// Attributes lazy loaders park the real image URL in, in priority order
const LAZY_SRC_ATTRS: &[&str] = &["data-src", "data-lazy-src", "data-original"];

const SRCSET_ATTRS: &[&str] = &["srcset", "data-srcset"];

/// Return the element itself if it satisfies `predicate`, else its first
/// matching descendant in document order.
pub fn find_first<'a, P>(element: ElementRef<'a>, predicate: P) -> Option<ElementRef<'a>>
where
    P: Fn(&ElementRef<'a>) -> bool,
{
    // descendants() yields the element itself first
    element
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|candidate| predicate(candidate))
}

/// [`find_first`] by tag name
pub fn find_first_tag<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    find_first(element, |candidate| candidate.value().name() == tag)
}

/// Visible text of an element: script/style/noscript descendants dropped,
/// trimmed, whitespace runs collapsed to one space.
pub fn clean_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    let mut stack: Vec<_> = element.children().rev().collect();

    while let Some(node) = stack.pop() {
        if let Some(text) = node.value().as_text() {
            raw.push_str(text);
        } else if let Some(child) = node.value().as_element() {
            if !HIDDEN_TEXT_TAGS.contains(&child.name()) {
                stack.extend(node.children().rev());
            }
        }
    }

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Attribute value or empty string
pub fn attr_or_empty(element: ElementRef<'_>, name: &str) -> String {
    element.value().attr(name).unwrap_or("").to_string()
}

/// Source URL of an image element, as written in the markup.
///
/// Returns `src` unchanged unless `resolve_lazy` is set and `src` is missing,
/// blank or a `data:` placeholder. In that case the first usable lazy-load
/// attribute wins, then the widest `srcset` candidate.
pub fn image_source(img: ElementRef<'_>, resolve_lazy: bool) -> String {
    let el = img.value();
    let src = el.attr("src").unwrap_or("");

    if !resolve_lazy || !is_placeholder_src(src) {
        return src.to_string();
    }

    LAZY_SRC_ATTRS
        .iter()
        .filter_map(|name| el.attr(name))
        .find(|value| !is_placeholder_src(value))
        .map(String::from)
        .or_else(|| {
            SRCSET_ATTRS
                .iter()
                .filter_map(|name| el.attr(name))
                .find_map(widest_srcset_candidate)
        })
        .unwrap_or_else(|| src.to_string())
}

fn is_placeholder_src(value: &str) -> bool {
    let value = value.trim_start();
    value.is_empty()
        || value
            .get(..5)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Widest (or densest) URL in a srcset list; the first one wins ties.
/// A candidate without descriptor counts as `1x`.
pub fn widest_srcset_candidate(srcset: &str) -> Option<String> {
    let mut best: Option<(f64, &str)> = None;

    for part in srcset.split(',') {
        let mut pieces = part.split_whitespace();
        let Some(url) = pieces.next() else {
            continue;
        };
        if is_placeholder_src(url) {
            continue;
        }

        let score = pieces
            .next()
            .and_then(|desc| {
                desc.strip_suffix('w')
                    .or_else(|| desc.strip_suffix('x'))
                    .and_then(|n| n.parse::<f64>().ok())
            })
            .unwrap_or(1.0);

        if best.map_or(true, |(top, _)| score > top) {
            best = Some((score, url));
        }
    }

    best.map(|(_, url)| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(document: &'a Html, selector: &str) -> ElementRef<'a> {
        let sel = Selector::parse(selector).unwrap();
        document.select(&sel).next().unwrap()
    }

    #[test]
    fn test_find_first_prefers_self() {
        let document = Html::parse_document(r#"<a id="outer" href="/o"><span><a href="/i">in</a></span></a>"#);
        let outer = first(&document, "a");
        let found = find_first_tag(outer, "a").unwrap();
        assert_eq!(found.value().attr("href"), Some("/o"));
    }

    #[test]
    fn test_find_first_descends_in_document_order() {
        let document = Html::parse_document(
            r#"<div class="card"><p><img src="1.jpg"></p><img src="2.jpg"></div>"#,
        );
        let card = first(&document, ".card");
        let img = find_first_tag(card, "img").unwrap();
        assert_eq!(img.value().attr("src"), Some("1.jpg"));
        assert!(find_first_tag(card, "a").is_none());
    }

    #[test]
    fn test_clean_text_drops_hidden_subtrees() {
        let document = Html::parse_document(
            r#"<div id="t">  Price:
                <style>.x { color: red }</style>
                <b>$10</b><script>track("view")</script>
                <noscript>enable js</noscript>  each
            </div>"#,
        );
        assert_eq!(clean_text(first(&document, "#t")), "Price: $10 each");
    }

    #[test]
    fn test_image_source_raw_src() {
        let document = Html::parse_document(r#"<img src="  ./a.jpg?x=1 " data-src="b.jpg">"#);
        assert_eq!(image_source(first(&document, "img"), true), "  ./a.jpg?x=1 ");
    }

    #[test]
    fn test_image_source_lazy_fallbacks() {
        let document = Html::parse_document(
            r#"
            <img id="a" src="data:image/gif;base64,R0lGODlhAQABAAAAACw=" data-src="real.jpg">
            <img id="b" data-lazy-src="lazy.jpg">
            <img id="c" src="" srcset="small.jpg 320w, large.jpg 1024w, mid.jpg 640w">
            <img id="d" data-srcset="one.jpg, two.jpg 2x">
            <img id="e">
            "#,
        );
        assert_eq!(image_source(first(&document, "#a"), true), "real.jpg");
        assert_eq!(image_source(first(&document, "#b"), true), "lazy.jpg");
        assert_eq!(image_source(first(&document, "#c"), true), "large.jpg");
        assert_eq!(image_source(first(&document, "#d"), true), "two.jpg");
        assert_eq!(image_source(first(&document, "#e"), true), "");

        assert!(image_source(first(&document, "#a"), false).starts_with("data:image/gif"));
        assert_eq!(image_source(first(&document, "#b"), false), "");
    }

    #[test]
    fn test_widest_srcset_candidate() {
        assert_eq!(widest_srcset_candidate("a.jpg 1x, b.jpg 1x").as_deref(), Some("a.jpg"));
        assert_eq!(widest_srcset_candidate(" , ").as_deref(), None);
    }
}

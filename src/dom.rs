//! Small DOM query helpers shared by the classifier and the renderers.
//!
//! All tree access goes through `scraper` ([`ElementRef`] over an html5ever
//! parse). Selectors are compiled once into statics; the helpers here cover
//! the handful of traversals CSS selectors cannot express directly
//! (direct-child-only walks, ancestor tests, collapsed visible text).

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

pub(crate) static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("valid body selector"));
pub(crate) static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("valid paragraph selector"));
pub(crate) static BULLET_LIST_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("ul").expect("valid list selector"));
pub(crate) static ORDERED_LIST_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("ol").expect("valid list selector"));
pub(crate) static IMAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("valid image selector"));
pub(crate) static H3_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3").expect("valid heading selector"));
pub(crate) static H4_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h4").expect("valid heading selector"));
pub(crate) static H6_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h6").expect("valid heading selector"));
pub(crate) static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("valid anchor selector"));
pub(crate) static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("valid cell selector"));

/// The `<body>` element of a parsed document, if any.
pub(crate) fn body_element(doc: &Html) -> Option<ElementRef<'_>> {
    doc.select(&BODY_SELECTOR).next()
}

/// First descendant matching `sel`, in document order.
pub(crate) fn first_descendant<'a>(el: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    el.select(sel).next()
}

/// Direct element children only (text and comment nodes skipped).
pub(crate) fn direct_children(el: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    el.children().filter_map(ElementRef::wrap)
}

/// First direct child with the given tag name.
pub(crate) fn direct_child_by_name<'a>(el: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    direct_children(el).find(|c| c.value().name() == name)
}

/// Nearest enclosing element with the given tag name.
pub(crate) fn nearest_ancestor<'a>(el: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == name)
}

/// True if any ancestor element has the given tag name.
///
/// Used to skip paragraphs nested inside `<li>` when collecting body text,
/// so list items are not emitted twice.
pub(crate) fn has_ancestor(el: ElementRef<'_>, name: &str) -> bool {
    nearest_ancestor(el, name).is_some()
}

/// Visible text with whitespace runs collapsed to single spaces and the
/// ends trimmed. Table layouts are full of indentation-only text nodes;
/// collapsing makes length checks and lead-in matching reliable.
pub(crate) fn collapsed_text(el: ElementRef<'_>) -> String {
    let raw: String = el.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn direct_children_skip_text_nodes() {
        let doc = parse("<div>  <p>a</p>\n  <span>b</span></div>");
        let div = doc
            .select(&Selector::parse("div").unwrap())
            .next()
            .unwrap();
        let names: Vec<&str> = direct_children(div).map(|c| c.value().name()).collect();
        assert_eq!(names, vec!["p", "span"]);
    }

    #[test]
    fn direct_child_by_name_ignores_nested_matches() {
        let doc = parse("<div><span><p>nested</p></span><p>direct</p></div>");
        let div = doc
            .select(&Selector::parse("div").unwrap())
            .next()
            .unwrap();
        let p = direct_child_by_name(div, "p").unwrap();
        assert_eq!(collapsed_text(p), "direct");
    }

    #[test]
    fn collapsed_text_flattens_whitespace() {
        let doc = parse("<p>  The\n   details:   here </p>");
        let p = doc.select(&PARAGRAPH_SELECTOR).next().unwrap();
        assert_eq!(collapsed_text(p), "The details: here");
    }

    #[test]
    fn ancestor_test_finds_enclosing_list_item() {
        let doc = parse("<ul><li><div><p>x</p></div></li></ul>");
        let p = doc.select(&PARAGRAPH_SELECTOR).next().unwrap();
        assert!(has_ancestor(p, "li"));
        assert!(!has_ancestor(p, "table"));
    }
}

//! Section renderers: one classified row in, one clean HTML fragment out.
//!
//! Each renderer extracts what it recognises from the row's leading cell
//! and re-emits it with the fixed inline styles of the mobile article
//! template (publishing targets strip `<style>` blocks, so everything is
//! inline). Inner HTML of paragraphs and list items is carried over as-is;
//! only the outer wrappers are replaced.
//!
//! Failure semantics are uniform: anything a renderer cannot extract is
//! omitted, and a renderer always returns a fragment or an empty string.
//! An empty string tells the caller to drop the section entirely.

use crate::config::ConversionConfig;
use crate::dom;
use crate::pipeline::relocate::ImageRelocator;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use tracing::{debug, warn};

// ── The mobile template ──────────────────────────────────────────────────

const SECTION_TITLE_STYLE: &str =
    "background:#000;color:#fff;text-align:center;padding:12px;margin:20px 0;font-weight:bold;font-size:16px;";
const CARD_STYLE: &str =
    "border:2px solid #000;border-radius:10px;padding:15px;margin:15px 0;background:#fff;";
const CATEGORY_STYLE: &str = "font-size:12px;color:#999;margin:5px 0;";
const NEWS_HEADING_STYLE: &str =
    "font-size:18px;font-weight:bold;color:#000;margin:10px 0;line-height:1.4;";
const NEWS_IMAGE_WRAP_STYLE: &str = "text-align:center;margin:15px 0;";
const NEWS_IMAGE_STYLE: &str = "max-width:100%;height:auto;";
const NEWS_PARAGRAPH_STYLE: &str = "font-size:15px;line-height:1.8;color:#333;margin:10px 0;";
const NEWS_BULLET_STYLE: &str =
    "font-size:14px;line-height:1.8;color:#555;margin:8px 0;padding-left:20px;";
const NEWS_BULLET_DOT_STYLE: &str = "font-size:11px;";
const SUBSECTION_HEADING_STYLE: &str = "font-size:16px;font-weight:bold;color:#000;margin:10px 0;";
const BODY_PARAGRAPH_STYLE: &str = "font-size:15px;line-height:1.6;color:#333;margin:8px 0;";
const BODY_BULLET_STYLE: &str =
    "font-size:15px;line-height:1.6;color:#333;margin:6px 0;padding-left:20px;";
const BODY_BULLET_DOT_STYLE: &str = "font-size:12px;";
const DIVIDER_STYLE: &str = "border-top:2px solid #000;margin:15px 0;";
const SPACER_STYLE: &str = "height:20px;";
const BANNER_WRAP_STYLE: &str = "text-align:center;margin:0;padding:0;";
const BANNER_IMAGE_STYLE: &str = "width:100%;display:block;";

/// Source markup wraps list-item text in template `<p>` tags that would
/// break the bullet layout; they are stripped, keeping the inner content.
static P_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?p\b[^>]*>").expect("valid paragraph-tag regex"));

fn strip_paragraph_tags(inner: &str) -> String {
    P_TAG_RE.replace_all(inner, "").into_owned()
}

fn card(content: &str) -> String {
    format!("<div style=\"{CARD_STYLE}\">\n{content}\n</div>")
}

/// Bullet line for one `<li>`; `None` when the item has no visible text.
fn bullet_line(li: ElementRef<'_>, style: &str, dot_style: &str) -> Option<String> {
    if dom::collapsed_text(li).is_empty() {
        return None;
    }
    let inner = strip_paragraph_tags(&li.inner_html());
    Some(format!(
        "<p style=\"{style}\"><span style=\"{dot_style}\">•</span> {}</p>",
        inner.trim()
    ))
}

/// Numbered line for one `<li>`; the index is positional within the list,
/// so an empty item still consumes its number.
fn numbered_line(index: usize, li: ElementRef<'_>, style: &str) -> Option<String> {
    if dom::collapsed_text(li).is_empty() {
        return None;
    }
    let inner = strip_paragraph_tags(&li.inner_html());
    Some(format!("<p style=\"{style}\">{index}. {}</p>", inner.trim()))
}

fn is_list_item(el: &ElementRef<'_>) -> bool {
    el.value().name() == "li"
}

// ── Renderers ────────────────────────────────────────────────────────────

/// The relocated masthead image as a full-width leading fragment.
pub(crate) fn banner(url: &str) -> String {
    format!(
        "<p style=\"{BANNER_WRAP_STYLE}\"><img src=\"{url}\" style=\"{BANNER_IMAGE_STYLE}\" /></p>"
    )
}

/// Black section-title banner from the cell's visible text.
pub(crate) fn section_title(cell: ElementRef<'_>) -> String {
    let title = dom::collapsed_text(cell);
    format!("<div style=\"{SECTION_TITLE_STYLE}\">\n{title}\n</div>")
}

/// Bordered news card: category label, headline, lead image, body
/// paragraphs, bullet and numbered lists — each optional, in that order.
pub(crate) async fn news_item(
    cell: ElementRef<'_>,
    config: &ConversionConfig,
    relocator: &mut ImageRelocator,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(h6) = dom::first_descendant(cell, &dom::H6_SELECTOR) {
        parts.push(format!(
            "<p style=\"{CATEGORY_STYLE}\">{}</p>",
            h6.inner_html().trim()
        ));
    }

    if let Some(h4) = dom::first_descendant(cell, &dom::H4_SELECTOR) {
        parts.push(format!(
            "<h3 style=\"{NEWS_HEADING_STYLE}\">{}</h3>",
            h4.inner_html().trim()
        ));
    }

    // only the first image; icons further down the card are noise
    if let Some(img) = dom::first_descendant(cell, &dom::IMAGE_SELECTOR) {
        if let Some(src) = img.value().attr("src").filter(|s| s.contains("http")) {
            if let Some(url) = relocator.relocate(src).await {
                parts.push(format!(
                    "<p style=\"{NEWS_IMAGE_WRAP_STYLE}\"><img src=\"{url}\" style=\"{NEWS_IMAGE_STYLE}\"/></p>"
                ));
            }
        }
    }

    for p in cell.select(&dom::PARAGRAPH_SELECTOR) {
        if dom::has_ancestor(p, "li") {
            continue;
        }
        let text = dom::collapsed_text(p);
        if text.chars().count() <= config.min_news_paragraph_chars {
            continue;
        }
        if config
            .caption_markers
            .iter()
            .any(|m| text.contains(m.as_str()))
        {
            debug!("dropping caption paragraph");
            continue;
        }
        let inner = p.inner_html();
        let inner = inner.trim();
        if config
            .emphasis_leadins
            .iter()
            .any(|l| text.starts_with(l.as_str()))
        {
            parts.push(format!(
                "<p style=\"{NEWS_PARAGRAPH_STYLE}\"><strong>{inner}</strong></p>"
            ));
        } else {
            parts.push(format!("<p style=\"{NEWS_PARAGRAPH_STYLE}\">{inner}</p>"));
        }
    }

    for ul in cell.select(&dom::BULLET_LIST_SELECTOR) {
        for li in dom::direct_children(ul).filter(is_list_item) {
            if let Some(line) = bullet_line(li, NEWS_BULLET_STYLE, NEWS_BULLET_DOT_STYLE) {
                parts.push(line);
            }
        }
    }

    for ol in cell.select(&dom::ORDERED_LIST_SELECTOR) {
        for (i, li) in dom::direct_children(ol).filter(is_list_item).enumerate() {
            if let Some(line) = numbered_line(i + 1, li, NEWS_BULLET_STYLE) {
                parts.push(line);
            }
        }
    }

    if parts.is_empty() {
        return String::new();
    }
    card(&parts.join("\n"))
}

/// Quick-hits subsection: `<h3>` heading plus its bullet items.
///
/// The source puts the items either in the heading's own cell (phase 1) or
/// in the rows that follow it within the same row table (phase 2) — a
/// `<div><ul>` there contributes bullets, bare `<p>` children contribute
/// paragraphs. A heading with no content after both phases is dropped.
pub(crate) fn quick_hits(cell: ElementRef<'_>, _config: &ConversionConfig) -> String {
    let Some(h3) = dom::first_descendant(cell, &dom::H3_SELECTOR) else {
        return String::new();
    };

    // prefer the link text: the raw heading repeats the emoji the link
    // text already carries
    let title = match dom::first_descendant(h3, &dom::ANCHOR_SELECTOR) {
        Some(link) => dom::collapsed_text(link),
        None => dom::collapsed_text(h3),
    };
    let mut parts = vec![format!(
        "<h3 style=\"{SUBSECTION_HEADING_STYLE}\">{title}</h3>"
    )];
    let mut content_found = false;

    // phase 1: a list in the heading's own cell
    let h3_cell = dom::nearest_ancestor(h3, "td").unwrap_or(cell);
    if let Some(ul) = dom::first_descendant(h3_cell, &dom::BULLET_LIST_SELECTOR) {
        for li in dom::direct_children(ul).filter(is_list_item) {
            if let Some(line) = bullet_line(li, BODY_BULLET_STYLE, BODY_BULLET_DOT_STYLE) {
                parts.push(line);
                content_found = true;
            }
        }
    }

    // phase 2: rows after the heading row, within the same table
    if !content_found {
        debug!(
            "subsection '{}': no list beside the heading, scanning following rows",
            title
        );
        for row in following_rows(h3) {
            let Some(row_cell) = dom::first_descendant(row, &dom::CELL_SELECTOR) else {
                continue;
            };
            if let Some(div) = dom::direct_child_by_name(row_cell, "div") {
                if let Some(ul) = dom::first_descendant(div, &dom::BULLET_LIST_SELECTOR) {
                    for li in dom::direct_children(ul).filter(is_list_item) {
                        if let Some(line) =
                            bullet_line(li, BODY_BULLET_STYLE, BODY_BULLET_DOT_STYLE)
                        {
                            parts.push(line);
                            content_found = true;
                        }
                    }
                }
            } else {
                for p in dom::direct_children(row_cell).filter(|c| c.value().name() == "p") {
                    if dom::collapsed_text(p).is_empty() {
                        continue;
                    }
                    parts.push(format!(
                        "<p style=\"{BODY_PARAGRAPH_STYLE}\">{}</p>",
                        p.inner_html().trim()
                    ));
                    content_found = true;
                }
            }
        }
    }

    if !content_found {
        warn!(
            "subsection '{}' has a heading but no content, omitting",
            title
        );
        return String::new();
    }
    card(&parts.join("\n"))
}

/// Rows of the heading's table that follow the heading's own row.
fn following_rows(h3: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let Some(tr) = dom::nearest_ancestor(h3, "tr") else {
        return Vec::new();
    };
    tr.next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "tr")
        .collect()
}

/// Generic content block: paragraphs and bullet lists, with an optional
/// horizontal divider ahead of a transitional lead-in.
pub(crate) fn generic_block(
    cell: ElementRef<'_>,
    config: &ConversionConfig,
    add_border: bool,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    // a zero-height cell inside the block is the source template's visual
    // break; it licenses a divider before the transitional paragraph
    let has_divider = cell.select(&dom::CELL_SELECTOR).any(|td| {
        td.value()
            .attr("style")
            .is_some_and(|s| s.contains("line-height:0px"))
    });

    for p in cell.select(&dom::PARAGRAPH_SELECTOR) {
        if dom::has_ancestor(p, "li") {
            continue;
        }
        let text = dom::collapsed_text(p);
        if text.chars().count() <= config.min_generic_paragraph_chars {
            continue;
        }
        if has_divider
            && !parts.is_empty()
            && config
                .divider_leadins
                .iter()
                .any(|l| text.contains(l.as_str()))
        {
            parts.push(format!("<div style=\"{DIVIDER_STYLE}\"></div>"));
        }
        parts.push(format!(
            "<p style=\"{BODY_PARAGRAPH_STYLE}\">{}</p>",
            p.inner_html().trim()
        ));
    }

    for ul in cell.select(&dom::BULLET_LIST_SELECTOR) {
        for li in dom::direct_children(ul).filter(is_list_item) {
            if let Some(line) = bullet_line(li, BODY_BULLET_STYLE, BODY_BULLET_DOT_STYLE) {
                parts.push(line);
            }
        }
    }

    if parts.is_empty() {
        return String::new();
    }
    let content = parts.join("\n");
    if add_border {
        card(&content)
    } else {
        format!("{content}\n<div style=\"{SPACER_STYLE}\"></div>")
    }
}

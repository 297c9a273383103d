//! Article metadata extracted from converted output.
//!
//! Publishing platforms want a plain-text title, a short digest, and a
//! cover image next to the article body. All three are derived from the
//! converted HTML rather than the source newsletter, so they reflect what
//! the reader will actually see (post-translation, post-restructuring).

use crate::dom;
use chrono::{DateTime, Datelike, FixedOffset, Utc};
use scraper::Html;
use serde::{Deserialize, Serialize};

/// Draft fields for the publishing platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleMeta {
    /// First heading of the article, with pictographs removed.
    pub title: String,
    /// First real paragraph, truncated to 100 characters.
    pub digest: String,
    /// First hosted image, if any.
    pub cover_url: Option<String>,
}

/// Extract draft metadata from converted article HTML.
///
/// The title falls back to the empty string when the article has no
/// heading; callers usually wrap it with [`dated_title`] anyway.
pub fn article_meta(html: &str) -> ArticleMeta {
    let doc = Html::parse_document(html);

    let title = doc
        .select(&dom::H3_SELECTOR)
        .next()
        .map(|h3| strip_emoji(&dom::collapsed_text(h3)))
        .unwrap_or_default();

    // image-only wrapper paragraphs (the banner) have no text and are
    // skipped rather than producing an empty digest
    let digest = doc
        .select(&dom::PARAGRAPH_SELECTOR)
        .map(dom::collapsed_text)
        .find(|text| !text.is_empty())
        .map(|text| truncate_digest(&text))
        .unwrap_or_default();

    let cover_url = doc
        .select(&dom::IMAGE_SELECTOR)
        .filter_map(|img| img.value().attr("src"))
        .find(|src| src.contains("http"))
        .map(str::to_string);

    ArticleMeta {
        title,
        digest,
        cover_url,
    }
}

/// Prefix `title` using a template with a `{date}` placeholder.
///
/// The date renders as `M月D日` without zero padding, the form readers of
/// a daily digest expect in the title.
pub fn dated_title(title: &str, template: &str, date: DateTime<FixedOffset>) -> String {
    let date_str = format!("{}月{}日", date.month(), date.day());
    format!("{}{}", template.replace("{date}", &date_str), title)
}

/// Current time in Beijing (UTC+8, no DST).
pub fn beijing_now() -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(8 * 3600).expect("UTC+8 is a valid offset");
    Utc::now().with_timezone(&offset)
}

/// Remove pictographs, variation selectors, ZWJ and keycap combiners,
/// then collapse the whitespace they leave behind.
pub fn strip_emoji(text: &str) -> String {
    let kept: String = text.chars().filter(|c| !is_pictographic(*c)).collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_pictographic(c: char) -> bool {
    matches!(
        c,
        '\u{200D}'
            | '\u{FE0F}'
            | '\u{20E3}'
            | '\u{2600}'..='\u{27BF}'
            | '\u{2B00}'..='\u{2BFF}'
            | '\u{1F000}'..='\u{1FAFF}'
    )
}

fn truncate_digest(text: &str) -> String {
    const MAX_CHARS: usize = 100;
    if text.chars().count() <= MAX_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_CHARS - 3).collect();
    format!("{cut}...")
}

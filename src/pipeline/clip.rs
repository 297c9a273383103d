//! Structural clipping of raw newsletter HTML.
//!
//! Newsletter emails sandwich the editorial content between a promotional
//! header (view-in-browser links, sponsor slots) and a trailer (community
//! plugs, referral programme, unsubscribe footer). Both vary per issue, but
//! two text landmarks are stable: the greeting that opens the content and
//! the first trailer heading. Clipping works on **raw text offsets** — no
//! DOM build — because at this stage the markup is a 300 KB table soup and
//! all we need is two split points.
//!
//! Degrade rules (never corrupt, prefer keeping too much):
//! * no `<body>` / malformed body tag / no content anchor → input unchanged
//! * no row container before an anchor → split at the anchor text itself
//! * no trailer anchor, or trailer landmark not after the content landmark
//!   → keep everything to `</body>` (header-only trim)

use crate::config::ConversionConfig;
use tracing::{debug, warn};

/// Byte offset where the row containing `anchor` starts, searching only at
/// or after `from`.
///
/// Looks for the anchor text, then backward for the nearest preceding
/// top-level row opening (`row_open`, typically `<tr><td><table`). Returns
/// `None` when the anchor itself is absent; an anchor without a preceding
/// row opening yields the anchor offset.
pub(crate) fn landmark_start(
    html: &str,
    from: usize,
    anchor: &str,
    row_open: &str,
) -> Option<usize> {
    let anchor_pos = html[from..].find(anchor)? + from;
    match html[from..anchor_pos].rfind(row_open) {
        Some(rel) => Some(rel + from),
        None => {
            debug!(
                "no '{}' before anchor '{}', splitting at the anchor itself",
                row_open, anchor
            );
            Some(anchor_pos)
        }
    }
}

/// Trim a raw newsletter document to its editorial content.
///
/// Keeps the original `<head>` and `<body ...>` tag (charset, preheader
/// styles), drops everything between the body tag and the content landmark,
/// drops everything from the trailer landmark to `</body>`, and keeps the
/// closing tags. Total: any missing landmark degrades per the module rules
/// above instead of failing.
pub fn clip(html: &str, config: &ConversionConfig) -> String {
    let Some(body_open) = html.find("<body") else {
        warn!("no <body> tag found, returning input unchanged");
        return html.to_string();
    };
    let Some(rel_close) = html[body_open..].find('>') else {
        warn!("unterminated <body> tag, returning input unchanged");
        return html.to_string();
    };
    let body_tag_end = body_open + rel_close + 1;

    let Some(content_start) = landmark_start(
        html,
        body_tag_end,
        &config.content_anchor,
        &config.row_open_sequence,
    ) else {
        warn!(
            "content anchor '{}' not found, returning input unchanged",
            config.content_anchor
        );
        return html.to_string();
    };

    let body_close = html.rfind("</body>").unwrap_or(html.len());

    let trailer_start = match landmark_start(
        html,
        content_start,
        &config.trailer_anchor,
        &config.row_open_sequence,
    ) {
        Some(pos) if pos > content_start => pos.min(body_close),
        Some(_) => {
            warn!(
                "trailer anchor '{}' does not follow the content landmark, keeping tail",
                config.trailer_anchor
            );
            body_close
        }
        None => {
            debug!(
                "trailer anchor '{}' not found, keeping tail",
                config.trailer_anchor
            );
            body_close
        }
    };

    let mut out = String::with_capacity(html.len());
    out.push_str(&html[..body_tag_end]);
    out.push_str(&html[content_start..trailer_start]);
    out.push_str(&html[body_close..]);
    debug!("clipped {} bytes to {} bytes", html.len(), out.len());
    out
}

//! Salutation de-personalization.
//!
//! Retrieved newsletters greet the original recipient by name
//! (`Good morning, Alice.`). Republishing that name is a privacy leak, so
//! the name is dropped while the salutation itself is kept. Runs on raw
//! HTML between clipping and conversion; callers that machine-translate
//! the content interpose the translator right after this step.

use once_cell::sync::Lazy;
use regex::Regex;

static GREETING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(Good morning|Good afternoon|Good evening|Hello|Hi),\s+\w+\.")
        .expect("valid greeting regex")
});

/// Replace `Salutation, Name.` with `Salutation.` for the fixed salutation
/// set, case-insensitively, preserving the original salutation casing.
pub fn clean_greeting(html: &str) -> String {
    GREETING_RE.replace_all(html, "$1.").into_owned()
}

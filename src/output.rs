//! Output types: the assembled article plus per-run statistics.
//!
//! [`Converter::convert`](crate::Converter::convert) always returns a
//! [`ConversionOutput`], even for degenerate input. Callers that only want
//! the HTML read `.html`; callers that post-process (publishing, QA checks)
//! get the ordered fragments and the counters.

use serde::{Deserialize, Serialize};

/// What a rendered fragment is, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionKind {
    /// The fixed masthead image, relocated once per conversion. At most one,
    /// always first.
    Banner,
    /// A black section-title banner ("AI NEWS", "QUICK HITS", ...).
    Title,
    /// A bordered news card: category, heading, lead image, body.
    News,
    /// A quick-hits subsection: `<h3>` heading plus bullet links.
    QuickHits,
    /// Any other content row: intro paragraphs, transitional text.
    Generic,
}

impl SectionKind {
    /// Short lowercase label for logs and the CLI summary.
    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::Banner => "banner",
            SectionKind::Title => "title",
            SectionKind::News => "news",
            SectionKind::QuickHits => "quick-hits",
            SectionKind::Generic => "generic",
        }
    }
}

/// One rendered output fragment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedSection {
    pub kind: SectionKind,
    /// Self-contained HTML with inline styles; no external CSS required.
    pub html: String,
}

/// Result of a single conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The assembled article: all fragments joined with `\n`, in source
    /// row order.
    pub html: String,
    /// The fragments the article was assembled from, in order.
    pub sections: Vec<RenderedSection>,
    /// True when the input had no recognisable row tables and was returned
    /// unchanged.
    pub passthrough: bool,
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// Number of rendered fragments (banner included).
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}

/// Counters for one conversion run.
///
/// The degrade paths (skipped rows, omitted sections, failed uploads) are
/// visible here rather than as errors; a caller that wants stricter
/// behavior can inspect and reject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    pub input_bytes: usize,
    pub output_bytes: usize,
    /// Top-level row blocks examined.
    pub rows_seen: usize,
    /// Rows skipped for not matching the expected shape or background.
    pub rows_skipped: usize,
    pub sections_rendered: usize,
    /// Rows that classified but rendered empty (e.g. a heading-only
    /// subsection) and were dropped.
    pub sections_omitted: usize,
    /// Distinct images successfully uploaded this run.
    pub images_uploaded: usize,
    /// Image references answered from the relocation cache.
    pub image_cache_hits: usize,
    pub upload_failures: usize,
    pub duration_ms: u64,
}

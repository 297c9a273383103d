//! Configuration types for newsletter-to-article conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Every heuristic the pipeline applies
//! (landmark anchors, background colours, lead-in phrases, length cut-offs)
//! lives here as a named field with the stock newsletter template's values as
//! defaults, so adapting to a template tweak is a config change rather than a
//! code change.
//!
//! # Design choice: builder over constructor
//! A dozen-field constructor is unreadable and breaks on every new field.
//! The builder pattern lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::ConvertError;
use std::path::PathBuf;

/// Configuration for a newsletter-to-article conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use mail2article::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .content_anchor("Good morning")
///     .trailer_anchor("COMMUNITY")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Text landmark marking the start of editorial content. Default: `"Good morning"`.
    ///
    /// The clipper keeps everything from the row container enclosing this
    /// text onward. Newsletters open with a fixed greeting, which makes it a
    /// reliable anchor even though the surrounding markup shifts between
    /// issues. If the anchor is absent the input passes through unchanged.
    pub content_anchor: String,

    /// Text landmark marking the start of trailer boilerplate. Default: `"COMMUNITY"`.
    ///
    /// Everything from the row container enclosing this text to `</body>` is
    /// dropped (community plugs, referral links, unsubscribe footer). If the
    /// anchor is absent the clip keeps the document tail — trimming too
    /// little beats losing content.
    pub trailer_anchor: String,

    /// Literal opening sequence of a top-level row container. Default: `"<tr><td><table"`.
    ///
    /// The clipper searches backward from an anchor for this sequence to
    /// find where the enclosing row starts. Table-layout generators emit it
    /// without whitespace, so a plain byte search is sufficient — no parsing
    /// at the clipping stage.
    pub row_open_sequence: String,

    /// `bgcolor` marking a section-title row. Default: `"#000000"`.
    ///
    /// Compared ASCII-case-insensitively; real feeds mix `#FFFFFF` and
    /// `#ffffff` freely.
    pub title_background: String,

    /// `bgcolor` marking a content row (news, quick hits, generic). Default: `"#FFFFFF"`.
    pub content_background: String,

    /// Paragraph lead-ins rendered bold in news cards.
    /// Default: `"The Rundown:"`, `"The details:"`, `"Why it matters:"`.
    pub emphasis_leadins: Vec<String>,

    /// Phrases identifying image-caption paragraphs to drop.
    /// Default: `"Image source"`.
    pub caption_markers: Vec<String>,

    /// Phrases identifying transitional paragraphs that get a horizontal
    /// divider ahead of them in generic blocks.
    /// Default: `"在今天的人工智能动态中"`, `"In today"`.
    pub divider_leadins: Vec<String>,

    /// News-card paragraphs must be strictly longer than this many
    /// characters. Default: 10.
    ///
    /// Filters out spacer glyphs and decorative one-worders that table
    /// layouts are full of. Counted in characters, not bytes, so CJK text
    /// is not penalised.
    pub min_news_paragraph_chars: usize,

    /// Generic-block paragraphs must be strictly longer than this many
    /// characters. Default: 5.
    ///
    /// Lower than the news threshold: intro rows legitimately carry short
    /// transitional sentences.
    pub min_generic_paragraph_chars: usize,

    /// Local path of the masthead image to relocate and prepend. Default: `None`.
    ///
    /// Ignored (with a diagnostic) when the file is missing or no uploader
    /// is configured; the output never references a local path.
    pub banner_path: Option<PathBuf>,

    /// Wrap generic blocks in the bordered card. Default: `true`.
    ///
    /// When `false`, generic blocks render borderless with a trailing
    /// spacer instead.
    pub border_generic_blocks: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            content_anchor: "Good morning".to_string(),
            trailer_anchor: "COMMUNITY".to_string(),
            row_open_sequence: "<tr><td><table".to_string(),
            title_background: "#000000".to_string(),
            content_background: "#FFFFFF".to_string(),
            emphasis_leadins: vec![
                "The Rundown:".to_string(),
                "The details:".to_string(),
                "Why it matters:".to_string(),
            ],
            caption_markers: vec!["Image source".to_string()],
            divider_leadins: vec![
                "在今天的人工智能动态中".to_string(),
                "In today".to_string(),
            ],
            min_news_paragraph_chars: 10,
            min_generic_paragraph_chars: 5,
            banner_path: None,
            border_generic_blocks: true,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// True when `bgcolor` matches the section-title background.
    pub fn is_title_background(&self, bgcolor: &str) -> bool {
        bgcolor.eq_ignore_ascii_case(&self.title_background)
    }

    /// True when `bgcolor` matches the content background.
    pub fn is_content_background(&self, bgcolor: &str) -> bool {
        bgcolor.eq_ignore_ascii_case(&self.content_background)
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn content_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.config.content_anchor = anchor.into();
        self
    }

    pub fn trailer_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.config.trailer_anchor = anchor.into();
        self
    }

    pub fn row_open_sequence(mut self, seq: impl Into<String>) -> Self {
        self.config.row_open_sequence = seq.into();
        self
    }

    pub fn title_background(mut self, color: impl Into<String>) -> Self {
        self.config.title_background = color.into();
        self
    }

    pub fn content_background(mut self, color: impl Into<String>) -> Self {
        self.config.content_background = color.into();
        self
    }

    pub fn emphasis_leadins(mut self, leadins: Vec<String>) -> Self {
        self.config.emphasis_leadins = leadins;
        self
    }

    pub fn caption_markers(mut self, markers: Vec<String>) -> Self {
        self.config.caption_markers = markers;
        self
    }

    pub fn divider_leadins(mut self, leadins: Vec<String>) -> Self {
        self.config.divider_leadins = leadins;
        self
    }

    pub fn min_news_paragraph_chars(mut self, n: usize) -> Self {
        self.config.min_news_paragraph_chars = n;
        self
    }

    pub fn min_generic_paragraph_chars(mut self, n: usize) -> Self {
        self.config.min_generic_paragraph_chars = n;
        self
    }

    pub fn banner_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.banner_path = Some(path.into());
        self
    }

    pub fn border_generic_blocks(mut self, v: bool) -> Self {
        self.config.border_generic_blocks = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        let c = &self.config;
        if c.content_anchor.is_empty() {
            return Err(ConvertError::InvalidConfig(
                "content_anchor must not be empty".into(),
            ));
        }
        if c.trailer_anchor.is_empty() {
            return Err(ConvertError::InvalidConfig(
                "trailer_anchor must not be empty".into(),
            ));
        }
        if c.row_open_sequence.is_empty() {
            return Err(ConvertError::InvalidConfig(
                "row_open_sequence must not be empty".into(),
            ));
        }
        if c.title_background.eq_ignore_ascii_case(&c.content_background) {
            return Err(ConvertError::InvalidConfig(format!(
                "title_background and content_background must differ, both are '{}'",
                c.title_background
            )));
        }
        Ok(self.config)
    }
}

//! Full-document conversion entry points.
//!
//! [`Converter`] owns the configuration and the image relocation cache, so
//! repeated conversions of related documents (today's issue, a corrected
//! re-run) reuse already-uploaded images instead of uploading them again.
//!
//! Conversion itself is total: a document the converter cannot restructure
//! comes back unchanged with `passthrough` set, and a row it cannot render
//! is omitted from the output. Only the surrounding plumbing (runtime
//! creation, file writes) can fail, and those return [`ConvertError`].

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::output::{ConversionOutput, ConversionStats, RenderedSection, SectionKind};
use crate::pipeline::relocate::ImageRelocator;
use crate::pipeline::{classify, clip, greeting, render};
use crate::uploader::ImageUploader;
use scraper::Html;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Restructures newsletter issues into publish-ready article HTML.
///
/// One converter handles one document at a time; it takes `&mut self` so
/// the borrow checker enforces that, while the relocation cache it carries
/// lives across calls.
pub struct Converter {
    config: ConversionConfig,
    relocator: ImageRelocator,
}

impl Converter {
    /// Converter without an image uploader: sections render normally but
    /// every image reference is dropped.
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            config,
            relocator: ImageRelocator::new(None),
        }
    }

    /// Converter that rehosts images through `uploader`.
    pub fn with_uploader(config: ConversionConfig, uploader: Arc<dyn ImageUploader>) -> Self {
        Self {
            config,
            relocator: ImageRelocator::new(Some(uploader)),
        }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert one newsletter issue to article HTML.
    ///
    /// This is the primary entry point for the library.
    ///
    /// # Returns
    /// Always returns an output. When the document contains no recognisable
    /// row tables the input is passed through unchanged and
    /// `output.passthrough` is set; otherwise `output.html` is exactly the
    /// rendered section fragments joined with `"\n"`, and per-row problems
    /// show up as omitted sections in `output.stats` rather than as errors.
    pub async fn convert(&mut self, html: &str) -> ConversionOutput {
        let total_start = Instant::now();
        self.relocator.begin_run();
        info!("Starting conversion: {} input bytes", html.len());

        // ── Step 1: Clip the mailing header and trailer ──────────────────
        let clipped = clip::clip(html, &self.config);
        debug!("Clipped {} -> {} bytes", html.len(), clipped.len());

        // ── Step 2: Neutralise the personalised salutation ───────────────
        let cleaned = greeting::clean_greeting(&clipped);

        // ── Step 3: Parse and classify the row tables ────────────────────
        let doc = Html::parse_document(&cleaned);
        let scan = classify::classify(&doc, &self.config);
        if scan.examined == 0 {
            warn!("No recognisable row tables, returning the input unchanged");
            return ConversionOutput {
                html: html.to_string(),
                sections: Vec::new(),
                passthrough: true,
                stats: ConversionStats {
                    input_bytes: html.len(),
                    output_bytes: html.len(),
                    duration_ms: total_start.elapsed().as_millis() as u64,
                    ..ConversionStats::default()
                },
            };
        }
        debug!(
            "Classified {} of {} row tables",
            scan.rows.len(),
            scan.examined
        );

        // ── Step 4: Lead with the banner when one is configured ──────────
        let mut sections: Vec<RenderedSection> = Vec::new();
        if let Some(banner_path) = self.config.banner_path.clone() {
            if let Some(url) = self.relocator.relocate_banner(&banner_path).await {
                sections.push(RenderedSection {
                    kind: SectionKind::Banner,
                    html: render::banner(&url),
                });
            }
        }

        // ── Step 5: Render each classified row in document order ─────────
        let mut omitted = 0usize;
        for (i, row) in scan.rows.iter().enumerate() {
            let fragment = match row.kind {
                SectionKind::Title => render::section_title(row.cell),
                SectionKind::News => {
                    render::news_item(row.cell, &self.config, &mut self.relocator).await
                }
                SectionKind::QuickHits => render::quick_hits(row.cell, &self.config),
                SectionKind::Generic => render::generic_block(
                    row.cell,
                    &self.config,
                    self.config.border_generic_blocks,
                ),
                // the classifier never tags a row as banner
                SectionKind::Banner => String::new(),
            };
            if fragment.is_empty() {
                debug!("Row {} ({}) rendered empty, omitting", i + 1, row.kind.label());
                omitted += 1;
                continue;
            }
            sections.push(RenderedSection {
                kind: row.kind,
                html: fragment,
            });
        }

        // ── Step 6: Assemble the final document ──────────────────────────
        let html_out = sections
            .iter()
            .map(|s| s.html.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        // ── Step 7: Compute stats ────────────────────────────────────────
        let stats = ConversionStats {
            input_bytes: html.len(),
            output_bytes: html_out.len(),
            rows_seen: scan.examined,
            rows_skipped: scan.skipped(),
            sections_rendered: sections.len(),
            sections_omitted: omitted,
            images_uploaded: self.relocator.uploads(),
            image_cache_hits: self.relocator.cache_hits(),
            upload_failures: self.relocator.failures(),
            duration_ms: total_start.elapsed().as_millis() as u64,
        };

        info!(
            "Conversion complete: {} sections from {} rows, {}ms",
            stats.sections_rendered, stats.rows_seen, stats.duration_ms
        );

        ConversionOutput {
            html: html_out,
            sections,
            passthrough: false,
            stats,
        }
    }

    /// Convert an issue and write the article HTML directly to a file.
    ///
    /// Uses atomic write (temp file + rename) to prevent partial files.
    pub async fn convert_to_file(
        &mut self,
        html: &str,
        output_path: impl AsRef<Path>,
    ) -> Result<ConversionStats, ConvertError> {
        let output = self.convert(html).await;
        let path = output_path.as_ref();

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ConvertError::OutputWrite {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }

        let tmp_path = path.with_extension("html.tmp");
        tokio::fs::write(&tmp_path, &output.html)
            .await
            .map_err(|e| ConvertError::OutputWrite {
                path: path.to_path_buf(),
                source: e,
            })?;

        tokio::fs::rename(&tmp_path, path)
            .await
            .map_err(|e| ConvertError::OutputWrite {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(output.stats)
    }

    /// Synchronous wrapper around [`Converter::convert`].
    ///
    /// Creates a temporary tokio runtime internally.
    pub fn convert_sync(&mut self, html: &str) -> Result<ConversionOutput, ConvertError> {
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| ConvertError::Runtime(format!("Failed to create tokio runtime: {}", e)))?;
        Ok(runtime.block_on(self.convert(html)))
    }

    /// Forget every previously uploaded image, forcing re-uploads.
    pub fn reset_cache(&mut self) {
        self.relocator.reset();
    }

    /// Number of distinct image sources the converter has uploaded.
    pub fn cached_images(&self) -> usize {
        self.relocator.cached()
    }
}

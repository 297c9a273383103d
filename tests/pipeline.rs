//! End-to-end pipeline tests over realistic newsletter fixtures.
//!
//! No network: remote images are answered by an in-test recording uploader,
//! local files come from tempdirs. Run with:
//!   cargo test --test pipeline -- --nocapture

use async_trait::async_trait;
use mail2article::{ConversionConfig, Converter, ImageUploader, SectionKind, UploadError};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn init_logs() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Uploader that records every source it was asked for and answers with a
/// deterministic hosted URL per call.
struct RecordingUploader {
    calls: Mutex<Vec<String>>,
}

impl RecordingUploader {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageUploader for RecordingUploader {
    async fn upload(&self, source: &str) -> Result<String, UploadError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(source.to_string());
        Ok(format!("https://hosted.example.com/img-{:02}.png", calls.len()))
    }

    fn name(&self) -> &str {
        "recording"
    }
}

struct FailingUploader;

#[async_trait]
impl ImageUploader for FailingUploader {
    async fn upload(&self, _source: &str) -> Result<String, UploadError> {
        Err(UploadError::Rejected {
            message: "quota exhausted".into(),
        })
    }
}

/// A cut-down but structurally faithful issue: mailing header, greeting row,
/// two colour-coded sections, a quick-hits block with sibling-row content,
/// community trailer, unsubscribe footer.
fn issue_html() -> String {
    [
        "<html><head><title>Issue #500</title></head>",
        "<body style=\"margin:0;\">",
        "<table><tr><td><a href=\"#\">View online</a> | <a href=\"#\">Share</a></td></tr></table>",
        "<tr><td><table><tr><td bgcolor=\"#FFFFFF\"><p>Good morning, Alex. Welcome back to your daily AI briefing.</p></td></tr></table></td></tr>",
        "<tr><td><table><tr><td bgcolor=\"#000000\">LATEST DEVELOPMENTS</td></tr></table></td></tr>",
        "<tr><td><table><tr><td bgcolor=\"#FFFFFF\"><h6>TOOLS</h6><h4>Big Launch</h4><img src=\"https://cdn.example.com/hero.png\"/><p>The Rundown: a major model shipped with longer context.</p><ul><li>Cheaper tokens for long documents</li></ul></td></tr></table></td></tr>",
        "<tr><td><table><tr><td bgcolor=\"#000000\">QUICK HITS</td></tr></table></td></tr>",
        "<tr><td><table><tr><td bgcolor=\"#FFFFFF\"><h3>🛠️ <a href=\"https://example.com/tools\">Trending Tools</a></h3></td></tr><tr><td><div><ul><li>Tool A - drafts emails</li><li>Tool B - edits video</li></ul></div></td></tr></table></td></tr>",
        "<tr><td><table><tr><td bgcolor=\"#FFFFFF\"><p>COMMUNITY spotlight: share your builds with the crew.</p></td></tr></table></td></tr>",
        "<table><tr><td>Unsubscribe | Sent to alex@example.com</td></tr></table>",
        "</body></html>",
    ]
    .join("\n")
}

/// Same issue with a second news row referencing the same lead image.
fn issue_with_duplicate_image() -> String {
    issue_html().replace(
        "<tr><td><table><tr><td bgcolor=\"#000000\">QUICK HITS",
        "<tr><td><table><tr><td bgcolor=\"#FFFFFF\"><h4>Second Story</h4><img src=\"https://cdn.example.com/hero.png\"/><p>Another long body paragraph for the second story.</p></td></tr></table></td></tr>\n<tr><td><table><tr><td bgcolor=\"#000000\">QUICK HITS",
    )
}

// ── Full conversion ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_convert_restructures_full_issue() {
    init_logs();
    let uploader = RecordingUploader::new();
    let mut converter =
        Converter::with_uploader(
            ConversionConfig::default(),
            Arc::clone(&uploader) as Arc<dyn ImageUploader>,
        );

    let output = converter.convert(&issue_html()).await;

    assert!(!output.passthrough);
    let kinds: Vec<SectionKind> = output.sections.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SectionKind::Generic,
            SectionKind::Title,
            SectionKind::News,
            SectionKind::Title,
            SectionKind::QuickHits,
        ],
        "one section per surviving row, in source order"
    );

    // the article is exactly the fragments joined with newlines
    let joined = output
        .sections
        .iter()
        .map(|s| s.html.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    assert_eq!(output.html, joined);
    assert_eq!(output.stats.output_bytes, output.html.len());

    // restructured content survives
    assert!(output.html.contains("LATEST DEVELOPMENTS"));
    assert!(output.html.contains("Big Launch"));
    assert!(output.html.contains("•</span> Tool A - drafts emails"));
    assert!(output.html.contains("https://hosted.example.com/img-01.png"));
    assert!(output.html.contains("<strong>The Rundown:"));

    // mailing plumbing does not
    assert!(!output.html.contains("View online"));
    assert!(!output.html.contains("Unsubscribe"));
    assert!(!output.html.contains("COMMUNITY"));
    assert!(!output.html.contains("Alex"), "greeting must be neutralised");
    assert!(!output.html.contains("cdn.example.com"), "images must be rehosted");

    assert_eq!(output.stats.rows_seen, 5);
    assert_eq!(output.stats.rows_skipped, 0);
    assert_eq!(output.stats.sections_rendered, 5);
    assert_eq!(output.stats.sections_omitted, 0);
    assert_eq!(output.stats.images_uploaded, 1);
    assert_eq!(output.stats.upload_failures, 0);
    assert_eq!(uploader.call_count(), 1);
}

#[tokio::test]
async fn test_unrecognised_document_passes_through() {
    let input = "<p>Just a plain page with no row tables.</p>";
    let mut converter = Converter::new(ConversionConfig::default());

    let output = converter.convert(input).await;

    assert!(output.passthrough);
    assert_eq!(output.html, input, "passthrough must preserve the input");
    assert!(output.sections.is_empty());
    assert_eq!(output.stats.rows_seen, 0);
    assert_eq!(output.stats.input_bytes, input.len());
    assert_eq!(output.stats.output_bytes, input.len());
}

#[tokio::test]
async fn test_output_serialises_for_scripting() {
    let mut converter = Converter::new(ConversionConfig::default());
    let output = converter.convert(&issue_html()).await;

    let json = serde_json::to_value(&output).expect("output should serialise");
    assert_eq!(json["passthrough"], false);
    assert_eq!(json["stats"]["sections_rendered"], 5);
    assert!(json["sections"][0]["kind"].is_string());
}

#[tokio::test]
async fn test_upload_failure_keeps_section_without_image() {
    init_logs();
    let mut converter =
        Converter::with_uploader(ConversionConfig::default(), Arc::new(FailingUploader));

    let output = converter.convert(&issue_html()).await;

    assert_eq!(output.stats.sections_rendered, 5, "conversion must continue");
    assert_eq!(output.stats.upload_failures, 1);
    assert_eq!(output.stats.images_uploaded, 0);
    assert!(output.html.contains("Big Launch"));
    assert!(!output.html.contains("<img"), "failed image must be omitted");
}

// ── Image relocation cache ───────────────────────────────────────────────────

#[tokio::test]
async fn test_image_cache_dedupes_within_and_across_runs() {
    let uploader = RecordingUploader::new();
    let mut converter =
        Converter::with_uploader(
            ConversionConfig::default(),
            Arc::clone(&uploader) as Arc<dyn ImageUploader>,
        );
    let issue = issue_with_duplicate_image();

    let first = converter.convert(&issue).await;
    assert_eq!(first.stats.images_uploaded, 1);
    assert_eq!(first.stats.image_cache_hits, 1);
    assert_eq!(uploader.call_count(), 1, "same source must upload once");
    assert_eq!(converter.cached_images(), 1);
    // both references resolve to the single relocated URL
    assert_eq!(
        first
            .html
            .matches("https://hosted.example.com/img-01.png")
            .count(),
        2
    );

    // second run of the same converter hits the cache for both references
    let second = converter.convert(&issue).await;
    assert_eq!(second.stats.images_uploaded, 0);
    assert_eq!(second.stats.image_cache_hits, 2);
    assert_eq!(uploader.call_count(), 1);

    // resetting the cache forces a re-upload
    converter.reset_cache();
    let third = converter.convert(&issue).await;
    assert_eq!(third.stats.images_uploaded, 1);
    assert_eq!(uploader.call_count(), 2);
}

// ── Banner ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_banner_leads_the_article() {
    let dir = tempfile::tempdir().unwrap();
    let banner = dir.path().join("banner.png");
    tokio::fs::write(&banner, b"png-bytes").await.unwrap();

    let config = ConversionConfig::builder()
        .banner_path(&banner)
        .build()
        .unwrap();
    let uploader = RecordingUploader::new();
    let mut converter =
        Converter::with_uploader(config, Arc::clone(&uploader) as Arc<dyn ImageUploader>);

    let output = converter.convert(&issue_html()).await;

    assert_eq!(output.sections[0].kind, SectionKind::Banner);
    assert!(output.html.starts_with("<p"));
    assert!(output.sections[0].html.contains("https://hosted.example.com/img-01.png"));
    assert_eq!(output.stats.images_uploaded, 2, "banner plus the news image");
}

#[tokio::test]
async fn test_missing_banner_file_is_skipped() {
    let config = ConversionConfig::builder()
        .banner_path("/no/such/banner.png")
        .build()
        .unwrap();
    let uploader = RecordingUploader::new();
    let mut converter =
        Converter::with_uploader(config, Arc::clone(&uploader) as Arc<dyn ImageUploader>);

    let output = converter.convert(&issue_html()).await;

    assert_eq!(
        output.sections[0].kind,
        SectionKind::Generic,
        "article must start with the first row when the banner is unavailable"
    );
    assert_eq!(output.stats.sections_rendered, 5);
}

// ── File output and sync wrapper ─────────────────────────────────────────────

#[tokio::test]
async fn test_convert_to_file_writes_article() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("article.html");
    let mut converter = Converter::new(ConversionConfig::default());

    let stats = converter
        .convert_to_file(&issue_html(), &path)
        .await
        .expect("file conversion should succeed");

    assert_eq!(stats.sections_rendered, 5);
    let written = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(written.contains("Big Launch"));
    assert!(
        !path.with_extension("html.tmp").exists(),
        "temp file must be renamed away"
    );
}

#[test]
fn test_convert_sync_runs_without_ambient_runtime() {
    let mut converter = Converter::new(ConversionConfig::default());

    let output = converter
        .convert_sync(&issue_html())
        .expect("sync wrapper should build its own runtime");

    assert_eq!(output.stats.sections_rendered, 5);
    assert!(output.html.contains("Big Launch"));
    // no uploader configured, so image references are dropped entirely
    assert!(!output.html.contains("<img"));
}

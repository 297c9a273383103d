//! # mail2article
//!
//! Restructure table-layout newsletter emails into clean article HTML.
//!
//! ## Why this crate?
//!
//! Email newsletters arrive as deeply nested layout tables carrying the
//! remnants of the mailing pipeline: preheaders, tracking pixels, share
//! footers, personalised greetings. Generic HTML sanitisers either keep
//! that plumbing or flatten exactly the structure a publishing platform
//! needs. Instead this crate reads the newsletter the way its template was
//! written — one top-level table per content row, colour-coded lead cells —
//! and re-emits each row with the inline styles of a mobile article
//! template, rehosting images along the way.
//!
//! ## Pipeline Overview
//!
//! ```text
//! newsletter HTML
//!  │
//!  ├─ 1. Clip      drop the mailing header / community trailer by text landmarks
//!  ├─ 2. Greeting  neutralise the personalised salutation
//!  ├─ 3. Classify  tag each top-level row by its lead cell background colour
//!  ├─ 4. Render    title banner / news card / quick hits / generic block
//!  ├─ 5. Relocate  re-upload referenced images through an ImageUploader
//!  └─ 6. Assemble  banner + section fragments joined into the final article
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mail2article::{ConversionConfig, Converter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let html = std::fs::read_to_string("issue.html")?;
//!     let config = ConversionConfig::default();
//!     let mut converter = Converter::new(config);
//!     let output = converter.convert(&html).await;
//!     println!("{}", output.html);
//!     eprintln!("{} sections from {} rows",
//!         output.stats.sections_rendered,
//!         output.stats.rows_seen);
//!     Ok(())
//! }
//! ```
//!
//! Conversion itself never fails: a document without recognisable row
//! tables passes through unchanged (`output.passthrough`), and a row that
//! renders empty is dropped with a log line and a counter in
//! [`ConversionStats`]. Fallible plumbing (runtime creation, file output)
//! returns [`ConvertError`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mail2article` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! mail2article = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
mod dom;
pub mod error;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod uploader;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::Converter;
pub use error::{ConvertError, UploadError};
pub use metadata::{article_meta, beijing_now, dated_title, strip_emoji, ArticleMeta};
pub use output::{ConversionOutput, ConversionStats, RenderedSection, SectionKind};
pub use pipeline::clip::clip;
pub use pipeline::greeting::clean_greeting;
pub use uploader::{is_remote, ImageUploader, LocalAssetUploader};

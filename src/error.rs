//! Error types for the mail2article library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ConvertError`] — **Fatal**: returned only by the fallible wrappers
//!   (builder validation, blocking-runtime construction, output-file
//!   writes). [`crate::Converter::convert`] itself never returns one.
//!
//! * [`UploadError`] — the failure value of the [`crate::ImageUploader`]
//!   collaborator. The pipeline treats it as **non-fatal**: a failed upload
//!   is logged, counted in [`crate::ConversionStats::upload_failures`], and
//!   the affected image is dropped from the output.
//!
//! Structural degradations (a missing landmark, a row that does not match
//! the expected table shape, a subsection with no body) are not errors at
//! all: the pipeline logs them and keeps going, so a half-broken newsletter
//! still yields a usable article.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the mail2article library.
///
/// Upload failures use [`UploadError`] and surface as omitted images plus a
/// counter in [`crate::ConversionStats`] rather than propagating here.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Runtime errors ────────────────────────────────────────────────────
    /// `convert_sync` could not construct a Tokio runtime.
    #[error("Failed to create async runtime: {0}\nCall `convert` from an existing runtime instead.")]
    Runtime(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output HTML file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure value of the [`crate::ImageUploader`] collaborator.
///
/// Returned by `upload` implementations; the relocation cache logs it and
/// answers `None` so the renderer omits the image. Never aborts a
/// conversion.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The source looked like a local path but no file exists there.
    #[error("Image source not found: '{path}'")]
    SourceNotFound { path: PathBuf },

    /// The source was a URL but the download failed.
    #[error("Failed to fetch image '{url}': {reason}")]
    Fetch { url: String, reason: String },

    /// The image was obtained but could not be stored at its destination.
    #[error("Failed to store image at '{path}': {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote endpoint accepted the request but refused the image.
    #[error("Upload rejected: {message}")]
    Rejected { message: String },
}

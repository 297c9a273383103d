//! The image-upload collaborator boundary.
//!
//! Published articles cannot reference images on the newsletter's CDN
//! (hotlinking breaks, tracking pixels leak readers). Every image the
//! pipeline keeps is pushed through an [`ImageUploader`] that re-hosts it
//! and returns the URL the article should use. The trait is the narrow
//! seam for platform publishers (a WeChat material upload, an S3 bucket);
//! [`LocalAssetUploader`] is the built-in implementation used by the CLI
//! and tests, storing images in a local directory for offline preview.

use crate::error::UploadError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Re-hosts one image for the published article.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Upload one image and return the URL the article should reference.
    ///
    /// `source` is either an HTTP(S) URL or a local file path.
    /// Implementations fetch or read the bytes and host them wherever the
    /// published article will load them from.
    async fn upload(&self, source: &str) -> Result<String, UploadError>;

    /// Identifier used in logs.
    fn name(&self) -> &str {
        "uploader"
    }
}

/// True when the image source is a remote URL rather than a local path.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Stores images in a local directory and answers with the stored path.
///
/// Remote sources are downloaded (with a timeout); local sources are
/// copied. Stored names carry a per-uploader sequence prefix so two images
/// that share a filename never clobber each other. The returned "URL" is
/// the stored file path, which is exactly what an offline preview wants.
#[derive(Debug)]
pub struct LocalAssetUploader {
    dir: PathBuf,
    timeout_secs: u64,
    counter: AtomicUsize,
}

impl LocalAssetUploader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            timeout_secs: 60,
            counter: AtomicUsize::new(0),
        }
    }

    /// Download timeout for remote sources. Default: 60s.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs.max(1);
        self
    }

    fn next_target(&self, source: &str) -> PathBuf {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!("{:03}-{}", seq, base_name(source)))
    }

    async fn download(&self, url: &str, target: &Path) -> Result<(), UploadError> {
        info!("Downloading image from: {}", url);

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| UploadError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let response = client.get(url).send().await.map_err(|e| {
            let reason = if e.is_timeout() {
                format!("timed out after {}s", self.timeout_secs)
            } else {
                e.to_string()
            };
            UploadError::Fetch {
                url: url.to_string(),
                reason,
            }
        })?;

        if !response.status().is_success() {
            return Err(UploadError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let bytes = response.bytes().await.map_err(|e| UploadError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        tokio::fs::write(target, &bytes)
            .await
            .map_err(|e| UploadError::Store {
                path: target.to_path_buf(),
                source: e,
            })
    }

    async fn copy_local(&self, source: &str, target: &Path) -> Result<(), UploadError> {
        let path = PathBuf::from(source);
        if !path.exists() {
            return Err(UploadError::SourceNotFound { path });
        }
        tokio::fs::copy(&path, target)
            .await
            .map(|_| ())
            .map_err(|e| UploadError::Store {
                path: target.to_path_buf(),
                source: e,
            })
    }
}

#[async_trait]
impl ImageUploader for LocalAssetUploader {
    async fn upload(&self, source: &str) -> Result<String, UploadError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| UploadError::Store {
                path: self.dir.clone(),
                source: e,
            })?;

        let target = self.next_target(source);
        if is_remote(source) {
            self.download(source, &target).await?;
        } else {
            self.copy_local(source, &target).await?;
        }

        debug!("Stored image at: {}", target.display());
        Ok(target.display().to_string())
    }

    fn name(&self) -> &str {
        "local-assets"
    }
}

/// A reasonable filename for the source: the last URL path segment or the
/// local file name, falling back to a generic name when neither yields one.
fn base_name(source: &str) -> String {
    if is_remote(source) {
        if let Ok(parsed) = reqwest::Url::parse(source) {
            if let Some(mut segments) = parsed.path_segments() {
                if let Some(last) = segments.next_back() {
                    if !last.is_empty() && last.contains('.') {
                        return last.to_string();
                    }
                }
            }
        }
    } else if let Some(name) = Path::new(source).file_name() {
        return name.to_string_lossy().into_owned();
    }
    "image.png".to_string()
}

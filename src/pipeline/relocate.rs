//! Image relocation with per-converter dedupe.
//!
//! Newsletters repeat images (the same promo graphic in two rows, the same
//! banner every issue) and uploads are the only slow, fallible part of the
//! pipeline. The relocator fronts the [`ImageUploader`] with a cache keyed
//! by the original source, so each distinct image is uploaded at most once
//! per converter, including across sequential conversions by the same
//! converter. A failed upload is logged and answered with `None`; the
//! caller drops that image and the article ships without it.

use crate::uploader::ImageUploader;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

pub(crate) struct ImageRelocator {
    uploader: Option<Arc<dyn ImageUploader>>,
    cache: HashMap<String, String>,
    uploads: usize,
    cache_hits: usize,
    failures: usize,
}

impl ImageRelocator {
    pub(crate) fn new(uploader: Option<Arc<dyn ImageUploader>>) -> Self {
        Self {
            uploader,
            cache: HashMap::new(),
            uploads: 0,
            cache_hits: 0,
            failures: 0,
        }
    }

    /// Relocate one image source, answering from the cache when possible.
    ///
    /// `None` means the image should be omitted: upload failed, or no
    /// uploader is configured. Failures are not cached, so a source that
    /// appears again gets another attempt.
    pub(crate) async fn relocate(&mut self, source: &str) -> Option<String> {
        if let Some(url) = self.cache.get(source) {
            debug!("image cache hit for {}", source);
            self.cache_hits += 1;
            return Some(url.clone());
        }

        let Some(uploader) = self.uploader.as_ref() else {
            debug!("no uploader configured, dropping image {}", source);
            return None;
        };

        match uploader.upload(source).await {
            Ok(url) => {
                debug!("relocated {} -> {}", source, url);
                self.cache.insert(source.to_string(), url.clone());
                self.uploads += 1;
                Some(url)
            }
            Err(e) => {
                warn!("upload via '{}' failed for {}: {}", uploader.name(), source, e);
                self.failures += 1;
                None
            }
        }
    }

    /// Relocate the fixed masthead image. Missing file → omitted.
    pub(crate) async fn relocate_banner(&mut self, path: &Path) -> Option<String> {
        if !path.exists() {
            warn!("banner image not found at {}, omitting banner", path.display());
            return None;
        }
        self.relocate(&path.to_string_lossy()).await
    }

    /// Zero the per-run counters. The cache itself survives, which is the
    /// point: a second document reuses earlier uploads.
    pub(crate) fn begin_run(&mut self) {
        self.uploads = 0;
        self.cache_hits = 0;
        self.failures = 0;
    }

    pub(crate) fn uploads(&self) -> usize {
        self.uploads
    }

    pub(crate) fn cache_hits(&self) -> usize {
        self.cache_hits
    }

    pub(crate) fn failures(&self) -> usize {
        self.failures
    }

    pub(crate) fn cached(&self) -> usize {
        self.cache.len()
    }

    pub(crate) fn reset(&mut self) {
        self.cache.clear();
    }
}

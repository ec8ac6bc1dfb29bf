use chrono::Local;
use image::DynamicImage;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::config::DiagnosticsConfig;

/// Receives the offending image of every failed parse. Purely observational.
pub trait DiagnosticsSink: Send + Sync {
    fn capture(&self, tag: &str, image: &DynamicImage);
}

/// Discards everything
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn capture(&self, _tag: &str, _image: &DynamicImage) {}
}

/// Process-wide capture sequence so concurrent captures never share a name
static CAPTURE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Writes failure screenshots as PNG files
pub struct ScreenshotSink {
    dir: PathBuf,
}

impl ScreenshotSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<data dir>/item-descr-reader/screenshots`
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("item-descr-reader").join("screenshots"))
    }

    /// Sink described by the config, `None` when captures are disabled
    pub fn from_config(config: &DiagnosticsConfig) -> Option<Self> {
        if !config.capture_failures {
            return None;
        }
        config
            .screenshot_dir
            .clone()
            .or_else(Self::default_dir)
            .map(Self::new)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn next_path(&self, tag: &str) -> PathBuf {
        let seq = CAPTURE_SEQ.fetch_add(1, Ordering::Relaxed);
        let timestamp = Local::now().format("%Y%m%d_%H%M%S%.3f");
        self.dir.join(format!(
            "{}_{}_{:04}_{}.png",
            timestamp,
            std::process::id(),
            seq,
            tag
        ))
    }
}

impl DiagnosticsSink for ScreenshotSink {
    fn capture(&self, tag: &str, image: &DynamicImage) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            tracing::warn!(dir = %self.dir.display(), "failed to create screenshot directory: {}", e);
            return;
        }

        let path = self.next_path(tag);
        match image.save(&path) {
            Ok(()) => tracing::info!(path = %path.display(), "saved failure screenshot"),
            Err(e) => tracing::warn!(path = %path.display(), "failed to save screenshot: {}", e),
        }
    }
}

/// One capture kept by [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub tag: String,
    pub width: u32,
    pub height: u32,
}

/// Keeps captures in memory, for hosts that show failures themselves
#[derive(Default)]
pub struct MemorySink {
    captures: Mutex<Vec<Capture>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captures(&self) -> Vec<Capture> {
        self.captures.lock().clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.captures.lock().iter().map(|c| c.tag.clone()).collect()
    }

    pub fn clear(&self) {
        self.captures.lock().clear();
    }
}

impl DiagnosticsSink for MemorySink {
    fn capture(&self, tag: &str, image: &DynamicImage) {
        self.captures.lock().push(Capture {
            tag: tag.to_string(),
            width: image.width(),
            height: image.height(),
        });
    }
}

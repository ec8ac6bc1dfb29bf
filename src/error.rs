use std::fmt;
use thiserror::Error;

/// Extraction step a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Inherent,
    Affix,
    AspectOrUnique,
}

impl FailureStage {
    pub fn tag(&self) -> &'static str {
        match self {
            FailureStage::Inherent => "inherent",
            FailureStage::Affix => "affix",
            FailureStage::AspectOrUnique => "aspect_or_unique",
        }
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Why a description could not be read. Terminal for one parse only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("could not detect item_separator_short")]
    SeparatorNotFound,

    #[error("could not detect item power and item type: {debug}")]
    Classification { debug: String },

    #[error("could not find {stage}: {debug}")]
    Extraction { stage: FailureStage, debug: String },
}

impl ReadError {
    /// Short tag naming the failed step, used for screenshots
    pub fn tag(&self) -> &'static str {
        match self {
            ReadError::SeparatorNotFound => "separator_short",
            ReadError::Classification { .. } => "itempower_itemtype",
            ReadError::Extraction { stage, .. } => stage.tag(),
        }
    }
}

/// Loading or storing the reader configuration failed
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    NoConfigDir,

    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loading landmark templates failed
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("failed to read template directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to load template {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("no templates loaded from {0}")]
    Empty(String),
}

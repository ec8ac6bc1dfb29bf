//! Reads item description panels cropped from game screenshots.
//!
//! [`DescrReader`] anchors on the short separator below the item header,
//! reads the item type, then decodes inherent affixes, affixes and (for
//! uniques) the aspect line. Text decoding and template matching are
//! pluggable through the traits in [`services::ocr`].

pub mod error;
pub mod models;
pub mod services;

pub use error::{ConfigError, FailureStage, ReadError, TemplateError};
pub use models::config::{DiagnosticsConfig, LayoutConfig, MatchThresholds, ReaderConfig};
pub use models::item::{Affix, AffixKind, Aspect, Item, ItemRarity, ItemType};
pub use services::config::{init_layout, layout, ConfigManager};
pub use services::diagnostics::{DiagnosticsSink, MemorySink, NullSink, ScreenshotSink};
pub use services::reader::DescrReader;

/// Install the global tracing subscriber, filtered by `RUST_LOG` (default
/// `info`). Later calls are no-ops.
pub fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let result = if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

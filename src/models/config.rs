use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Reference resolution the layout constants were measured at
pub const BASE_WIDTH: u32 = 1920;
pub const BASE_HEIGHT: u32 = 1080;

/// Resolution dependent layout constants of the description panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutConfig {
    /// Height of one text line in the description
    pub item_descr_line_height: u32,
    /// Distance from the top the separator is searched in
    pub separator_search_height: u32,
    /// Width of the left column holding bullets and sockets
    pub bullet_column_width: u32,
    /// Matches closer than this (vertically) are the same marker
    pub min_landmark_spacing: u32,
    /// Factor applied to templates recorded at the reference resolution
    pub template_scale: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            item_descr_line_height: 25,
            separator_search_height: 220,
            bullet_column_width: 44,
            min_landmark_spacing: 10,
            template_scale: 1.0,
        }
    }
}

impl LayoutConfig {
    /// Scale the reference layout to a screen of the given size.
    ///
    /// The panel scales with the screen height; ultra-wide screens only add
    /// horizontal space, so the width is ignored unless it is the smaller side.
    pub fn scaled_to(&self, width: u32, height: u32) -> Self {
        let by_height = height as f64 / BASE_HEIGHT as f64;
        let by_width = width as f64 / BASE_WIDTH as f64;
        let factor = by_height.min(by_width);
        let scale = |value: u32| ((value as f64 * factor).round() as u32).max(1);

        Self {
            item_descr_line_height: scale(self.item_descr_line_height),
            separator_search_height: scale(self.separator_search_height),
            bullet_column_width: scale(self.bullet_column_width),
            min_landmark_spacing: scale(self.min_landmark_spacing),
            template_scale: self.template_scale * factor,
        }
    }
}

/// Minimum match scores (normalized cross-correlation, 0.0-1.0)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchThresholds {
    pub separator: f32,
    pub affix_bullet: f32,
    pub aspect_bullet: f32,
    pub codex_upgrade: f32,
    pub empty_socket: f32,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            separator: 0.68,
            affix_bullet: 0.8,
            aspect_bullet: 0.8,
            codex_upgrade: 0.8,
            empty_socket: 0.8,
        }
    }
}

/// Where and how failures are reported
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticsConfig {
    /// Directory for failure screenshots, platform data dir when unset
    pub screenshot_dir: Option<PathBuf>,
    pub capture_failures: bool,
    pub json_logs: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            screenshot_dir: None,
            capture_failures: true,
            json_logs: false,
        }
    }
}

/// Complete reader configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ReaderConfig {
    pub layout: LayoutConfig,
    pub thresholds: MatchThresholds,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    /// Directory holding the landmark template PNGs
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_config_default() {
        let config = ReaderConfig::default();

        assert_eq!(config.layout.item_descr_line_height, 25);
        assert_eq!(config.layout.template_scale, 1.0);
        assert_eq!(config.thresholds.separator, 0.68);
        assert_eq!(config.thresholds.affix_bullet, 0.8);
        assert!(config.diagnostics.capture_failures);
        assert!(config.diagnostics.screenshot_dir.is_none());
        assert!(config.template_dir.is_none());
    }

    #[test]
    fn test_reader_config_serialization() {
        let config = ReaderConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();

        let deserialized: ReaderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_diagnostics_section_uses_defaults() {
        let json = r#"{
            "layout": {
                "item_descr_line_height": 30,
                "separator_search_height": 260,
                "bullet_column_width": 52,
                "min_landmark_spacing": 12,
                "template_scale": 1.2
            },
            "thresholds": {
                "separator": 0.7,
                "affix_bullet": 0.75,
                "aspect_bullet": 0.75,
                "codex_upgrade": 0.8,
                "empty_socket": 0.8
            }
        }"#;

        let config: ReaderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.layout.item_descr_line_height, 30);
        assert_eq!(config.diagnostics, DiagnosticsConfig::default());
    }

    #[test]
    fn test_layout_scaled_to_1440p() {
        let layout = LayoutConfig::default().scaled_to(2560, 1440);

        // 25 * 1.333.. = 33.3
        assert_eq!(layout.item_descr_line_height, 33);
        assert_eq!(layout.bullet_column_width, 59);
        assert!((layout.template_scale - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_layout_scaled_ultrawide_follows_height() {
        let layout = LayoutConfig::default().scaled_to(3440, 1440);
        assert_eq!(layout, LayoutConfig::default().scaled_to(2560, 1440));
    }

    #[test]
    fn test_layout_scaled_never_zero() {
        let layout = LayoutConfig::default().scaled_to(16, 9);
        assert!(layout.item_descr_line_height >= 1);
        assert!(layout.min_landmark_spacing >= 1);
    }
}

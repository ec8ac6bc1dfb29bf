//! Locates the fixed markers of the description panel.
//!
//! Everything below the header is found relative to the short separator, so
//! its absence ends the parse. Bullets and sockets come back top to bottom:
//! the order is the order of the affix lines.

use image::GrayImage;

use crate::models::config::{LayoutConfig, MatchThresholds};
use crate::models::landmark::{Landmark, LandmarkMatch};
use crate::models::roi::Roi;
use crate::services::ocr::TemplateLocator;

pub struct LandmarkDetector<'a> {
    locator: &'a dyn TemplateLocator,
    layout: &'a LayoutConfig,
    thresholds: &'a MatchThresholds,
}

impl<'a> LandmarkDetector<'a> {
    pub fn new(
        locator: &'a dyn TemplateLocator,
        layout: &'a LayoutConfig,
        thresholds: &'a MatchThresholds,
    ) -> Self {
        Self {
            locator,
            layout,
            thresholds,
        }
    }

    /// Best separator match in the top part of the image
    pub fn find_separator_short(&self, image: &GrayImage) -> Option<LandmarkMatch> {
        let (width, height) = image.dimensions();
        let window = Roi::new(0, 0, width, self.layout.separator_search_height.min(height));

        self.search(image, Landmark::SeparatorShort, window, self.thresholds.separator)
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score).then(b.y().cmp(&a.y())))
    }

    pub fn find_affix_bullets(
        &self,
        image: &GrayImage,
        separator: &LandmarkMatch,
    ) -> Vec<LandmarkMatch> {
        let window = self.bullet_column(image, separator);
        let bullets = self.top_to_bottom(self.search(
            image,
            Landmark::AffixBullet,
            window,
            self.thresholds.affix_bullet,
        ));
        tracing::debug!(count = bullets.len(), "affix bullets");
        bullets
    }

    /// Topmost aspect bullet below the separator
    pub fn find_aspect_bullet(
        &self,
        image: &GrayImage,
        separator: &LandmarkMatch,
    ) -> Option<LandmarkMatch> {
        let window = self.bullet_column(image, separator);
        self.top_to_bottom(self.search(
            image,
            Landmark::AspectBullet,
            window,
            self.thresholds.aspect_bullet,
        ))
        .into_iter()
        .next()
    }

    /// The codex icon sits on the aspect line, right of the bullet column
    pub fn find_codex_upgrade_icon(
        &self,
        image: &GrayImage,
        aspect_bullet: Option<&LandmarkMatch>,
    ) -> bool {
        let Some(aspect_bullet) = aspect_bullet else {
            return false;
        };

        let line_height = self.layout.item_descr_line_height;
        let width = image.width();
        let x = self.layout.bullet_column_width.min(width);
        let window = Roi::new(
            x,
            aspect_bullet.y().saturating_sub(line_height),
            width - x,
            line_height * 2,
        );

        !self
            .search(image, Landmark::CodexUpgradeIcon, window, self.thresholds.codex_upgrade)
            .is_empty()
    }

    pub fn find_empty_sockets(
        &self,
        image: &GrayImage,
        separator: &LandmarkMatch,
    ) -> Vec<LandmarkMatch> {
        let window = self.bullet_column(image, separator);
        let sockets = self.top_to_bottom(self.search(
            image,
            Landmark::EmptySocket,
            window,
            self.thresholds.empty_socket,
        ));
        tracing::debug!(count = sockets.len(), "empty sockets");
        sockets
    }

    /// Left column from the separator down to the bottom of the image
    fn bullet_column(&self, image: &GrayImage, separator: &LandmarkMatch) -> Roi {
        let (width, height) = image.dimensions();
        Roi::new(
            0,
            separator.y(),
            self.layout.bullet_column_width.min(width),
            height.saturating_sub(separator.y()),
        )
    }

    fn search(
        &self,
        image: &GrayImage,
        landmark: Landmark,
        window: Roi,
        threshold: f32,
    ) -> Vec<LandmarkMatch> {
        let matches: Vec<LandmarkMatch> = landmark
            .templates()
            .iter()
            .flat_map(|template| self.locator.locate(image, template, window, threshold))
            .collect();
        tracing::trace!(landmark = landmark.name(), hits = matches.len(), ?window, "template search");
        matches
    }

    /// Sort by y and merge matches of different templates on the same line,
    /// keeping the better score.
    fn top_to_bottom(&self, mut matches: Vec<LandmarkMatch>) -> Vec<LandmarkMatch> {
        matches.sort_by_key(|m| m.y());

        let mut merged: Vec<LandmarkMatch> = Vec::with_capacity(matches.len());
        for m in matches {
            match merged.last_mut() {
                Some(last) if m.y() - last.y() < self.layout.min_landmark_spacing => {
                    if m.score > last.score {
                        *last = m;
                    }
                }
                _ => merged.push(m),
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::ScriptedLocator;

    fn gray(w: u32, h: u32) -> GrayImage {
        GrayImage::new(w, h)
    }

    fn detect<'a>(
        locator: &'a ScriptedLocator,
        layout: &'a LayoutConfig,
        thresholds: &'a MatchThresholds,
    ) -> LandmarkDetector<'a> {
        LandmarkDetector::new(locator, layout, thresholds)
    }

    #[test]
    fn test_separator_best_score_wins() {
        let locator = ScriptedLocator::new()
            .with("item_separator_short_rare", 200, 60, 0.75)
            .with("item_separator_short_legendary", 200, 64, 0.9);
        let (layout, thresholds) = (LayoutConfig::default(), MatchThresholds::default());

        let sep = detect(&locator, &layout, &thresholds)
            .find_separator_short(&gray(400, 600))
            .unwrap();
        assert_eq!(sep.center, (200, 64));
        assert_eq!(sep.name, "item_separator_short_legendary");
    }

    #[test]
    fn test_separator_outside_search_band_is_ignored() {
        // Deep in the panel, e.g. a separator of a compared item
        let locator = ScriptedLocator::new().with("item_separator_short_rare", 200, 400, 0.95);
        let (layout, thresholds) = (LayoutConfig::default(), MatchThresholds::default());

        assert!(detect(&locator, &layout, &thresholds)
            .find_separator_short(&gray(400, 600))
            .is_none());
    }

    #[test]
    fn test_separator_below_threshold_is_missing() {
        let locator = ScriptedLocator::new().with("item_separator_short_rare", 200, 60, 0.5);
        let (layout, thresholds) = (LayoutConfig::default(), MatchThresholds::default());

        assert!(detect(&locator, &layout, &thresholds)
            .find_separator_short(&gray(400, 600))
            .is_none());
    }

    #[test]
    fn test_affix_bullets_sorted_and_merged() {
        let locator = ScriptedLocator::new()
            .with("affix_bullet_point", 20, 300, 0.9)
            .with("greater_affix_bullet_point", 20, 150, 0.95)
            .with("tempered_affix_bullet_point", 20, 220, 0.85)
            // Same line as the greater bullet, weaker
            .with("affix_bullet_point", 21, 153, 0.82)
            // Above the separator
            .with("affix_bullet_point", 20, 40, 0.99)
            // Outside the bullet column
            .with("affix_bullet_point", 200, 260, 0.99);
        let (layout, thresholds) = (LayoutConfig::default(), MatchThresholds::default());
        let sep = LandmarkMatch::new((200, 60), "item_separator_short_rare", 0.9);

        let bullets = detect(&locator, &layout, &thresholds).find_affix_bullets(&gray(400, 600), &sep);

        let ys: Vec<u32> = bullets.iter().map(|b| b.y()).collect();
        assert_eq!(ys, vec![150, 220, 300]);
        assert_eq!(bullets[0].name, "greater_affix_bullet_point");
    }

    #[test]
    fn test_no_bullets_is_empty_not_error() {
        let locator = ScriptedLocator::new();
        let (layout, thresholds) = (LayoutConfig::default(), MatchThresholds::default());
        let sep = LandmarkMatch::new((200, 60), "item_separator_short_rare", 0.9);
        let detector = detect(&locator, &layout, &thresholds);

        assert!(detector.find_affix_bullets(&gray(400, 600), &sep).is_empty());
        assert!(detector.find_empty_sockets(&gray(400, 600), &sep).is_empty());
        assert!(detector.find_aspect_bullet(&gray(400, 600), &sep).is_none());
    }

    #[test]
    fn test_aspect_bullet_topmost() {
        let locator = ScriptedLocator::new()
            .with("unique_bullet_point", 20, 480, 0.9)
            .with("aspect_bullet_point", 20, 420, 0.85);
        let (layout, thresholds) = (LayoutConfig::default(), MatchThresholds::default());
        let sep = LandmarkMatch::new((200, 60), "item_separator_short_unique", 0.9);

        let aspect = detect(&locator, &layout, &thresholds)
            .find_aspect_bullet(&gray(400, 600), &sep)
            .unwrap();
        assert_eq!(aspect.y(), 420);
    }

    #[test]
    fn test_codex_icon_needs_aspect_line() {
        let locator = ScriptedLocator::new().with("codex_upgrade_icon", 300, 425, 0.9);
        let (layout, thresholds) = (LayoutConfig::default(), MatchThresholds::default());
        let detector = detect(&locator, &layout, &thresholds);
        let image = gray(400, 600);

        let on_line = LandmarkMatch::new((20, 420), "aspect_bullet_point", 0.9);
        let far_away = LandmarkMatch::new((20, 200), "aspect_bullet_point", 0.9);

        assert!(detector.find_codex_upgrade_icon(&image, Some(&on_line)));
        assert!(!detector.find_codex_upgrade_icon(&image, Some(&far_away)));
        assert!(!detector.find_codex_upgrade_icon(&image, None));
    }

    #[test]
    fn test_empty_sockets_sorted() {
        let locator = ScriptedLocator::new()
            .with("empty_socket", 22, 560, 0.9)
            .with("empty_socket", 22, 520, 0.9);
        let (layout, thresholds) = (LayoutConfig::default(), MatchThresholds::default());
        let sep = LandmarkMatch::new((200, 60), "item_separator_short_rare", 0.9);

        let sockets = detect(&locator, &layout, &thresholds).find_empty_sockets(&gray(400, 600), &sep);
        let ys: Vec<u32> = sockets.iter().map(|s| s.y()).collect();
        assert_eq!(ys, vec![520, 560]);
    }
}

//! Turns a cropped description panel into an [`Item`].
//!
//! A parse walks a fixed sequence of stages. Every stage either hands the
//! next one its state, finishes the item early, or fails with a tagged
//! error; there are no backward edges. Retries happen inside the
//! classifier and the extractors, never here.

use image::{DynamicImage, GrayImage};
use rayon::prelude::*;
use std::sync::Arc;

use crate::error::{ReadError, TemplateError};
use crate::models::config::{LayoutConfig, MatchThresholds, ReaderConfig};
use crate::models::item::{Item, ItemRarity, ItemType};
use crate::models::landmark::LandmarkMatch;
use crate::services::classifier::{carries_no_affixes, classify};
use crate::services::config;
use crate::services::diagnostics::{DiagnosticsSink, NullSink, ScreenshotSink};
use crate::services::extractor::{extract_affixes, extract_aspect, extract_inherent};
use crate::services::landmarks::LandmarkDetector;
use crate::services::ocr::{
    AffixDecoder, AspectDecoder, ItemTypeDecoder, TemplateLocator, TemplateMatcher,
};
use crate::services::regions::{affix_bottom, split_bullets, BulletSplit};

/// Landmarks found below the separator once the item type is known
#[derive(Debug, Clone)]
struct PanelLandmarks {
    split: BulletSplit,
    aspect_bullet: Option<LandmarkMatch>,
    empty_sockets: Vec<LandmarkMatch>,
}

#[derive(Debug)]
enum Stage {
    Start,
    SeparatorFound {
        separator: LandmarkMatch,
    },
    TypeResolved {
        item: Item,
        separator: LandmarkMatch,
    },
    BulletsLocated {
        item: Item,
        item_type: ItemType,
        landmarks: PanelLandmarks,
    },
    InherentParsed {
        item: Item,
        item_type: ItemType,
        landmarks: PanelLandmarks,
    },
    AffixesParsed {
        item: Item,
        aspect_bullet: Option<LandmarkMatch>,
    },
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::SeparatorFound { .. } => "separator_found",
            Stage::TypeResolved { .. } => "type_resolved",
            Stage::BulletsLocated { .. } => "bullets_located",
            Stage::InherentParsed { .. } => "inherent_parsed",
            Stage::AffixesParsed { .. } => "affixes_parsed",
        }
    }
}

enum Transition {
    Continue(Stage),
    Done(Item),
    Failed(ReadError),
}

/// State of one parse call
struct Pass<'a> {
    reader: &'a DescrReader,
    rarity: ItemRarity,
    image: &'a DynamicImage,
    gray: GrayImage,
}

impl Pass<'_> {
    fn detector(&self) -> LandmarkDetector<'_> {
        LandmarkDetector::new(
            self.reader.locator.as_ref(),
            &self.reader.layout,
            &self.reader.thresholds,
        )
    }

    fn run(self) -> Result<Item, ReadError> {
        let mut stage = Stage::Start;
        loop {
            let name = stage.name();
            match self.advance(stage) {
                Transition::Continue(next) => {
                    tracing::trace!(from = name, to = next.name(), "descr stage");
                    stage = next;
                }
                Transition::Done(item) => return Ok(item),
                Transition::Failed(e) => return Err(e),
            }
        }
    }

    fn advance(&self, stage: Stage) -> Transition {
        match stage {
            Stage::Start => match self.detector().find_separator_short(&self.gray) {
                Some(separator) => Transition::Continue(Stage::SeparatorFound { separator }),
                None => Transition::Failed(ReadError::SeparatorNotFound),
            },

            Stage::SeparatorFound { separator } => {
                let base = Item::new(self.rarity);
                match classify(
                    self.reader.type_decoder.as_ref(),
                    &base,
                    self.image,
                    &separator,
                ) {
                    Ok(classified) => {
                        tracing::debug!(
                            item_type = %classified.item_type,
                            matched = %classified.matched,
                            "item type resolved"
                        );
                        Transition::Continue(Stage::TypeResolved {
                            item: classified.item,
                            separator,
                        })
                    }
                    Err(e) => Transition::Failed(e),
                }
            }

            Stage::TypeResolved { item, separator } => {
                let item_type = match item.item_type {
                    Some(item_type) if !carries_no_affixes(&item) => item_type,
                    _ => return Transition::Done(item),
                };
                self.locate_bullets(item, item_type, &separator)
            }

            Stage::BulletsLocated {
                mut item,
                item_type,
                landmarks,
            } => {
                match extract_inherent(
                    self.reader.affix_decoder.as_ref(),
                    self.image,
                    &landmarks.split,
                    item_type == ItemType::Sigil,
                    self.reader.layout.item_descr_line_height,
                ) {
                    Ok(inherent) => {
                        item.inherent = inherent;
                        Transition::Continue(Stage::InherentParsed {
                            item,
                            item_type,
                            landmarks,
                        })
                    }
                    Err(e) => Transition::Failed(e),
                }
            }

            Stage::InherentParsed {
                mut item,
                item_type,
                landmarks,
            } => {
                let bottom_limit = affix_bottom(
                    landmarks.aspect_bullet.as_ref(),
                    &landmarks.empty_sockets,
                    self.image.height(),
                );
                match extract_affixes(
                    self.reader.affix_decoder.as_ref(),
                    self.image,
                    &landmarks.split.affixes,
                    bottom_limit,
                    item_type == ItemType::Sigil,
                ) {
                    Ok(affixes) => {
                        item.affixes = affixes;
                        Transition::Continue(Stage::AffixesParsed {
                            item,
                            aspect_bullet: landmarks.aspect_bullet,
                        })
                    }
                    Err(e) => Transition::Failed(e),
                }
            }

            Stage::AffixesParsed {
                mut item,
                aspect_bullet,
            } => {
                if self.rarity != ItemRarity::Unique {
                    return Transition::Done(item);
                }
                match extract_aspect(
                    self.reader.aspect_decoder.as_ref(),
                    self.image,
                    aspect_bullet.as_ref(),
                ) {
                    Ok(aspect) => {
                        item.aspect = Some(aspect);
                        Transition::Done(item)
                    }
                    Err(e) => Transition::Failed(e),
                }
            }
        }
    }

    fn locate_bullets(
        &self,
        mut item: Item,
        item_type: ItemType,
        separator: &LandmarkMatch,
    ) -> Transition {
        let detector = self.detector();

        let bullets = detector.find_affix_bullets(&self.gray, separator);
        let aspect_bullet = if self.rarity.has_aspect_slot() {
            detector.find_aspect_bullet(&self.gray, separator)
        } else {
            None
        };
        item.codex_upgrade = detector.find_codex_upgrade_icon(&self.gray, aspect_bullet.as_ref());
        let empty_sockets = detector.find_empty_sockets(&self.gray, separator);

        let split = split_bullets(item_type, bullets);
        tracing::debug!(
            inherent = split.inherent.len(),
            affixes = split.affixes.len(),
            sockets = empty_sockets.len(),
            aspect = aspect_bullet.is_some(),
            "bullets located"
        );

        Transition::Continue(Stage::BulletsLocated {
            item,
            item_type,
            landmarks: PanelLandmarks {
                split,
                aspect_bullet,
                empty_sockets,
            },
        })
    }
}

/// Item description reader. Cheap to share across threads; every call is
/// independent.
pub struct DescrReader {
    locator: Arc<dyn TemplateLocator>,
    type_decoder: Arc<dyn ItemTypeDecoder>,
    affix_decoder: Arc<dyn AffixDecoder>,
    aspect_decoder: Arc<dyn AspectDecoder>,
    sink: Arc<dyn DiagnosticsSink>,
    layout: LayoutConfig,
    thresholds: MatchThresholds,
}

impl DescrReader {
    /// Reader with the process-wide layout, default thresholds and no
    /// diagnostics sink
    pub fn new(
        locator: Arc<dyn TemplateLocator>,
        type_decoder: Arc<dyn ItemTypeDecoder>,
        affix_decoder: Arc<dyn AffixDecoder>,
        aspect_decoder: Arc<dyn AspectDecoder>,
    ) -> Self {
        Self {
            locator,
            type_decoder,
            affix_decoder,
            aspect_decoder,
            sink: Arc::new(NullSink),
            layout: config::layout().clone(),
            thresholds: MatchThresholds::default(),
        }
    }

    /// Reader backed by the template directory and diagnostics described in
    /// `config`
    pub fn from_config(
        config: &ReaderConfig,
        type_decoder: Arc<dyn ItemTypeDecoder>,
        affix_decoder: Arc<dyn AffixDecoder>,
        aspect_decoder: Arc<dyn AspectDecoder>,
    ) -> Result<Self, TemplateError> {
        let mut matcher = TemplateMatcher::new();
        if let Some(dir) = &config.template_dir {
            matcher.load_templates(dir, config.layout.template_scale)?;
        }

        let mut reader = Self::new(Arc::new(matcher), type_decoder, affix_decoder, aspect_decoder)
            .with_layout(config.layout.clone())
            .with_thresholds(config.thresholds.clone());
        if let Some(sink) = ScreenshotSink::from_config(&config.diagnostics) {
            tracing::info!(dir = %sink.dir().display(), "failure screenshots enabled");
            reader = reader.with_sink(Arc::new(sink));
        }
        Ok(reader)
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_thresholds(mut self, thresholds: MatchThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Parse one panel. `rarity` is the rarity known from the caller's
    /// context; the header may still refine it.
    pub fn try_read_descr(
        &self,
        rarity: ItemRarity,
        image: &DynamicImage,
    ) -> Result<Item, ReadError> {
        Pass {
            reader: self,
            rarity,
            image,
            gray: image.to_luma8(),
        }
        .run()
    }

    /// Parse one panel, `None` on failure. With `show_warnings` the failure
    /// is logged and the image handed to the diagnostics sink.
    pub fn read_descr(
        &self,
        rarity: ItemRarity,
        image: &DynamicImage,
        show_warnings: bool,
    ) -> Option<Item> {
        match self.try_read_descr(rarity, image) {
            Ok(item) => Some(item),
            Err(e) => {
                if show_warnings {
                    tracing::warn!(tag = e.tag(), ?rarity, "{}", e);
                    self.sink.capture(&format!("failed_{}", e.tag()), image);
                }
                None
            }
        }
    }

    /// Parse independent panels in parallel. Results keep the input order.
    pub fn read_descr_batch(
        &self,
        jobs: &[(ItemRarity, DynamicImage)],
        show_warnings: bool,
    ) -> Vec<Option<Item>> {
        jobs.par_iter()
            .map(|(rarity, image)| self.read_descr(*rarity, image, show_warnings))
            .collect()
    }
}

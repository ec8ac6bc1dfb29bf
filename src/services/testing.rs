//! Scripted stand-ins for the locator, the decoders and their bookkeeping.

use image::{DynamicImage, GrayImage};
use parking_lot::Mutex;

use crate::models::item::{Affix, AffixKind, Aspect, ItemRarity, ItemType};
use crate::models::landmark::LandmarkMatch;
use crate::models::roi::Roi;
use crate::services::ocr::{
    AffixDecoder, AffixRequest, AspectDecoder, DecodeFailure, ItemTypeDecoder, TemplateLocator,
    TypeReading,
};

pub fn blank(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::new(width, height))
}

pub fn bullets_at(ys: &[u32]) -> Vec<LandmarkMatch> {
    ys.iter()
        .map(|&y| LandmarkMatch::new((20, y), "affix_bullet_point", 0.9))
        .collect()
}

/// Locator answering from a fixed list of template hits
#[derive(Default)]
pub struct ScriptedLocator {
    marks: Vec<LandmarkMatch>,
    queried: Mutex<Vec<String>>,
}

impl ScriptedLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, template: &str, x: u32, y: u32, score: f32) -> Self {
        self.marks.push(LandmarkMatch::new((x, y), template, score));
        self
    }

    /// Templates asked for so far, in order
    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().clone()
    }
}

impl TemplateLocator for ScriptedLocator {
    fn locate(
        &self,
        _image: &GrayImage,
        template: &str,
        window: Roi,
        threshold: f32,
    ) -> Vec<LandmarkMatch> {
        self.queried.lock().push(template.to_string());
        self.marks
            .iter()
            .filter(|m| m.name == template && window.contains(m.x(), m.y()) && m.score >= threshold)
            .cloned()
            .collect()
    }
}

pub struct FakeTypeDecoder {
    reading: Option<TypeReading>,
    failing_modes: Vec<bool>,
    calls: Mutex<Vec<bool>>,
}

impl FakeTypeDecoder {
    pub fn returning(item_type: ItemType) -> Self {
        Self {
            reading: Some(TypeReading {
                item_type,
                rarity: None,
                power: Some(800),
                matched: item_type.label().to_string(),
            }),
            failing_modes: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unreadable() -> Self {
        Self {
            reading: None,
            failing_modes: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_when(mut self, preprocess: bool) -> Self {
        self.failing_modes.push(preprocess);
        self
    }

    pub fn with_rarity(mut self, rarity: ItemRarity) -> Self {
        if let Some(reading) = self.reading.as_mut() {
            reading.rarity = Some(rarity);
        }
        self
    }

    /// Preprocessing flag of every call
    pub fn calls(&self) -> Vec<bool> {
        self.calls.lock().clone()
    }
}

impl ItemTypeDecoder for FakeTypeDecoder {
    fn decode_type(
        &self,
        _image: &DynamicImage,
        _separator: &LandmarkMatch,
        preprocess: bool,
    ) -> Result<TypeReading, DecodeFailure> {
        self.calls.lock().push(preprocess);
        match &self.reading {
            Some(reading) if !self.failing_modes.contains(&preprocess) => Ok(reading.clone()),
            _ => Err(DecodeFailure::new(format!(
                "unreadable header, preprocess={}",
                preprocess
            ))),
        }
    }
}

/// One recorded affix decode
#[derive(Debug, Clone, PartialEq)]
pub struct AffixCall {
    pub bullet_ys: Vec<u32>,
    pub bottom_limit: u32,
    pub is_sigil: bool,
    pub is_inherent: bool,
    pub preprocess: bool,
}

/// Decodes one affix per bullet unless told to fail
#[derive(Default)]
pub struct FakeAffixDecoder {
    failing_inherent: Vec<bool>,
    failing_normal: Vec<bool>,
    calls: Mutex<Vec<AffixCall>>,
}

impl FakeAffixDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_inherent(mut self, modes: &[bool]) -> Self {
        self.failing_inherent.extend_from_slice(modes);
        self
    }

    pub fn failing_normal(mut self, modes: &[bool]) -> Self {
        self.failing_normal.extend_from_slice(modes);
        self
    }

    pub fn calls(&self) -> Vec<AffixCall> {
        self.calls.lock().clone()
    }

    pub fn inherent_calls(&self) -> usize {
        self.calls.lock().iter().filter(|c| c.is_inherent).count()
    }
}

impl AffixDecoder for FakeAffixDecoder {
    fn decode_affixes(
        &self,
        request: &AffixRequest<'_>,
        preprocess: bool,
    ) -> Result<Vec<Affix>, DecodeFailure> {
        self.calls.lock().push(AffixCall {
            bullet_ys: request.bullets.iter().map(|b| b.y()).collect(),
            bottom_limit: request.bottom_limit,
            is_sigil: request.is_sigil,
            is_inherent: request.is_inherent,
            preprocess,
        });

        let failing = if request.is_inherent {
            &self.failing_inherent
        } else {
            &self.failing_normal
        };
        if failing.contains(&preprocess) {
            return Err(DecodeFailure::new(format!(
                "no affix text above y={}",
                request.bottom_limit
            )));
        }

        Ok(request
            .bullets
            .iter()
            .map(|bullet| {
                let kind = if request.is_inherent {
                    AffixKind::Inherent
                } else if bullet.name.starts_with("greater_") {
                    AffixKind::Greater
                } else if bullet.name.starts_with("rerolled_") {
                    AffixKind::Rerolled
                } else if bullet.name.starts_with("tempered_") {
                    AffixKind::Tempered
                } else {
                    AffixKind::Normal
                };
                let name = format!("affix@{}", bullet.y());
                Affix::new(name.clone(), Some(bullet.y() as f32), kind, name)
            })
            .collect())
    }
}

#[derive(Default)]
pub struct FakeAspectDecoder {
    failing_modes: Vec<bool>,
    calls: Mutex<Vec<(Option<u32>, bool)>>,
}

impl FakeAspectDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, modes: &[bool]) -> Self {
        self.failing_modes.extend_from_slice(modes);
        self
    }

    /// (aspect bullet y, preprocess) of every call
    pub fn calls(&self) -> Vec<(Option<u32>, bool)> {
        self.calls.lock().clone()
    }
}

impl AspectDecoder for FakeAspectDecoder {
    fn decode_aspect(
        &self,
        _image: &DynamicImage,
        bullet: Option<&LandmarkMatch>,
        preprocess: bool,
    ) -> Result<Aspect, DecodeFailure> {
        self.calls.lock().push((bullet.map(|b| b.y()), preprocess));
        if self.failing_modes.contains(&preprocess) {
            return Err(DecodeFailure::new("aspect text garbled"));
        }

        Ok(Aspect {
            name: "unique power".to_string(),
            value: Some(25.0),
            text: "Lucky Hit: up to a 25% chance".to_string(),
        })
    }
}

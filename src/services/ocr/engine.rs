//! Seams to the text-recognition and template-matching backends.
//!
//! The reader never looks at pixels itself beyond locating landmarks; every
//! piece of text is handed to one of these decoders together with a
//! preprocessing flag.

use image::{DynamicImage, GrayImage};

use crate::models::item::{Affix, Aspect, ItemRarity, ItemType};
use crate::models::landmark::LandmarkMatch;
use crate::models::roi::Roi;

/// A decoder gave up. `debug` is the raw text it saw, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    pub debug: String,
}

impl DecodeFailure {
    pub fn new(debug: impl Into<String>) -> Self {
        Self {
            debug: debug.into(),
        }
    }
}

/// What the type/tier line decoded to
#[derive(Debug, Clone, PartialEq)]
pub struct TypeReading {
    pub item_type: ItemType,
    /// Set when the tier line disagrees with the rarity passed in
    pub rarity: Option<ItemRarity>,
    pub power: Option<u32>,
    /// Matched type string, kept for diagnostics
    pub matched: String,
}

/// One affix region handed to the affix decoder
#[derive(Debug, Clone, Copy)]
pub struct AffixRequest<'a> {
    pub image: &'a DynamicImage,
    /// Bullets of the region, top to bottom
    pub bullets: &'a [LandmarkMatch],
    /// Lower boundary of the region (exclusive)
    pub bottom_limit: u32,
    pub is_sigil: bool,
    pub is_inherent: bool,
}

/// Reads item type, item power and tier from the header below the separator
pub trait ItemTypeDecoder: Send + Sync {
    fn decode_type(
        &self,
        image: &DynamicImage,
        separator: &LandmarkMatch,
        preprocess: bool,
    ) -> Result<TypeReading, DecodeFailure>;
}

/// Reads the affix lines next to a list of bullets
pub trait AffixDecoder: Send + Sync {
    fn decode_affixes(
        &self,
        request: &AffixRequest<'_>,
        preprocess: bool,
    ) -> Result<Vec<Affix>, DecodeFailure>;
}

/// Reads the aspect text, anchored at the aspect bullet when there is one
pub trait AspectDecoder: Send + Sync {
    fn decode_aspect(
        &self,
        image: &DynamicImage,
        bullet: Option<&LandmarkMatch>,
        preprocess: bool,
    ) -> Result<Aspect, DecodeFailure>;
}

/// Low-level template search
pub trait TemplateLocator: Send + Sync {
    /// All positions of `template` inside `window` scoring at least
    /// `threshold`. Centers are in full-image coordinates; order is unspecified.
    fn locate(
        &self,
        image: &GrayImage,
        template: &str,
        window: Roi,
        threshold: f32,
    ) -> Vec<LandmarkMatch>;
}

//! Hands affix and aspect regions to the text decoders.
//!
//! Every site decodes with preprocessing first and retries exactly once
//! without it; a second failure is terminal and tagged with the site.

use image::DynamicImage;

use crate::error::{FailureStage, ReadError};
use crate::models::item::{Affix, Aspect};
use crate::models::landmark::LandmarkMatch;
use crate::services::fallback::attempt_with_fallback;
use crate::services::ocr::{AffixDecoder, AffixRequest, AspectDecoder};
use crate::services::regions::{inherent_bottom, BulletSplit};

/// Inherent affixes above the first normal affix.
///
/// Skipped (empty result) unless there are inherent bullets *and* normal
/// bullets: the region is bounded by the first normal bullet.
pub fn extract_inherent(
    decoder: &dyn AffixDecoder,
    image: &DynamicImage,
    split: &BulletSplit,
    is_sigil: bool,
    line_height: u32,
) -> Result<Vec<Affix>, ReadError> {
    let Some(first_affix) = split.affixes.first() else {
        return Ok(Vec::new());
    };
    if split.inherent.is_empty() {
        return Ok(Vec::new());
    }

    let request = AffixRequest {
        image,
        bullets: &split.inherent,
        bottom_limit: inherent_bottom(first_affix, line_height),
        is_sigil,
        is_inherent: true,
    };

    decode_affixes(decoder, &request, FailureStage::Inherent)
}

pub fn extract_affixes(
    decoder: &dyn AffixDecoder,
    image: &DynamicImage,
    bullets: &[LandmarkMatch],
    bottom_limit: u32,
    is_sigil: bool,
) -> Result<Vec<Affix>, ReadError> {
    let request = AffixRequest {
        image,
        bullets,
        bottom_limit,
        is_sigil,
        is_inherent: false,
    };

    decode_affixes(decoder, &request, FailureStage::Affix)
}

pub fn extract_aspect(
    decoder: &dyn AspectDecoder,
    image: &DynamicImage,
    bullet: Option<&LandmarkMatch>,
) -> Result<Aspect, ReadError> {
    attempt_with_fallback(FailureStage::AspectOrUnique.tag(), true, |preprocess| {
        decoder.decode_aspect(image, bullet, preprocess)
    })
    .map_err(|failure| ReadError::Extraction {
        stage: FailureStage::AspectOrUnique,
        debug: failure.debug,
    })
}

fn decode_affixes(
    decoder: &dyn AffixDecoder,
    request: &AffixRequest<'_>,
    stage: FailureStage,
) -> Result<Vec<Affix>, ReadError> {
    attempt_with_fallback(stage.tag(), true, |preprocess| {
        decoder.decode_affixes(request, preprocess)
    })
    .map_err(|failure| ReadError::Extraction {
        stage,
        debug: failure.debug,
    })
}

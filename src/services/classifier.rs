use image::DynamicImage;

use crate::error::ReadError;
use crate::models::item::{Item, ItemRarity, ItemType};
use crate::models::landmark::LandmarkMatch;
use crate::services::fallback::attempt_with_fallback;
use crate::services::ocr::ItemTypeDecoder;

/// Item after the header was read
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub item: Item,
    pub item_type: ItemType,
    /// Type string the decoder matched, for diagnostics
    pub matched: String,
}

/// Read item type and item power. Clean renders decode without
/// preprocessing; only when that fails is the preprocessed variant tried.
pub fn classify(
    decoder: &dyn ItemTypeDecoder,
    base: &Item,
    image: &DynamicImage,
    separator: &LandmarkMatch,
) -> Result<Classified, ReadError> {
    let reading = attempt_with_fallback("item type", false, |preprocess| {
        decoder.decode_type(image, separator, preprocess)
    })
    .map_err(|failure| ReadError::Classification {
        debug: failure.debug,
    })?;

    let mut item = base.clone();
    item.item_type = Some(reading.item_type);
    if reading.power.is_some() {
        item.power = reading.power;
    }
    if let Some(rarity) = reading.rarity {
        item.rarity = rarity;
    }

    Ok(Classified {
        item,
        item_type: reading.item_type,
        matched: reading.matched,
    })
}

/// Items whose description ends after the header. Parsing further would
/// only pick up unrelated UI text below the panel.
pub fn carries_no_affixes(item: &Item) -> bool {
    match item.item_type {
        Some(item_type) if item_type.is_consumable() => true,
        Some(ItemType::Sigil) => false,
        _ => matches!(item.rarity, ItemRarity::Magic | ItemRarity::Common),
    }
}

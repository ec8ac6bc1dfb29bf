use crate::models::item::ItemType;
use crate::models::landmark::LandmarkMatch;

/// Number of leading bullets that belong to inherent affixes
pub fn inherent_bullet_count(item_type: ItemType) -> usize {
    match item_type {
        ItemType::ChestArmor | ItemType::Helm | ItemType::Gloves | ItemType::Legs => 0,
        ItemType::Ring => 2,
        ItemType::Sigil => 3,
        ItemType::Shield => 4,
        // Amulets, boots, weapons and the remaining off-hands
        _ => 1,
    }
}

/// Detected bullets split into the inherent prefix and the affix suffix
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BulletSplit {
    pub inherent: Vec<LandmarkMatch>,
    pub affixes: Vec<LandmarkMatch>,
}

/// Split top-to-bottom bullets by item type. Never takes more inherent
/// bullets than were detected.
pub fn split_bullets(item_type: ItemType, mut bullets: Vec<LandmarkMatch>) -> BulletSplit {
    let count = inherent_bullet_count(item_type).min(bullets.len());
    let affixes = bullets.split_off(count);

    BulletSplit {
        inherent: bullets,
        affixes,
    }
}

/// Lower bound of the inherent region: half a line above the first affix
/// bullet, so its icon stays out of the region.
pub fn inherent_bottom(first_affix_bullet: &LandmarkMatch, line_height: u32) -> u32 {
    first_affix_bullet.y().saturating_sub(line_height / 2)
}

/// Lower bound of the affix region: the aspect bullet, else the first empty
/// socket, else the bottom of the image.
pub fn affix_bottom(
    aspect_bullet: Option<&LandmarkMatch>,
    empty_sockets: &[LandmarkMatch],
    image_height: u32,
) -> u32 {
    aspect_bullet
        .or_else(|| empty_sockets.first())
        .map(LandmarkMatch::y)
        .unwrap_or(image_height)
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Item rarity as shown by the tooltip frame
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ItemRarity {
    Common,
    Magic,
    Rare,
    Legendary,
    Unique,
    Mythic,
}

impl ItemRarity {
    /// Rarities whose description can hold an aspect bullet
    pub fn has_aspect_slot(&self) -> bool {
        matches!(self, ItemRarity::Legendary | ItemRarity::Unique)
    }
}

/// Closed set of item categories the reader understands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ItemType {
    // Armor
    ChestArmor,
    Helm,
    Gloves,
    Legs,
    Boots,
    // Jewelry
    Ring,
    Amulet,
    // Off-hands
    Shield,
    Focus,
    Tome,
    OffHandTotem,
    // Weapons
    Axe,
    Axe2H,
    Bow,
    Crossbow2H,
    Dagger,
    Glaive,
    Mace,
    Mace2H,
    Polearm,
    Quarterstaff,
    Scythe,
    Scythe2H,
    Staff,
    Sword,
    Sword2H,
    Wand,
    // Non-equipment
    Sigil,
    Material,
    TemperManual,
    Elixir,
}

impl ItemType {
    pub const ALL: [ItemType; 31] = [
        ItemType::ChestArmor,
        ItemType::Helm,
        ItemType::Gloves,
        ItemType::Legs,
        ItemType::Boots,
        ItemType::Ring,
        ItemType::Amulet,
        ItemType::Shield,
        ItemType::Focus,
        ItemType::Tome,
        ItemType::OffHandTotem,
        ItemType::Axe,
        ItemType::Axe2H,
        ItemType::Bow,
        ItemType::Crossbow2H,
        ItemType::Dagger,
        ItemType::Glaive,
        ItemType::Mace,
        ItemType::Mace2H,
        ItemType::Polearm,
        ItemType::Quarterstaff,
        ItemType::Scythe,
        ItemType::Scythe2H,
        ItemType::Staff,
        ItemType::Sword,
        ItemType::Sword2H,
        ItemType::Wand,
        ItemType::Sigil,
        ItemType::Material,
        ItemType::TemperManual,
        ItemType::Elixir,
    ];

    /// Label as printed in the item description
    pub fn label(&self) -> &'static str {
        match self {
            ItemType::ChestArmor => "Chest Armor",
            ItemType::Helm => "Helm",
            ItemType::Gloves => "Gloves",
            ItemType::Legs => "Pants",
            ItemType::Boots => "Boots",
            ItemType::Ring => "Ring",
            ItemType::Amulet => "Amulet",
            ItemType::Shield => "Shield",
            ItemType::Focus => "Focus",
            ItemType::Tome => "Tome",
            ItemType::OffHandTotem => "Totem",
            ItemType::Axe => "Axe",
            ItemType::Axe2H => "Two-Handed Axe",
            ItemType::Bow => "Bow",
            ItemType::Crossbow2H => "Crossbow",
            ItemType::Dagger => "Dagger",
            ItemType::Glaive => "Glaive",
            ItemType::Mace => "Mace",
            ItemType::Mace2H => "Two-Handed Mace",
            ItemType::Polearm => "Polearm",
            ItemType::Quarterstaff => "Quarterstaff",
            ItemType::Scythe => "Scythe",
            ItemType::Scythe2H => "Two-Handed Scythe",
            ItemType::Staff => "Staff",
            ItemType::Sword => "Sword",
            ItemType::Sword2H => "Two-Handed Sword",
            ItemType::Wand => "Wand",
            ItemType::Sigil => "Nightmare Sigil",
            ItemType::Material => "Crafting Material",
            ItemType::TemperManual => "Temper Manual",
            ItemType::Elixir => "Elixir",
        }
    }

    pub fn is_weapon(&self) -> bool {
        matches!(
            self,
            ItemType::Axe
                | ItemType::Axe2H
                | ItemType::Bow
                | ItemType::Crossbow2H
                | ItemType::Dagger
                | ItemType::Glaive
                | ItemType::Mace
                | ItemType::Mace2H
                | ItemType::Polearm
                | ItemType::Quarterstaff
                | ItemType::Scythe
                | ItemType::Scythe2H
                | ItemType::Staff
                | ItemType::Sword
                | ItemType::Sword2H
                | ItemType::Wand
        )
    }

    /// Non-equipment types whose description never lists affixes
    pub fn is_consumable(&self) -> bool {
        matches!(
            self,
            ItemType::Material | ItemType::TemperManual | ItemType::Elixir
        )
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ItemType::ALL
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("Unknown item type: {}", s))
    }
}

/// How an affix line is marked in the tooltip
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AffixKind {
    #[default]
    Normal,
    Greater,
    Rerolled,
    Tempered,
    Inherent,
}

/// One decoded affix line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Affix {
    pub name: String,
    pub value: Option<f32>,
    pub kind: AffixKind,
    pub text: String,
}

impl Affix {
    pub fn new(name: impl Into<String>, value: Option<f32>, kind: AffixKind, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            kind,
            text: text.into(),
        }
    }
}

/// Decoded aspect (legendary power) of a unique item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Aspect {
    pub name: String,
    pub value: Option<f32>,
    pub text: String,
}

/// Structured record read from one item description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub rarity: ItemRarity,
    pub item_type: Option<ItemType>,
    pub power: Option<u32>,
    pub inherent: Vec<Affix>,
    pub affixes: Vec<Affix>,
    pub aspect: Option<Aspect>,
    pub codex_upgrade: bool,
}

impl Item {
    /// Empty record for a known rarity
    pub fn new(rarity: ItemRarity) -> Self {
        Self {
            rarity,
            item_type: None,
            power: None,
            inherent: Vec::new(),
            affixes: Vec::new(),
            aspect: None,
            codex_upgrade: false,
        }
    }

    pub fn is_sigil(&self) -> bool {
        self.item_type == Some(ItemType::Sigil)
    }
}

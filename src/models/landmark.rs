use serde::{Deserialize, Serialize};

/// Fixed visual markers of the description panel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    /// Short separator line under the item header
    SeparatorShort,
    AffixBullet,
    AspectBullet,
    CodexUpgradeIcon,
    EmptySocket,
}

impl Landmark {
    /// Template names that count as this landmark
    pub fn templates(&self) -> &'static [&'static str] {
        match self {
            Landmark::SeparatorShort => &[
                "item_separator_short_rare",
                "item_separator_short_legendary",
                "item_separator_short_unique",
                "item_separator_short_mythic",
            ],
            Landmark::AffixBullet => &[
                "affix_bullet_point",
                "greater_affix_bullet_point",
                "rerolled_affix_bullet_point",
                "tempered_affix_bullet_point",
            ],
            Landmark::AspectBullet => &["aspect_bullet_point", "unique_bullet_point"],
            Landmark::CodexUpgradeIcon => &["codex_upgrade_icon"],
            Landmark::EmptySocket => &["empty_socket"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Landmark::SeparatorShort => "separator_short",
            Landmark::AffixBullet => "affix_bullet",
            Landmark::AspectBullet => "aspect_bullet",
            Landmark::CodexUpgradeIcon => "codex_upgrade_icon",
            Landmark::EmptySocket => "empty_socket",
        }
    }
}

/// A located marker, center in image coordinates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LandmarkMatch {
    pub center: (u32, u32),
    /// Template that produced the match
    pub name: String,
    pub score: f32,
}

impl LandmarkMatch {
    pub fn new(center: (u32, u32), name: impl Into<String>, score: f32) -> Self {
        Self {
            center,
            name: name.into(),
            score,
        }
    }

    pub fn x(&self) -> u32 {
        self.center.0
    }

    pub fn y(&self) -> u32 {
        self.center.1
    }
}

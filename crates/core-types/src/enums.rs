use crate::constants;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Rarity class of a moon ore, ordered from the absence of a class up to R64.
///
/// Serialized as its numeric value so that data tables can sort on it directly.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum OreRarityClass {
    #[default]
    None,
    R4,
    R8,
    R16,
    R32,
    R64,
}

impl OreRarityClass {
    pub const ALL: [OreRarityClass; 6] = [
        OreRarityClass::None,
        OreRarityClass::R4,
        OreRarityClass::R8,
        OreRarityClass::R16,
        OreRarityClass::R32,
        OreRarityClass::R64,
    ];

    /// The numeric tier (0 for ores without a class).
    pub fn value(&self) -> u8 {
        match self {
            OreRarityClass::None => 0,
            OreRarityClass::R4 => 4,
            OreRarityClass::R8 => 8,
            OreRarityClass::R16 => 16,
            OreRarityClass::R32 => 32,
            OreRarityClass::R64 => 64,
        }
    }

    /// Human readable label, e.g. "R16". Empty for `None`.
    pub fn label(&self) -> &'static str {
        match self {
            OreRarityClass::None => "",
            OreRarityClass::R4 => "R4",
            OreRarityClass::R8 => "R8",
            OreRarityClass::R16 => "R16",
            OreRarityClass::R32 => "R32",
            OreRarityClass::R64 => "R64",
        }
    }

    /// Maps an inventory group id of a moon asteroid to its rarity class.
    pub fn from_eve_group_id(eve_group_id: i32) -> Self {
        match eve_group_id {
            constants::EVE_GROUP_ID_UBIQUITOUS_MOON_ASTEROIDS => OreRarityClass::R4,
            constants::EVE_GROUP_ID_COMMON_MOON_ASTEROIDS => OreRarityClass::R8,
            constants::EVE_GROUP_ID_UNCOMMON_MOON_ASTEROIDS => OreRarityClass::R16,
            constants::EVE_GROUP_ID_RARE_MOON_ASTEROIDS => OreRarityClass::R32,
            constants::EVE_GROUP_ID_EXCEPTIONAL_MOON_ASTEROIDS => OreRarityClass::R64,
            _ => OreRarityClass::None,
        }
    }
}

impl From<OreRarityClass> for u8 {
    fn from(value: OreRarityClass) -> Self {
        value.value()
    }
}

impl TryFrom<u8> for OreRarityClass {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        OreRarityClass::ALL
            .into_iter()
            .find(|class| class.value() == value)
            .ok_or(CoreError::UnknownRarityClass(value))
    }
}

/// Quality class of an ore variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OreQualityClass {
    #[default]
    Undefined,
    Regular,
    Improved,
    Excellent,
}

impl OreQualityClass {
    /// Maps the ore quality attribute (1, 3 or 5) to a quality class.
    pub fn from_quality_level(level: Option<i32>) -> Self {
        match level {
            Some(1) => OreQualityClass::Regular,
            Some(3) => OreQualityClass::Improved,
            Some(5) => OreQualityClass::Excellent,
            _ => OreQualityClass::Undefined,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OreQualityClass::Undefined => "(undefined)",
            OreQualityClass::Regular => "regular",
            OreQualityClass::Improved => "improved",
            OreQualityClass::Excellent => "excellent",
        }
    }

    /// Short yield bonus tag shown next to improved and excellent ores.
    pub fn tag_text(&self) -> Option<&'static str> {
        match self {
            OreQualityClass::Improved => Some("+15%"),
            OreQualityClass::Excellent => Some("+100%"),
            _ => None,
        }
    }
}

/// Lifecycle state of a moon extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    Started,
    Canceled,
    Ready,
    Completed,
    #[default]
    Undefined,
}

impl ExtractionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ExtractionStatus::Started => "started",
            ExtractionStatus::Canceled => "canceled",
            ExtractionStatus::Ready => "ready",
            ExtractionStatus::Completed => "completed",
            ExtractionStatus::Undefined => "undefined",
        }
    }

    /// An extraction is active while its chunk is still travelling or waiting to be fractured.
    pub fn is_active(&self) -> bool {
        matches!(self, ExtractionStatus::Started | ExtractionStatus::Ready)
    }
}

/// Character notification types relevant for moon mining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationType {
    MoonminingExtractionStarted,
    MoonminingExtractionCancelled,
    MoonminingExtractionFinished,
    MoonminingAutomaticFracture,
    MoonminingLaserFired,
    #[serde(other)]
    Other,
}

impl NotificationType {
    pub fn is_moon_mining(&self) -> bool {
        !matches!(self, NotificationType::Other)
    }
}

use crate::enums::{ExtractionStatus, NotificationType, OreQualityClass, OreRarityClass};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type MoonId = i64;
pub type OreTypeId = i32;
pub type CorporationId = i64;
pub type RefineryId = i64;
pub type ExtractionId = i64;
pub type EntityId = i64;
pub type UserId = i64;

/// An ore type as known from the static data, reduced to what the feeds need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OreType {
    pub id: OreTypeId,
    pub name: String,
    pub group_id: i32,
    /// Packaged volume of one unit in m³.
    pub volume: Decimal,
    /// Value of the ore quality attribute, if the type has one.
    #[serde(default)]
    pub quality_level: Option<i32>,
}

impl OreType {
    pub fn rarity_class(&self) -> OreRarityClass {
        OreRarityClass::from_eve_group_id(self.group_id)
    }

    pub fn quality_class(&self) -> OreQualityClass {
        OreQualityClass::from_quality_level(self.quality_level)
    }
}

/// A named character, corporation or alliance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EveEntity {
    pub id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corporation {
    pub id: CorporationId,
    pub name: String,
    #[serde(default)]
    pub alliance_name: Option<String>,
    #[serde(default)]
    pub alliance_ticker: Option<String>,
}

impl Corporation {
    /// Corporation name followed by the alliance ticker, e.g. "Wayne Mining [WYN]".
    pub fn owner_name(&self) -> String {
        with_alliance_ticker(&self.name, self.alliance_ticker.as_deref())
    }

    pub fn alliance_name_or_empty(&self) -> &str {
        self.alliance_name.as_deref().unwrap_or_default()
    }
}

/// Appends ` [TICKER]` to a name when a ticker is present.
pub fn with_alliance_ticker(name: &str, ticker: Option<&str>) -> String {
    match ticker {
        Some(ticker) if !ticker.is_empty() => format!("{name} [{ticker}]"),
        _ => name.to_string(),
    }
}

/// A moon known through a survey or an anchored refinery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moon {
    pub id: MoonId,
    pub name: String,
    pub solar_system_name: String,
    pub region_name: String,
    /// Monthly value estimate, supplied by the valuation backend.
    #[serde(default)]
    pub value: Option<Decimal>,
    #[serde(default)]
    pub rarity_class: OreRarityClass,
    #[serde(default)]
    pub products: Vec<MoonProduct>,
    #[serde(default)]
    pub products_updated_by: Option<String>,
    #[serde(default)]
    pub products_updated_at: Option<DateTime<Utc>>,
}

/// One ore of a moon and its share of the moon's composition (0..=1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonProduct {
    pub ore_type_id: OreTypeId,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refinery {
    pub id: RefineryId,
    pub name: String,
    #[serde(default)]
    pub moon_id: Option<MoonId>,
    pub corporation_id: CorporationId,
}

/// A moon chunk extraction at a refinery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub id: ExtractionId,
    pub refinery_id: RefineryId,
    pub ready_time: DateTime<Utc>,
    #[serde(default)]
    pub auto_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: ExtractionStatus,
    #[serde(default)]
    pub started_by: Option<EntityId>,
    #[serde(default)]
    pub canceled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub canceled_by: Option<EntityId>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fractured_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fractured_by: Option<EntityId>,
    #[serde(default)]
    pub products: Vec<ExtractionProduct>,
}

impl Extraction {
    pub fn total_volume(&self) -> Decimal {
        self.products.iter().map(|product| product.volume).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionProduct {
    pub ore_type_id: OreTypeId,
    /// Extracted volume in m³.
    pub volume: Decimal,
}

/// A character notification as delivered by the game API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub notification_type: NotificationType,
    /// YAML encoded notification body.
    pub text: String,
}

/// An alliance auth member with the main character used for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: UserId,
    pub name: String,
    pub corporation_name: String,
    #[serde(default)]
    pub alliance_ticker: Option<String>,
    /// Membership state label, e.g. "Member" or "Guest".
    pub state: String,
}

/// One day of ore mined by a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningLedgerEntry {
    pub user_id: UserId,
    pub day: NaiveDate,
    pub ore_type_id: OreTypeId,
    /// Number of ore units mined.
    pub quantity: i64,
    /// Price of one unit, supplied by the valuation backend.
    #[serde(default)]
    pub unit_price: Decimal,
}

/// Everything the feeds are computed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub ore_types: Vec<OreType>,
    pub entities: Vec<EveEntity>,
    pub corporations: Vec<Corporation>,
    pub moons: Vec<Moon>,
    pub refineries: Vec<Refinery>,
    pub extractions: Vec<Extraction>,
    pub notifications: Vec<Notification>,
    pub members: Vec<Member>,
    pub mining_ledger: Vec<MiningLedgerEntry>,
}

impl Snapshot {
    pub fn moon(&self, moon_id: MoonId) -> Option<&Moon> {
        self.moons.iter().find(|moon| moon.id == moon_id)
    }

    pub fn extraction(&self, extraction_id: ExtractionId) -> Option<&Extraction> {
        self.extractions
            .iter()
            .find(|extraction| extraction.id == extraction_id)
    }

    pub fn refinery(&self, refinery_id: RefineryId) -> Option<&Refinery> {
        self.refineries
            .iter()
            .find(|refinery| refinery.id == refinery_id)
    }

    pub fn refinery_for_moon(&self, moon_id: MoonId) -> Option<&Refinery> {
        self.refineries
            .iter()
            .find(|refinery| refinery.moon_id == Some(moon_id))
    }

    pub fn corporation(&self, corporation_id: CorporationId) -> Option<&Corporation> {
        self.corporations
            .iter()
            .find(|corporation| corporation.id == corporation_id)
    }

    pub fn entity_name(&self, entity_id: EntityId) -> Option<&str> {
        self.entities
            .iter()
            .find(|entity| entity.id == entity_id)
            .map(|entity| entity.name.as_str())
    }

    pub fn ore_types_by_id(&self) -> HashMap<OreTypeId, &OreType> {
        self.ore_types
            .iter()
            .map(|ore_type| (ore_type.id, ore_type))
            .collect()
    }

    /// Rarity class of a moon: the highest class among its products.
    pub fn calc_rarity_class(&self, products: &[MoonProduct]) -> OreRarityClass {
        let ore_types = self.ore_types_by_id();
        products
            .iter()
            .filter_map(|product| ore_types.get(&product.ore_type_id))
            .map(|ore_type| ore_type.rarity_class())
            .max()
            .unwrap_or_default()
    }

    /// An extraction is a jackpot when it has products and every one of its ores is of
    /// excellent quality.
    ///
    /// Returns `None` when an ore type is unknown.
    pub fn calc_is_jackpot(&self, extraction: &Extraction) -> Option<bool> {
        if extraction.products.is_empty() {
            return Some(false);
        }
        let ore_types = self.ore_types_by_id();
        let mut is_jackpot = true;
        for product in &extraction.products {
            let ore_type = ore_types.get(&product.ore_type_id)?;
            is_jackpot &= ore_type.quality_class() == OreQualityClass::Excellent;
        }
        Some(is_jackpot)
    }
}

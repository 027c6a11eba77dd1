//! Snapshot fixture shared by the feed tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_types::{
    Corporation, EveEntity, Extraction, ExtractionProduct, ExtractionStatus, Member,
    MiningLedgerEntry, Moon, MoonProduct, OreRarityClass, OreType, Refinery, Snapshot,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const REFINERY_AUGA: i64 = 1000000000001;
pub const REFINERY_AUGA_2: i64 = 1000000000002;
pub const REFINERY_HELGATILD: i64 = 1000000000003;

/// The clock used by tests that depend on the current time.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 11, 15, 12, 0, 0).unwrap()
}

pub fn today() -> NaiveDate {
    now().date_naive()
}

fn ore(id: i32, name: &str, group_id: i32, quality_level: i32) -> OreType {
    OreType {
        id,
        name: name.to_string(),
        group_id,
        volume: dec!(10),
        quality_level: Some(quality_level),
    }
}

#[allow(clippy::too_many_arguments)]
fn moon(
    id: i64,
    name: &str,
    solar_system_name: &str,
    region_name: &str,
    value: Option<Decimal>,
    rarity_class: OreRarityClass,
    products: &[(i32, Decimal)],
    products_updated_by: Option<&str>,
) -> Moon {
    Moon {
        id,
        name: name.to_string(),
        solar_system_name: solar_system_name.to_string(),
        region_name: region_name.to_string(),
        value,
        rarity_class,
        products: products
            .iter()
            .map(|(ore_type_id, amount)| MoonProduct {
                ore_type_id: *ore_type_id,
                amount: *amount,
            })
            .collect(),
        products_updated_by: products_updated_by.map(str::to_string),
        products_updated_at: products_updated_by
            .map(|_| Utc.with_ymd_and_hms(2019, 11, 1, 18, 30, 0).unwrap()),
    }
}

fn extraction(
    id: i64,
    refinery_id: i64,
    ready_time: DateTime<Utc>,
    status: ExtractionStatus,
    products: &[(i32, Decimal)],
) -> Extraction {
    Extraction {
        id,
        refinery_id,
        ready_time,
        auto_time: Some(ready_time + chrono::Duration::hours(3)),
        status,
        started_by: Some(1001),
        canceled_at: None,
        canceled_by: None,
        finished_at: None,
        fractured_at: None,
        fractured_by: None,
        products: products
            .iter()
            .map(|(ore_type_id, volume)| ExtractionProduct {
                ore_type_id: *ore_type_id,
                volume: *volume,
            })
            .collect(),
    }
}

fn ledger(user_id: i64, day: (i32, u32, u32), ore_type_id: i32, quantity: i64, unit_price: Decimal) -> MiningLedgerEntry {
    MiningLedgerEntry {
        user_id,
        day: NaiveDate::from_ymd_opt(day.0, day.1, day.2).unwrap(),
        ore_type_id,
        quantity,
        unit_price,
    }
}

/// Two corporations owning three of four moons, with extractions in every state
/// that matters for the listings and a small mining ledger.
pub fn snapshot() -> Snapshot {
    let mut completed = extraction(
        102,
        REFINERY_AUGA,
        Utc.with_ymd_and_hms(2019, 10, 20, 0, 1, 0).unwrap(),
        ExtractionStatus::Completed,
        &[(46677, dec!(80000))],
    );
    completed.fractured_at = Some(Utc.with_ymd_and_hms(2019, 10, 20, 3, 1, 0).unwrap());
    completed.fractured_by = Some(1001);

    let mut canceled = extraction(
        103,
        REFINERY_HELGATILD,
        Utc.with_ymd_and_hms(2019, 11, 25, 8, 0, 0).unwrap(),
        ExtractionStatus::Canceled,
        &[],
    );
    canceled.started_by = Some(1002);
    canceled.canceled_at = Some(Utc.with_ymd_and_hms(2019, 11, 10, 8, 0, 0).unwrap());
    canceled.canceled_by = Some(1002);

    Snapshot {
        ore_types: vec![
            ore(45492, "Bitumens", 1884, 1),
            ore(45506, "Cinnabar", 1922, 1),
            ore(46677, "Bountiful Cobaltite", 1920, 5),
        ],
        entities: vec![
            EveEntity { id: 1001, name: "Bruce Wayne".to_string() },
            EveEntity { id: 1002, name: "Lex Luthor".to_string() },
        ],
        corporations: vec![
            Corporation {
                id: 2001,
                name: "Wayne Technologies".to_string(),
                alliance_name: Some("Wayne Enterprises".to_string()),
                alliance_ticker: Some("WYE".to_string()),
            },
            Corporation {
                id: 2002,
                name: "Lex Corp".to_string(),
                alliance_name: None,
                alliance_ticker: None,
            },
        ],
        moons: vec![
            moon(
                40161711,
                "Jita IV - Moon 4",
                "Jita",
                "The Forge",
                Some(dec!(50000000000)),
                OreRarityClass::R4,
                &[(45492, dec!(1))],
                Some("Bruce Wayne"),
            ),
            moon(
                40161708,
                "Auga V - Moon 1",
                "Auga",
                "Derelik",
                Some(dec!(300000000000)),
                OreRarityClass::R32,
                &[(46677, dec!(0.4)), (45506, dec!(0.6))],
                Some("Bruce Wayne"),
            ),
            moon(
                40161710,
                "Helgatild IX - Moon 3",
                "Helgatild",
                "Heimatar",
                None,
                OreRarityClass::R8,
                &[(46677, dec!(1))],
                None,
            ),
            moon(
                40161709,
                "Auga V - Moon 2",
                "Auga",
                "Derelik",
                Some(dec!(100000000000)),
                OreRarityClass::R4,
                &[(45492, dec!(1))],
                Some("Clark Kent"),
            ),
        ],
        refineries: vec![
            Refinery {
                id: REFINERY_AUGA,
                name: "Auga - Refinery".to_string(),
                moon_id: Some(40161708),
                corporation_id: 2001,
            },
            Refinery {
                id: REFINERY_AUGA_2,
                name: "Auga - Refinery 2".to_string(),
                moon_id: Some(40161709),
                corporation_id: 2001,
            },
            Refinery {
                id: REFINERY_HELGATILD,
                name: "Helgatild - Refinery".to_string(),
                moon_id: Some(40161710),
                corporation_id: 2002,
            },
        ],
        extractions: vec![
            extraction(
                101,
                REFINERY_AUGA,
                Utc.with_ymd_and_hms(2019, 11, 20, 0, 1, 0).unwrap(),
                ExtractionStatus::Started,
                &[(45506, dec!(100000)), (46677, dec!(50000))],
            ),
            completed,
            canceled,
        ],
        notifications: Vec::new(),
        members: vec![
            Member {
                id: 1,
                name: "Bruce Wayne".to_string(),
                corporation_name: "Wayne Technologies".to_string(),
                alliance_ticker: Some("WYE".to_string()),
                state: "Member".to_string(),
            },
            Member {
                id: 2,
                name: "Clark Kent".to_string(),
                corporation_name: "Daily Planet".to_string(),
                alliance_ticker: None,
                state: "Guest".to_string(),
            },
            Member {
                id: 3,
                name: "Lex Luthor".to_string(),
                corporation_name: "Lex Corp".to_string(),
                alliance_ticker: None,
                state: "Member".to_string(),
            },
        ],
        mining_ledger: vec![
            ledger(1, (2019, 11, 2), 45506, 1000, dec!(200)),
            ledger(1, (2019, 11, 10), 45492, 500, dec!(50)),
            ledger(1, (2019, 9, 30), 45506, 100, dec!(200)),
            ledger(2, (2019, 10, 1), 45492, 200, dec!(50)),
            ledger(2, (2019, 7, 31), 45492, 999, dec!(50)),
            ledger(3, (2019, 6, 15), 45492, 100, dec!(50)),
        ],
    }
}

//! Report of the ore mined by every member over the last calendar months.

use crate::table::{Cell, TableRow};
use chrono::{Datelike, NaiveDate};
use core_types::{Snapshot, UserId, with_alliance_ticker};
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Mined volume (m³) and price of one calendar month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlyMining {
    pub volume: Decimal,
    pub price: Decimal,
}

impl MonthlyMining {
    fn is_zero(&self) -> bool {
        self.volume.is_zero() && self.price.is_zero()
    }
}

/// A row of the user mining report. `months[0]` is the current month.
///
/// Serializes flat, with one `volume_month_N` and `price_month_N` pair per month.
#[derive(Debug, Clone, PartialEq)]
pub struct UserMiningRow {
    pub id: UserId,
    pub name: String,
    pub corporation: String,
    pub state: String,
    pub months: Vec<MonthlyMining>,
}

impl Serialize for UserMiningRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4 + 2 * self.months.len()))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("corporation", &self.corporation)?;
        map.serialize_entry("state", &self.state)?;
        for (index, month) in self.months.iter().enumerate() {
            map.serialize_entry(&format!("volume_month_{index}"), &month.volume)?;
            map.serialize_entry(&format!("price_month_{index}"), &month.price)?;
        }
        map.end()
    }
}

fn month_column(column: &str) -> Option<(bool, usize)> {
    if let Some(index) = column.strip_prefix("volume_month_") {
        return index.parse().ok().map(|index| (true, index));
    }
    column
        .strip_prefix("price_month_")
        .and_then(|index| index.parse().ok())
        .map(|index| (false, index))
}

impl TableRow for UserMiningRow {
    const COLUMNS: &'static [&'static str] = &["id", "name", "corporation", "state"];

    /// Month columns are accepted for any index, the month count is configured.
    fn is_column(column: &str) -> bool {
        Self::COLUMNS.iter().any(|name| *name == column) || month_column(column).is_some()
    }

    fn numeric_columns(&self) -> Vec<String> {
        (0..self.months.len())
            .flat_map(|index| [format!("volume_month_{index}"), format!("price_month_{index}")])
            .collect()
    }

    fn cell(&self, column: &str) -> Option<Cell> {
        match column {
            "id" => Some(Cell::Number(Decimal::from(self.id))),
            "name" => Some(Cell::text(&self.name)),
            "corporation" => Some(Cell::text(&self.corporation)),
            "state" => Some(Cell::text(&self.state)),
            _ => {
                let (is_volume, index) = month_column(column)?;
                let month = self.months.get(index)?;
                Some(Cell::Number(if is_volume { month.volume } else { month.price }))
            }
        }
    }
}

/// Number of calendar months `day` lies before the month of `today`.
///
/// `None` for days in a later month than `today`.
pub fn months_before(today: NaiveDate, day: NaiveDate) -> Option<usize> {
    let month_number = |date: NaiveDate| date.year() * 12 + date.month0() as i32;
    usize::try_from(month_number(today) - month_number(day)).ok()
}

/// Builds the user mining report over `months` calendar months ending with the month
/// of `today`. Members without any mining in that window are left out.
pub fn user_mining_report(snapshot: &Snapshot, today: NaiveDate, months: usize) -> Vec<UserMiningRow> {
    let ore_types = snapshot.ore_types_by_id();
    let mut mined: HashMap<UserId, Vec<MonthlyMining>> = HashMap::new();

    for entry in &snapshot.mining_ledger {
        let Some(index) = months_before(today, entry.day).filter(|index| *index < months) else {
            continue;
        };
        let Some(ore_type) = ore_types.get(&entry.ore_type_id) else {
            tracing::warn!(
                ore_type_id = entry.ore_type_id,
                user_id = entry.user_id,
                "Skipping ledger entry with unknown ore type."
            );
            continue;
        };
        let quantity = Decimal::from(entry.quantity);
        let month = &mut mined
            .entry(entry.user_id)
            .or_insert_with(|| vec![MonthlyMining::default(); months])[index];
        month.volume += quantity * ore_type.volume;
        month.price += quantity * entry.unit_price;
    }

    let mut rows: Vec<UserMiningRow> = snapshot
        .members
        .iter()
        .filter_map(|member| {
            let months = mined.remove(&member.id)?;
            if months.iter().all(MonthlyMining::is_zero) {
                return None;
            }
            Some(UserMiningRow {
                id: member.id,
                name: member.name.clone(),
                corporation: with_alliance_ticker(
                    &member.corporation_name,
                    member.alliance_ticker.as_deref(),
                ),
                state: member.state.clone(),
                months,
            })
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    rows
}

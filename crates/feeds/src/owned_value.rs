//! Report of the value of every owned moon, grouped by the owning corporation.

use crate::moons::rarity_pair;
use crate::pair::DisplaySort;
use crate::table::{Cell, TableRow};
use core_types::{MoonId, OreRarityClass, Snapshot};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub const TOTAL_LABEL: &str = "TOTAL";

/// A row of the owned value report.
///
/// Total rows close each corporation group and only carry `corporation`, `moon`,
/// `total` and `is_total`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnedValueRow {
    pub corporation: String,
    pub moon: DisplaySort<String, usize>,
    pub moon_id: Option<MoonId>,
    pub region: Option<String>,
    pub rarity_class: Option<DisplaySort<String, OreRarityClass>>,
    pub value: Option<Decimal>,
    pub percent: Option<Decimal>,
    pub rank: Option<usize>,
    pub total: Option<Decimal>,
    pub is_total: bool,
}

impl TableRow for OwnedValueRow {
    const COLUMNS: &'static [&'static str] = &[
        "corporation",
        "moon",
        "region",
        "rarity_class",
        "value",
        "percent",
        "rank",
        "total",
    ];

    fn numeric_columns(&self) -> Vec<String> {
        ["value", "percent", "total"].map(String::from).to_vec()
    }

    fn cell(&self, column: &str) -> Option<Cell> {
        let cell = match column {
            "corporation" => Cell::text(&self.corporation),
            "moon" => Cell::Number(Decimal::from(self.moon.sort)),
            "region" => self.region.as_deref().map_or(Cell::Empty, |region| Cell::text(region)),
            "rarity_class" => self.rarity_class.as_ref().map_or(Cell::Empty, |rarity_class| {
                Cell::Number(Decimal::from(rarity_class.sort.value()))
            }),
            "value" => Cell::number(self.value),
            "percent" => Cell::number(self.percent),
            "rank" => Cell::number(self.rank.map(Decimal::from)),
            "total" => Cell::number(self.total),
            _ => return None,
        };
        Some(cell)
    }
}

struct OwnedMoon<'a> {
    id: MoonId,
    name: &'a str,
    region: &'a str,
    rarity_class: OreRarityClass,
    value: Option<Decimal>,
}

/// Builds the owned value report.
///
/// Groups are ordered by owner name and moons by name inside each group, so a data
/// table grouping on `corporation` shows contiguous groups with the total row last.
pub fn owned_value_report(snapshot: &Snapshot) -> Vec<OwnedValueRow> {
    let mut groups: BTreeMap<String, Vec<OwnedMoon>> = BTreeMap::new();
    for refinery in &snapshot.refineries {
        let Some(moon) = refinery.moon_id.and_then(|moon_id| snapshot.moon(moon_id)) else {
            continue;
        };
        let owner = snapshot
            .corporation(refinery.corporation_id)
            .map(|corporation| corporation.owner_name())
            .unwrap_or_else(|| format!("#{}", refinery.corporation_id));
        groups.entry(owner).or_default().push(OwnedMoon {
            id: moon.id,
            name: &moon.name,
            region: &moon.region_name,
            rarity_class: moon.rarity_class,
            value: moon.value,
        });
    }

    let grand_total: Decimal = groups
        .values()
        .flatten()
        .filter_map(|moon| moon.value)
        .sum();
    let ranks = ranks_by_value(groups.values().flatten());

    let mut rows = Vec::new();
    for (owner, mut moons) in groups {
        moons.sort_by(|a, b| a.name.cmp(b.name).then(a.id.cmp(&b.id)));
        let corporation = format!("{owner} ({})", moons.len());
        let group_total: Decimal = moons.iter().filter_map(|moon| moon.value).sum();

        for (position, moon) in moons.iter().enumerate() {
            let percent = (!grand_total.is_zero()).then(|| {
                moon.value.unwrap_or_default() / grand_total * Decimal::ONE_HUNDRED
            });
            rows.push(OwnedValueRow {
                corporation: corporation.clone(),
                moon: DisplaySort::new(moon.name.to_string(), position),
                moon_id: Some(moon.id),
                region: Some(moon.region.to_string()),
                rarity_class: Some(rarity_pair(moon.rarity_class)),
                value: moon.value,
                percent,
                rank: ranks.get(&moon.id).copied(),
                total: None,
                is_total: false,
            });
        }
        rows.push(OwnedValueRow {
            corporation,
            moon: DisplaySort::new(TOTAL_LABEL.to_string(), moons.len()),
            moon_id: None,
            region: None,
            rarity_class: None,
            value: None,
            percent: None,
            rank: None,
            total: Some(group_total),
            is_total: true,
        });
    }

    close_percent_remainder(&mut rows);
    tracing::debug!(rows = rows.len(), %grand_total, "Built owned value report.");
    rows
}

/// Gives the last valued moon whatever is left of 100%, so that divisions which do not
/// terminate still add up to exactly 100.
fn close_percent_remainder(rows: &mut [OwnedValueRow]) {
    let Some(last) = rows
        .iter()
        .rposition(|row| row.value.is_some() && row.percent.is_some())
    else {
        return;
    };
    let others: Decimal = rows
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != last)
        .filter_map(|(_, row)| row.percent)
        .sum();
    rows[last].percent = Some(Decimal::ONE_HUNDRED - others);
}

/// 1-based rank of every valued moon by descending value, ties broken by name.
fn ranks_by_value<'a>(moons: impl Iterator<Item = &'a OwnedMoon<'a>>) -> HashMap<MoonId, usize> {
    let mut valued: Vec<(&'a OwnedMoon<'a>, Decimal)> = moons
        .filter_map(|moon| moon.value.map(|value| (moon, value)))
        .collect();
    valued.sort_by(|(a, a_value), (b, b_value)| {
        b_value.cmp(a_value).then(a.name.cmp(b.name)).then(a.id.cmp(&b.id))
    });
    valued
        .into_iter()
        .enumerate()
        .map(|(index, (moon, _))| (moon.id, index + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Footer, SortDirection, sort_rows_within_groups};
    use crate::test_support::snapshot;
    use core_types::{Corporation, Moon, Refinery};
    use rust_decimal_macros::dec;

    fn labels(rows: &[OwnedValueRow]) -> Vec<(&str, &str)> {
        rows.iter()
            .map(|row| (row.corporation.as_str(), row.moon.display.as_str()))
            .collect()
    }

    #[test]
    fn groups_are_contiguous_with_total_last() {
        let rows = owned_value_report(&snapshot());
        assert_eq!(
            labels(&rows),
            [
                ("Lex Corp (1)", "Helgatild IX - Moon 3"),
                ("Lex Corp (1)", "TOTAL"),
                ("Wayne Technologies [WYE] (2)", "Auga V - Moon 1"),
                ("Wayne Technologies [WYE] (2)", "Auga V - Moon 2"),
                ("Wayne Technologies [WYE] (2)", "TOTAL"),
            ]
        );
        let sorts: Vec<usize> = rows.iter().map(|row| row.moon.sort).collect();
        assert_eq!(sorts, [0, 1, 0, 1, 2]);
    }

    #[test]
    fn total_rows_only_carry_the_group_sum() {
        let rows = owned_value_report(&snapshot());
        let totals: Vec<&OwnedValueRow> = rows.iter().filter(|row| row.is_total).collect();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].total, Some(Decimal::ZERO));
        assert_eq!(totals[1].total, Some(dec!(400000000000)));
        for total in totals {
            assert_eq!(total.value, None);
            assert_eq!(total.percent, None);
            assert_eq!(total.rank, None);
            assert_eq!(total.region, None);
            assert_eq!(total.moon_id, None);
        }
    }

    #[test]
    fn percent_and_rank_are_relative_to_all_owned_moons() {
        let rows = owned_value_report(&snapshot());
        let moon_1 = &rows[2];
        assert_eq!(moon_1.percent, Some(dec!(75)));
        assert_eq!(moon_1.rank, Some(1));
        let moon_2 = &rows[3];
        assert_eq!(moon_2.percent, Some(dec!(25)));
        assert_eq!(moon_2.rank, Some(2));

        let unvalued = &rows[0];
        assert_eq!(unvalued.value, None);
        assert_eq!(unvalued.percent, Some(Decimal::ZERO));
        assert_eq!(unvalued.rank, None);

        let sum: Decimal = rows.iter().filter_map(|row| row.percent).sum();
        assert_eq!(sum, dec!(100));
    }

    #[test]
    fn percentages_of_equal_thirds_add_up_to_100() {
        let mut snapshot = snapshot();
        for moon in &mut snapshot.moons {
            moon.value = Some(dec!(1000));
        }
        let rows = owned_value_report(&snapshot);
        let percents: Vec<Decimal> = rows.iter().filter_map(|row| row.percent).collect();
        assert_eq!(percents.len(), 3);
        assert_eq!(percents.iter().copied().sum::<Decimal>(), dec!(100));
        for percent in percents {
            assert_eq!(percent.round_dp(2), dec!(33.33));
        }
    }

    #[test]
    fn ties_rank_by_moon_name() {
        let mut snapshot = snapshot();
        for moon in &mut snapshot.moons {
            moon.value = Some(dec!(1000));
        }
        let rows = owned_value_report(&snapshot);
        let ranks: Vec<(&str, Option<usize>)> = rows
            .iter()
            .filter(|row| !row.is_total)
            .map(|row| (row.moon.display.as_str(), row.rank))
            .collect();
        assert_eq!(
            ranks,
            [
                ("Helgatild IX - Moon 3", Some(3)),
                ("Auga V - Moon 1", Some(1)),
                ("Auga V - Moon 2", Some(2)),
            ]
        );
    }

    #[test]
    fn percent_is_absent_without_any_value() {
        let mut snapshot = snapshot();
        for moon in &mut snapshot.moons {
            moon.value = None;
        }
        let rows = owned_value_report(&snapshot);
        assert!(rows.iter().all(|row| row.percent.is_none()));
        assert!(rows.iter().all(|row| row.rank.is_none()));
    }

    #[test]
    fn footer_counts_total_rows_only_in_total_column() {
        let footer = Footer::sum(&owned_value_report(&snapshot()));
        assert_eq!(footer.get("value"), Some(dec!(400000000000)));
        assert_eq!(footer.get("percent"), Some(dec!(100)));
        assert_eq!(footer.get("total"), Some(dec!(400000000000)));
    }

    #[test]
    fn sorting_by_value_keeps_total_rows_in_their_group() {
        let mut rows = owned_value_report(&snapshot());
        sort_rows_within_groups(&mut rows, "corporation", "moon", SortDirection::Asc).unwrap();
        assert_eq!(rows[1].moon.display, "TOTAL");
        assert_eq!(rows[4].moon.display, "TOTAL");
    }

    #[test]
    fn corporation_without_alliance_has_plain_owner_name() {
        let snapshot = Snapshot {
            corporations: vec![Corporation {
                id: 1,
                name: "Solo".to_string(),
                alliance_name: None,
                alliance_ticker: None,
            }],
            moons: vec![Moon {
                id: 10,
                name: "Solo I - Moon 1".to_string(),
                solar_system_name: "Solo".to_string(),
                region_name: "Nowhere".to_string(),
                value: Some(dec!(5)),
                rarity_class: OreRarityClass::R16,
                products: Vec::new(),
                products_updated_by: None,
                products_updated_at: None,
            }],
            refineries: vec![Refinery {
                id: 100,
                name: "Solo - Refinery".to_string(),
                moon_id: Some(10),
                corporation_id: 1,
            }],
            ..Default::default()
        };
        let rows = owned_value_report(&snapshot);
        assert_eq!(rows[0].corporation, "Solo (1)");
        assert_eq!(rows[0].percent, Some(dec!(100)));
        assert_eq!(rows[0].rarity_class.as_ref().unwrap().display, "R16");
    }

    #[test]
    fn empty_snapshot_gives_empty_report() {
        assert!(owned_value_report(&Snapshot::default()).is_empty());
    }
}

use crate::category::MoonCategory;
use crate::error::FeedError;
use crate::extractions::{ExtractionRow, extraction_row};
use crate::pair::DisplaySort;
use crate::table::{Cell, TableRow};
use chrono::{DateTime, Utc};
use core_types::{
    MoonId, OreQualityClass, OreRarityClass, OreTypeId, RefineryId, Snapshot,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;

/// A row of the moon listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoonRow {
    pub id: MoonId,
    pub moon_name: String,
    pub corporation: DisplaySort<String, String>,
    pub solar_system_name: String,
    pub region_name: String,
    pub value: Option<Decimal>,
    pub rarity_class: DisplaySort<String, OreRarityClass>,
    pub details_url: String,
    // Hidden columns backing the dropdown filters.
    pub has_refinery_str: String,
    pub has_extraction_str: String,
    pub corporation_name: String,
    pub alliance_name: String,
    pub rarity_class_str: String,
}

impl TableRow for MoonRow {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "moon_name",
        "corporation",
        "solar_system_name",
        "region_name",
        "value",
        "rarity_class",
        "has_refinery_str",
        "has_extraction_str",
        "corporation_name",
        "alliance_name",
        "rarity_class_str",
    ];

    fn numeric_columns(&self) -> Vec<String> {
        vec!["value".to_string()]
    }

    fn cell(&self, column: &str) -> Option<Cell> {
        let cell = match column {
            "id" => Cell::Number(Decimal::from(self.id)),
            "moon_name" => Cell::text(&self.moon_name),
            "corporation" => Cell::text(&self.corporation.sort),
            "solar_system_name" => Cell::text(&self.solar_system_name),
            "region_name" => Cell::text(&self.region_name),
            "value" => Cell::number(self.value),
            "rarity_class" => Cell::Number(Decimal::from(self.rarity_class.sort.value())),
            "has_refinery_str" => Cell::text(&self.has_refinery_str),
            "has_extraction_str" => Cell::text(&self.has_extraction_str),
            "corporation_name" => Cell::text(&self.corporation_name),
            "alliance_name" => Cell::text(&self.alliance_name),
            "rarity_class_str" => Cell::text(&self.rarity_class_str),
            _ => return None,
        };
        Some(cell)
    }
}

pub fn moon_details_url(moon_id: MoonId) -> String {
    format!("/api/moons/{moon_id}")
}

pub(crate) fn rarity_pair(rarity_class: OreRarityClass) -> DisplaySort<String, OreRarityClass> {
    DisplaySort::new(rarity_class.label().to_string(), rarity_class)
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

/// Builds the moon listing for one tab, ordered by moon name.
///
/// The `Uploads` tab lists the moons last surveyed by `uploader` and is empty without one.
pub fn moon_rows(
    snapshot: &Snapshot,
    category: MoonCategory,
    uploader: Option<&str>,
) -> Vec<MoonRow> {
    let active_refineries: HashSet<RefineryId> = snapshot
        .extractions
        .iter()
        .filter(|extraction| extraction.status.is_active())
        .map(|extraction| extraction.refinery_id)
        .collect();

    let mut rows: Vec<MoonRow> = snapshot
        .moons
        .iter()
        .filter_map(|moon| {
            let refinery = snapshot.refinery_for_moon(moon.id);
            let included = match category {
                MoonCategory::All => true,
                MoonCategory::Ours => refinery.is_some(),
                MoonCategory::Uploads => uploader.is_some_and(|uploader| {
                    moon.products_updated_by.as_deref() == Some(uploader)
                }),
            };
            if !included {
                return None;
            }

            let owner = refinery.and_then(|refinery| snapshot.corporation(refinery.corporation_id));
            let has_extraction =
                refinery.is_some_and(|refinery| active_refineries.contains(&refinery.id));

            Some(MoonRow {
                id: moon.id,
                moon_name: moon.name.clone(),
                corporation: DisplaySort::new(
                    owner.map(|owner| owner.owner_name()).unwrap_or_default(),
                    owner.map(|owner| owner.name.clone()).unwrap_or_default(),
                ),
                solar_system_name: moon.solar_system_name.clone(),
                region_name: moon.region_name.clone(),
                value: moon.value,
                rarity_class: rarity_pair(moon.rarity_class),
                details_url: moon_details_url(moon.id),
                has_refinery_str: yes_no(refinery.is_some()),
                has_extraction_str: yes_no(has_extraction),
                corporation_name: owner.map(|owner| owner.name.clone()).unwrap_or_default(),
                alliance_name: owner
                    .map(|owner| owner.alliance_name_or_empty().to_string())
                    .unwrap_or_default(),
                rarity_class_str: moon.rarity_class.label().to_string(),
            })
        })
        .collect();

    rows.sort_by(|a, b| a.moon_name.cmp(&b.moon_name).then(a.id.cmp(&b.id)));
    tracing::debug!(?category, rows = rows.len(), "Built moon listing.");
    rows
}

/// One ore of a moon as shown in the moon detail dialog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoonProductDetail {
    pub ore_type_id: OreTypeId,
    pub ore_name: String,
    pub amount: Decimal,
    pub amount_percent: Decimal,
    pub rarity_class: DisplaySort<String, OreRarityClass>,
    pub quality_class: OreQualityClass,
    pub quality_tag: Option<&'static str>,
    /// Expected monthly volume of this ore in m³.
    pub volume_per_month: Decimal,
}

/// Content of the moon detail dialog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoonDetail {
    pub id: MoonId,
    pub name: String,
    pub solar_system_name: String,
    pub region_name: String,
    pub value: Option<Decimal>,
    pub rarity_class: DisplaySort<String, OreRarityClass>,
    pub owner: Option<String>,
    pub refinery_name: Option<String>,
    pub products: Vec<MoonProductDetail>,
    pub products_updated_by: Option<String>,
    pub products_updated_at: Option<DateTime<Utc>>,
    pub next_extraction: Option<ExtractionRow>,
}

pub(crate) fn ore_name(snapshot: &Snapshot, ore_type_id: OreTypeId) -> String {
    snapshot
        .ore_types
        .iter()
        .find(|ore_type| ore_type.id == ore_type_id)
        .map(|ore_type| ore_type.name.clone())
        .unwrap_or_else(|| format!("Type #{ore_type_id}"))
}

/// Builds the moon detail dialog. Products are listed by descending amount.
pub fn moon_detail(
    snapshot: &Snapshot,
    moon_id: MoonId,
    volume_per_month: Decimal,
) -> Result<MoonDetail, FeedError> {
    let moon = snapshot.moon(moon_id).ok_or(FeedError::NotFound {
        kind: "Moon",
        id: moon_id,
    })?;
    let refinery = snapshot.refinery_for_moon(moon.id);
    let owner = refinery.and_then(|refinery| snapshot.corporation(refinery.corporation_id));
    let ore_types = snapshot.ore_types_by_id();

    let mut products: Vec<MoonProductDetail> = moon
        .products
        .iter()
        .map(|product| {
            let ore_type = ore_types.get(&product.ore_type_id);
            let rarity_class = ore_type.map(|ore_type| ore_type.rarity_class()).unwrap_or_default();
            let quality_class = ore_type.map(|ore_type| ore_type.quality_class()).unwrap_or_default();
            MoonProductDetail {
                ore_type_id: product.ore_type_id,
                ore_name: ore_name(snapshot, product.ore_type_id),
                amount: product.amount,
                amount_percent: product.amount * Decimal::ONE_HUNDRED,
                rarity_class: rarity_pair(rarity_class),
                quality_class,
                quality_tag: quality_class.tag_text(),
                volume_per_month: product.amount * volume_per_month,
            }
        })
        .collect();
    products.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.ore_name.cmp(&b.ore_name)));

    let next_extraction = refinery.and_then(|refinery| {
        snapshot
            .extractions
            .iter()
            .filter(|extraction| extraction.refinery_id == refinery.id && extraction.status.is_active())
            .min_by_key(|extraction| extraction.ready_time)
            .map(|extraction| extraction_row(snapshot, extraction))
    });

    Ok(MoonDetail {
        id: moon.id,
        name: moon.name.clone(),
        solar_system_name: moon.solar_system_name.clone(),
        region_name: moon.region_name.clone(),
        value: moon.value,
        rarity_class: rarity_pair(moon.rarity_class),
        owner: owner.map(|owner| owner.owner_name()),
        refinery_name: refinery.map(|refinery| refinery.name.clone()),
        products,
        products_updated_by: moon.products_updated_by.clone(),
        products_updated_at: moon.products_updated_at,
        next_extraction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::snapshot;
    use crate::table::{FilterSet, SortDirection, sort_rows};
    use rust_decimal_macros::dec;

    fn names(rows: &[MoonRow]) -> Vec<&str> {
        rows.iter().map(|row| row.moon_name.as_str()).collect()
    }

    #[test]
    fn all_tab_lists_every_moon_by_name() {
        let rows = moon_rows(&snapshot(), MoonCategory::All, None);
        assert_eq!(
            names(&rows),
            ["Auga V - Moon 1", "Auga V - Moon 2", "Helgatild IX - Moon 3", "Jita IV - Moon 4"]
        );
    }

    #[test]
    fn ours_tab_lists_moons_with_refinery() {
        let rows = moon_rows(&snapshot(), MoonCategory::Ours, None);
        assert_eq!(names(&rows), ["Auga V - Moon 1", "Auga V - Moon 2", "Helgatild IX - Moon 3"]);

        let owned = &rows[0];
        assert_eq!(owned.corporation.display, "Wayne Technologies [WYE]");
        assert_eq!(owned.corporation.sort, "Wayne Technologies");
        assert_eq!(owned.corporation_name, "Wayne Technologies");
        assert_eq!(owned.alliance_name, "Wayne Enterprises");
        assert_eq!(owned.has_refinery_str, "yes");
        assert_eq!(owned.has_extraction_str, "yes");
        assert_eq!(owned.rarity_class.display, "R32");
        assert_eq!(owned.rarity_class.sort, OreRarityClass::R32);
        assert_eq!(owned.rarity_class_str, "R32");
        assert_eq!(owned.details_url, "/api/moons/40161708");
    }

    #[test]
    fn unowned_moons_have_blank_owner_fields() {
        let rows = moon_rows(&snapshot(), MoonCategory::All, None);
        let unowned = rows.iter().find(|row| row.id == 40161711).unwrap();
        assert_eq!(unowned.corporation.display, "");
        assert_eq!(unowned.corporation_name, "");
        assert_eq!(unowned.alliance_name, "");
        assert_eq!(unowned.has_refinery_str, "no");
        assert_eq!(unowned.has_extraction_str, "no");
    }

    #[test]
    fn uploads_tab_needs_uploader() {
        let snapshot = snapshot();
        assert!(moon_rows(&snapshot, MoonCategory::Uploads, None).is_empty());
        let rows = moon_rows(&snapshot, MoonCategory::Uploads, Some("Bruce Wayne"));
        assert_eq!(names(&rows), ["Auga V - Moon 1", "Jita IV - Moon 4"]);
    }

    #[test]
    fn unknown_sort_column_fails_even_without_rows() {
        let mut rows = moon_rows(&snapshot(), MoonCategory::Uploads, None);
        assert!(rows.is_empty());
        assert!(matches!(
            sort_rows(&mut rows, "color", SortDirection::Asc),
            Err(FeedError::UnknownColumn(_))
        ));
    }

    #[test]
    fn hidden_fields_drive_dropdown_filters() {
        let rows = moon_rows(&snapshot(), MoonCategory::All, None);
        assert_eq!(
            FilterSet::distinct_values(&rows, "corporation_name"),
            ["Lex Corp", "Wayne Technologies"]
        );
        let filtered = FilterSet::new().with("has_refinery_str", "no").apply(rows);
        assert_eq!(names(&filtered), ["Jita IV - Moon 4"]);
    }

    #[test]
    fn every_listed_column_has_a_cell() {
        let rows = moon_rows(&snapshot(), MoonCategory::All, None);
        for column in MoonRow::COLUMNS {
            assert!(rows[0].cell(column).is_some(), "{column}");
        }
        assert!(rows[0].cell("details_url").is_none());
        assert!(!MoonRow::is_column("details_url"));
    }

    #[test]
    fn row_serializes_display_sort_pairs() {
        let rows = moon_rows(&snapshot(), MoonCategory::All, None);
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["rarity_class"]["display"], "R32");
        assert_eq!(json["rarity_class"]["sort"], 32);
        assert_eq!(json["corporation"]["sort"], "Wayne Technologies");
        assert_eq!(json["value"], 300000000000.0);
    }

    #[test]
    fn detail_lists_products_by_amount() {
        let detail = moon_detail(&snapshot(), 40161708, dec!(1000000)).unwrap();
        assert_eq!(detail.owner.as_deref(), Some("Wayne Technologies [WYE]"));
        assert_eq!(detail.refinery_name.as_deref(), Some("Auga - Refinery"));
        assert_eq!(detail.products.len(), 2);

        let first = &detail.products[0];
        assert_eq!(first.ore_name, "Cinnabar");
        assert_eq!(first.amount_percent, dec!(60));
        assert_eq!(first.volume_per_month, dec!(600000));
        assert_eq!(first.rarity_class.display, "R32");

        let second = &detail.products[1];
        assert_eq!(second.quality_class, OreQualityClass::Excellent);
        assert_eq!(second.quality_tag, Some("+100%"));

        let next = detail.next_extraction.unwrap();
        assert_eq!(next.id, 101);
    }

    #[test]
    fn detail_of_unknown_moon_is_not_found() {
        assert!(matches!(
            moon_detail(&snapshot(), 1, dec!(1)),
            Err(FeedError::NotFound { kind: "Moon", id: 1 })
        ));
    }
}

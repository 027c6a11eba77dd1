use crate::category::ExtractionCategory;
use crate::error::FeedError;
use crate::format::format_datetime;
use crate::moons::ore_name;
use crate::pair::DisplaySort;
use crate::table::{Cell, TableRow};
use chrono::{DateTime, Utc};
use core_types::{
    EntityId, Extraction, ExtractionId, ExtractionStatus, MoonId, OreQualityClass, OreTypeId,
    Snapshot,
};
use rust_decimal::Decimal;
use serde::Serialize;

/// A row of the extraction listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionRow {
    pub id: ExtractionId,
    pub ready_time: DisplaySort<String, DateTime<Utc>>,
    pub moon_name: String,
    pub refinery_name: String,
    pub corporation_name: String,
    pub status: ExtractionStatus,
    pub status_str: String,
    pub total_volume: Decimal,
    pub is_jackpot: Option<bool>,
    pub details_url: String,
    // Hidden filter column.
    pub started_by: String,
}

impl TableRow for ExtractionRow {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "ready_time",
        "moon_name",
        "refinery_name",
        "corporation_name",
        "status",
        "status_str",
        "total_volume",
        "is_jackpot",
        "started_by",
    ];

    fn numeric_columns(&self) -> Vec<String> {
        vec!["total_volume".to_string()]
    }

    fn cell(&self, column: &str) -> Option<Cell> {
        let cell = match column {
            "id" => Cell::Number(Decimal::from(self.id)),
            "ready_time" => Cell::Time(self.ready_time.sort),
            "moon_name" => Cell::text(&self.moon_name),
            "refinery_name" => Cell::text(&self.refinery_name),
            "corporation_name" => Cell::text(&self.corporation_name),
            "status" | "status_str" => Cell::text(&self.status_str),
            "total_volume" => Cell::Number(self.total_volume),
            "is_jackpot" => match self.is_jackpot {
                Some(true) => Cell::text("yes"),
                Some(false) => Cell::text("no"),
                None => Cell::Empty,
            },
            "started_by" => Cell::text(&self.started_by),
            _ => return None,
        };
        Some(cell)
    }
}

pub fn extraction_details_url(extraction_id: ExtractionId) -> String {
    format!("/api/extractions/{extraction_id}")
}

fn entity_name(snapshot: &Snapshot, entity_id: Option<EntityId>) -> Option<String> {
    entity_id.map(|id| {
        snapshot
            .entity_name(id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{id}"))
    })
}

pub(crate) fn extraction_row(snapshot: &Snapshot, extraction: &Extraction) -> ExtractionRow {
    let refinery = snapshot.refinery(extraction.refinery_id);
    let moon = refinery
        .and_then(|refinery| refinery.moon_id)
        .and_then(|moon_id| snapshot.moon(moon_id));
    let corporation = refinery.and_then(|refinery| snapshot.corporation(refinery.corporation_id));

    ExtractionRow {
        id: extraction.id,
        ready_time: DisplaySort::new(format_datetime(&extraction.ready_time), extraction.ready_time),
        moon_name: moon.map(|moon| moon.name.clone()).unwrap_or_default(),
        refinery_name: refinery.map(|refinery| refinery.name.clone()).unwrap_or_default(),
        corporation_name: corporation
            .map(|corporation| corporation.name.clone())
            .unwrap_or_default(),
        status: extraction.status,
        status_str: extraction.status.label().to_string(),
        total_volume: extraction.total_volume(),
        is_jackpot: snapshot.calc_is_jackpot(extraction),
        details_url: extraction_details_url(extraction.id),
        started_by: entity_name(snapshot, extraction.started_by).unwrap_or_default(),
    }
}

/// Builds the extraction listing for one tab.
///
/// Upcoming extractions are still active and ready in the future, soonest first.
/// Everything else is past, most recent first.
pub fn extraction_rows(
    snapshot: &Snapshot,
    category: ExtractionCategory,
    now: DateTime<Utc>,
) -> Vec<ExtractionRow> {
    let is_upcoming =
        |extraction: &Extraction| extraction.ready_time > now && extraction.status.is_active();

    let mut extractions: Vec<&Extraction> = snapshot
        .extractions
        .iter()
        .filter(|extraction| match category {
            ExtractionCategory::Upcoming => is_upcoming(extraction),
            ExtractionCategory::Past => !is_upcoming(extraction),
        })
        .collect();
    match category {
        ExtractionCategory::Upcoming => extractions.sort_by_key(|extraction| extraction.ready_time),
        ExtractionCategory::Past => {
            extractions.sort_by(|a, b| b.ready_time.cmp(&a.ready_time))
        }
    }

    extractions
        .into_iter()
        .map(|extraction| extraction_row(snapshot, extraction))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionProductDetail {
    pub ore_type_id: OreTypeId,
    pub ore_name: String,
    pub volume: Decimal,
    pub quality_class: OreQualityClass,
}

/// Content of the extraction detail dialog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionDetail {
    pub id: ExtractionId,
    pub status: ExtractionStatus,
    pub status_str: String,
    pub moon_id: Option<MoonId>,
    pub moon_name: Option<String>,
    pub refinery_name: Option<String>,
    pub owner: Option<String>,
    pub ready_time: DateTime<Utc>,
    pub auto_time: Option<DateTime<Utc>>,
    pub started_by: Option<String>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub canceled_by: Option<String>,
    pub finished_at: Option<DateTime<Utc>>,
    pub fractured_at: Option<DateTime<Utc>>,
    pub fractured_by: Option<String>,
    pub products: Vec<ExtractionProductDetail>,
    pub total_volume: Decimal,
    pub is_jackpot: Option<bool>,
}

/// Builds the extraction detail dialog. Products are listed by descending volume.
pub fn extraction_detail(
    snapshot: &Snapshot,
    extraction_id: ExtractionId,
) -> Result<ExtractionDetail, FeedError> {
    let extraction = snapshot
        .extraction(extraction_id)
        .ok_or(FeedError::NotFound {
            kind: "Extraction",
            id: extraction_id,
        })?;
    let refinery = snapshot.refinery(extraction.refinery_id);
    let moon = refinery
        .and_then(|refinery| refinery.moon_id)
        .and_then(|moon_id| snapshot.moon(moon_id));
    let owner = refinery.and_then(|refinery| snapshot.corporation(refinery.corporation_id));
    let ore_types = snapshot.ore_types_by_id();

    let mut products: Vec<ExtractionProductDetail> = extraction
        .products
        .iter()
        .map(|product| ExtractionProductDetail {
            ore_type_id: product.ore_type_id,
            ore_name: ore_name(snapshot, product.ore_type_id),
            volume: product.volume,
            quality_class: ore_types
                .get(&product.ore_type_id)
                .map(|ore_type| ore_type.quality_class())
                .unwrap_or_default(),
        })
        .collect();
    products.sort_by(|a, b| b.volume.cmp(&a.volume).then(a.ore_name.cmp(&b.ore_name)));

    Ok(ExtractionDetail {
        id: extraction.id,
        status: extraction.status,
        status_str: extraction.status.label().to_string(),
        moon_id: moon.map(|moon| moon.id),
        moon_name: moon.map(|moon| moon.name.clone()),
        refinery_name: refinery.map(|refinery| refinery.name.clone()),
        owner: owner.map(|owner| owner.owner_name()),
        ready_time: extraction.ready_time,
        auto_time: extraction.auto_time,
        started_by: entity_name(snapshot, extraction.started_by),
        canceled_at: extraction.canceled_at,
        canceled_by: entity_name(snapshot, extraction.canceled_by),
        finished_at: extraction.finished_at,
        fractured_at: extraction.fractured_at,
        fractured_by: entity_name(snapshot, extraction.fractured_by),
        products,
        total_volume: extraction.total_volume(),
        is_jackpot: snapshot.calc_is_jackpot(extraction),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Footer, SortDirection, sort_rows};
    use crate::test_support::{now, snapshot};
    use rust_decimal_macros::dec;

    fn ids(rows: &[ExtractionRow]) -> Vec<i64> {
        rows.iter().map(|row| row.id).collect()
    }

    #[test]
    fn upcoming_lists_active_future_extractions() {
        let rows = extraction_rows(&snapshot(), ExtractionCategory::Upcoming, now());
        assert_eq!(ids(&rows), [101]);

        let row = &rows[0];
        assert_eq!(row.ready_time.display, "2019-Nov-20 00:01");
        assert_eq!(row.moon_name, "Auga V - Moon 1");
        assert_eq!(row.refinery_name, "Auga - Refinery");
        assert_eq!(row.corporation_name, "Wayne Technologies");
        assert_eq!(row.status_str, "started");
        assert_eq!(row.total_volume, dec!(150000));
        assert_eq!(row.is_jackpot, Some(false));
        assert_eq!(row.started_by, "Bruce Wayne");
        assert_eq!(row.details_url, "/api/extractions/101");
    }

    #[test]
    fn past_lists_everything_else_latest_first() {
        let rows = extraction_rows(&snapshot(), ExtractionCategory::Past, now());
        assert_eq!(ids(&rows), [103, 102]);
        assert_eq!(rows[0].status, ExtractionStatus::Canceled);
        assert_eq!(rows[0].is_jackpot, Some(false));
        assert_eq!(rows[1].is_jackpot, Some(true));
    }

    #[test]
    fn started_extraction_moves_to_past_once_ready_time_passed() {
        let later = now() + chrono::Duration::days(30);
        assert!(extraction_rows(&snapshot(), ExtractionCategory::Upcoming, later).is_empty());
        assert_eq!(
            extraction_rows(&snapshot(), ExtractionCategory::Past, later).len(),
            3
        );
    }

    #[test]
    fn rows_sort_by_ready_time_and_sum_volume() {
        let mut rows = extraction_rows(&snapshot(), ExtractionCategory::Past, now());
        sort_rows(&mut rows, "ready_time", SortDirection::Asc).unwrap();
        assert_eq!(ids(&rows), [102, 103]);
        assert_eq!(Footer::sum(&rows).get("total_volume"), Some(dec!(80000)));
    }

    #[test]
    fn every_listed_column_has_a_cell() {
        let rows = extraction_rows(&snapshot(), ExtractionCategory::Past, now());
        for column in ExtractionRow::COLUMNS {
            assert!(rows[0].cell(column).is_some(), "{column}");
        }
    }

    #[test]
    fn detail_resolves_names() {
        let detail = extraction_detail(&snapshot(), 103).unwrap();
        assert_eq!(detail.moon_name.as_deref(), Some("Helgatild IX - Moon 3"));
        assert_eq!(detail.owner.as_deref(), Some("Lex Corp"));
        assert_eq!(detail.started_by.as_deref(), Some("Lex Luthor"));
        assert_eq!(detail.canceled_by.as_deref(), Some("Lex Luthor"));
        assert!(detail.canceled_at.is_some());
        assert!(detail.products.is_empty());
        assert_eq!(detail.total_volume, Decimal::ZERO);
    }

    #[test]
    fn detail_lists_products_by_volume() {
        let detail = extraction_detail(&snapshot(), 101).unwrap();
        let names: Vec<&str> = detail.products.iter().map(|p| p.ore_name.as_str()).collect();
        assert_eq!(names, ["Cinnabar", "Bountiful Cobaltite"]);
        assert_eq!(detail.products[1].quality_class, OreQualityClass::Excellent);
        assert_eq!(detail.is_jackpot, Some(false));
    }

    #[test]
    fn detail_of_unknown_extraction_is_not_found() {
        let err = extraction_detail(&snapshot(), 999).unwrap_err();
        assert_eq!(err.to_string(), "Extraction 999 not found");
    }
}

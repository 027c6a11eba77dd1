//! Terminal tables for the report feeds.

use chrono::{Datelike, Months, NaiveDate};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL,
};
use core_types::OreRarityClass;
use feeds::{
    ExtractionRow, Footer, MoonRow, OwnedValueRow, UserMiningRow, format_isk,
    format_isk_billions, format_optional, format_percent, format_volume,
};
use ingest::SurveyMoon;
use rust_decimal::Decimal;

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            header
                .into_iter()
                .map(|title| Cell::new(title).add_attribute(Attribute::Bold)),
        );
    table
}

fn number(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn footer_cell(footer: &Footer, column: &str, format: impl Fn(Decimal) -> String) -> Cell {
    number(format_optional(footer.get(column), format)).add_attribute(Attribute::Bold)
}

fn rarity_cell(rarity_class: OreRarityClass) -> Cell {
    let color = match rarity_class {
        OreRarityClass::R64 => Color::Red,
        OreRarityClass::R32 => Color::Yellow,
        OreRarityClass::R16 => Color::Blue,
        OreRarityClass::R8 => Color::Cyan,
        OreRarityClass::R4 => Color::Green,
        OreRarityClass::None => Color::Reset,
    };
    Cell::new(rarity_class.label()).fg(color)
}

pub fn moons_table(rows: &[MoonRow]) -> Table {
    let mut table = new_table(
        ["Moon", "Owner", "Solar System", "Region", "Rarity", "Value", "Extraction"]
            .map(String::from)
            .to_vec(),
    );
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.moon_name),
            Cell::new(&row.corporation.display),
            Cell::new(&row.solar_system_name),
            Cell::new(&row.region_name),
            rarity_cell(row.rarity_class.sort),
            number(format_optional(row.value, format_isk_billions)),
            Cell::new(&row.has_extraction_str),
        ]);
    }
    let footer = Footer::sum(rows);
    table.add_row(vec![
        Cell::new(format!("{} moons", rows.len())).add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        footer_cell(&footer, "value", format_isk_billions),
        Cell::new(""),
    ]);
    table
}

pub fn owned_value_table(rows: &[OwnedValueRow]) -> Table {
    let mut table = new_table(
        ["Corporation", "Moon", "Region", "Rarity", "Value", "%", "Rank", "Total"]
            .map(String::from)
            .to_vec(),
    );
    for row in rows {
        if row.is_total {
            table.add_row(vec![
                Cell::new(&row.corporation).add_attribute(Attribute::Bold),
                Cell::new(&row.moon.display).add_attribute(Attribute::Bold),
                Cell::new(""),
                Cell::new(""),
                Cell::new(""),
                Cell::new(""),
                Cell::new(""),
                number(format_optional(row.total, format_isk_billions)).add_attribute(Attribute::Bold),
            ]);
            continue;
        }
        table.add_row(vec![
            Cell::new(&row.corporation),
            Cell::new(&row.moon.display),
            Cell::new(row.region.as_deref().unwrap_or_default()),
            row.rarity_class
                .as_ref()
                .map_or_else(|| Cell::new(""), |rarity_class| rarity_cell(rarity_class.sort)),
            number(format_optional(row.value, format_isk_billions)),
            number(format_optional(row.percent, format_percent)),
            number(format_optional(row.rank, |rank| rank.to_string())),
            Cell::new(""),
        ]);
    }
    let footer = Footer::sum(rows);
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        footer_cell(&footer, "value", format_isk_billions),
        footer_cell(&footer, "percent", format_percent),
        Cell::new(""),
        footer_cell(&footer, "total", format_isk_billions),
    ]);
    table
}

/// Label of the calendar month `offset` months before the month of `today`, e.g. "2019-11".
fn month_label(today: NaiveDate, offset: usize) -> String {
    let offset = u32::try_from(offset).unwrap_or(u32::MAX);
    today
        .with_day(1)
        .and_then(|first| first.checked_sub_months(Months::new(offset)))
        .map(|month| month.format("%Y-%m").to_string())
        .unwrap_or_default()
}

pub fn user_mining_table(rows: &[UserMiningRow], today: NaiveDate, months: usize) -> Table {
    let mut header: Vec<String> = ["Name", "Corporation", "State"].map(String::from).to_vec();
    for offset in 0..months {
        let label = month_label(today, offset);
        header.push(format!("Volume {label}"));
        header.push(format!("Price {label}"));
    }
    let mut table = new_table(header);

    for row in rows {
        let mut cells = vec![
            Cell::new(&row.name),
            Cell::new(&row.corporation),
            Cell::new(&row.state),
        ];
        for month in &row.months {
            cells.push(number(format_volume(month.volume)));
            cells.push(number(format_isk(month.price)));
        }
        table.add_row(cells);
    }

    let footer = Footer::sum(rows);
    let mut cells = vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
    ];
    for offset in 0..months {
        cells.push(footer_cell(&footer, &format!("volume_month_{offset}"), format_volume));
        cells.push(footer_cell(&footer, &format!("price_month_{offset}"), format_isk));
    }
    table.add_row(cells);
    table
}

pub fn extractions_table(rows: &[ExtractionRow]) -> Table {
    let mut table = new_table(
        ["Ready", "Moon", "Refinery", "Corporation", "Status", "Volume", "Jackpot"]
            .map(String::from)
            .to_vec(),
    );
    for row in rows {
        let jackpot = match row.is_jackpot {
            Some(true) => Cell::new("yes").fg(Color::Yellow),
            Some(false) => Cell::new("no"),
            None => Cell::new(""),
        };
        table.add_row(vec![
            Cell::new(&row.ready_time.display),
            Cell::new(&row.moon_name),
            Cell::new(&row.refinery_name),
            Cell::new(&row.corporation_name),
            Cell::new(&row.status_str),
            number(format_volume(row.total_volume)),
            jackpot,
        ]);
    }
    let footer = Footer::sum(rows);
    table.add_row(vec![
        Cell::new(format!("{} extractions", rows.len())).add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        footer_cell(&footer, "total_volume", format_volume),
        Cell::new(""),
    ]);
    table
}

pub fn survey_table(moons: &[SurveyMoon]) -> Table {
    let mut table = new_table(
        ["Moon", "Moon ID", "Ore Type ID", "Amount"]
            .map(String::from)
            .to_vec(),
    );
    for moon in moons {
        for (index, product) in moon.products.iter().enumerate() {
            let (name, id) = if index == 0 {
                (moon.name.clone(), moon.moon_id.to_string())
            } else {
                (String::new(), String::new())
            };
            table.add_row(vec![
                Cell::new(name),
                Cell::new(id),
                Cell::new(product.ore_type_id),
                number(format_percent(product.amount * Decimal::ONE_HUNDRED)),
            ]);
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_labels_cross_year_boundaries() {
        let today = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap();
        assert_eq!(month_label(today, 0), "2020-01");
        assert_eq!(month_label(today, 1), "2019-12");
        assert_eq!(month_label(today, 3), "2019-10");
    }
}

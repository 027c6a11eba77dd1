//! The client side half of the feed contract: sorting, dropdown filters and footer sums.
//!
//! Every row type exposes its columns as `Cell`s, which gives renderers one uniform way
//! to order, filter and aggregate any feed.

use crate::error::FeedError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// The sortable value of one column of a row.
///
/// Empty cells order before everything else, like `null` in a data table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Cell {
    Empty,
    Number(Decimal),
    Time(DateTime<Utc>),
    Text(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn number(value: Option<Decimal>) -> Self {
        value.map_or(Cell::Empty, Cell::Number)
    }

    /// The value as offered in a dropdown filter.
    pub fn filter_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Number(value) => Some(value.normalize().to_string()),
            Cell::Time(time) => Some(time.to_rfc3339()),
            Cell::Text(text) if text.is_empty() => None,
            Cell::Text(text) => Some(text.clone()),
        }
    }
}

/// A row of a data table feed.
pub trait TableRow {
    /// Names of the sortable and filterable columns of the row type.
    const COLUMNS: &'static [&'static str];

    /// Whether `column` names a column of the row type, independent of any row.
    fn is_column(column: &str) -> bool {
        Self::COLUMNS.iter().any(|name| *name == column)
    }

    /// Columns whose values are summed in the table footer.
    fn numeric_columns(&self) -> Vec<String>;

    /// The sort value of `column`, or `None` if the row has no such column.
    fn cell(&self, column: &str) -> Option<Cell>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Stable sort of `rows` by `column`.
pub fn sort_rows<R: TableRow>(
    rows: &mut [R],
    column: &str,
    direction: SortDirection,
) -> Result<(), FeedError> {
    ensure_column::<R>(column)?;
    rows.sort_by(|a, b| directed(compare_column(a, b, column), direction));
    Ok(())
}

/// Sorts by `column` while keeping rows of the same group together.
///
/// Groups stay in ascending order of `group_column`, mirroring a data table with a
/// fixed row group ordering.
pub fn sort_rows_within_groups<R: TableRow>(
    rows: &mut [R],
    group_column: &str,
    column: &str,
    direction: SortDirection,
) -> Result<(), FeedError> {
    ensure_column::<R>(group_column)?;
    ensure_column::<R>(column)?;
    rows.sort_by(|a, b| {
        compare_column(a, b, group_column)
            .then_with(|| directed(compare_column(a, b, column), direction))
    });
    Ok(())
}

fn ensure_column<R: TableRow>(column: &str) -> Result<(), FeedError> {
    if R::is_column(column) {
        Ok(())
    } else {
        Err(FeedError::UnknownColumn(column.to_string()))
    }
}

fn compare_column<R: TableRow>(a: &R, b: &R, column: &str) -> Ordering {
    a.cell(column).cmp(&b.cell(column))
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Selected values of dropdown filters, keyed by column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    selected: BTreeMap<String, String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.selected.insert(column.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Options of a dropdown filter: the sorted, de-duplicated non-empty values of a column.
    pub fn distinct_values<R: TableRow>(rows: &[R], column: &str) -> Vec<String> {
        rows.iter()
            .filter_map(|row| row.cell(column))
            .filter_map(|cell| cell.filter_text())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Keeps the rows matching every selected value.
    pub fn apply<R: TableRow>(&self, rows: Vec<R>) -> Vec<R> {
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }

    pub fn matches<R: TableRow>(&self, row: &R) -> bool {
        self.selected.iter().all(|(column, value)| {
            row.cell(column)
                .and_then(|cell| cell.filter_text())
                .is_some_and(|text| &text == value)
        })
    }
}

/// Per column sums shown in a table footer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Footer {
    sums: BTreeMap<String, Decimal>,
}

impl Footer {
    /// Sums every numeric column over `rows`, skipping empty cells.
    pub fn sum<R: TableRow>(rows: &[R]) -> Self {
        let mut sums: BTreeMap<String, Decimal> = BTreeMap::new();
        for row in rows {
            for column in row.numeric_columns() {
                let sum = sums.entry(column.clone()).or_default();
                if let Some(Cell::Number(value)) = row.cell(&column) {
                    *sum += value;
                }
            }
        }
        Self { sums }
    }

    pub fn get(&self, column: &str) -> Option<Decimal> {
        self.sums.get(column).copied()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.sums.iter().map(|(column, sum)| (column.as_str(), *sum))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[derive(Debug, Clone)]
    struct Row {
        group: &'static str,
        name: &'static str,
        value: Option<Decimal>,
    }

    impl TableRow for Row {
        const COLUMNS: &'static [&'static str] = &["group", "name", "value"];

        fn numeric_columns(&self) -> Vec<String> {
            vec!["value".to_string()]
        }

        fn cell(&self, column: &str) -> Option<Cell> {
            match column {
                "group" => Some(Cell::text(self.group)),
                "name" => Some(Cell::text(self.name)),
                "value" => Some(Cell::number(self.value)),
                _ => None,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { group: "b", name: "one", value: Some(dec!(3)) },
            Row { group: "a", name: "two", value: None },
            Row { group: "b", name: "three", value: Some(dec!(1)) },
            Row { group: "a", name: "four", value: Some(dec!(2)) },
        ]
    }

    fn names(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|row| row.name).collect()
    }

    #[test]
    fn sorts_with_empty_cells_first() {
        let mut rows = rows();
        sort_rows(&mut rows, "value", SortDirection::Asc).unwrap();
        assert_eq!(names(&rows), ["two", "three", "four", "one"]);

        sort_rows(&mut rows, "value", SortDirection::Desc).unwrap();
        assert_eq!(names(&rows), ["one", "four", "three", "two"]);
    }

    #[test]
    fn sorting_within_groups_keeps_groups_contiguous() {
        let mut rows = rows();
        sort_rows_within_groups(&mut rows, "group", "value", SortDirection::Desc).unwrap();
        assert_eq!(names(&rows), ["four", "two", "one", "three"]);
    }

    #[test]
    fn unknown_column_is_an_error() {
        let mut rows = rows();
        assert!(matches!(
            sort_rows(&mut rows, "color", SortDirection::Asc),
            Err(FeedError::UnknownColumn(_))
        ));
    }

    #[test]
    fn unknown_column_is_rejected_on_empty_rows() {
        let mut empty: Vec<Row> = Vec::new();
        assert!(matches!(
            sort_rows(&mut empty, "color", SortDirection::Asc),
            Err(FeedError::UnknownColumn(column)) if column == "color"
        ));
        assert!(sort_rows_within_groups(&mut empty, "group", "color", SortDirection::Asc).is_err());
        assert!(sort_rows(&mut empty, "value", SortDirection::Desc).is_ok());
    }

    #[test]
    fn dropdown_options_are_distinct_and_sorted() {
        assert_eq!(FilterSet::distinct_values(&rows(), "group"), ["a", "b"]);
        assert_eq!(FilterSet::distinct_values(&rows(), "value"), ["1", "2", "3"]);
    }

    #[test]
    fn filters_are_conjunctive() {
        let filtered = FilterSet::new().with("group", "b").apply(rows());
        assert_eq!(names(&filtered), ["one", "three"]);

        let filtered = FilterSet::new().with("group", "b").with("value", "1").apply(rows());
        assert_eq!(names(&filtered), ["three"]);

        let filtered = FilterSet::new().with("missing", "x").apply(rows());
        assert!(filtered.is_empty());
    }

    #[test]
    fn footer_skips_empty_cells() {
        let footer = Footer::sum(&rows());
        assert_eq!(footer.get("value"), Some(dec!(6)));
        assert_eq!(footer.get("name"), None);

        let empty: Vec<Row> = Vec::new();
        assert_eq!(Footer::sum(&empty).get("value"), None);
    }
}

//! # Feeds
//!
//! The data behind every table of the moon mining dashboard. Each view has a row type
//! with the exact fields its data table is configured with, and a builder that computes
//! the rows from a [`Snapshot`](core_types::Snapshot):
//!
//! - moon listing per tab ([`moon_rows`]) and the moon detail dialog ([`moon_detail`])
//! - extraction listing per tab ([`extraction_rows`]) and its detail dialog
//!   ([`extraction_detail`])
//! - owned value report, grouped by corporation ([`owned_value_report`])
//! - user mining report over the last calendar months ([`user_mining_report`])
//!
//! The [`table`] module holds what the table renderer does with the rows: footer sums,
//! sorting and dropdown filters.

pub mod category;
pub mod error;
pub mod extractions;
pub mod format;
pub mod moons;
pub mod owned_value;
pub mod pair;
pub mod table;
pub mod user_mining;

#[cfg(test)]
mod test_support;

pub use category::{ExtractionCategory, MoonCategory};
pub use error::FeedError;
pub use extractions::{
    ExtractionDetail, ExtractionProductDetail, ExtractionRow, extraction_detail, extraction_rows,
};
pub use format::{
    format_datetime, format_isk, format_isk_billions, format_optional, format_percent, format_volume,
};
pub use moons::{MoonDetail, MoonProductDetail, MoonRow, moon_detail, moon_rows};
pub use owned_value::{OwnedValueRow, TOTAL_LABEL, owned_value_report};
pub use pair::DisplaySort;
pub use table::{Cell, FilterSet, Footer, SortDirection, TableRow, sort_rows, sort_rows_within_groups};
pub use user_mining::{MonthlyMining, UserMiningRow, user_mining_report};

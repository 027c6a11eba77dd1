//! Number and time formatting shared by every table renderer.

use chrono::{DateTime, Utc};
use core_types::constants::{DATETIME_FORMAT, VALUE_DIVIDER};
use rust_decimal::{Decimal, RoundingStrategy};

/// ISK value in billions with one decimal, e.g. "12.3 B".
pub fn format_isk_billions(value: Decimal) -> String {
    format!("{:.1} B", round_one_decimal(value / Decimal::from(VALUE_DIVIDER)))
}

/// Percentage with one decimal, e.g. "42.5%".
pub fn format_percent(percent: Decimal) -> String {
    format!("{:.1}%", round_one_decimal(percent))
}

/// Whole cubic meters with thousands separators, e.g. "1,288,476 m³".
pub fn format_volume(volume: Decimal) -> String {
    format!("{} m³", format_whole(volume))
}

/// Whole ISK with thousands separators, e.g. "225,000 ISK".
pub fn format_isk(value: Decimal) -> String {
    format!("{} ISK", format_whole(value))
}

fn format_whole(value: Decimal) -> String {
    group_thousands(value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}

pub fn format_datetime(time: &DateTime<Utc>) -> String {
    time.format(DATETIME_FORMAT).to_string()
}

/// Formats an optional cell, leaving absent values blank.
pub fn format_optional<T>(value: Option<T>, format: impl Fn(T) -> String) -> String {
    value.map(format).unwrap_or_default()
}

fn round_one_decimal(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

fn group_thousands(whole: Decimal) -> String {
    let digits = whole.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole.is_sign_negative() && !whole.is_zero() {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

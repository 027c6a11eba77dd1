//! Parser for moon surveys copied from the game client.
//!
//! A survey is tab separated text. A line holding a single field names a moon, the
//! product lines that follow list the moon's ores:
//!
//! ```text
//! Moon	Moon Product	Quantity	Ore TypeID	SolarSystemID	PlanetID	MoonID
//! Amamake II - Moon 1
//! 	Cinnabar	0.19	45506	30002537	40161465	40161708
//! 	Cobaltite	0.23	46676	30002537	40161465	40161708
//! ```
//!
//! Several surveys can be pasted one after another; the header line is optional.

use crate::error::IngestError;
use core_types::{MoonId, MoonProduct, OreTypeId};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

const HEADER_FIRST_COLUMN: &str = "Moon";
const PRODUCT_COLUMNS: usize = 6;

/// One moon block of a survey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyMoon {
    pub moon_id: MoonId,
    pub name: String,
    pub solar_system_id: i64,
    pub planet_id: i64,
    pub products: Vec<MoonProduct>,
}

/// A moon block still being read.
struct PendingMoon {
    name: String,
    line: usize,
    ids: Option<(MoonId, i64, i64)>,
    products: Vec<MoonProduct>,
}

impl PendingMoon {
    fn finish(self) -> Result<SurveyMoon, IngestError> {
        let Some((moon_id, solar_system_id, planet_id)) = self.ids else {
            return Err(IngestError::survey(
                self.line,
                format!("moon '{}' has no products", self.name),
            ));
        };
        Ok(SurveyMoon {
            moon_id,
            name: self.name,
            solar_system_id,
            planet_id,
            products: self.products,
        })
    }
}

/// Parses survey text into moon blocks.
pub fn parse_survey(input: &str) -> Result<Vec<SurveyMoon>, IngestError> {
    let mut moons = Vec::new();
    let mut current: Option<PendingMoon> = None;

    for (index, raw_line) in input.lines().enumerate() {
        let line_no = index + 1;
        let fields: Vec<&str> = raw_line
            .trim_end_matches('\r')
            .split('\t')
            .map(str::trim)
            .skip_while(|field| field.is_empty())
            .collect();

        match fields.len() {
            0 => continue,
            1 => {
                if let Some(pending) = current.take() {
                    moons.push(pending.finish()?);
                }
                current = Some(PendingMoon {
                    name: fields[0].to_string(),
                    line: line_no,
                    ids: None,
                    products: Vec::new(),
                });
            }
            n if fields[0] == HEADER_FIRST_COLUMN && n > 1 => continue,
            n if n >= PRODUCT_COLUMNS => {
                let Some(pending) = current.as_mut() else {
                    return Err(IngestError::survey(
                        line_no,
                        "product line before any moon name",
                    ));
                };
                read_product(pending, &fields, line_no)?;
            }
            n => {
                return Err(IngestError::survey(
                    line_no,
                    format!("expected {PRODUCT_COLUMNS} columns, found {n}"),
                ));
            }
        }
    }

    if let Some(pending) = current.take() {
        moons.push(pending.finish()?);
    }
    if moons.is_empty() {
        return Err(IngestError::EmptySurvey);
    }
    Ok(moons)
}

fn read_product(pending: &mut PendingMoon, fields: &[&str], line: usize) -> Result<(), IngestError> {
    let amount = parse_amount(fields[1], line)?;
    let ore_type_id: OreTypeId = parse_number(fields[2], "ore type id", line)?;
    let solar_system_id: i64 = parse_number(fields[3], "solar system id", line)?;
    let planet_id: i64 = parse_number(fields[4], "planet id", line)?;
    let moon_id: MoonId = parse_number(fields[5], "moon id", line)?;

    match pending.ids {
        None => pending.ids = Some((moon_id, solar_system_id, planet_id)),
        Some((expected, _, _)) if expected != moon_id => {
            return Err(IngestError::survey(
                line,
                format!("moon id {moon_id} does not match {expected} of '{}'", pending.name),
            ));
        }
        Some(_) => {}
    }

    if pending
        .products
        .iter()
        .any(|product| product.ore_type_id == ore_type_id)
    {
        return Err(IngestError::survey(
            line,
            format!("ore type {ore_type_id} listed twice for '{}'", pending.name),
        ));
    }

    pending.products.push(MoonProduct {
        ore_type_id,
        amount,
    });
    Ok(())
}

fn parse_amount(field: &str, line: usize) -> Result<Decimal, IngestError> {
    // Some client locales use a decimal comma.
    let normalized = field.replace(',', ".");
    let amount = Decimal::from_str(&normalized)
        .map_err(|_| IngestError::survey(line, format!("invalid quantity '{field}'")))?;
    if amount < Decimal::ZERO || amount > Decimal::ONE {
        return Err(IngestError::survey(
            line,
            format!("quantity {amount} is outside 0..1"),
        ));
    }
    Ok(amount)
}

fn parse_number<T: FromStr>(field: &str, what: &str, line: usize) -> Result<T, IngestError> {
    field
        .parse()
        .map_err(|_| IngestError::survey(line, format!("invalid {what} '{field}'")))
}

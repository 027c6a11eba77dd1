//! Derives extractions from moon mining notifications.
//!
//! The game does not expose extraction history directly. Each refinery emits
//! notifications when an extraction is started, cancelled, finished and fractured;
//! replaying them in order yields the extraction timeline.

use crate::error::IngestError;
use chrono::{DateTime, Duration, DurationRound, Utc};
use core_types::{
    EntityId, Extraction, ExtractionProduct, ExtractionStatus, Notification, NotificationType,
    OreTypeId, RefineryId,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Seconds between 1601-01-01 and the unix epoch.
const LDAP_EPOCH_OFFSET_SECONDS: i64 = 11_644_473_600;

/// Converts an LDAP timestamp (100 ns ticks since 1601-01-01 UTC) to a datetime.
pub fn ldap_time_to_datetime(ldap_time: i64) -> Result<DateTime<Utc>, IngestError> {
    let unix_micros = ldap_time / 10 - LDAP_EPOCH_OFFSET_SECONDS * 1_000_000;
    DateTime::from_timestamp_micros(unix_micros).ok_or(IngestError::InvalidTimestamp(ldap_time))
}

/// The fields of moon mining notification bodies this crate cares about.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoonminingBody {
    #[serde(rename = "structureID")]
    structure_id: RefineryId,
    #[serde(default)]
    ready_time: Option<i64>,
    #[serde(default)]
    auto_time: Option<i64>,
    #[serde(default)]
    started_by: Option<EntityId>,
    #[serde(default)]
    cancelled_by: Option<EntityId>,
    #[serde(default)]
    fired_by: Option<EntityId>,
    #[serde(default)]
    ore_volume_by_type: BTreeMap<OreTypeId, Decimal>,
}

impl MoonminingBody {
    fn parse(notification: &Notification) -> Result<Self, IngestError> {
        serde_yaml::from_str(&notification.text).map_err(|source| IngestError::NotificationBody {
            id: notification.id,
            source,
        })
    }

    fn products(&self) -> Vec<ExtractionProduct> {
        self.ore_volume_by_type
            .iter()
            .map(|(ore_type_id, volume)| ExtractionProduct {
                ore_type_id: *ore_type_id,
                volume: *volume,
            })
            .collect()
    }
}

/// Replays moon mining notifications into extractions.
///
/// Notifications of other types, for refineries not in `refineries`, or with malformed
/// bodies are skipped. Extraction ids are the ids of the notifications that created them.
pub fn calculate_extractions(
    notifications: &[Notification],
    refineries: &HashSet<RefineryId>,
) -> Vec<Extraction> {
    let mut ordered: Vec<&Notification> = notifications
        .iter()
        .filter(|notification| notification.notification_type.is_moon_mining())
        .collect();
    ordered.sort_by_key(|notification| (notification.timestamp, notification.id));

    let mut extractions: Vec<Extraction> = Vec::new();
    // Index of the most recent extraction per refinery that can still change state.
    let mut current: HashMap<RefineryId, usize> = HashMap::new();

    for notification in ordered {
        let body = match MoonminingBody::parse(notification) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed moon mining notification.");
                continue;
            }
        };
        let refinery_id = body.structure_id;
        if !refineries.contains(&refinery_id) {
            tracing::debug!(
                notification_id = notification.id,
                refinery_id,
                "Ignoring notification for unknown refinery."
            );
            continue;
        }

        let result = match notification.notification_type {
            NotificationType::MoonminingExtractionStarted => {
                started(&mut extractions, &mut current, notification, &body)
            }
            NotificationType::MoonminingExtractionCancelled => {
                if let Some(index) = current.remove(&refinery_id) {
                    let extraction = &mut extractions[index];
                    extraction.status = ExtractionStatus::Canceled;
                    extraction.canceled_at = Some(notification.timestamp);
                    extraction.canceled_by = body.cancelled_by;
                }
                Ok(())
            }
            NotificationType::MoonminingExtractionFinished => {
                finished(&mut extractions, &mut current, notification, &body)
            }
            NotificationType::MoonminingAutomaticFracture
            | NotificationType::MoonminingLaserFired => {
                fractured(&mut extractions, &mut current, notification, &body);
                Ok(())
            }
            NotificationType::Other => Ok(()),
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, notification_id = notification.id, "Skipping notification.");
        }
    }

    extractions
}

fn started(
    extractions: &mut Vec<Extraction>,
    current: &mut HashMap<RefineryId, usize>,
    notification: &Notification,
    body: &MoonminingBody,
) -> Result<(), IngestError> {
    let ready_time = match body.ready_time {
        Some(ldap_time) => round_seconds(ldap_time_to_datetime(ldap_time)?),
        None => round_seconds(notification.timestamp),
    };
    let auto_time = body.auto_time.map(ldap_time_to_datetime).transpose()?;

    let existing = extractions.iter().position(|extraction| {
        extraction.refinery_id == body.structure_id && extraction.ready_time == ready_time
    });
    let index = match existing {
        Some(index) => index,
        None => {
            extractions.push(new_extraction(notification, body.structure_id, ready_time));
            extractions.len() - 1
        }
    };

    let extraction = &mut extractions[index];
    extraction.status = ExtractionStatus::Started;
    extraction.auto_time = auto_time;
    extraction.started_by = body.started_by;
    extraction.products = body.products();
    current.insert(body.structure_id, index);
    Ok(())
}

fn finished(
    extractions: &mut Vec<Extraction>,
    current: &mut HashMap<RefineryId, usize>,
    notification: &Notification,
    body: &MoonminingBody,
) -> Result<(), IngestError> {
    let auto_time = body.auto_time.map(ldap_time_to_datetime).transpose()?;
    let index = match current.get(&body.structure_id) {
        Some(index) => *index,
        None => {
            let ready_time = round_seconds(notification.timestamp);
            extractions.push(new_extraction(notification, body.structure_id, ready_time));
            current.insert(body.structure_id, extractions.len() - 1);
            extractions.len() - 1
        }
    };

    let extraction = &mut extractions[index];
    extraction.status = ExtractionStatus::Ready;
    extraction.finished_at = Some(notification.timestamp);
    if auto_time.is_some() {
        extraction.auto_time = auto_time;
    }
    if !body.ore_volume_by_type.is_empty() {
        extraction.products = body.products();
    }
    Ok(())
}

fn fractured(
    extractions: &mut Vec<Extraction>,
    current: &mut HashMap<RefineryId, usize>,
    notification: &Notification,
    body: &MoonminingBody,
) {
    let index = match current.remove(&body.structure_id) {
        Some(index) => index,
        None => {
            let ready_time = round_seconds(notification.timestamp);
            extractions.push(new_extraction(notification, body.structure_id, ready_time));
            extractions.len() - 1
        }
    };

    let extraction = &mut extractions[index];
    extraction.status = ExtractionStatus::Completed;
    extraction.fractured_at = Some(notification.timestamp);
    extraction.fractured_by = body.fired_by;
    if !body.ore_volume_by_type.is_empty() {
        extraction.products = body.products();
    }
}

fn new_extraction(
    notification: &Notification,
    refinery_id: RefineryId,
    ready_time: DateTime<Utc>,
) -> Extraction {
    Extraction {
        id: notification.id,
        refinery_id,
        ready_time,
        auto_time: None,
        status: ExtractionStatus::Undefined,
        started_by: None,
        canceled_at: None,
        canceled_by: None,
        finished_at: None,
        fractured_at: None,
        fractured_by: None,
        products: Vec::new(),
    }
}

fn round_seconds(time: DateTime<Utc>) -> DateTime<Utc> {
    time.duration_round(Duration::seconds(1)).unwrap_or(time)
}

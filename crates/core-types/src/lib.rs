//! # Moon Mining Core Types
//!
//! The shared vocabulary of the workspace: rarity and quality classes, extraction
//! states and the snapshot records every feed is computed from.
//!
//! This crate has no knowledge of HTTP, files or configuration.

pub mod constants;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{ExtractionStatus, NotificationType, OreQualityClass, OreRarityClass};
pub use error::CoreError;
pub use structs::{
    Corporation, CorporationId, EntityId, EveEntity, Extraction, ExtractionId, ExtractionProduct,
    Member, MiningLedgerEntry, Moon, MoonId, MoonProduct, Notification, OreType, OreTypeId,
    Refinery, RefineryId, Snapshot, UserId, with_alliance_ticker,
};

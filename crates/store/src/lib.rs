//! # Moon Mining Store
//!
//! The data source behind the feeds. `FeedSource` is the interface the web server
//! uses; `SnapshotStore` implements it over a snapshot loaded from a JSON file.
//!
//! ## Snapshot file
//!
//! A JSON object with one array per record kind. Every array is optional:
//!
//! ```json
//! {
//!   "ore_types": [{"id": 45506, "name": "Cinnabar", "group_id": 1922, "volume": 10.0, "quality_level": 1}],
//!   "entities": [{"id": 1001, "name": "Bruce Wayne"}],
//!   "corporations": [{"id": 2001, "name": "Wayne Technologies", "alliance_name": "Wayne Enterprises", "alliance_ticker": "WYE"}],
//!   "moons": [{"id": 40161708, "name": "Auga V - Moon 1", "solar_system_name": "Auga", "region_name": "Derelik",
//!              "value": 300000000000.0, "rarity_class": 32, "products": [{"ore_type_id": 45506, "amount": 0.6}]}],
//!   "refineries": [{"id": 1000000000001, "name": "Auga - Refinery", "moon_id": 40161708, "corporation_id": 2001}],
//!   "extractions": [],
//!   "notifications": [{"id": 77, "timestamp": "2019-11-13T10:00:00Z",
//!                      "notification_type": "MoonminingExtractionStarted", "text": "structureID: 1000000000001\n..."}],
//!   "members": [{"id": 1, "name": "Bruce Wayne", "corporation_name": "Wayne Technologies", "state": "Member"}],
//!   "mining_ledger": [{"user_id": 1, "day": "2019-11-02", "ore_type_id": 45506, "quantity": 1000, "unit_price": 200.0}]
//! }
//! ```
//!
//! Extractions are replayed from `notifications` at load time and merged with the ones
//! listed explicitly.

pub mod error;
pub mod snapshot_store;
pub mod source;

pub use error::StoreError;
pub use snapshot_store::SnapshotStore;
pub use source::{FeedSource, ImportSummary};

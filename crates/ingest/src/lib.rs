//! # Moon Mining Ingest
//!
//! Parsers for the inputs users and the game hand to the dashboard:
//!
//! - `survey`: moon surveys pasted from the game client.
//! - `notifications`: moon mining notifications replayed into extractions.

pub mod error;
pub mod notifications;
pub mod survey;

pub use error::IngestError;
pub use notifications::{calculate_extractions, ldap_time_to_datetime};
pub use survey::{SurveyMoon, parse_survey};

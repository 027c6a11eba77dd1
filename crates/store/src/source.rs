use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{MoonId, Snapshot};
use ingest::SurveyMoon;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Outcome of merging a survey into the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub upload_id: Uuid,
    /// Moons whose products were replaced.
    pub updated: Vec<MoonId>,
    /// Moons listed in the survey but not known to the source.
    pub unknown: Vec<MoonId>,
}

/// Where the feeds get their data from.
///
/// The web server only talks to this trait, so the in-memory store can be replaced
/// by a backend that fetches from the game API.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// The current snapshot.
    async fn snapshot(&self) -> Result<Arc<Snapshot>, StoreError>;

    /// Replaces the products of the surveyed moons and records who uploaded them.
    async fn apply_survey(
        &self,
        moons: Vec<SurveyMoon>,
        uploader: &str,
        at: DateTime<Utc>,
    ) -> Result<ImportSummary, StoreError>;
}

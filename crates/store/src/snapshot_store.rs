use crate::error::StoreError;
use crate::source::{FeedSource, ImportSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{Extraction, OreRarityClass, RefineryId, Snapshot};
use ingest::{SurveyMoon, calculate_extractions};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Serves feeds from a snapshot held in memory.
///
/// Readers get a shared `Arc` of the current snapshot. A survey upload swaps in an
/// updated copy, so feeds being computed keep a consistent view.
#[derive(Debug)]
pub struct SnapshotStore {
    snapshot: RwLock<Arc<Snapshot>>,
}

impl SnapshotStore {
    /// Wraps a snapshot, deriving extractions from its notifications.
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(prepare(snapshot))),
        }
    }

    /// Loads a snapshot from a JSON file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            moons = snapshot.moons.len(),
            refineries = snapshot.refineries.len(),
            notifications = snapshot.notifications.len(),
            "Loaded snapshot."
        );
        Ok(Self::new(snapshot))
    }
}

#[async_trait]
impl FeedSource for SnapshotStore {
    async fn snapshot(&self) -> Result<Arc<Snapshot>, StoreError> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn apply_survey(
        &self,
        moons: Vec<SurveyMoon>,
        uploader: &str,
        at: DateTime<Utc>,
    ) -> Result<ImportSummary, StoreError> {
        let uploader = uploader.trim();
        if uploader.is_empty() {
            return Err(StoreError::MissingUploader);
        }

        let upload_id = Uuid::new_v4();
        let mut guard = self.snapshot.write().await;
        let snapshot = Arc::make_mut(&mut guard);
        let mut updated = Vec::new();
        let mut unknown = Vec::new();

        for survey in moons {
            let rarity_class = snapshot.calc_rarity_class(&survey.products);
            let Some(moon) = snapshot.moons.iter_mut().find(|moon| moon.id == survey.moon_id) else {
                tracing::warn!(%upload_id, moon_id = survey.moon_id, name = %survey.name, "Survey lists an unknown moon.");
                unknown.push(survey.moon_id);
                continue;
            };
            moon.products = survey.products;
            moon.rarity_class = rarity_class;
            // Values are estimated elsewhere from the products, the old one is stale now.
            moon.value = None;
            moon.products_updated_by = Some(uploader.to_string());
            moon.products_updated_at = Some(at);
            updated.push(moon.id);
        }

        tracing::info!(
            %upload_id,
            uploader,
            updated = updated.len(),
            unknown = unknown.len(),
            "Applied moon survey."
        );
        Ok(ImportSummary {
            upload_id,
            updated,
            unknown,
        })
    }
}

/// Completes a freshly loaded snapshot.
///
/// Extractions replayed from notifications are added unless an explicit extraction of
/// the same refinery and ready time (or with the same id) is already listed. Moons
/// without a rarity class get the one of their products.
fn prepare(mut snapshot: Snapshot) -> Snapshot {
    let refineries: HashSet<RefineryId> = snapshot
        .refineries
        .iter()
        .map(|refinery| refinery.id)
        .collect();
    let derived = calculate_extractions(&snapshot.notifications, &refineries);
    let derived_count = derived.len();
    merge_extractions(&mut snapshot.extractions, derived);
    tracing::debug!(
        derived = derived_count,
        total = snapshot.extractions.len(),
        "Merged extractions from notifications."
    );

    for index in 0..snapshot.moons.len() {
        if snapshot.moons[index].rarity_class == OreRarityClass::None {
            let rarity_class = snapshot.calc_rarity_class(&snapshot.moons[index].products);
            snapshot.moons[index].rarity_class = rarity_class;
        }
    }
    snapshot
}

fn merge_extractions(explicit: &mut Vec<Extraction>, derived: Vec<Extraction>) {
    let keys: HashSet<(RefineryId, DateTime<Utc>)> = explicit
        .iter()
        .map(|extraction| (extraction.refinery_id, extraction.ready_time))
        .collect();
    let ids: HashSet<i64> = explicit.iter().map(|extraction| extraction.id).collect();
    explicit.extend(derived.into_iter().filter(|extraction| {
        !keys.contains(&(extraction.refinery_id, extraction.ready_time))
            && !ids.contains(&extraction.id)
    }));
}

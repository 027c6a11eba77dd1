use serde::{Deserialize, Serialize};

/// Tabs of the moon listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoonCategory {
    /// Every known moon.
    #[default]
    All,
    /// Moons with a refinery of a tracked corporation.
    Ours,
    /// Moons whose latest survey was uploaded by a given user.
    Uploads,
}

/// Tabs of the extraction listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionCategory {
    #[default]
    Upcoming,
    Past,
}

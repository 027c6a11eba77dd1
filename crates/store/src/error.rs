use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read snapshot file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("An error occurred during JSON deserialization of the snapshot: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("A survey upload needs the name of the uploader")]
    MissingUploader,
}

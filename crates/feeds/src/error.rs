use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}

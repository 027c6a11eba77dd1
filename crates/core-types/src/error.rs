use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown ore rarity class: {0}")]
    UnknownRarityClass(u8),
}

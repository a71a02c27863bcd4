use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("invalid zone entry: {reason}")]
    Invalid { reason: String },
}

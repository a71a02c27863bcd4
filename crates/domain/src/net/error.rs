use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("invalid CIDR notation '{value}': {reason}")]
    InvalidCidr { value: String, reason: String },

    #[error("invalid host address '{value}'")]
    InvalidAddress { value: String },

    #[error("invalid prefix length {prefix_len} for {family} network")]
    InvalidPrefix { prefix_len: u8, family: &'static str },
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid config value for {key}: {value:?}")]
    InvalidConfig { key: String, value: String },
}

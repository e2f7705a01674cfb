use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Invalid affordability ratio {0}: must be in (0.0, 1.0]")]
    InvalidAffordabilityRatio(f64),

    #[error("Invalid allocation policy for '{profile}': {details}")]
    InvalidPolicy { profile: String, details: String },

    #[error("Configuration error in {field}: {details}")]
    ValidationError { field: String, details: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InsightError>;

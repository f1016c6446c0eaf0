use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResampleError {
    #[error("Unknown resampling method: {0}")]
    UnknownMethod(String),

    #[error("Sheared affine transform is not supported (b={b}, d={d})")]
    Sheared { b: f64, d: f64 },

    #[error("Invalid affine transform: {0}")]
    Affine(String),

    #[error("Invalid shape: {0}")]
    Shape(String),

    #[error("Level {level} out of range (pyramid has {levels} levels)")]
    Level { level: usize, levels: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ResampleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for resampling operations.
pub type Result<T> = std::result::Result<T, ResampleError>;

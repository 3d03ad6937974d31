//! Error types for gain configuration.

/// Errors that can occur while loading or validating a [`GainConfig`](crate::GainConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    Json(serde_json::Error),
    /// A field holds NaN or an infinity.
    NonFinite { field: &'static str },
    /// A field is outside its allowed range.
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid gain config: {err}"),
            Self::NonFinite { field } => write!(f, "{field} must be finite"),
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field} = {value} is outside [{min}, {max}]"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

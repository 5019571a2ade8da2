use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurveError {
    #[error("invalid coordinate: lat={lat}, lon={lon} (expected lat in [-90, 90], lon in [-180, 180])")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("route needs at least {required} points, got {actual}")]
    InsufficientPoints { required: usize, actual: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse JSON at `{path}`: {message}")]
    Parse { path: String, message: String },

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CurveError>;

/// Deserialize JSON, keeping the path of the offending field in the error.
pub fn from_json_str<T: DeserializeOwned>(json_in: &str) -> Result<T> {
    let mut de = serde_json::Deserializer::from_str(json_in);
    serde_path_to_error::deserialize(&mut de).map_err(|e| CurveError::Parse {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

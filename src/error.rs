use thiserror::Error;

/// Problems that stop a scoring run before any centroid is processed.
#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    #[error("{id}: latitude {value} is outside [-90, 90]")]
    InvalidLatitude { id: String, value: f64 },

    #[error("{id}: longitude {value} is outside [-180, 180]")]
    InvalidLongitude { id: String, value: f64 },

    #[error("max study area must be a positive number of kilometres, got {0}")]
    InvalidStudyArea(f64),

    #[error("friction coefficient must be positive, got {0}")]
    InvalidCoefficient(f64),

    #[error("normalization bounds must be finite with max > min, got [{min}, {max}]")]
    InvalidNormalization { min: f64, max: f64 },

    #[error("amenity type `{0}` may only contain a-z, 0-9 and _")]
    InvalidAmenityType(String),

    #[error("{source_name} is missing required column `{column}`")]
    MissingColumn { source_name: String, column: String },
}

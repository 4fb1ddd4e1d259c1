//! Errors from structure assembly and ellipsometric evaluation.

use thiserror::Error;

use stratus_materials::model::MaterialError;

/// Errors that can occur while building a structure or evaluating the
/// forward model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("angle of incidence {aoi_deg}° is outside the open interval (0°, 90°)")]
    InvalidAngle { aoi_deg: f64 },

    #[error("malformed structure: {0}")]
    Structure(String),

    #[error(transparent)]
    Material(#[from] MaterialError),
}

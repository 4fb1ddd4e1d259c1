//! Dispersion model trait and error type.
//!
//! All dispersion models implement [`DispersionModel`], which maps a vacuum
//! wavelength to a complex refractive index $\tilde{n} = n + ik$. Tabulated
//! and parametric models share this one capability; everything downstream
//! (slabs, structures, the reflectance engine) dispatches through it.

use num_complex::Complex64;
use thiserror::Error;

use crate::parameter::Parameterised;

/// Errors from dispersion models and material tables.
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("wavelength {wavelength_nm} nm is outside the tabulated range [{min}, {max}] nm")]
    OutOfRange {
        wavelength_nm: f64,
        min: f64,
        max: f64,
    },

    #[error("a tabulated dispersion needs at least 2 samples, got {count}")]
    InsufficientData { count: usize },

    #[error("material data error: {0}")]
    DataError(String),

    #[error("failed to read material file")]
    Io(#[from] std::io::Error),
}

/// hc in eV·nm. Divides a vacuum wavelength into a photon energy.
pub const HC_EV_NM: f64 = 1239.841984;

/// Maps wavelength to a material's complex refractive index.
///
/// Implementations are side-effect-free apart from reading the current
/// values of their adjustable [`Parameter`](crate::parameter::Parameter)s,
/// which an external fitting loop mutates between evaluations.
pub trait DispersionModel: Parameterised + Send + Sync {
    /// Human-readable name of this material or model.
    fn name(&self) -> &str;

    /// Complex refractive index $n + ik$ at a vacuum wavelength in nm.
    fn refractive_index(&self, wavelength_nm: f64) -> Result<Complex64, MaterialError>;

    /// Evaluate a batch of wavelengths, failing on the first error.
    fn refractive_index_batch(
        &self,
        wavelengths_nm: &[f64],
    ) -> Result<Vec<Complex64>, MaterialError> {
        wavelengths_nm
            .iter()
            .map(|&w| self.refractive_index(w))
            .collect()
    }
}

/// Refractive index from a complex dielectric function, $\tilde{n} =
/// \sqrt{\epsilon}$ on the branch with non-negative imaginary part
/// (physical absorption).
pub fn index_from_epsilon(epsilon: Complex64) -> Complex64 {
    let n = epsilon.sqrt();
    if n.im < 0.0 {
        -n
    } else {
        n
    }
}

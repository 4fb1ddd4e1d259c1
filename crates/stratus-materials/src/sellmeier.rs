//! Three-term Sellmeier dispersion.
//!
//! $n^2(\lambda) = 1 + \sum_i B_i \lambda^2 / (\lambda^2 - C_i)$ with
//! $\lambda$ in micrometres. The standard glass-catalogue form; below the
//! nearest resonance $n^2$ can go negative, in which case the index comes
//! out purely imaginary on the absorbing branch.

use num_complex::Complex64;

use crate::model::{index_from_epsilon, DispersionModel, MaterialError};
use crate::parameter::{Parameter, Parameterised};

/// Three-term Sellmeier model with adjustable B and C coefficients.
#[derive(Clone)]
pub struct Sellmeier {
    b: [Parameter; 3],
    c: [Parameter; 3],
}

impl Sellmeier {
    /// Create a Sellmeier model (C coefficients in µm²).
    ///
    /// # Errors
    /// All coefficients must be finite and the C resonance terms
    /// non-negative.
    pub fn new(b: [f64; 3], c: [f64; 3]) -> Result<Self, MaterialError> {
        if b.iter().any(|v| !v.is_finite()) {
            return Err(MaterialError::DataError(
                "all B coefficients must be finite".into(),
            ));
        }
        if c.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(MaterialError::DataError(
                "all C coefficients must be non-negative and finite".into(),
            ));
        }
        let mk = |prefix: &str, values: [f64; 3]| -> [Parameter; 3] {
            std::array::from_fn(|i| {
                Parameter::new(format!("sellmeier.{prefix}{}", i + 1), values[i])
            })
        };
        Ok(Self {
            b: mk("B", b),
            c: mk("C", c),
        })
    }

    /// BK7 borosilicate crown glass (SCHOTT catalogue coefficients).
    pub fn bk7() -> Self {
        // Coefficients are catalogue constants, validation cannot fail.
        Self::new(
            [1.039_612_12, 0.231_792_344, 1.010_469_45],
            [0.006_000_698_67, 0.020_017_914_4, 103.560_653],
        )
        .unwrap_or_else(|_| unreachable!("catalogue coefficients are valid"))
    }

    fn epsilon_at(&self, wavelength_nm: f64) -> f64 {
        let lam2 = (wavelength_nm / 1000.0).powi(2);
        let mut n2 = 1.0;
        for (b, c) in self.b.iter().zip(&self.c) {
            n2 += b.value() * lam2 / (lam2 - c.value());
        }
        n2
    }
}

impl DispersionModel for Sellmeier {
    fn name(&self) -> &str {
        "Sellmeier"
    }

    fn refractive_index(&self, wavelength_nm: f64) -> Result<Complex64, MaterialError> {
        Ok(index_from_epsilon(Complex64::new(
            self.epsilon_at(wavelength_nm),
            0.0,
        )))
    }
}

impl Parameterised for Sellmeier {
    fn parameters(&self) -> Vec<Parameter> {
        let mut params: Vec<Parameter> = self.b.iter().cloned().collect();
        params.extend(self.c.iter().cloned());
        params
    }
}

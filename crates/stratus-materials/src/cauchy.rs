//! Cauchy dispersion for transparent dielectrics.
//!
//! $n(\lambda) = A + B/\lambda^2 + C/\lambda^4$ with $\lambda$ in
//! micrometres. Purely real: no absorption term is exposed, so the
//! imaginary part of the returned index is always zero.

use num_complex::Complex64;

use crate::model::{DispersionModel, MaterialError};
use crate::parameter::{Parameter, Parameterised};

/// Three-coefficient Cauchy model.
#[derive(Clone)]
pub struct Cauchy {
    a: Parameter,
    b: Parameter,
    c: Parameter,
}

impl Cauchy {
    /// Create a Cauchy model from its coefficients (B and C in µm² and µm⁴).
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self {
            a: Parameter::new("cauchy.A", a),
            b: Parameter::new("cauchy.B", b),
            c: Parameter::new("cauchy.C", c),
        }
    }

    pub fn a(&self) -> Parameter {
        self.a.clone()
    }

    pub fn b(&self) -> Parameter {
        self.b.clone()
    }

    pub fn c(&self) -> Parameter {
        self.c.clone()
    }

    fn index_at(&self, wavelength_nm: f64) -> f64 {
        let lam_um_sq = (wavelength_nm / 1000.0).powi(2);
        self.a.value() + self.b.value() / lam_um_sq + self.c.value() / lam_um_sq.powi(2)
    }
}

impl DispersionModel for Cauchy {
    fn name(&self) -> &str {
        "Cauchy"
    }

    fn refractive_index(&self, wavelength_nm: f64) -> Result<Complex64, MaterialError> {
        Ok(Complex64::new(self.index_at(wavelength_nm), 0.0))
    }
}

impl Parameterised for Cauchy {
    fn parameters(&self) -> Vec<Parameter> {
        vec![self.a.clone(), self.b.clone(), self.c.clone()]
    }
}

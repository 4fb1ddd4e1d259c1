//! Lorentz-oscillator dispersion for absorbing films.
//!
//! The dielectric function is a sum of damped-oscillator terms over photon
//! energy plus a high-frequency offset:
//!
//! $\epsilon(E) = \epsilon_\infty + \sum_i \frac{A_i}{E_i^2 - E^2 - i \Gamma_i E}$
//!
//! with amplitudes $A_i$, broadenings $\Gamma_i$ and centre energies $E_i$
//! in eV. The refractive index is $\sqrt{\epsilon}$ on the branch with
//! non-negative imaginary part.

use num_complex::Complex64;

use crate::model::{index_from_epsilon, DispersionModel, MaterialError, HC_EV_NM};
use crate::parameter::{Parameter, Parameterised};

/// Multi-oscillator Lorentz model.
#[derive(Debug, Clone)]
pub struct Lorentz {
    am: Vec<Parameter>,
    brn: Vec<Parameter>,
    en: Vec<Parameter>,
    einf: Parameter,
}

impl Lorentz {
    /// Create a Lorentz model from index-aligned oscillator coefficients.
    ///
    /// # Errors
    /// The three coefficient slices must have equal, non-zero length.
    pub fn new(am: &[f64], brn: &[f64], en: &[f64], einf: f64) -> Result<Self, MaterialError> {
        if am.len() != brn.len() || am.len() != en.len() {
            return Err(MaterialError::DataError(format!(
                "oscillator coefficient lengths differ: {} Am, {} Brn, {} En",
                am.len(),
                brn.len(),
                en.len()
            )));
        }
        if am.is_empty() {
            return Err(MaterialError::DataError(
                "a Lorentz model needs at least one oscillator".into(),
            ));
        }
        let param_vec = |prefix: &str, values: &[f64]| {
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| Parameter::new(format!("lorentz.{prefix}{i}"), v))
                .collect()
        };
        Ok(Self {
            am: param_vec("Am", am),
            brn: param_vec("Brn", brn),
            en: param_vec("En", en),
            einf: Parameter::new("lorentz.Einf", einf),
        })
    }

    pub fn oscillator_count(&self) -> usize {
        self.am.len()
    }

    /// Amplitude parameters, one per oscillator.
    pub fn amplitudes(&self) -> &[Parameter] {
        &self.am
    }

    /// Broadening parameters (eV), one per oscillator.
    pub fn broadenings(&self) -> &[Parameter] {
        &self.brn
    }

    /// Centre-energy parameters (eV), one per oscillator.
    pub fn centre_energies(&self) -> &[Parameter] {
        &self.en
    }

    pub fn einf(&self) -> Parameter {
        self.einf.clone()
    }

    /// Complex dielectric function at a photon energy in eV.
    pub fn epsilon(&self, energy_ev: f64) -> Complex64 {
        let e = energy_ev;
        let mut eps = Complex64::from(self.einf.value());
        for ((am, brn), en) in self.am.iter().zip(&self.brn).zip(&self.en) {
            let en = en.value();
            let denom = Complex64::new(en * en - e * e, -brn.value() * e);
            eps += am.value() / denom;
        }
        eps
    }

    /// [`epsilon`](Self::epsilon) over a batch of energies.
    pub fn epsilon_batch(&self, energies_ev: &[f64]) -> Vec<Complex64> {
        energies_ev.iter().map(|&e| self.epsilon(e)).collect()
    }
}

impl DispersionModel for Lorentz {
    fn name(&self) -> &str {
        "Lorentz"
    }

    fn refractive_index(&self, wavelength_nm: f64) -> Result<Complex64, MaterialError> {
        let energy_ev = HC_EV_NM / wavelength_nm;
        Ok(index_from_epsilon(self.epsilon(energy_ev)))
    }
}

impl Parameterised for Lorentz {
    fn parameters(&self) -> Vec<Parameter> {
        let mut params: Vec<Parameter> = self.am.clone();
        params.extend(self.brn.iter().cloned());
        params.extend(self.en.iter().cloned());
        params.push(self.einf.clone());
        params
    }
}

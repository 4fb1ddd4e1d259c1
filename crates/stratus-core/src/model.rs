//! The ellipsometric forward model consumed by fitting code.
//!
//! [`EllipsometricModel`] owns a [`Structure`] and maps arrays of
//! (wavelength, angle-of-incidence) pairs to arrays of (Ψ, Δ). This is
//! the `model` contract the external objective/fitting layer calls; the
//! model itself is stateless apart from the parameter values it reads.

use ndarray::Array1;
use rayon::prelude::*;

use stratus_materials::parameter::{Parameter, Parameterised};

use crate::error::ModelError;
use crate::structure::Structure;
use crate::tmm;

/// Forward model mapping (wavelength, angle of incidence) to (Ψ, Δ).
pub struct EllipsometricModel {
    structure: Structure,
}

impl EllipsometricModel {
    pub fn new(structure: Structure) -> Self {
        Self { structure }
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Ψ and Δ in degrees for a single wavelength/angle pair.
    ///
    /// The structure is resolved into its slab table at this wavelength
    /// (re-reading every layer's dispersion model and parameter values)
    /// and handed to the reflectance engine.
    pub fn psi_delta(&self, wavelength_nm: f64, aoi_deg: f64) -> Result<(f64, f64), ModelError> {
        let table = self.structure.slab_table(wavelength_nm)?;
        let r = tmm::reflection(table.view(), wavelength_nm, aoi_deg)?;
        Ok(tmm::psi_delta(&r))
    }

    /// Evaluate a batch of (wavelength_nm, aoi_deg) pairs into same-length
    /// Ψ and Δ arrays, both in degrees.
    ///
    /// Pairs are independent and evaluated in parallel; any error aborts
    /// the whole batch. Callers must not mutate parameters while a batch
    /// is in flight.
    pub fn model(
        &self,
        wavelength_aoi: &[(f64, f64)],
    ) -> Result<(Array1<f64>, Array1<f64>), ModelError> {
        log::debug!(
            "evaluating {} wavelength/angle pairs over {} layers",
            wavelength_aoi.len(),
            self.structure.num_layers()
        );
        let pairs: Vec<(f64, f64)> = wavelength_aoi
            .par_iter()
            .map(|&(wavelength, aoi)| self.psi_delta(wavelength, aoi))
            .collect::<Result<_, _>>()?;

        let psi = Array1::from_iter(pairs.iter().map(|p| p.0));
        let delta = Array1::from_iter(pairs.iter().map(|p| p.1));
        Ok((psi, delta))
    }

    /// Evaluate a wavelength sweep at one fixed angle of incidence, the
    /// common single-detector measurement geometry.
    pub fn model_at_aoi(
        &self,
        wavelengths_nm: &[f64],
        aoi_deg: f64,
    ) -> Result<(Array1<f64>, Array1<f64>), ModelError> {
        let pairs: Vec<(f64, f64)> = wavelengths_nm.iter().map(|&w| (w, aoi_deg)).collect();
        self.model(&pairs)
    }
}

impl Parameterised for EllipsometricModel {
    /// The structure's layer parameters are the model's adjustable
    /// parameters.
    fn parameters(&self) -> Vec<Parameter> {
        self.structure.parameters()
    }
}

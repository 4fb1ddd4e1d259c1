//! Stack layers and their five-column row contract.
//!
//! The reflectance engine consumes a structure as a homogeneous table of
//! numeric rows, one per layer, regardless of what produced each row. A
//! pure [`Slab`] resolves its material at the requested wavelength; a
//! [`MixedSlab`] first combines two materials into an effective medium.

use std::sync::Arc;

use ndarray::{array, Array2};
use num_complex::Complex64;

use stratus_materials::model::{index_from_epsilon, DispersionModel};
use stratus_materials::parameter::{Parameter, Parameterised};

use crate::error::ModelError;

/// Columns of a slab row: thickness / nm, Re(n), Im(n), roughness / nm,
/// solvent-fraction placeholder (always 0 here).
pub const SLAB_COLUMNS: usize = 5;

/// A stack layer that can resolve itself to numeric rows at a wavelength.
pub trait Layer: Parameterised + Send + Sync {
    /// One row per sub-layer (a single row for every layer kind in this
    /// crate): `[d, Re(n_eff), Im(n_eff), σ, 0.0]` at the given wavelength.
    fn slab_rows(&self, wavelength_nm: f64) -> Result<Array2<f64>, ModelError>;

    /// Layer thickness in nm; 0 means semi-infinite.
    fn thickness_nm(&self) -> f64;
}

/// A single homogeneous layer: one material, a thickness, an interface
/// roughness toward the layer above it.
pub struct Slab {
    material: Arc<dyn DispersionModel>,
    thickness: Parameter,
    roughness: Parameter,
}

impl Slab {
    /// A film of the given thickness with a smooth interface.
    pub fn new(material: Arc<dyn DispersionModel>, thickness_nm: f64) -> Self {
        Self::with_roughness(material, thickness_nm, 0.0)
    }

    /// A film with interface roughness σ toward the layer above.
    pub fn with_roughness(
        material: Arc<dyn DispersionModel>,
        thickness_nm: f64,
        roughness_nm: f64,
    ) -> Self {
        assert!(thickness_nm >= 0.0, "thickness must be non-negative");
        assert!(roughness_nm >= 0.0, "roughness must be non-negative");
        let name = material.name().to_owned();
        Self {
            material,
            thickness: Parameter::new(format!("{name}.thickness"), thickness_nm),
            roughness: Parameter::new(format!("{name}.roughness"), roughness_nm),
        }
    }

    /// A boundary layer with no thickness (superstrate or substrate).
    pub fn semi_infinite(material: Arc<dyn DispersionModel>) -> Self {
        Self::new(material, 0.0)
    }

    pub fn thickness(&self) -> Parameter {
        self.thickness.clone()
    }

    pub fn roughness(&self) -> Parameter {
        self.roughness.clone()
    }

    pub fn material(&self) -> Arc<dyn DispersionModel> {
        Arc::clone(&self.material)
    }
}

impl Layer for Slab {
    fn slab_rows(&self, wavelength_nm: f64) -> Result<Array2<f64>, ModelError> {
        let nk = self.material.refractive_index(wavelength_nm)?;
        Ok(array![[
            self.thickness.value(),
            nk.re,
            nk.im,
            self.roughness.value(),
            0.0
        ]])
    }

    fn thickness_nm(&self) -> f64 {
        self.thickness.value()
    }
}

impl Parameterised for Slab {
    fn parameters(&self) -> Vec<Parameter> {
        let mut params = vec![self.thickness.clone(), self.roughness.clone()];
        params.extend(self.material.parameters());
        params
    }
}

/// A layer whose effective index is a volume-fraction mixture of two
/// materials: $n_{\text{eff}}^2 = (1 - f) n_a^2 + f n_b^2$.
pub struct MixedSlab {
    material_a: Arc<dyn DispersionModel>,
    material_b: Arc<dyn DispersionModel>,
    thickness: Parameter,
    vf_b: Parameter,
    roughness: Parameter,
}

impl MixedSlab {
    /// Create a mixed layer with volume fraction `vf_b` of material b.
    ///
    /// # Errors
    /// The fraction must lie in `[0, 1]`.
    pub fn new(
        thickness_nm: f64,
        material_a: Arc<dyn DispersionModel>,
        material_b: Arc<dyn DispersionModel>,
        vf_b: f64,
        roughness_nm: f64,
    ) -> Result<Self, ModelError> {
        check_fraction(vf_b)?;
        assert!(thickness_nm >= 0.0, "thickness must be non-negative");
        assert!(roughness_nm >= 0.0, "roughness must be non-negative");
        let name = format!("{}+{}", material_a.name(), material_b.name());
        Ok(Self {
            material_a,
            material_b,
            thickness: Parameter::new(format!("{name}.thickness"), thickness_nm),
            vf_b: Parameter::varying(format!("{name}.vf_b"), vf_b, 0.0, 1.0),
            roughness: Parameter::new(format!("{name}.roughness"), roughness_nm),
        })
    }

    /// The mixing fraction of material b, an adjustable parameter.
    pub fn volume_fraction(&self) -> Parameter {
        self.vf_b.clone()
    }

    pub fn thickness(&self) -> Parameter {
        self.thickness.clone()
    }

    pub fn roughness(&self) -> Parameter {
        self.roughness.clone()
    }

    /// Effective complex index at a wavelength, re-reading the current
    /// mixing fraction. A fraction pushed outside `[0, 1]` by the fitting
    /// loop is rejected here rather than silently extrapolated.
    pub fn effective_index(&self, wavelength_nm: f64) -> Result<Complex64, ModelError> {
        let f = self.vf_b.value();
        check_fraction(f)?;
        let na = self.material_a.refractive_index(wavelength_nm)?;
        let nb = self.material_b.refractive_index(wavelength_nm)?;
        Ok(index_from_epsilon((1.0 - f) * na * na + f * nb * nb))
    }
}

fn check_fraction(f: f64) -> Result<(), ModelError> {
    if !(0.0..=1.0).contains(&f) {
        return Err(ModelError::Structure(format!(
            "volume fraction {f} is outside [0, 1]"
        )));
    }
    Ok(())
}

impl Layer for MixedSlab {
    fn slab_rows(&self, wavelength_nm: f64) -> Result<Array2<f64>, ModelError> {
        let nk = self.effective_index(wavelength_nm)?;
        Ok(array![[
            self.thickness.value(),
            nk.re,
            nk.im,
            self.roughness.value(),
            0.0
        ]])
    }

    fn thickness_nm(&self) -> f64 {
        self.thickness.value()
    }
}

impl Parameterised for MixedSlab {
    fn parameters(&self) -> Vec<Parameter> {
        let mut params = vec![
            self.thickness.clone(),
            self.roughness.clone(),
            self.vf_b.clone(),
        ];
        params.extend(self.material_a.parameters());
        params.extend(self.material_b.parameters());
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use stratus_materials::cauchy::Cauchy;
    use stratus_materials::library::load_material;

    #[test]
    fn test_slab_row_shape_and_contents() {
        let glass = Arc::new(Cauchy::new(1.5, 0.0, 0.0));
        let slab = Slab::with_roughness(glass, 120.0, 4.0);
        let rows = slab.slab_rows(500.0).unwrap();
        assert_eq!(rows.shape(), &[1, SLAB_COLUMNS]);
        assert_relative_eq!(rows[[0, 0]], 120.0);
        assert_relative_eq!(rows[[0, 1]], 1.5);
        assert_relative_eq!(rows[[0, 2]], 0.0);
        assert_relative_eq!(rows[[0, 3]], 4.0);
        assert_relative_eq!(rows[[0, 4]], 0.0);
    }

    #[test]
    fn test_mixed_slab_matches_pure_endmembers() {
        let water: Arc<dyn DispersionModel> = Arc::new(load_material("water").unwrap());
        let cauchy: Arc<dyn DispersionModel> = Arc::new(Cauchy::new(1.47, 0.00495, 0.0));

        let mixed = MixedSlab::new(10.0, Arc::clone(&water), Arc::clone(&cauchy), 0.5, 3.0)
            .unwrap();
        assert_eq!(mixed.slab_rows(400.0).unwrap().shape(), &[1, 5]);
        assert_relative_eq!(mixed.volume_fraction().value(), 0.5);

        let ria = water.refractive_index(400.0).unwrap();
        let rib = cauchy.refractive_index(400.0).unwrap();

        mixed.volume_fraction().set_value(0.0);
        let rows = mixed.slab_rows(400.0).unwrap();
        assert_relative_eq!(rows[[0, 1]], ria.re, max_relative = 1e-12);
        assert_relative_eq!(rows[[0, 2]], ria.im, max_relative = 1e-12);

        mixed.volume_fraction().set_value(1.0);
        let rows = mixed.slab_rows(400.0).unwrap();
        assert_relative_eq!(rows[[0, 1]], rib.re, max_relative = 1e-12);

        mixed.volume_fraction().set_value(0.25);
        let overall = (0.75 * ria * ria + 0.25 * rib * rib).sqrt();
        let rows = mixed.slab_rows(400.0).unwrap();
        assert_relative_eq!(rows[[0, 1]], overall.re, max_relative = 1e-12);
        assert_relative_eq!(rows[[0, 2]], overall.im, max_relative = 1e-12);
    }

    #[test]
    fn test_mixed_slab_round_trips_against_pure_slab() {
        let water: Arc<dyn DispersionModel> = Arc::new(load_material("water").unwrap());
        let si: Arc<dyn DispersionModel> = Arc::new(load_material("silicon").unwrap());

        let pure = Slab::with_roughness(Arc::clone(&water), 10.0, 3.0);
        let mixed =
            MixedSlab::new(10.0, Arc::clone(&water), Arc::clone(&si), 0.0, 3.0).unwrap();

        let a = pure.slab_rows(500.0).unwrap();
        let b = mixed.slab_rows(500.0).unwrap();
        for col in 0..SLAB_COLUMNS {
            assert_relative_eq!(a[[0, col]], b[[0, col]], max_relative = 1e-12);
        }
    }

    #[test]
    fn test_mixing_law_holds_in_epsilon() {
        let a: Arc<dyn DispersionModel> = Arc::new(load_material("silica").unwrap());
        let b: Arc<dyn DispersionModel> = Arc::new(load_material("silicon").unwrap());
        let f = 0.37;
        let mixed = MixedSlab::new(50.0, Arc::clone(&a), Arc::clone(&b), f, 0.0).unwrap();

        let na = a.refractive_index(600.0).unwrap();
        let nb = b.refractive_index(600.0).unwrap();
        let neff = mixed.effective_index(600.0).unwrap();

        let lhs = neff * neff;
        let rhs = (1.0 - f) * na * na + f * nb * nb;
        assert_relative_eq!(lhs.re, rhs.re, max_relative = 1e-12);
        assert_relative_eq!(lhs.im, rhs.im, max_relative = 1e-12);
    }

    #[test]
    fn test_fraction_outside_unit_interval_is_rejected() {
        let a: Arc<dyn DispersionModel> = Arc::new(Cauchy::new(1.4, 0.0, 0.0));
        let b: Arc<dyn DispersionModel> = Arc::new(Cauchy::new(1.6, 0.0, 0.0));

        assert!(MixedSlab::new(10.0, Arc::clone(&a), Arc::clone(&b), 1.2, 0.0).is_err());

        // a fitter walking the fraction out of range is caught at evaluation
        let mixed = MixedSlab::new(10.0, a, b, 0.5, 0.0).unwrap();
        mixed.volume_fraction().set_value(-0.1);
        assert!(matches!(
            mixed.slab_rows(500.0).unwrap_err(),
            ModelError::Structure(_)
        ));
    }

    #[test]
    fn test_material_coefficients_are_discoverable() {
        let water: Arc<dyn DispersionModel> = Arc::new(load_material("water").unwrap());
        let cauchy = Cauchy::new(1.47, 0.00495, 0.0);
        let handle = cauchy.a();
        let mixed = MixedSlab::new(10.0, water, Arc::new(cauchy), 0.5, 3.0).unwrap();

        let flat = mixed.parameters();
        assert!(flat.iter().any(|p| p.is_same(&handle)));
    }
}

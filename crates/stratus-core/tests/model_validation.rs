//! Integration test: transfer-matrix engine vs Parratt recursion.
//!
//! The characteristic-matrix engine and the Parratt reflectivity
//! recursion are algebraically equivalent but share no code; agreement
//! across a realistic absorbing multilayer validates the full pipeline
//! from dispersion models through the slab table to Ψ and Δ.

use std::sync::Arc;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use ndarray::Array2;
use num_complex::Complex64;

use stratus_core::model::EllipsometricModel;
use stratus_core::slab::{MixedSlab, Slab};
use stratus_core::structure::Structure;
use stratus_materials::library::load_material;
use stratus_materials::lorentz::Lorentz;
use stratus_materials::model::DispersionModel;
use stratus_materials::parameter::Parameterised;

/// Independent reference: Parratt recursion from the substrate upward,
/// written in the angle (n·cosθ) formulation rather than the engine's
/// q_z one.
fn parratt_psi_delta(table: &Array2<f64>, wavelength_nm: f64, aoi_deg: f64) -> (f64, f64) {
    let nlayers = table.nrows();
    let k0 = 2.0 * std::f64::consts::PI / wavelength_nm;
    let one = Complex64::new(1.0, 0.0);

    let n: Vec<Complex64> = (0..nlayers)
        .map(|j| Complex64::new(table[[j, 1]], table[[j, 2]]))
        .collect();

    // kz_j = k0 n_j cos(theta_j) via complex Snell's law, decaying branch
    let s = n[0] * aoi_deg.to_radians().sin();
    let kz: Vec<Complex64> = n
        .iter()
        .map(|&nj| {
            let sin_t = s / nj;
            let q = nj * (one - sin_t * sin_t).sqrt();
            let q = if q.im < 0.0 { -q } else { q };
            q * k0
        })
        .collect();

    let r_s = |i: usize| (kz[i] - kz[i + 1]) / (kz[i] + kz[i + 1]);
    let r_p = |i: usize| {
        (n[i + 1] * n[i + 1] * kz[i] - n[i] * n[i] * kz[i + 1])
            / (n[i + 1] * n[i + 1] * kz[i] + n[i] * n[i] * kz[i + 1])
    };

    let mut rs = r_s(nlayers - 2);
    let mut rp = r_p(nlayers - 2);
    for j in (0..nlayers.saturating_sub(2)).rev() {
        let d = table[[j + 1, 0]];
        let phase = (Complex64::new(0.0, 2.0) * kz[j + 1] * d).exp();
        rs = (r_s(j) + rs * phase) / (one + r_s(j) * rs * phase);
        rp = (r_p(j) + rp * phase) / (one + r_p(j) * rp * phase);
    }

    let rho = rp / rs;
    let psi = rho.norm().atan().to_degrees();
    let mut delta = rho.arg().to_degrees();
    if delta < 0.0 {
        delta += 360.0;
    }
    (psi, delta)
}

/// Smallest angular distance between two angles in degrees.
fn angular_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

fn reference_structure() -> (Structure, Lorentz) {
    let air: Arc<dyn DispersionModel> = Arc::new(load_material("air").unwrap());
    let silica: Arc<dyn DispersionModel> = Arc::new(load_material("silica").unwrap());
    let silicon: Arc<dyn DispersionModel> = Arc::new(load_material("silicon").unwrap());
    let film = Lorentz::new(&[5.0, 10.0], &[0.25, 0.5], &[2.0, 4.0], 2.0).unwrap();

    let structure = Structure::builder()
        .append(Slab::semi_infinite(air))
        .append(Slab::new(Arc::new(film.clone()), 1000.0))
        .append(Slab::new(silica, 25.0))
        .append(Slab::semi_infinite(silicon))
        .build()
        .unwrap();
    (structure, film)
}

/// Validate the matrix engine against Parratt across a wavelength and
/// angle sweep of the air | Lorentz(1000 nm) | silica(25 nm) | silicon
/// reference stack.
#[test]
fn test_engine_vs_parratt_recursion() {
    let (structure, _) = reference_structure();
    let model = EllipsometricModel::new(structure);

    let wavelengths: Vec<f64> = (0..81).map(|i| 400.0 + 5.0 * i as f64).collect();
    let mut worst_psi = 0.0_f64;
    let mut worst_delta = 0.0_f64;

    for &aoi in &[55.0, 65.0, 70.0, 75.0] {
        let (psi, delta) = model.model_at_aoi(&wavelengths, aoi).unwrap();

        for (i, &wl) in wavelengths.iter().enumerate() {
            let table = model.structure().slab_table(wl).unwrap();
            let (psi_ref, delta_ref) = parratt_psi_delta(&table, wl, aoi);

            let psi_err = (psi[i] - psi_ref).abs() / psi_ref.abs();
            let delta_err = angular_diff(delta[i], delta_ref);
            worst_psi = worst_psi.max(psi_err);
            worst_delta = worst_delta.max(delta_err);

            assert!(
                psi_err < 1e-8,
                "Ψ mismatch at λ={wl} nm, θ={aoi}°: engine {} vs Parratt {psi_ref}",
                psi[i]
            );
            assert!(
                delta_err < 1e-7,
                "Δ mismatch at λ={wl} nm, θ={aoi}°: engine {} vs Parratt {delta_ref}",
                delta[i]
            );
            assert!((0.0..90.0).contains(&psi[i]));
            assert!((0.0..360.0).contains(&delta[i]));
        }
    }

    eprintln!(
        "engine vs Parratt over {} points: worst Ψ rel err {:.2e}, worst Δ gap {:.2e}°",
        4 * wavelengths.len(),
        worst_psi,
        worst_delta
    );
}

/// A bare absorbing substrate reduces to the single-interface Fresnel
/// formulas.
#[test]
fn test_bare_substrate_matches_fresnel() {
    let air: Arc<dyn DispersionModel> = Arc::new(load_material("air").unwrap());
    let silicon: Arc<dyn DispersionModel> = Arc::new(load_material("silicon").unwrap());
    let nk = silicon.refractive_index(632.8).unwrap();

    let structure = Structure::builder()
        .append(Slab::semi_infinite(air))
        .append(Slab::semi_infinite(silicon))
        .build()
        .unwrap();
    let model = EllipsometricModel::new(structure);

    for &aoi in &[30.0, 50.0, 70.0] {
        let (psi, delta) = model.psi_delta(632.8, aoi).unwrap();

        // direct two-medium Fresnel in the angle formulation
        let theta0 = aoi.to_radians();
        let sin_t = theta0.sin() / nk;
        let cos_t = (Complex64::new(1.0, 0.0) - sin_t * sin_t).sqrt();
        let cos_i = Complex64::new(theta0.cos(), 0.0);
        let rs = (cos_i - nk * cos_t) / (cos_i + nk * cos_t);
        let rp = (nk * cos_i - cos_t) / (nk * cos_i + cos_t);
        let rho = rp / rs;
        let psi_ref = rho.norm().atan().to_degrees();
        let mut delta_ref = rho.arg().to_degrees();
        if delta_ref < 0.0 {
            delta_ref += 360.0;
        }

        assert_relative_eq!(psi, psi_ref, max_relative = 1e-10);
        assert_abs_diff_eq!(angular_diff(delta, delta_ref), 0.0, epsilon = 1e-9);
    }
}

/// A mixed slab forced to an end-member fraction is indistinguishable
/// from the equivalent pure stack all the way through the engine.
#[test]
fn test_mixed_structure_collapses_to_pure_endmember() {
    let air: Arc<dyn DispersionModel> = Arc::new(load_material("air").unwrap());
    let silica: Arc<dyn DispersionModel> = Arc::new(load_material("silica").unwrap());
    let water: Arc<dyn DispersionModel> = Arc::new(load_material("water").unwrap());
    let silicon: Arc<dyn DispersionModel> = Arc::new(load_material("silicon").unwrap());

    let mixed = MixedSlab::new(80.0, Arc::clone(&silica), water, 0.0, 0.0).unwrap();
    let mixed_model = EllipsometricModel::new(
        Structure::builder()
            .append(Slab::semi_infinite(Arc::clone(&air)))
            .append(mixed)
            .append(Slab::semi_infinite(Arc::clone(&silicon)))
            .build()
            .unwrap(),
    );
    let pure_model = EllipsometricModel::new(
        Structure::builder()
            .append(Slab::semi_infinite(air))
            .append(Slab::new(silica, 80.0))
            .append(Slab::semi_infinite(silicon))
            .build()
            .unwrap(),
    );

    let wavelengths: Vec<f64> = (0..26).map(|i| 400.0 + 20.0 * i as f64).collect();
    let (psi_m, delta_m) = mixed_model.model_at_aoi(&wavelengths, 70.0).unwrap();
    let (psi_p, delta_p) = pure_model.model_at_aoi(&wavelengths, 70.0).unwrap();

    for i in 0..wavelengths.len() {
        assert_relative_eq!(psi_m[i], psi_p[i], max_relative = 1e-10);
        assert_abs_diff_eq!(angular_diff(delta_m[i], delta_p[i]), 0.0, epsilon = 1e-9);
    }
}

/// Flattening exposes every layer parameter, in a stable order, with
/// live handles.
#[test]
fn test_model_parameters_are_flat_stable_and_live() {
    let (structure, film) = reference_structure();
    let model = EllipsometricModel::new(structure);

    let params = model.parameters();
    // air: thickness+roughness; Lorentz film: thickness+roughness + 2×3
    // oscillator coefficients + Einf; silica film: thickness+roughness;
    // silicon: thickness+roughness
    assert_eq!(params.len(), 2 + (2 + 7) + 2 + 2);

    let again = model.parameters();
    for (a, b) in params.iter().zip(&again) {
        assert!(a.is_same(b), "flattening order changed between calls");
    }

    // the film's first amplitude is reachable and live
    let am0 = &film.amplitudes()[0];
    assert!(params.iter().any(|p| p.is_same(am0)));

    let (psi_before, _) = model.psi_delta(620.0, 70.0).unwrap();
    am0.set_value(8.0);
    let (psi_after, _) = model.psi_delta(620.0, 70.0).unwrap();
    assert!(
        (psi_before - psi_after).abs() > 1e-6,
        "amplitude change did not move Ψ"
    );
}

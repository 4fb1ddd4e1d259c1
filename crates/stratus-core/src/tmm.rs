//! Transfer-matrix reflectance for stratified media.
//!
//! Classical characteristic-matrix method: each interface contributes a
//! Fresnel matrix, each finite layer a propagation matrix, and their
//! ordered product (superstrate → substrate) yields the complex amplitude
//! reflection coefficients for s and p polarisation. The ellipsometric
//! angles follow from the ratio $\rho = r_p / r_s$:
//!
//! $\Psi = \arctan|\rho|, \qquad \Delta = \arg\rho$
//!
//! both reported in degrees, with $\Delta$ normalised into [0°, 360°).
//! All arithmetic is complex throughout, so absorbing layers and
//! substrates need no special casing.

use ndarray::ArrayView2;
use num_complex::Complex64;

use crate::error::ModelError;

/// s and p amplitude reflection coefficients of a stack.
#[derive(Debug, Clone, Copy)]
pub struct ReflectionCoefficients {
    pub r_s: Complex64,
    pub r_p: Complex64,
}

/// 2×2 complex matrix, row-major.
#[derive(Debug, Clone, Copy)]
struct Matrix2([Complex64; 4]);

impl Matrix2 {
    fn identity() -> Matrix2 {
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        Matrix2([one, zero, zero, one])
    }

    fn mul(&self, rhs: &Matrix2) -> Matrix2 {
        let a = &self.0;
        let b = &rhs.0;
        Matrix2([
            a[0] * b[0] + a[1] * b[2],
            a[0] * b[1] + a[1] * b[3],
            a[2] * b[0] + a[3] * b[2],
            a[2] * b[1] + a[3] * b[3],
        ])
    }

    /// Interface matrix $(1/t)\,[[1, r], [r, 1]]$.
    fn interface(r: Complex64, t: Complex64) -> Matrix2 {
        let inv_t = Complex64::new(1.0, 0.0) / t;
        Matrix2([inv_t, r * inv_t, r * inv_t, inv_t])
    }

    /// Propagation matrix $\mathrm{diag}(e^{-i\beta}, e^{+i\beta})$.
    fn propagation(beta: Complex64) -> Matrix2 {
        let zero = Complex64::new(0.0, 0.0);
        let i_beta = Complex64::new(0.0, 1.0) * beta;
        Matrix2([(-i_beta).exp(), zero, zero, i_beta.exp()])
    }
}

/// Normal component of the complex wavevector direction,
/// $q_z = \sqrt{n^2 - s^2}$ with $s = n_0 \sin\theta_0$.
///
/// The branch with $\mathrm{Im}\,q_z \ge 0$ is chosen so the field decays
/// into absorbing media and beyond total internal reflection.
fn qz(n: Complex64, s_sq: Complex64) -> Complex64 {
    let q = (n * n - s_sq).sqrt();
    if q.im < 0.0 {
        -q
    } else {
        q
    }
}

/// s-polarisation Fresnel coefficients (r, t) for interface i → j.
fn fresnel_s(qz_i: Complex64, qz_j: Complex64) -> (Complex64, Complex64) {
    let denom = qz_i + qz_j;
    ((qz_i - qz_j) / denom, 2.0 * qz_i / denom)
}

/// p-polarisation Fresnel coefficients (r, t) for interface i → j.
fn fresnel_p(
    n_i: Complex64,
    n_j: Complex64,
    qz_i: Complex64,
    qz_j: Complex64,
) -> (Complex64, Complex64) {
    let denom = n_j * n_j * qz_i + n_i * n_i * qz_j;
    (
        (n_j * n_j * qz_i - n_i * n_i * qz_j) / denom,
        2.0 * n_i * n_j * qz_i / denom,
    )
}

/// Nevot–Croce attenuation of an interface with rms roughness σ:
/// $\exp(-2 k_0^2 q_{z,i} q_{z,j} \sigma^2)$.
fn roughness_attenuation(k0: f64, qz_i: Complex64, qz_j: Complex64, sigma_nm: f64) -> Complex64 {
    if sigma_nm == 0.0 {
        return Complex64::new(1.0, 0.0);
    }
    (qz_i * qz_j * (-2.0 * k0 * k0 * sigma_nm * sigma_nm)).exp()
}

/// Compute r_s and r_p for a slab table at one wavelength and angle of
/// incidence.
///
/// `slabs` is the N×5 layer table produced by
/// [`Structure::slab_table`](crate::structure::Structure::slab_table):
/// the first row is the semi-infinite superstrate, the last the
/// substrate, interior rows are films. The roughness in column 3 belongs
/// to the interface between a row and the row above it.
pub fn reflection(
    slabs: ArrayView2<f64>,
    wavelength_nm: f64,
    aoi_deg: f64,
) -> Result<ReflectionCoefficients, ModelError> {
    if !(aoi_deg > 0.0 && aoi_deg < 90.0) {
        return Err(ModelError::InvalidAngle { aoi_deg });
    }
    let nlayers = slabs.nrows();
    if nlayers < 2 {
        return Err(ModelError::Structure(format!(
            "reflectance needs a superstrate and a substrate, got {nlayers} row(s)"
        )));
    }

    let k0 = 2.0 * std::f64::consts::PI / wavelength_nm;
    let n: Vec<Complex64> = (0..nlayers)
        .map(|j| Complex64::new(slabs[[j, 1]], slabs[[j, 2]]))
        .collect();

    // In-plane wavevector component, conserved across all interfaces
    // (complex Snell's law).
    let s = n[0] * aoi_deg.to_radians().sin();
    let s_sq = s * s;
    let qzs: Vec<Complex64> = n.iter().map(|&nj| qz(nj, s_sq)).collect();

    let mut m_s = Matrix2::identity();
    let mut m_p = Matrix2::identity();

    for j in 0..nlayers - 1 {
        if j > 0 {
            let beta = qzs[j] * (k0 * slabs[[j, 0]]);
            let prop = Matrix2::propagation(beta);
            m_s = m_s.mul(&prop);
            m_p = m_p.mul(&prop);
        }

        let (mut r_s, t_s) = fresnel_s(qzs[j], qzs[j + 1]);
        let (mut r_p, t_p) = fresnel_p(n[j], n[j + 1], qzs[j], qzs[j + 1]);

        let att = roughness_attenuation(k0, qzs[j], qzs[j + 1], slabs[[j + 1, 3]]);
        r_s *= att;
        r_p *= att;

        m_s = m_s.mul(&Matrix2::interface(r_s, t_s));
        m_p = m_p.mul(&Matrix2::interface(r_p, t_p));
    }

    Ok(ReflectionCoefficients {
        r_s: m_s.0[2] / m_s.0[0],
        r_p: m_p.0[2] / m_p.0[0],
    })
}

/// Ellipsometric angles (Ψ, Δ) in degrees from the reflection
/// coefficients; Δ normalised into [0°, 360°).
pub fn psi_delta(r: &ReflectionCoefficients) -> (f64, f64) {
    let rho = r.r_p / r.r_s;
    let psi = rho.norm().atan().to_degrees();
    let mut delta = rho.arg().to_degrees();
    if delta < 0.0 {
        delta += 360.0;
    }
    (psi, delta)
}

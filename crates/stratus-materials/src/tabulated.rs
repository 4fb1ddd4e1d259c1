//! Tabulated refractive-index dispersion.
//!
//! Optical constants measured at discrete wavelengths, loaded from explicit
//! arrays or delimited text (`wavelength  n  [k]`, commas and/or whitespace,
//! `#` comments). Rows are re-sorted by wavelength on construction and
//! evaluated by linear interpolation on n and k independently.

use std::path::Path;

use num_complex::Complex64;

use crate::interp::LinearInterpolator;
use crate::model::{DispersionModel, MaterialError};
use crate::parameter::{Parameter, Parameterised};

/// Largest wavelength value still taken to be micrometres.
///
/// A table whose maximum wavelength is at or below this is assumed to be in
/// µm and is rescaled to nm by ×1000; 100 nm is already vacuum-UV, so real
/// nanometre tables never trip the conversion. Callers that know their
/// units should prefer [`TabulatedIndex::from_arrays_nm`], which skips the
/// guess.
const MICRON_THRESHOLD: f64 = 100.0;

/// Dispersion from a table of (wavelength, n, k) samples.
#[derive(Debug)]
pub struct TabulatedIndex {
    name: String,
    wavelengths_nm: Vec<f64>,
    interp_n: LinearInterpolator,
    interp_k: LinearInterpolator,
}

impl TabulatedIndex {
    /// Construct from parallel arrays of wavelength, n, and k.
    ///
    /// Wavelength units are auto-detected by magnitude: a table whose
    /// maximum wavelength is ≤ 100 is treated as micrometres.
    pub fn from_arrays(
        name: impl Into<String>,
        wavelengths: Vec<f64>,
        n: Vec<f64>,
        k: Vec<f64>,
    ) -> Result<Self, MaterialError> {
        let rows = zip_rows(wavelengths, n, k)?;
        Self::build(name.into(), rows, true)
    }

    /// Construct from arrays already known to be in nanometres.
    pub fn from_arrays_nm(
        name: impl Into<String>,
        wavelengths_nm: Vec<f64>,
        n: Vec<f64>,
        k: Vec<f64>,
    ) -> Result<Self, MaterialError> {
        let rows = zip_rows(wavelengths_nm, n, k)?;
        Self::build(name.into(), rows, false)
    }

    /// Load from a delimited text file; the material name is the file stem.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MaterialError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let text = std::fs::read_to_string(path)?;
        Self::from_delimited(name, &text)
    }

    /// Parse delimited text: one `wavelength n [k]` row per line, k
    /// defaulting to 0. Units are auto-detected as for
    /// [`from_arrays`](Self::from_arrays).
    pub fn from_delimited(name: impl Into<String>, text: &str) -> Result<Self, MaterialError> {
        let rows = parse_delimited(text)?;
        Self::build(name.into(), rows, true)
    }

    fn build(
        name: String,
        mut rows: Vec<(f64, f64, f64)>,
        detect_units: bool,
    ) -> Result<Self, MaterialError> {
        if rows.len() < 2 {
            return Err(MaterialError::InsufficientData { count: rows.len() });
        }
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut wavelengths_nm: Vec<f64> = rows.iter().map(|r| r.0).collect();
        let max = wavelengths_nm[wavelengths_nm.len() - 1];
        if detect_units && max <= MICRON_THRESHOLD {
            log::debug!(
                "{name}: max wavelength {max} taken as micrometres, rescaling to nm"
            );
            for w in &mut wavelengths_nm {
                *w *= 1000.0;
            }
        }

        for i in 1..wavelengths_nm.len() {
            if wavelengths_nm[i] <= wavelengths_nm[i - 1] {
                return Err(MaterialError::DataError(format!(
                    "{name}: duplicate wavelength {} nm",
                    wavelengths_nm[i]
                )));
            }
        }

        let n: Vec<f64> = rows.iter().map(|r| r.1).collect();
        let k: Vec<f64> = rows.iter().map(|r| r.2).collect();
        Ok(Self {
            interp_n: LinearInterpolator::new(wavelengths_nm.clone(), n),
            interp_k: LinearInterpolator::new(wavelengths_nm.clone(), k),
            name,
            wavelengths_nm,
        })
    }

    /// The normalised wavelength samples in nm, ascending.
    pub fn wavelengths_nm(&self) -> &[f64] {
        &self.wavelengths_nm
    }

    /// Number of tabulated samples.
    pub fn samples(&self) -> usize {
        self.wavelengths_nm.len()
    }

    /// Covered wavelength range `(min, max)` in nm.
    pub fn wavelength_range(&self) -> (f64, f64) {
        self.interp_n.range()
    }
}

impl DispersionModel for TabulatedIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn refractive_index(&self, wavelength_nm: f64) -> Result<Complex64, MaterialError> {
        let (min, max) = self.wavelength_range();
        if wavelength_nm < min || wavelength_nm > max {
            return Err(MaterialError::OutOfRange {
                wavelength_nm,
                min,
                max,
            });
        }
        Ok(Complex64::new(
            self.interp_n.evaluate(wavelength_nm),
            self.interp_k.evaluate(wavelength_nm),
        ))
    }
}

impl Parameterised for TabulatedIndex {
    /// Tabulated data carries no adjustable coefficients.
    fn parameters(&self) -> Vec<Parameter> {
        Vec::new()
    }
}

fn zip_rows(
    wavelengths: Vec<f64>,
    n: Vec<f64>,
    k: Vec<f64>,
) -> Result<Vec<(f64, f64, f64)>, MaterialError> {
    if wavelengths.len() != n.len() || wavelengths.len() != k.len() {
        return Err(MaterialError::DataError(format!(
            "array lengths differ: {} wavelengths, {} n, {} k",
            wavelengths.len(),
            n.len(),
            k.len()
        )));
    }
    Ok(wavelengths
        .into_iter()
        .zip(n)
        .zip(k)
        .map(|((w, n), k)| (w, n, k))
        .collect())
}

fn parse_delimited(text: &str) -> Result<Vec<(f64, f64, f64)>, MaterialError> {
    let mut rows = Vec::new();
    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();
        let parsed: Result<Vec<f64>, _> = fields.iter().map(|f| f.parse::<f64>()).collect();
        let values = parsed.map_err(|_| {
            MaterialError::DataError(format!("line {}: non-numeric field in {line:?}", lineno + 1))
        })?;
        match values.as_slice() {
            [w, n] => rows.push((*w, *n, 0.0)),
            [w, n, k] => rows.push((*w, *n, *k)),
            _ => {
                return Err(MaterialError::DataError(format!(
                    "line {}: expected 2 or 3 columns, got {}",
                    lineno + 1,
                    values.len()
                )))
            }
        }
    }
    Ok(rows)
}

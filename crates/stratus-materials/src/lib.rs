//! # Stratus Materials
//!
//! Dispersion models for the Stratus ellipsometry engine. All models
//! implement the [`DispersionModel`](model::DispersionModel) trait, which
//! maps a vacuum wavelength to a complex refractive index $n + ik$.
//!
//! ## Available models
//!
//! | Model | Module | Kind |
//! |-------|--------|------|
//! | Tabulated (n, k) | [`tabulated`] | measured data, linear interpolation |
//! | Cauchy | [`cauchy`] | parametric, transparent |
//! | Sellmeier | [`sellmeier`] | parametric, transparent |
//! | Lorentz oscillators | [`lorentz`] | parametric, absorbing |
//!
//! ## Adjustable parameters
//!
//! Every parametric coefficient is a shared-handle
//! [`Parameter`](parameter::Parameter) that an external fitting loop
//! mutates in place between evaluations; models only read current values.
//! [`Parameterised`](parameter::Parameterised) flattens them in a stable
//! order for optimisers.
//!
//! ## Bundled data
//!
//! [`library::load_material`] loads the optical-constant tables shipped
//! with the crate (`air`, `water`, `silica`, `silicon`).

pub mod cauchy;
pub mod interp;
pub mod library;
pub mod lorentz;
pub mod model;
pub mod parameter;
pub mod sellmeier;
pub mod tabulated;

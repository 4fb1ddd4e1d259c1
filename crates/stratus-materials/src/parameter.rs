//! Adjustable numeric parameters shared between the optical model and an
//! external fitting loop.
//!
//! A [`Parameter`] is a handle to a scalar value with bounds and a vary
//! flag. The fitting framework owns the optimisation logic; the optical
//! model only reads current values during evaluation. Cloning a handle
//! shares the underlying state, so the fitter mutates in place without
//! cloning the model.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ParamState {
    name: String,
    value: f64,
    bounds: (f64, f64),
    vary: bool,
}

/// An adjustable scalar with bounds and a vary flag.
///
/// `Clone` yields a second handle to the *same* value: a fitting loop
/// holding one handle mutates the value that the optical model reads
/// through another. Mutating a parameter while a batch evaluation of the
/// same model is in flight is a contract violation on the caller's side;
/// the model never writes.
#[derive(Clone)]
pub struct Parameter {
    state: Arc<RwLock<ParamState>>,
}

impl Parameter {
    /// Create a fixed parameter with unbounded range.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self::from_state(ParamState {
            name: name.into(),
            value,
            bounds: (f64::NEG_INFINITY, f64::INFINITY),
            vary: false,
        })
    }

    /// Create a parameter that is free to vary within `[lower, upper]`.
    pub fn varying(name: impl Into<String>, value: f64, lower: f64, upper: f64) -> Self {
        Self::from_state(ParamState {
            name: name.into(),
            value,
            bounds: (lower, upper),
            vary: true,
        })
    }

    fn from_state(state: ParamState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    fn read(&self) -> ParamState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn name(&self) -> String {
        self.read().name
    }

    /// The current scalar value used in dispersion formulas.
    pub fn value(&self) -> f64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .value
    }

    pub fn set_value(&self, value: f64) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .value = value;
    }

    pub fn bounds(&self) -> (f64, f64) {
        self.read().bounds
    }

    pub fn set_bounds(&self, lower: f64, upper: f64) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .bounds = (lower, upper);
    }

    /// Whether the external optimiser should treat this parameter as free.
    pub fn vary(&self) -> bool {
        self.read().vary
    }

    pub fn set_vary(&self, vary: bool) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .vary = vary;
    }

    /// True when `other` is a handle to the same underlying value.
    pub fn is_same(&self, other: &Parameter) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("Parameter")
            .field("name", &state.name)
            .field("value", &state.value)
            .field("bounds", &state.bounds)
            .field("vary", &state.vary)
            .finish()
    }
}

impl Serialize for Parameter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.read().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Parameter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ParamState::deserialize(deserializer).map(Self::from_state)
    }
}

/// Exposes adjustable parameters for an external optimiser.
///
/// The returned order is the construction order of the parameters and is
/// stable across repeated calls on the same object: fitting code flattens
/// once, indexes forever.
pub trait Parameterised {
    fn parameters(&self) -> Vec<Parameter>;
}

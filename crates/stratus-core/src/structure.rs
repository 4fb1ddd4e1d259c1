//! Ordered layer stacks and their builder.
//!
//! A [`Structure`] is the full stack from semi-infinite superstrate to
//! semi-infinite substrate, in physical light-propagation order. It is
//! assembled once through [`StructureBuilder`] and read-only afterwards.

use ndarray::{Array2, Axis};

use stratus_materials::parameter::{Parameter, Parameterised};

use crate::error::ModelError;
use crate::slab::{Layer, SLAB_COLUMNS};

/// An ordered stack: superstrate first, substrate last.
pub struct Structure {
    layers: Vec<Box<dyn Layer>>,
}

impl std::fmt::Debug for Structure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Structure")
            .field("num_layers", &self.layers.len())
            .finish()
    }
}

impl Structure {
    pub fn builder() -> StructureBuilder {
        StructureBuilder::new()
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    /// Resolve every layer at one wavelength into an N×5 table
    /// (`[d, Re n, Im n, σ, 0.0]` per row) for the reflectance engine.
    pub fn slab_table(&self, wavelength_nm: f64) -> Result<Array2<f64>, ModelError> {
        let mut table = Array2::zeros((0, SLAB_COLUMNS));
        for layer in &self.layers {
            let rows = layer.slab_rows(wavelength_nm)?;
            table
                .append(Axis(0), rows.view())
                .map_err(|e| ModelError::Structure(format!("bad slab rows: {e}")))?;
        }
        Ok(table)
    }
}

impl Parameterised for Structure {
    /// Every adjustable parameter reachable from any layer, in layer
    /// order then each layer's own construction order.
    fn parameters(&self) -> Vec<Parameter> {
        self.layers
            .iter()
            .flat_map(|layer| layer.parameters())
            .collect()
    }
}

/// Assembles a [`Structure`] superstrate-to-substrate.
#[derive(Default)]
pub struct StructureBuilder {
    layers: Vec<Box<dyn Layer>>,
}

impl StructureBuilder {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Append the next layer toward the substrate.
    pub fn append(mut self, layer: impl Layer + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// Validate and freeze the stack.
    ///
    /// # Errors
    /// A structure needs at least a superstrate and a substrate, and both
    /// boundary layers must be semi-infinite (zero thickness).
    pub fn build(self) -> Result<Structure, ModelError> {
        if self.layers.len() < 2 {
            return Err(ModelError::Structure(format!(
                "a structure needs a semi-infinite superstrate and substrate, got {} layer(s)",
                self.layers.len()
            )));
        }
        let first = self.layers[0].thickness_nm();
        if first != 0.0 {
            return Err(ModelError::Structure(format!(
                "superstrate must be semi-infinite, has thickness {first} nm"
            )));
        }
        let last = self.layers[self.layers.len() - 1].thickness_nm();
        if last != 0.0 {
            return Err(ModelError::Structure(format!(
                "substrate must be semi-infinite, has thickness {last} nm"
            )));
        }
        Ok(Structure {
            layers: self.layers,
        })
    }
}

//! Bundled optical-constant tables.
//!
//! A small set of common ellipsometry materials shipped with the crate as
//! delimited text and parsed through the same loader as user-supplied
//! files.
//!
//! | Name | Description | Range |
//! |------|-------------|-------|
//! | `air` | ambient, n = 1 | 150–2000 nm |
//! | `water` | liquid H₂O at 25 °C | 200–1000 nm |
//! | `silica` | fused SiO₂ | 300–1000 nm |
//! | `silicon` | crystalline Si | 250–1000 nm |

use crate::model::MaterialError;
use crate::tabulated::TabulatedIndex;

/// The bundled tables as `(name, delimited text)` pairs.
pub const BUNDLED: &[(&str, &str)] = &[
    ("air", include_str!("../data/air.csv")),
    ("water", include_str!("../data/water.csv")),
    ("silica", include_str!("../data/silica.csv")),
    ("silicon", include_str!("../data/silicon.csv")),
];

/// Load a bundled material table by name.
pub fn load_material(name: &str) -> Result<TabulatedIndex, MaterialError> {
    let text = BUNDLED
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, text)| *text)
        .ok_or_else(|| {
            let known: Vec<&str> = BUNDLED.iter().map(|(n, _)| *n).collect();
            MaterialError::DataError(format!(
                "unknown bundled material {name:?}; available: {}",
                known.join(", ")
            ))
        })?;
    TabulatedIndex::from_delimited(name, text)
}

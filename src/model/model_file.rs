//! Configuration data structures used in [`ModelBuilder`](super::ModelBuilder)

use std::collections::BTreeMap;

use serde::Deserialize;

/// Mappings for a [`MappedModel`](super::MappedModel)
///
/// This structure is designed for deserializing [TOML](https://toml.io/en/),
/// but you can try other formats supported by serde.
///
/// ```toml
/// name = "relativistic"
///
/// [[mapping]]
/// symbol = "L"
/// to = { T = 1 }
/// factor = { dividend = 1, divisor = 299792458 }
/// ```
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ModelFile {
    /// Only informative
    pub name: Option<String>,
    /// Declare new mappings
    ///
    /// A symbol can only be mapped once across all the layers.
    #[serde(default)]
    pub mapping: Vec<MappingEntry>,
    /// Replace mappings from layers added before
    #[serde(default)]
    pub extend: Vec<MappingEntry>,
}

/// A fundamental symbol rewritten into another dimension
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MappingEntry {
    /// Fundamental symbol, like `L`
    pub symbol: String,
    /// Target dimension as symbol to integer exponent
    pub to: BTreeMap<String, i32>,
    /// Scale from the mapped symbol's system unit to the target's one
    ///
    /// Defaults to 1.
    #[serde(default)]
    pub factor: Option<Factor>,
}

/// Linear conversion factor of a [`MappingEntry`]
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum Factor {
    /// Exact ratio
    Ratio { dividend: i64, divisor: i64 },
    /// Any number
    Number(f64),
}

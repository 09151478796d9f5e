use std::{collections::HashMap, sync::Arc};

use thiserror::Error;

use super::{
    model_file::{Factor, MappingEntry},
    MappedModel, Mapping, ModelFile,
};
use crate::{
    converter::Converter,
    dimension::Dimension,
    error::{InvalidConstruction, NonLinearConverter},
};

/// Builder to create a custom [`MappedModel`]
///
/// The builder uses [`ModelFile`]s to configure the model. More than one
/// file can be layered. Order matters, as one file can extend the mappings
/// of another added before.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    mappings: HashMap<Arc<str>, Mapping>,
    extend: Vec<MappingEntry>,
}

/// Errors generated by [`ModelBuilder`]
#[derive(Debug, Error)]
pub enum ModelBuilderError {
    #[error("Duplicate mapping for symbol '{symbol}'")]
    DuplicateMapping { symbol: String },

    #[error("Can't extend unknown mapping for symbol '{symbol}'")]
    UnknownMapping { symbol: String },

    #[error("Empty symbol in a mapping")]
    EmptySymbol,

    #[error("Mapping for symbol '{symbol}' is cyclic")]
    Cycle { symbol: String },

    #[error("Mapping for symbol '{symbol}' maps to itself")]
    SelfMapping { symbol: String },

    #[error("Invalid factor for symbol '{symbol}'")]
    InvalidFactor {
        symbol: String,
        #[source]
        source: InvalidConstruction,
    },

    #[error(transparent)]
    NonLinear(#[from] NonLinearConverter),
}

impl ModelBuilder {
    /// New empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a [`ModelFile`] to the builder
    pub fn with_model_file(mut self, file: ModelFile) -> Result<Self, ModelBuilderError> {
        self.add_model_file(file)?;
        Ok(self)
    }

    /// Add a [`ModelFile`] to the builder
    pub fn add_model_file(&mut self, file: ModelFile) -> Result<&mut Self, ModelBuilderError> {
        for entry in file.mapping {
            let (symbol, mapping) = entry_mapping(entry)?;
            self.insert(symbol, mapping)?;
        }
        // applied at the end so a file can extend mappings from any earlier one
        self.extend.extend(file.extend);
        Ok(self)
    }

    /// Maps a fundamental symbol to a dimension with a linear converter
    pub fn map(
        &mut self,
        symbol: &str,
        dimension: Dimension,
        converter: Converter,
    ) -> Result<&mut Self, ModelBuilderError> {
        self.insert(
            symbol.to_string(),
            Mapping {
                dimension,
                converter,
            },
        )?;
        Ok(self)
    }

    /// Consume the builder and return the new [`MappedModel`]
    pub fn finish(mut self) -> Result<MappedModel, ModelBuilderError> {
        for entry in std::mem::take(&mut self.extend) {
            let (symbol, mapping) = entry_mapping(entry)?;
            match self.mappings.get_mut(symbol.as_str()) {
                Some(m) => *m = mapping,
                None => return Err(ModelBuilderError::UnknownMapping { symbol }),
            }
        }

        for symbol in self.mappings.keys() {
            check_acyclic(symbol, &self.mappings, &mut Vec::new())?;
        }

        Ok(MappedModel::new(self.mappings))
    }

    fn insert(&mut self, symbol: String, mapping: Mapping) -> Result<(), ModelBuilderError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(ModelBuilderError::EmptySymbol);
        }
        if !mapping.converter.is_linear() {
            return Err(NonLinearConverter {
                converter: mapping.converter,
                context: "in a model mapping",
            }
            .into());
        }
        if mapping.dimension.exponent_of(symbol).pow() != 0 {
            return Err(ModelBuilderError::SelfMapping {
                symbol: symbol.to_string(),
            });
        }
        if self.mappings.contains_key(symbol) {
            return Err(ModelBuilderError::DuplicateMapping {
                symbol: symbol.to_string(),
            });
        }
        tracing::trace!(symbol, dimension = %mapping.dimension, converter = %mapping.converter, "new mapping");
        self.mappings.insert(Arc::from(symbol), mapping);
        Ok(())
    }
}

fn entry_mapping(entry: MappingEntry) -> Result<(String, Mapping), ModelBuilderError> {
    let converter = match entry.factor {
        None => Ok(Converter::Identity),
        Some(Factor::Number(f)) => Converter::multiply(f),
        Some(Factor::Ratio { dividend, divisor }) => Converter::rational(dividend, divisor),
    }
    .map_err(|source| ModelBuilderError::InvalidFactor {
        symbol: entry.symbol.clone(),
        source,
    })?;
    if entry.to.keys().any(|s| s.trim().is_empty()) {
        return Err(ModelBuilderError::EmptySymbol);
    }
    let dimension = Dimension::from_factors(entry.to);
    Ok((
        entry.symbol,
        Mapping {
            dimension,
            converter,
        },
    ))
}

fn check_acyclic(
    symbol: &str,
    mappings: &HashMap<Arc<str>, Mapping>,
    stack: &mut Vec<String>,
) -> Result<(), ModelBuilderError> {
    if stack.iter().any(|s| s == symbol) {
        return Err(ModelBuilderError::Cycle {
            symbol: symbol.to_string(),
        });
    }
    let Some(mapping) = mappings.get(symbol) else {
        return Ok(());
    };
    stack.push(symbol.to_string());
    for (target, _) in mapping.dimension.factors() {
        check_acyclic(target, mappings, stack)?;
    }
    stack.pop();
    Ok(())
}

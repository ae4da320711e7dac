use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::WhiteSpace;

/// Effective value-space restrictions of a simple type.
///
/// Bound facets keep their lexical form; each value generator parses them in
/// the value space of its own datatype family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Facets {
    #[serde(default)]
    pub length: Option<u64>,
    #[serde(default)]
    pub min_length: Option<u64>,
    #[serde(default)]
    pub max_length: Option<u64>,
    /// Pattern facets, carried through but not interpreted by the generator.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enumeration: Vec<String>,
    #[serde(default)]
    pub white_space: Option<WhiteSpace>,
    #[serde(default)]
    pub min_inclusive: Option<String>,
    #[serde(default)]
    pub max_inclusive: Option<String>,
    #[serde(default)]
    pub min_exclusive: Option<String>,
    #[serde(default)]
    pub max_exclusive: Option<String>,
    #[serde(default)]
    pub total_digits: Option<u32>,
    #[serde(default)]
    pub fraction_digits: Option<u32>,
}

/// A lower or upper bound facet with its inclusiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound<'a> {
    Inclusive(&'a str),
    Exclusive(&'a str),
}

impl Facets {
    /// Lower bound; an inclusive facet wins when both are present.
    pub fn lower_bound(&self) -> Option<Bound<'_>> {
        self.min_inclusive
            .as_deref()
            .map(Bound::Inclusive)
            .or_else(|| self.min_exclusive.as_deref().map(Bound::Exclusive))
    }

    /// Upper bound; an inclusive facet wins when both are present.
    pub fn upper_bound(&self) -> Option<Bound<'_>> {
        self.max_inclusive
            .as_deref()
            .map(Bound::Inclusive)
            .or_else(|| self.max_exclusive.as_deref().map(Bound::Exclusive))
    }
}

//! Saved-state document: one node per domain.
//!
//! Nodes carry named variable columns rather than raw slices, so a restore can
//! match values by component name and fall back to the variant's default for
//! anything missing. Documents convert to and from JSON or YAML strings; where
//! those strings are kept is up to the caller.

use crate::error::{DomainError, DomainResult};
use crate::kind::DomainKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Values of one solution component across a domain's grid points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableColumn {
    pub name: String,
    pub values: Vec<f64>,
}

/// Saved state of a single domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainNode {
    /// Position of the domain in its chain.
    pub id: u32,
    pub name: String,
    pub kind: DomainKind,
    pub points: usize,
    pub variables: Vec<VariableColumn>,
    /// Stored scalars such as `temperature`, `mdot`, `spread_rate`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, f64>,
    /// Resolved mass fractions by species name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<BTreeMap<String, f64>>,
}

impl DomainNode {
    pub fn new(id: u32, name: impl Into<String>, kind: DomainKind, points: usize) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            points,
            variables: Vec::new(),
            attributes: BTreeMap::new(),
            composition: None,
        }
    }

    /// Column for a named component, if saved with the right length.
    pub fn variable(&self, name: &str) -> Option<&[f64]> {
        self.variables
            .iter()
            .find(|c| c.name == name && c.values.len() == self.points)
            .map(|c| c.values.as_slice())
    }

    pub fn attribute(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).copied()
    }

    pub fn set_attribute(&mut self, name: &str, value: f64) {
        self.attributes.insert(name.to_string(), value);
    }
}

/// Saved state of a whole chain.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SolutionDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub domains: Vec<DomainNode>,
}

impl SolutionDocument {
    pub fn new(domains: Vec<DomainNode>) -> Self {
        Self {
            description: None,
            domains,
        }
    }

    pub fn node(&self, id: u32) -> Option<&DomainNode> {
        self.domains.iter().find(|n| n.id == id)
    }

    pub fn to_json_string(&self) -> DomainResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DomainError::Document {
            message: e.to_string(),
        })
    }

    pub fn from_json_str(s: &str) -> DomainResult<Self> {
        serde_json::from_str(s).map_err(|e| DomainError::Document {
            message: e.to_string(),
        })
    }

    pub fn to_yaml_string(&self) -> DomainResult<String> {
        serde_yaml::to_string(self).map_err(|e| DomainError::Document {
            message: e.to_string(),
        })
    }

    pub fn from_yaml_str(s: &str) -> DomainResult<Self> {
        serde_yaml::from_str(s).map_err(|e| DomainError::Document {
            message: e.to_string(),
        })
    }
}

//! Composition specifications and mole/mass fraction conversion.

use crate::error::{KineticsError, KineticsResult};
use crate::species::SpeciesSet;
use fc_core::numeric::{Tolerances, nearly_equal};
use serde::{Deserialize, Serialize};

/// Tolerance on the sum of a mass-fraction array supplied directly.
pub const MASS_FRACTION_SUM_TOL: f64 = 1e-6;

/// Whether fractions in a specification are mole or mass based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Basis {
    #[default]
    Mole,
    Mass,
}

/// A composition given by species name, not yet bound to a phase.
///
/// Fractions are validated and normalized to sum=1 on construction.
/// Binding to a [`SpeciesSet`] happens in [`CompositionSpec::resolve_mass_fractions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionSpec {
    basis: Basis,
    items: Vec<(String, f64)>,
}

impl CompositionSpec {
    /// Parse a `name:value` list, e.g. `"CH4:1, O2:2, N2:7.52"`.
    ///
    /// Pairs may be separated by commas and/or whitespace. Values are mole
    /// fractions unless the basis is changed with [`CompositionSpec::with_basis`].
    pub fn parse(input: &str) -> KineticsResult<Self> {
        let compact = strip_space_around_colons(input);
        let mut items = Vec::new();
        for token in compact
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let (name, value) = token.split_once(':').ok_or_else(|| KineticsError::Parse {
                input: input.to_string(),
                reason: "expected name:value pairs",
            })?;
            if name.is_empty() {
                return Err(KineticsError::Parse {
                    input: input.to_string(),
                    reason: "missing species name",
                });
            }
            let value: f64 = value.parse().map_err(|_| KineticsError::Parse {
                input: input.to_string(),
                reason: "invalid number",
            })?;
            items.push((name.to_string(), value));
        }
        if items.is_empty() {
            return Err(KineticsError::Parse {
                input: input.to_string(),
                reason: "empty composition",
            });
        }
        Self::from_pairs(Basis::Mole, items)
    }

    /// Build from explicit pairs; validates and normalizes.
    pub fn from_pairs(basis: Basis, pairs: Vec<(String, f64)>) -> KineticsResult<Self> {
        if pairs.is_empty() {
            return Err(KineticsError::InvalidArg {
                what: "empty composition",
            });
        }
        for (i, (name, _)) in pairs.iter().enumerate() {
            if pairs[..i].iter().any(|(n, _)| n == name) {
                return Err(KineticsError::InvalidArg {
                    what: "species listed twice in composition",
                });
            }
        }
        let values: Vec<f64> = pairs.iter().map(|(_, v)| *v).collect();
        let normalized = normalize_fractions(&values)?;
        let items = pairs
            .into_iter()
            .zip(normalized)
            .map(|((name, _), v)| (name, v))
            .collect();
        Ok(Self { basis, items })
    }

    /// Reinterpret the fractions in another basis.
    pub fn with_basis(mut self, basis: Basis) -> Self {
        self.basis = basis;
        self
    }

    pub fn basis(&self) -> Basis {
        self.basis
    }

    /// Iterate over species names and normalized fractions.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.items.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Fraction of a named species (0.0 if absent).
    pub fn fraction(&self, name: &str) -> f64 {
        self.items
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }

    /// Expand into a full mass-fraction array ordered like `species`.
    pub fn resolve_mass_fractions(&self, species: &SpeciesSet) -> KineticsResult<Vec<f64>> {
        let mut values = vec![0.0; species.len()];
        for (name, v) in &self.items {
            let k = species
                .index(name)
                .ok_or_else(|| KineticsError::UnknownSpecies { name: name.clone() })?;
            values[k] = *v;
        }
        match self.basis {
            Basis::Mole => mole_to_mass_fractions(&values, species.molecular_weights()),
            Basis::Mass => normalize_fractions(&values),
        }
    }
}

impl std::str::FromStr for CompositionSpec {
    type Err = KineticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn strip_space_around_colons(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    for (i, c) in chars.iter().enumerate() {
        if c.is_whitespace() {
            let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
            let prev = chars[..i].iter().rev().find(|c| !c.is_whitespace());
            if next == Some(&':') || prev == Some(&':') {
                continue;
            }
        }
        out.push(*c);
    }
    out
}

/// Validate and normalize fractions to sum=1.
///
/// Rejects non-finite or negative entries and arrays whose sum is zero.
pub fn normalize_fractions(values: &[f64]) -> KineticsResult<Vec<f64>> {
    let mut sum = 0.0;
    for v in values {
        if !v.is_finite() {
            return Err(KineticsError::NonPhysical {
                what: "non-finite fraction",
            });
        }
        if *v < 0.0 {
            return Err(KineticsError::NonPhysical {
                what: "negative fraction",
            });
        }
        sum += v;
    }
    if sum <= 0.0 {
        return Err(KineticsError::NonPhysical {
            what: "fractions sum to zero",
        });
    }
    Ok(values.iter().map(|v| v / sum).collect())
}

/// Convert mole fractions to mass fractions: `y_k = x_k M_k / Σ x_j M_j`.
pub fn mole_to_mass_fractions(x: &[f64], mw: &[f64]) -> KineticsResult<Vec<f64>> {
    if x.len() != mw.len() {
        return Err(KineticsError::SpeciesCountMismatch {
            what: "mole fractions",
            expected: mw.len(),
            actual: x.len(),
        });
    }
    let x = normalize_fractions(x)?;
    let weighted: Vec<f64> = x.iter().zip(mw).map(|(xi, wi)| xi * wi).collect();
    normalize_fractions(&weighted)
}

/// Convert mass fractions to mole fractions: `x_k = (y_k / M_k) / Σ y_j / M_j`.
pub fn mass_to_mole_fractions(y: &[f64], mw: &[f64]) -> KineticsResult<Vec<f64>> {
    if y.len() != mw.len() {
        return Err(KineticsError::SpeciesCountMismatch {
            what: "mass fractions",
            expected: mw.len(),
            actual: y.len(),
        });
    }
    let y = normalize_fractions(y)?;
    let moles: Vec<f64> = y.iter().zip(mw).map(|(yi, wi)| yi / wi).collect();
    normalize_fractions(&moles)
}

/// Check a mass-fraction array supplied directly by a caller.
///
/// Unlike mole-fraction input, mass fractions are not silently rescaled: they
/// must already sum to one within [`MASS_FRACTION_SUM_TOL`].
pub fn check_mass_fractions(y: &[f64], n_species: usize) -> KineticsResult<()> {
    if y.len() != n_species {
        return Err(KineticsError::SpeciesCountMismatch {
            what: "mass fractions",
            expected: n_species,
            actual: y.len(),
        });
    }
    if y.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(KineticsError::NonPhysical {
            what: "mass fraction",
        });
    }
    let sum: f64 = y.iter().sum();
    let tol = Tolerances {
        abs: MASS_FRACTION_SUM_TOL,
        rel: 0.0,
    };
    if !nearly_equal(sum, 1.0, tol) {
        return Err(KineticsError::NonPhysical {
            what: "mass fractions must sum to 1",
        });
    }
    Ok(())
}

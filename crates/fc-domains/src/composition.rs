//! Boundary composition: what the user set and what it resolves to.
//!
//! Composition input may arrive before the boundary knows which species its
//! attached flow carries. Strings are parsed immediately so syntax errors show
//! up at the setter; names and array lengths are checked against the species
//! set as soon as one is known (immediately if the boundary is already
//! initialized, otherwise at `init()`).

use crate::error::{DomainError, DomainResult};
use fc_kinetics::{
    Basis, CompositionSpec, KineticsError, SpeciesSet, check_mass_fractions,
    mole_to_mass_fractions,
};

#[derive(Debug, Clone, PartialEq)]
enum Source {
    /// Nothing set yet: all mass on the first species.
    Default,
    Named(CompositionSpec),
    MoleArray(Vec<f64>),
    MassArray(Vec<f64>),
}

/// Composition carried by an inlet or outlet reservoir, stored resolved as
/// mass fractions.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryComposition {
    source: Source,
    species: Option<SpeciesSet>,
    resolved: Option<Vec<f64>>,
}

impl Default for BoundaryComposition {
    fn default() -> Self {
        Self {
            source: Source::Default,
            species: None,
            resolved: None,
        }
    }
}

impl BoundaryComposition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set mole fractions from a `name:value` string.
    pub fn set_mole_fractions_str(&mut self, input: &str) -> DomainResult<()> {
        let spec = CompositionSpec::parse(input)?;
        self.set_source(Source::Named(spec))
    }

    /// Set mass fractions from a `name:value` string.
    pub fn set_mass_fractions_str(&mut self, input: &str) -> DomainResult<()> {
        let spec = CompositionSpec::parse(input)?.with_basis(Basis::Mass);
        self.set_source(Source::Named(spec))
    }

    /// Set composition from named fractions.
    pub fn set_named(&mut self, spec: CompositionSpec) -> DomainResult<()> {
        self.set_source(Source::Named(spec))
    }

    /// Set mole fractions ordered like the attached flow's species. Normalized.
    pub fn set_mole_fractions(&mut self, x: &[f64]) -> DomainResult<()> {
        fc_kinetics::normalize_fractions(x)?;
        self.set_source(Source::MoleArray(x.to_vec()))
    }

    /// Set mass fractions ordered like the attached flow's species.
    ///
    /// Must already sum to one; they are not rescaled.
    pub fn set_mass_fractions(&mut self, y: &[f64]) -> DomainResult<()> {
        check_mass_fractions(y, y.len())?;
        self.set_source(Source::MassArray(y.to_vec()))
    }

    fn set_source(&mut self, source: Source) -> DomainResult<()> {
        if let Some(species) = &self.species {
            let resolved = resolve(&source, species)?;
            self.resolved = Some(resolved);
        }
        self.source = source;
        Ok(())
    }

    /// Bind to a species set and resolve.
    pub fn resolve(&mut self, species: &SpeciesSet) -> DomainResult<()> {
        let resolved = resolve(&self.source, species)?;
        self.species = Some(species.clone());
        self.resolved = Some(resolved);
        Ok(())
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    pub fn species(&self) -> Option<&SpeciesSet> {
        self.species.as_ref()
    }

    /// Resolved mass fractions.
    pub fn mass_fractions(&self) -> DomainResult<&[f64]> {
        self.resolved.as_deref().ok_or(DomainError::NotReady {
            what: "boundary composition before init",
        })
    }

    /// Resolved mass fraction of species `k`.
    pub fn mass_fraction(&self, k: usize) -> DomainResult<f64> {
        let y = self.mass_fractions()?;
        y.get(k).copied().ok_or_else(|| {
            DomainError::config(format!(
                "species index {k} out of range for {} species",
                y.len()
            ))
        })
    }

    /// Resolved mass fraction of a named species.
    pub fn mass_fraction_of(&self, name: &str) -> DomainResult<f64> {
        let species = self.species.as_ref().ok_or(DomainError::NotReady {
            what: "boundary composition before init",
        })?;
        let k = species
            .index(name)
            .ok_or_else(|| KineticsError::UnknownSpecies {
                name: name.to_string(),
            })?;
        self.mass_fraction(k)
    }

    /// Non-zero resolved mass fractions by species name.
    pub fn named_mass_fractions(&self) -> Option<Vec<(String, f64)>> {
        let species = self.species.as_ref()?;
        let y = self.resolved.as_ref()?;
        Some(
            species
                .names()
                .iter()
                .zip(y)
                .filter(|(_, v)| **v > 0.0)
                .map(|(n, v)| (n.clone(), *v))
                .collect(),
        )
    }
}

fn resolve(source: &Source, species: &SpeciesSet) -> DomainResult<Vec<f64>> {
    let n = species.len();
    if n == 0 {
        return Err(DomainError::config("attached flow carries no species"));
    }
    let y = match source {
        Source::Default => {
            let mut y = vec![0.0; n];
            y[0] = 1.0;
            y
        }
        Source::Named(spec) => spec.resolve_mass_fractions(species)?,
        Source::MoleArray(x) => {
            if x.len() != n {
                return Err(KineticsError::SpeciesCountMismatch {
                    what: "mole fractions",
                    expected: n,
                    actual: x.len(),
                }
                .into());
            }
            mole_to_mass_fractions(x, species.molecular_weights())?
        }
        Source::MassArray(y) => {
            check_mass_fractions(y, n)?;
            y.clone()
        }
    };
    Ok(y)
}

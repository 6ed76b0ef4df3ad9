//! Chemical species definitions and ordered species sets.

use crate::error::{KineticsError, KineticsResult};
use serde::{Deserialize, Serialize};

/// Gas-phase species commonly found in premixed and counterflow flame models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    /// Hydrogen (H₂)
    H2,
    /// Atomic hydrogen
    H,
    /// Oxygen (O₂)
    O2,
    /// Atomic oxygen
    O,
    /// Hydroxyl radical
    OH,
    /// Hydroperoxyl radical
    HO2,
    /// Water (H₂O)
    H2O,
    /// Hydrogen peroxide
    H2O2,
    /// Methane (CH₄)
    CH4,
    /// Methyl radical
    CH3,
    /// Formaldehyde
    CH2O,
    /// Carbon monoxide (CO)
    CO,
    /// Carbon dioxide (CO₂)
    CO2,
    /// Ethane
    C2H6,
    /// Propane
    C3H8,
    /// Nitrogen (N₂)
    N2,
    /// Argon (Ar)
    Ar,
    /// Helium (He)
    He,
}

impl Species {
    pub const ALL: [Species; 18] = [
        Species::H2,
        Species::H,
        Species::O2,
        Species::O,
        Species::OH,
        Species::HO2,
        Species::H2O,
        Species::H2O2,
        Species::CH4,
        Species::CH3,
        Species::CH2O,
        Species::CO,
        Species::CO2,
        Species::C2H6,
        Species::C3H8,
        Species::N2,
        Species::Ar,
        Species::He,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Species::H2 => "H2",
            Species::H => "H",
            Species::O2 => "O2",
            Species::O => "O",
            Species::OH => "OH",
            Species::HO2 => "HO2",
            Species::H2O => "H2O",
            Species::H2O2 => "H2O2",
            Species::CH4 => "CH4",
            Species::CH3 => "CH3",
            Species::CH2O => "CH2O",
            Species::CO => "CO",
            Species::CO2 => "CO2",
            Species::C2H6 => "C2H6",
            Species::C3H8 => "C3H8",
            Species::N2 => "N2",
            Species::Ar => "AR",
            Species::He => "HE",
        }
    }

    /// Get molar mass [kg/kmol] for this species.
    pub fn molar_mass(&self) -> f64 {
        match self {
            Species::H2 => 2.016,
            Species::H => 1.008,
            Species::O2 => 31.999,
            Species::O => 15.999,
            Species::OH => 17.007,
            Species::HO2 => 33.006,
            Species::H2O => 18.015,
            Species::H2O2 => 34.014,
            Species::CH4 => 16.043,
            Species::CH3 => 15.035,
            Species::CH2O => 30.026,
            Species::CO => 28.010,
            Species::CO2 => 44.010,
            Species::C2H6 => 30.070,
            Species::C3H8 => 44.097,
            Species::N2 => 28.014,
            Species::Ar => 39.948,
            Species::He => 4.003,
        }
    }
}

impl std::str::FromStr for Species {
    type Err = KineticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Species::ALL
            .iter()
            .copied()
            .find(|sp| sp.key() == upper)
            .ok_or_else(|| KineticsError::UnknownSpecies {
                name: s.trim().to_string(),
            })
    }
}

/// Ordered species of one phase: names and molecular weights.
///
/// The order defines species indices used in mass-fraction arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesSet {
    names: Vec<String>,
    molecular_weights: Vec<f64>,
}

impl SpeciesSet {
    /// Build a set from built-in species definitions.
    pub fn from_species(species: &[Species]) -> Self {
        Self {
            names: species.iter().map(|s| s.key().to_string()).collect(),
            molecular_weights: species.iter().map(|s| s.molar_mass()).collect(),
        }
    }

    /// Build a set from arbitrary names and molecular weights [kg/kmol].
    pub fn new(names: Vec<String>, molecular_weights: Vec<f64>) -> KineticsResult<Self> {
        if names.len() != molecular_weights.len() {
            return Err(KineticsError::SpeciesCountMismatch {
                what: "molecular weights",
                expected: names.len(),
                actual: molecular_weights.len(),
            });
        }
        if molecular_weights
            .iter()
            .any(|w| !w.is_finite() || *w <= 0.0)
        {
            return Err(KineticsError::NonPhysical {
                what: "molecular weight",
            });
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].iter().any(|n| n == name) {
                return Err(KineticsError::InvalidArg {
                    what: "duplicate species name",
                });
            }
        }
        Ok(Self {
            names,
            molecular_weights,
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index of a species by name (case-sensitive first, then case-insensitive).
    pub fn index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.names
            .iter()
            .position(|n| n == name)
            .or_else(|| self.names.iter().position(|n| n.eq_ignore_ascii_case(name)))
    }

    pub fn name(&self, k: usize) -> Option<&str> {
        self.names.get(k).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn molecular_weights(&self) -> &[f64] {
        &self.molecular_weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keys() {
        assert_eq!("CH4".parse::<Species>().unwrap(), Species::CH4);
        assert_eq!("ar".parse::<Species>().unwrap(), Species::Ar);
        assert!("XX".parse::<Species>().is_err());
    }

    #[test]
    fn canonical_key_roundtrip() {
        for sp in Species::ALL {
            assert_eq!(sp.key().parse::<Species>().unwrap(), sp);
        }
    }

    #[test]
    fn species_set_lookup() {
        let set = SpeciesSet::from_species(&[Species::CH4, Species::O2, Species::N2]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.index("O2"), Some(1));
        assert_eq!(set.index("n2"), Some(2));
        assert_eq!(set.index("H2"), None);
        assert_eq!(set.name(0), Some("CH4"));
        assert!((set.molecular_weights()[0] - 16.043).abs() < 1e-12);
    }

    #[test]
    fn species_set_rejects_bad_weights() {
        let err = SpeciesSet::new(vec!["A".into(), "B".into()], vec![1.0]).unwrap_err();
        assert!(matches!(err, KineticsError::SpeciesCountMismatch { .. }));

        let err = SpeciesSet::new(vec!["A".into()], vec![-1.0]).unwrap_err();
        assert!(matches!(err, KineticsError::NonPhysical { .. }));

        let err = SpeciesSet::new(vec!["A".into(), "A".into()], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, KineticsError::InvalidArg { .. }));
    }
}

//! Reference surface mechanism built from first-order site exchanges.
//!
//! This is a small, self-contained [`SurfaceKinetics`] implementation used to
//! exercise reacting-surface boundaries without a full heterogeneous chemistry
//! package. Every reaction moves sites from one surface species to another, so
//! the surface production rates sum to zero for any coverages:
//!
//! ```text
//! A(s) <=> B(s)            r = kf(T) θ_A - kr(T) θ_B
//! G + E(s) <=> G(s)        r = ka(T) Y_G θ_E - kd(T) θ_G(s)
//! ```
//!
//! Rate constants follow a plain Arrhenius form `k = A exp(-Ea / (R T))`.

use crate::error::{KineticsError, KineticsResult};
use crate::species::SpeciesSet;
use crate::surface::{GasState, ProductionRates, SurfaceKinetics};
use fc_core::units::constants::GAS_CONSTANT;

/// Arrhenius rate constant `A exp(-Ea / (R T))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrhenius {
    /// Pre-exponential factor
    pub a: f64,
    /// Activation energy [J/kmol]
    pub ea: f64,
}

impl Arrhenius {
    pub fn constant(a: f64) -> Self {
        Self { a, ea: 0.0 }
    }

    pub fn rate(&self, t: f64) -> f64 {
        if self.ea == 0.0 {
            self.a
        } else {
            self.a * (-self.ea / (GAS_CONSTANT * t)).exp()
        }
    }
}

/// Reversible exchange of sites between two surface species.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteExchange {
    pub from: usize,
    pub to: usize,
    pub forward: Arrhenius,
    pub reverse: Arrhenius,
}

/// Reversible adsorption of a gas species onto an empty site.
#[derive(Debug, Clone, PartialEq)]
pub struct Adsorption {
    /// Index of the gas species in the adjoining gas phase.
    pub gas: usize,
    /// Surface species acting as the empty site.
    pub empty: usize,
    /// Surface species holding the adsorbate.
    pub adsorbed: usize,
    pub adsorb: Arrhenius,
    pub desorb: Arrhenius,
}

/// First-order site-exchange mechanism over one surface phase.
#[derive(Debug, Clone)]
pub struct SiteExchangeMechanism {
    name: String,
    species: SpeciesSet,
    initial: Vec<f64>,
    exchanges: Vec<SiteExchange>,
    adsorptions: Vec<Adsorption>,
}

impl SiteExchangeMechanism {
    /// Create a mechanism over the given surface species.
    ///
    /// Initial coverages default to a fully vacant first species.
    pub fn new(name: impl Into<String>, species: SpeciesSet) -> Self {
        let mut initial = vec![0.0; species.len()];
        if let Some(first) = initial.first_mut() {
            *first = 1.0;
        }
        Self {
            name: name.into(),
            species,
            initial,
            exchanges: Vec::new(),
            adsorptions: Vec::new(),
        }
    }

    /// Set the starting coverages; they must match the species count.
    pub fn with_initial_coverages(mut self, coverages: Vec<f64>) -> KineticsResult<Self> {
        if coverages.len() != self.species.len() {
            return Err(KineticsError::SpeciesCountMismatch {
                what: "initial coverages",
                expected: self.species.len(),
                actual: coverages.len(),
            });
        }
        self.initial = coverages;
        Ok(self)
    }

    /// Add a reversible surface exchange `from <=> to`.
    pub fn add_exchange(&mut self, exchange: SiteExchange) -> KineticsResult<()> {
        let n = self.species.len();
        if exchange.from >= n || exchange.to >= n || exchange.from == exchange.to {
            return Err(KineticsError::InvalidArg {
                what: "exchange references invalid surface species",
            });
        }
        self.exchanges.push(exchange);
        Ok(())
    }

    /// Add a reversible adsorption of a gas species.
    pub fn add_adsorption(&mut self, adsorption: Adsorption) -> KineticsResult<()> {
        let n = self.species.len();
        if adsorption.empty >= n
            || adsorption.adsorbed >= n
            || adsorption.empty == adsorption.adsorbed
        {
            return Err(KineticsError::InvalidArg {
                what: "adsorption references invalid surface species",
            });
        }
        self.adsorptions.push(adsorption);
        Ok(())
    }
}

impl SurfaceKinetics for SiteExchangeMechanism {
    fn name(&self) -> &str {
        &self.name
    }

    // gas phase first, surface second
    fn n_phases(&self) -> usize {
        2
    }

    fn surface_phase_index(&self) -> usize {
        1
    }

    fn surface_species(&self) -> &SpeciesSet {
        &self.species
    }

    fn initial_coverages(&self) -> Vec<f64> {
        self.initial.clone()
    }

    fn production_rates(
        &self,
        temperature: f64,
        coverages: &[f64],
        gas: Option<GasState<'_>>,
    ) -> KineticsResult<ProductionRates> {
        if coverages.len() != self.species.len() {
            return Err(KineticsError::SpeciesCountMismatch {
                what: "coverages",
                expected: self.species.len(),
                actual: coverages.len(),
            });
        }
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(KineticsError::NonPhysical {
                what: "surface temperature",
            });
        }

        let mut surface = vec![0.0; coverages.len()];
        for ex in &self.exchanges {
            let r = ex.forward.rate(temperature) * coverages[ex.from]
                - ex.reverse.rate(temperature) * coverages[ex.to];
            surface[ex.from] -= r;
            surface[ex.to] += r;
        }

        let mut gas_rates = Vec::new();
        if let Some(gas) = gas {
            if !self.adsorptions.is_empty() {
                gas_rates = vec![0.0; gas.mass_fractions.len()];
            }
            for ads in &self.adsorptions {
                let y = gas.mass_fractions.get(ads.gas).copied().ok_or(
                    KineticsError::InvalidArg {
                        what: "adsorption gas index outside gas phase",
                    },
                )?;
                let r = ads.adsorb.rate(temperature) * y * coverages[ads.empty]
                    - ads.desorb.rate(temperature) * coverages[ads.adsorbed];
                surface[ads.empty] -= r;
                surface[ads.adsorbed] += r;
                gas_rates[ads.gas] -= r;
            }
        }

        Ok(ProductionRates {
            surface,
            gas: gas_rates,
        })
    }
}

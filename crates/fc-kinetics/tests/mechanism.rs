//! Integration tests for compositions and the site-exchange mechanism.

use fc_core::numeric::{Tolerances, nearly_equal};
use fc_kinetics::{
    Adsorption, Arrhenius, CompositionSpec, GasState, SiteExchange, SiteExchangeMechanism,
    Species, SpeciesSet, SurfaceKinetics, mass_to_mole_fractions,
};

fn tol() -> Tolerances {
    Tolerances {
        abs: 1e-12,
        rel: 1e-9,
    }
}

#[test]
fn mole_string_converts_with_molar_masses() {
    let gas = SpeciesSet::from_species(&[Species::CH4, Species::O2, Species::N2]);
    let spec: CompositionSpec = "CH4:1 O2:2 N2:7.52".parse().unwrap();
    let y = spec.resolve_mass_fractions(&gas).unwrap();

    let mw = gas.molecular_weights();
    let total = mw[0] + 2.0 * mw[1] + 7.52 * mw[2];
    assert!(nearly_equal(y[0], mw[0] / total, tol()));
    assert!(nearly_equal(y[1], 2.0 * mw[1] / total, tol()));

    let x = mass_to_mole_fractions(&y, mw).unwrap();
    assert!(nearly_equal(x[1] / x[0], 2.0, tol()));
    assert!(nearly_equal(x[2] / x[0], 7.52, tol()));
}

#[test]
fn unknown_species_is_rejected_at_resolution() {
    let gas = SpeciesSet::from_species(&[Species::N2]);
    let spec: CompositionSpec = "AR:1".parse().unwrap();
    assert!(spec.resolve_mass_fractions(&gas).is_err());
}

#[test]
fn surface_rates_conserve_sites_with_gas_coupling() {
    let surface = SpeciesSet::new(
        vec!["PT(S)".into(), "H(S)".into(), "O(S)".into()],
        vec![195.08, 196.09, 211.08],
    )
    .unwrap();
    let mut mech = SiteExchangeMechanism::new("pt", surface)
        .with_initial_coverages(vec![0.5, 0.25, 0.25])
        .unwrap();
    mech.add_exchange(SiteExchange {
        from: 1,
        to: 2,
        forward: Arrhenius { a: 4.0, ea: 1.0e7 },
        reverse: Arrhenius::constant(0.3),
    })
    .unwrap();
    mech.add_adsorption(Adsorption {
        gas: 0,
        empty: 0,
        adsorbed: 1,
        adsorb: Arrhenius::constant(2.0),
        desorb: Arrhenius::constant(0.1),
    })
    .unwrap();

    let y = [0.1, 0.2, 0.7];
    let rates = mech
        .production_rates(
            900.0,
            &mech.initial_coverages(),
            Some(GasState {
                temperature: 900.0,
                mass_fractions: &y,
            }),
        )
        .unwrap();
    let sum: f64 = rates.surface.iter().sum();
    assert!(sum.abs() < 1e-15, "surface rates sum to {sum}");
    assert_eq!(rates.gas.len(), 3);
    // gas species 0 adsorbs onto empty sites
    assert!(rates.gas[0] < 0.0);
    assert_eq!(rates.gas[1], 0.0);
}

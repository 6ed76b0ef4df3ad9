//! Integration tests for steady solves and pseudo-time stepping.

use fc_chain::{Chain, ChainBuilder, ChainError};
use fc_core::DomainId;
use fc_core::numeric::{Tolerances, nearly_equal};
use fc_core::units::m;
use fc_domains::{ConvectionColumn, Domain, Inlet, MassFluxMode, Outlet, ReactingSurface};
use fc_kinetics::{Arrhenius, SiteExchange, SiteExchangeMechanism, Species, SpeciesSet};
use fc_solver::{SolveConfig, SolverError, advance, solve};
use std::sync::Arc;

const Y_FEED: [f64; 3] = [0.1, 0.2, 0.7];

fn tol() -> Tolerances {
    Tolerances {
        abs: 1e-8,
        rel: 1e-8,
    }
}

fn gas() -> SpeciesSet {
    SpeciesSet::from_species(&[Species::CH4, Species::O2, Species::N2])
}

fn feed(mdot: f64) -> Domain {
    let mut inlet = Domain::from(Inlet::new("feed"));
    inlet.set_mdot(mdot).unwrap();
    inlet.set_temperature(300.0).unwrap();
    inlet.set_mass_fractions(&Y_FEED).unwrap();
    inlet
}

fn burner(column: ConvectionColumn, mdot: f64) -> Chain {
    let mut builder = ChainBuilder::new();
    builder.push(feed(mdot));
    builder.push_flow(column);
    builder.push(Outlet::new("exit"));
    builder.build().unwrap()
}

fn surface_chain(
    species: Vec<&str>,
    coverages: Vec<f64>,
    exchanges: Vec<SiteExchange>,
) -> Chain {
    let weights = vec![195.08; species.len()];
    let names = species.into_iter().map(String::from).collect();
    let mut mech = SiteExchangeMechanism::new("pt", SpeciesSet::new(names, weights).unwrap())
        .with_initial_coverages(coverages)
        .unwrap();
    for ex in exchanges {
        mech.add_exchange(ex).unwrap();
    }
    let mut surface = ReactingSurface::new("wall");
    surface.set_temperature(800.0).unwrap();
    surface.set_kinetics(Arc::new(mech)).unwrap();

    let mut builder = ChainBuilder::new();
    builder.push(surface);
    let mut chain = builder.build().unwrap();
    chain.init().unwrap();
    chain
}

fn exchange(from: usize, to: usize, forward: f64, reverse: f64) -> SiteExchange {
    SiteExchange {
        from,
        to,
        forward: Arrhenius::constant(forward),
        reverse: Arrhenius::constant(reverse),
    }
}

#[test]
fn hot_column_relaxes_to_inlet_state() {
    let column = ConvectionColumn::new("flow", gas(), 10, m(0.02))
        .unwrap()
        .with_initial_temperature(1000.0)
        .unwrap();
    let mut chain = burner(column, 0.5);
    let sol = solve(&mut chain, None, None).unwrap();

    assert_eq!(sol.time_steps, 0);
    assert_eq!(sol.attempts, 1);
    let flow = DomainId::from_index(1);
    let t = sol.profile(&chain, flow, ConvectionColumn::T).unwrap();
    let u = sol.profile(&chain, flow, ConvectionColumn::U).unwrap();
    let o2 = sol.profile(&chain, flow, ConvectionColumn::Y0 + 1).unwrap();
    for j in 0..10 {
        assert!(nearly_equal(t[j], 300.0, tol()), "T[{j}] = {}", t[j]);
        assert!(nearly_equal(u[j], 0.5, tol()), "u[{j}] = {}", u[j]);
        assert!(nearly_equal(o2[j], Y_FEED[1], tol()), "Y_O2[{j}] = {}", o2[j]);
    }

    // the outlet stores its converged temperature
    let exit = chain.domain(DomainId::from_index(2)).unwrap();
    assert!(nearly_equal(exit.temperature().unwrap(), 300.0, tol()));
}

#[test]
fn free_column_sets_inlet_mass_flux() {
    let column = ConvectionColumn::new("flame", gas(), 8, m(0.01))
        .unwrap()
        .with_mode(MassFluxMode::Free { mass_flux: 0.3 });
    let mut chain = burner(column, 0.0);
    solve(&mut chain, None, None).unwrap();

    let inlet = chain.domain(DomainId::from_index(0)).unwrap();
    assert!(nearly_equal(inlet.mdot().unwrap(), 0.3, tol()));
}

#[test]
fn singular_steady_surface_falls_back_to_time_stepping() {
    // θ0 <-> θ1 with kf = 2, kr = 1: equilibrium at [1/3, 2/3]
    let mut chain = surface_chain(
        vec!["PT(S)", "O(S)"],
        vec![0.7, 0.3],
        vec![exchange(0, 1, 2.0, 1.0)],
    );
    let sol = solve(&mut chain, None, None).unwrap();

    assert!(sol.time_steps > 0);
    assert!(sol.attempts > 1);
    assert!(nearly_equal(sol.x[0], 800.0, tol()));
    assert!(nearly_equal(sol.x[1], 1.0 / 3.0, tol()), "{:?}", sol.x);
    assert!(nearly_equal(sol.x[2], 2.0 / 3.0, tol()), "{:?}", sol.x);

    let wall = chain.domain(DomainId::from_index(0)).unwrap();
    let stored = wall.as_reacting_surface().unwrap().fixed_coverages();
    assert!((stored.iter().sum::<f64>() - 1.0).abs() < 1e-10);
}

#[test]
fn coverage_sum_preserved_by_pseudo_time_steps() {
    let chain = surface_chain(
        vec!["PT(S)", "H(S)", "O(S)"],
        vec![0.2, 0.3, 0.5],
        vec![exchange(0, 1, 3.0, 1.0), exchange(2, 0, 2.0, 0.5)],
    );
    let config = SolveConfig::default();
    let mut x = chain.initial_solution().unwrap();
    let dt = 0.05;
    let start = x[1..].to_vec();

    for _ in 0..20 {
        let report = advance(&chain, &mut x, dt, 1, &config).unwrap();
        assert_eq!(report.accepted, 1);
        let sum: f64 = x[1..].iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "coverage sum drifted to {sum}");
    }
    assert_ne!(x[1..].to_vec(), start);
    assert!(nearly_equal(x[0], 800.0, tol()));
}

#[test]
fn solve_rejects_bad_guess_length() {
    let column = ConvectionColumn::new("flow", gas(), 5, m(0.01)).unwrap();
    let mut chain = burner(column, 0.5);
    let err = solve(&mut chain, None, Some(&[0.0; 3])).unwrap_err();
    assert!(matches!(
        err,
        SolverError::Chain(ChainError::LengthMismatch { .. })
    ));
}

#[test]
fn solve_rejects_bad_config() {
    let column = ConvectionColumn::new("flow", gas(), 5, m(0.01)).unwrap();
    let mut chain = burner(column, 0.5);
    let config = SolveConfig {
        max_attempts: 0,
        ..SolveConfig::default()
    };
    assert!(matches!(
        solve(&mut chain, Some(config), None),
        Err(SolverError::InvalidArg { .. })
    ));
}

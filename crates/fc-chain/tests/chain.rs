//! Integration tests for chain assembly and residual dispatch.

use fc_chain::{Chain, ChainBuilder, ChainError, EvalRequest};
use fc_core::DomainId;
use fc_core::numeric::{Tolerances, nearly_equal};
use fc_core::units::m;
use fc_domains::{
    ConvectionColumn, Domain, DomainError, EdgeCondition, FlowDomain, Inlet, Outlet,
    ReactingSurface, SolutionDocument, Surface, Symmetry,
};
use fc_kinetics::{Adsorption, Arrhenius, SiteExchange, SiteExchangeMechanism, Species, SpeciesSet};
use std::sync::Arc;

const Y_FEED: [f64; 3] = [0.2, 0.3, 0.5];

fn gas() -> SpeciesSet {
    SpeciesSet::from_species(&[Species::CH4, Species::O2, Species::N2])
}

fn column(np: usize) -> ConvectionColumn {
    ConvectionColumn::new("flame", gas(), np, m(0.02))
        .unwrap()
        .with_initial_mass_fractions(Y_FEED.to_vec())
        .unwrap()
}

fn feed(name: &str, mdot: f64) -> Domain {
    let mut inlet = Domain::from(Inlet::new(name));
    inlet.set_mdot(mdot).unwrap();
    inlet.set_temperature(300.0).unwrap();
    inlet.set_mass_fractions(&Y_FEED).unwrap();
    inlet
}

/// [Inlet | Column(np) | Outlet], initialized.
fn burner(np: usize) -> Chain {
    let mut builder = ChainBuilder::new();
    builder.push(feed("fuel", 0.5));
    builder.push_flow(column(np));
    builder.push(Outlet::new("exit"));
    let mut chain = builder.build().unwrap();
    chain.init().unwrap();
    chain
}

/// Overwrite the column with a uniform state matching the inlet.
fn uniform_state(chain: &Chain, u: f64, t: f64) -> Vec<f64> {
    let mut x = chain.initial_solution().unwrap();
    let ext = chain.layout().extent(DomainId::from_index(1)).unwrap();
    for j in 0..ext.np {
        x[ext.index(j, ConvectionColumn::U)] = u;
        x[ext.index(j, ConvectionColumn::T)] = t;
        for (k, y) in Y_FEED.iter().enumerate() {
            x[ext.index(j, ConvectionColumn::Y0 + k)] = *y;
        }
    }
    let outlet = chain.layout().extent(DomainId::from_index(2)).unwrap();
    x[outlet.offset] = t;
    x
}

fn site_mechanism() -> Arc<SiteExchangeMechanism> {
    let species = SpeciesSet::new(
        vec!["PT(S)".into(), "O(S)".into()],
        vec![195.08, 211.08],
    )
    .unwrap();
    let mut mech = SiteExchangeMechanism::new("pt", species)
        .with_initial_coverages(vec![0.7, 0.3])
        .unwrap();
    mech.add_exchange(SiteExchange {
        from: 0,
        to: 1,
        forward: Arrhenius::constant(2.0),
        reverse: Arrhenius::constant(1.0),
    })
    .unwrap();
    mech.add_adsorption(Adsorption {
        gas: 1,
        empty: 0,
        adsorbed: 1,
        adsorb: Arrhenius::constant(0.4),
        desorb: Arrhenius::constant(0.1),
    })
    .unwrap();
    Arc::new(mech)
}

/// [Inlet | Column(np) | ReactingSurface], initialized.
fn stagnation(np: usize) -> Chain {
    let mut surface = ReactingSurface::new("wall");
    surface.set_temperature(900.0).unwrap();
    surface.set_kinetics(site_mechanism()).unwrap();

    let mut builder = ChainBuilder::new();
    builder.push(feed("jet", 0.3));
    builder.push_flow(column(np));
    builder.push(surface);
    let mut chain = builder.build().unwrap();
    chain.init().unwrap();
    chain
}

#[test]
fn layout_follows_chain_order() {
    let chain = burner(10);
    let nv = column(10).nv();
    assert_eq!(chain.len(), 3);
    assert_eq!(chain.size(), 2 + 10 * nv + 1);
    assert_eq!(chain.n_points(), 12);
    assert_eq!(chain.find("exit"), Some(DomainId::from_index(2)));
    assert_eq!(chain.row_label(2 + nv + ConvectionColumn::T).as_deref(), Some("flame.T[1]"));
    assert_eq!(chain.row_label(0).as_deref(), Some("fuel.mdot[0]"));
}

#[test]
fn boundaries_cannot_touch_each_other() {
    let mut builder = ChainBuilder::new();
    builder.push(feed("fuel", 0.5));
    builder.push_flow(column(4));
    builder.push(Outlet::new("exit"));
    builder.push(Surface::new("wall"));
    assert!(matches!(
        builder.build(),
        Err(ChainError::AdjacentBoundaries { .. })
    ));

    let mut builder = ChainBuilder::new();
    builder.push(Symmetry::new("axis"));
    builder.push_flow(column(4));
    builder.push(Surface::new("a"));
    builder.push(Surface::new("b"));
    match builder.build() {
        Err(ChainError::AdjacentBoundaries { left, right }) => {
            assert_eq!(left, DomainId::from_index(2));
            assert_eq!(right, DomainId::from_index(3));
        }
        other => panic!("expected adjacent boundaries, got {other:?}"),
    }
}

#[test]
fn consistent_state_has_zero_residual() {
    let chain = burner(12);
    let x = uniform_state(&chain, 0.5, 300.0);
    let r = chain.residual(&x, EvalRequest::steady()).unwrap();
    let tol = Tolerances::default();
    for (row, v) in r.iter().enumerate() {
        assert!(
            nearly_equal(*v, 0.0, tol),
            "{} = {v}",
            chain.row_label(row).unwrap()
        );
    }
}

#[test]
fn inlet_residual_responds_to_its_own_unknowns() {
    let chain = burner(6);
    let mut x = uniform_state(&chain, 0.5, 300.0);
    x[0] = 0.55;
    x[1] = 310.0;
    let r = chain.residual(&x, EvalRequest::steady()).unwrap();
    assert!((r[0] - 0.05).abs() < 1e-12);
    assert!((r[1] - 10.0).abs() < 1e-12);
}

#[test]
fn counterflow_edges_carry_signed_fluxes() {
    let mut builder = ChainBuilder::new();
    builder.push(feed("fuel", 0.5));
    builder.push_flow(column(8));
    builder.push(feed("oxidizer", 0.7));
    let mut chain = builder.build().unwrap();
    chain.init().unwrap();

    let x = chain.initial_solution().unwrap();
    let edges = chain.edge_conditions(&x).unwrap();
    assert!(edges[1].is_none());
    match (&edges[0], &edges[2]) {
        (
            Some(EdgeCondition::Inflow { mass_flux: Some(left), .. }),
            Some(EdgeCondition::Inflow { mass_flux: Some(right), .. }),
        ) => {
            assert!((left - 0.5).abs() < 1e-12);
            assert!((right + 0.7).abs() < 1e-12);
        }
        other => panic!("unexpected edges: {other:?}"),
    }
}

#[test]
fn parallel_assembly_matches_serial() {
    let chain = stagnation(15);
    let mut x = chain.initial_solution().unwrap();
    for (i, v) in x.iter_mut().enumerate() {
        *v *= 1.0 + 0.01 * ((i % 7) as f64 - 3.0);
    }
    let prev = chain.initial_solution().unwrap();

    for req in [
        EvalRequest::steady(),
        EvalRequest::transient(50.0, &prev),
        EvalRequest::steady().at_point(16),
    ] {
        let mut serial = vec![0.0; chain.size()];
        let mut parallel = vec![0.0; chain.size()];
        chain.eval(&x, &mut serial, req).unwrap();
        chain.eval_parallel(&x, &mut parallel, req).unwrap();
        assert_eq!(serial, parallel);
    }
}

#[test]
fn surface_flux_reaches_the_flow_edge() {
    let chain = stagnation(6);
    let x = chain.initial_solution().unwrap();
    let edges = chain.edge_conditions(&x).unwrap();
    match &edges[2] {
        Some(EdgeCondition::Wall {
            temperature,
            species_flux,
        }) => {
            assert_eq!(*temperature, 900.0);
            assert_eq!(species_flux.len(), 3);
            // O2 is consumed by adsorption onto empty sites
            assert!(species_flux[1] < 0.0);
        }
        other => panic!("unexpected edge: {other:?}"),
    }
}

#[test]
fn transient_mask_marks_interior_and_coverages() {
    let chain = stagnation(5);
    let mask = chain.transient_mask().unwrap();
    let nv = column(5).nv();
    assert!(!mask[0] && !mask[1]);
    let col = chain.layout().extent(DomainId::from_index(1)).unwrap();
    assert!(!mask[col.index(0, ConvectionColumn::T)]);
    assert!(mask[col.index(2, ConvectionColumn::T)]);
    assert!(!mask[col.index(2, ConvectionColumn::U)]);
    let wall = chain.layout().extent(DomainId::from_index(2)).unwrap();
    assert_eq!(wall.offset, 2 + 5 * nv);
    assert_eq!(mask[wall.range()].to_vec(), vec![false, true, true]);
    assert_eq!(chain.bounds().unwrap().len(), chain.size());
}

#[test]
fn transient_residual_requires_previous_solution() {
    let chain = burner(5);
    let x = chain.initial_solution().unwrap();
    let mut r = vec![0.0; chain.size()];
    let req = EvalRequest {
        rdt: 10.0,
        previous: None,
        point: None,
    };
    assert!(matches!(
        chain.eval(&x, &mut r, req),
        Err(ChainError::Domain(DomainError::NotReady { .. }))
    ));
}

#[test]
fn mutation_requires_reinit() {
    let mut chain = burner(5);
    chain
        .domain_mut(DomainId::from_index(0))
        .unwrap()
        .set_mdot(0.8)
        .unwrap();
    assert!(!chain.is_initialized());
    let mut r = vec![0.0; chain.size()];
    let x = vec![0.0; chain.size()];
    assert_eq!(
        chain.eval(&x, &mut r, EvalRequest::steady()),
        Err(ChainError::NotInitialized)
    );
    chain.init().unwrap();
    let x = chain.initial_solution().unwrap();
    assert_eq!(x[0], 0.8);
}

#[test]
fn wrong_length_is_rejected() {
    let chain = burner(5);
    let x = vec![0.0; chain.size() - 1];
    assert!(matches!(
        chain.residual(&x, EvalRequest::steady()),
        Err(ChainError::LengthMismatch {
            what: "trial vector",
            ..
        })
    ));
    assert!(matches!(
        chain.domain(DomainId::from_index(7)),
        Err(ChainError::UnknownDomain { .. })
    ));
}

#[test]
fn finalize_stores_boundary_state() {
    let mut chain = burner(6);
    let mut x = uniform_state(&chain, 0.5, 300.0);
    let exit = chain.find("exit").unwrap();
    let offset = chain.layout().extent(exit).unwrap().offset;
    x[offset] = 420.0;
    chain.finalize(&x).unwrap();
    assert_eq!(chain.domain(exit).unwrap().temperature().unwrap(), 420.0);
}

#[test]
fn save_restore_round_trip_through_yaml_and_json() {
    let chain = stagnation(7);
    let mut x = chain.initial_solution().unwrap();
    for (i, v) in x.iter_mut().enumerate() {
        *v += 1e-3 * i as f64;
    }
    let doc = chain.save(&x).unwrap();

    for text in [doc.to_yaml_string().unwrap(), doc.to_json_string().unwrap()] {
        let parsed = if text.trim_start().starts_with('{') {
            SolutionDocument::from_json_str(&text).unwrap()
        } else {
            SolutionDocument::from_yaml_str(&text).unwrap()
        };
        let mut fresh = stagnation(7);
        let mut restored = vec![0.0; fresh.size()];
        fresh.restore(&parsed, &mut restored).unwrap();
        assert_eq!(restored.len(), x.len());
        for (a, b) in restored.iter().zip(&x) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
        let jet = fresh.domain(DomainId::from_index(0)).unwrap();
        assert!((jet.mdot().unwrap() - 0.3).abs() < 1e-12);
        assert!((jet.mass_fraction(1).unwrap() - Y_FEED[1]).abs() < 1e-9);
    }
}

#[test]
fn restore_rejects_mismatched_kinds() {
    let source = burner(6);
    let x = source.initial_solution().unwrap();
    let doc = source.save(&x).unwrap();

    let mut target = stagnation(6);
    let mut y = vec![0.0; target.size()];
    assert!(matches!(
        target.restore(&doc, &mut y),
        Err(ChainError::Domain(DomainError::Config { .. }))
    ));
}

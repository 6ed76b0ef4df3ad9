//! The assembled chain: init, residual dispatch, and solution hand-off.

use fc_core::DomainId;
use fc_domains::{
    ComponentBounds, Domain, DomainNode, EdgeCondition, EvalContext, Extent, FlowInfo,
    InitContext, Neighbor, SolutionDocument,
};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{ChainError, ChainResult};
use crate::layout::Layout;
use crate::validate;

/// What kind of residual to assemble.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalRequest<'a> {
    /// Reciprocal pseudo-time step; `0.0` for the steady residual.
    pub rdt: f64,
    /// Solution at the previous pseudo-time level. Required when `rdt != 0`.
    pub previous: Option<&'a [f64]>,
    /// Global grid point being perturbed during Jacobian evaluation.
    pub point: Option<usize>,
}

impl<'a> EvalRequest<'a> {
    pub fn steady() -> Self {
        Self::default()
    }

    pub fn transient(rdt: f64, previous: &'a [f64]) -> Self {
        Self {
            rdt,
            previous: Some(previous),
            point: None,
        }
    }

    pub fn at_point(mut self, point: usize) -> Self {
        self.point = Some(point);
        self
    }
}

/// Ordered domains with their layout in the global unknown vector.
///
/// Domain `i` has `DomainId::from_index(i)`; its neighbours are `i - 1`
/// and `i + 1`.
#[derive(Debug)]
pub struct Chain {
    domains: Vec<Domain>,
    layout: Layout,
    initialized: bool,
}

impl Chain {
    pub(crate) fn new(domains: Vec<Domain>) -> Self {
        let layout = Layout::from_domains(&domains);
        Self {
            domains,
            layout,
            initialized: false,
        }
    }

    /// Number of domains.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Total number of unknowns.
    pub fn size(&self) -> usize {
        self.layout.len()
    }

    pub fn n_points(&self) -> usize {
        self.layout.n_points()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn ids(&self) -> impl Iterator<Item = DomainId> + '_ {
        (0..self.domains.len()).map(|i| DomainId::from_index(i as u32))
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn domain(&self, id: DomainId) -> ChainResult<&Domain> {
        self.domains
            .get(id.slot())
            .ok_or(ChainError::UnknownDomain { id })
    }

    /// Mutable access to a domain. The chain must be re-initialized afterwards,
    /// since the change may alter shapes or attachments.
    pub fn domain_mut(&mut self, id: DomainId) -> ChainResult<&mut Domain> {
        let domain = self
            .domains
            .get_mut(id.slot())
            .ok_or(ChainError::UnknownDomain { id })?;
        self.initialized = false;
        Ok(domain)
    }

    pub fn left_of(&self, id: DomainId) -> Option<&Domain> {
        id.slot().checked_sub(1).and_then(|s| self.domains.get(s))
    }

    pub fn right_of(&self, id: DomainId) -> Option<&Domain> {
        self.domains.get(id.slot() + 1)
    }

    /// Find a domain by name.
    pub fn find(&self, name: &str) -> Option<DomainId> {
        self.domains
            .iter()
            .position(|d| d.name() == name)
            .map(|i| DomainId::from_index(i as u32))
    }

    // ---- lifecycle ----

    /// Re-check topology, recompute the layout, and initialize every domain
    /// against its neighbours.
    pub fn init(&mut self) -> ChainResult<()> {
        let kinds: Vec<_> = self.domains.iter().map(Domain::kind).collect();
        validate::validate_topology(&kinds)?;
        self.layout = Layout::from_domains(&self.domains);

        for slot in 0..self.domains.len() {
            let ctx = self.init_context(slot);
            self.domains[slot].init(&ctx)?;
        }
        self.initialized = true;

        info!(
            domains = self.domains.len(),
            unknowns = self.layout.len(),
            points = self.layout.n_points(),
            "chain initialized"
        );
        Ok(())
    }

    fn neighbor(&self, slot: usize) -> Neighbor {
        let domain = &self.domains[slot];
        Neighbor {
            id: DomainId::from_index(slot as u32),
            kind: domain.kind(),
            flow: domain.as_flow().map(FlowInfo::of),
        }
    }

    fn init_context(&self, slot: usize) -> InitContext {
        InitContext {
            id: DomainId::from_index(slot as u32),
            left: slot.checked_sub(1).map(|s| self.neighbor(s)),
            right: (slot + 1 < self.domains.len()).then(|| self.neighbor(slot + 1)),
        }
    }

    fn ensure_ready(&self) -> ChainResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(ChainError::NotInitialized)
        }
    }

    fn check_len(&self, what: &'static str, v: &[f64]) -> ChainResult<()> {
        if v.len() == self.layout.len() {
            Ok(())
        } else {
            Err(ChainError::LengthMismatch {
                what,
                expected: self.layout.len(),
                actual: v.len(),
            })
        }
    }

    fn check_request(&self, x: &[f64], r: &[f64], req: &EvalRequest<'_>) -> ChainResult<()> {
        self.ensure_ready()?;
        self.check_len("trial vector", x)?;
        self.check_len("residual vector", r)?;
        if let Some(prev) = req.previous {
            self.check_len("previous solution", prev)?;
        }
        Ok(())
    }

    // ---- residual ----

    fn extent_at(&self, slot: Option<usize>) -> Option<Extent> {
        slot.and_then(|s| self.layout.extents().get(s).copied())
    }

    fn context<'a>(
        &self,
        slot: usize,
        x: &'a [f64],
        req: &EvalRequest<'a>,
        edges: &'a [Option<EdgeCondition>],
    ) -> EvalContext<'a> {
        let left = slot.checked_sub(1);
        let right = Some(slot + 1);
        let mut ctx = EvalContext::new(x, self.layout.extents()[slot])
            .with_neighbors(self.extent_at(left), self.extent_at(right))
            .with_transient(req.rdt, req.previous)
            .with_point(req.point);
        if self.domains[slot].kind().is_flow() {
            let edge = |s: Option<usize>| s.and_then(|s| edges.get(s)).and_then(Option::as_ref);
            ctx = ctx.with_edges(edge(left), edge(right));
        }
        ctx
    }

    fn edge_condition_of(&self, slot: usize, x: &[f64]) -> ChainResult<Option<EdgeCondition>> {
        let req = EvalRequest::steady();
        let ctx = self.context(slot, x, &req, &[]);
        Ok(self.domains[slot].edge_condition(&ctx)?)
    }

    /// What each boundary imposes on its flow at the trial point `x`.
    pub fn edge_conditions(&self, x: &[f64]) -> ChainResult<Vec<Option<EdgeCondition>>> {
        self.ensure_ready()?;
        self.check_len("trial vector", x)?;
        (0..self.domains.len())
            .map(|slot| self.edge_condition_of(slot, x))
            .collect()
    }

    /// Assemble the full residual into `r`.
    ///
    /// Boundaries are asked for their edge conditions first; every domain
    /// then writes only its own slice of `r`.
    pub fn eval(&self, x: &[f64], r: &mut [f64], req: EvalRequest<'_>) -> ChainResult<()> {
        self.check_request(x, r, &req)?;
        let edges = self.edge_conditions(x)?;
        let slices = self.layout.split(r);
        for (slot, (domain, slice)) in self.domains.iter().zip(slices).enumerate() {
            let ctx = self.context(slot, x, &req, &edges);
            domain.eval(&ctx, slice)?;
        }
        Ok(())
    }

    /// Same as [`Chain::eval`], with domains evaluated in parallel.
    pub fn eval_parallel(
        &self,
        x: &[f64],
        r: &mut [f64],
        req: EvalRequest<'_>,
    ) -> ChainResult<()> {
        self.check_request(x, r, &req)?;
        let edges = (0..self.domains.len())
            .into_par_iter()
            .map(|slot| self.edge_condition_of(slot, x))
            .collect::<ChainResult<Vec<_>>>()?;
        let slices = self.layout.split(r);
        self.domains
            .par_iter()
            .zip(slices)
            .enumerate()
            .try_for_each(|(slot, (domain, slice))| {
                let ctx = self.context(slot, x, &req, &edges);
                domain.eval(&ctx, slice).map_err(ChainError::from)
            })
    }

    /// Allocate and return the residual at `x`.
    pub fn residual(&self, x: &[f64], req: EvalRequest<'_>) -> ChainResult<Vec<f64>> {
        let mut r = vec![0.0; self.layout.len()];
        self.eval(x, &mut r, req)?;
        Ok(r)
    }

    /// Rows whose residuals can change when the unknowns at `point` change.
    pub fn rows_touched_by(&self, point: usize) -> std::ops::Range<usize> {
        self.layout.rows_touched_by(point)
    }

    // ---- per-row metadata ----

    /// Starting estimate for every unknown.
    pub fn initial_solution(&self) -> ChainResult<Vec<f64>> {
        self.ensure_ready()?;
        let mut x = vec![0.0; self.layout.len()];
        for (domain, ext) in self.domains.iter().zip(self.layout.extents()) {
            domain.initial_solution(&mut x[ext.range()]);
        }
        Ok(x)
    }

    /// Per-row flag: `true` where the equation carries a time derivative.
    pub fn transient_mask(&self) -> ChainResult<Vec<bool>> {
        self.ensure_ready()?;
        let mut mask = vec![false; self.layout.len()];
        for (domain, ext) in self.domains.iter().zip(self.layout.extents()) {
            for (local, flag) in mask[ext.range()].iter_mut().enumerate() {
                *flag = domain.is_differential(local);
            }
        }
        Ok(mask)
    }

    /// Per-row bounds used by the Newton damping.
    pub fn bounds(&self) -> ChainResult<Vec<ComponentBounds>> {
        self.ensure_ready()?;
        let mut bounds = Vec::with_capacity(self.layout.len());
        for (domain, ext) in self.domains.iter().zip(self.layout.extents()) {
            for _ in 0..ext.np {
                bounds.extend((0..ext.nv).map(|n| domain.bounds(n)));
            }
        }
        Ok(bounds)
    }

    /// Human-readable label of a row, e.g. `"flame.T[3]"`.
    pub fn row_label(&self, row: usize) -> Option<String> {
        let (id, point, component) = self.layout.locate(row)?;
        let domain = self.domains.get(id.slot())?;
        let name = domain
            .component_name(component)
            .unwrap_or_else(|| format!("component_{component}"));
        Some(format!("{}.{}[{}]", domain.name(), name, point))
    }

    // ---- solution hand-off ----

    /// Pass the converged solution to every domain so it can store state.
    pub fn finalize(&mut self, x: &[f64]) -> ChainResult<()> {
        self.ensure_ready()?;
        self.check_len("solution", x)?;
        for (domain, ext) in self.domains.iter_mut().zip(self.layout.extents()) {
            domain.finalize(&x[ext.range()])?;
        }
        debug!(domains = self.domains.len(), "chain finalized");
        Ok(())
    }

    /// Log the state of every domain at `x`.
    pub fn show_solution(&self, x: &[f64]) -> ChainResult<()> {
        self.check_len("solution", x)?;
        for (domain, ext) in self.domains.iter().zip(self.layout.extents()) {
            domain.show_solution(&x[ext.range()]);
        }
        Ok(())
    }

    /// Save the chain and solution `x` into a document.
    pub fn save(&self, x: &[f64]) -> ChainResult<SolutionDocument> {
        self.ensure_ready()?;
        self.check_len("solution", x)?;
        let nodes: Vec<DomainNode> = self
            .domains
            .iter()
            .zip(self.layout.extents())
            .enumerate()
            .map(|(slot, (domain, ext))| domain.save(slot as u32, &x[ext.range()]))
            .collect();
        Ok(SolutionDocument::new(nodes))
    }

    /// Restore domain state and the solution `x` from a document.
    ///
    /// Nodes are matched by domain ID. Domains without a node keep their
    /// state and take their starting values.
    pub fn restore(&mut self, doc: &SolutionDocument, x: &mut [f64]) -> ChainResult<()> {
        self.ensure_ready()?;
        self.check_len("solution", x)?;
        for (slot, (domain, ext)) in self
            .domains
            .iter_mut()
            .zip(self.layout.extents())
            .enumerate()
        {
            let slice = &mut x[ext.range()];
            match doc.node(slot as u32) {
                Some(node) => domain.restore(node, slice)?,
                None => {
                    warn!(domain = %domain.name(), "no saved node, using starting values");
                    domain.initial_solution(slice);
                }
            }
        }
        Ok(())
    }
}

//! Incremental chain builder.

use fc_core::DomainId;
use fc_domains::{Domain, FlowDomain};

use crate::chain::Chain;
use crate::error::ChainResult;
use crate::validate;

/// Builder for assembling a chain left to right.
///
/// Use `push` for boundaries and `push_flow` for flow domains, then call
/// `build()` to check the topology and compute the layout. The built chain
/// still needs `init()` before evaluation.
#[derive(Debug, Default)]
pub struct ChainBuilder {
    domains: Vec<Domain>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a domain and return its ID (its position in the chain).
    pub fn push(&mut self, domain: impl Into<Domain>) -> DomainId {
        let id = DomainId::from_index(self.domains.len() as u32);
        self.domains.push(domain.into());
        id
    }

    pub fn push_flow(&mut self, flow: impl FlowDomain + 'static) -> DomainId {
        self.push(Domain::flow(flow))
    }

    /// Adjust a domain before the chain is built.
    pub fn domain_mut(&mut self, id: DomainId) -> Option<&mut Domain> {
        self.domains.get_mut(id.slot())
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Validate the topology and freeze the order into a `Chain`.
    pub fn build(self) -> ChainResult<Chain> {
        let kinds: Vec<_> = self.domains.iter().map(Domain::kind).collect();
        validate::validate_topology(&kinds)?;
        Ok(Chain::new(self.domains))
    }
}

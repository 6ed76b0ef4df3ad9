//! Placeholder domain closing a chain.

use crate::context::EvalContext;
use crate::error::DomainResult;

/// One dummy unknown with residual `r = x`.
#[derive(Debug, Clone, Default)]
pub struct Terminator {
    name: String,
}

impl Terminator {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn eval(&self, ctx: &EvalContext<'_>, r: &mut [f64]) -> DomainResult<()> {
        if ctx.skip() {
            return Ok(());
        }
        let x = ctx.own_values()?;
        r[0] = x[0];
        Ok(())
    }
}

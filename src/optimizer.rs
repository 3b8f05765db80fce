//! AST rewrite passes.
//!
//! The compiler hands every AST to an [`Optimizer`] before returning it. The
//! default is [`IdentityOptimizer`]; planners plug in their own passes
//! (predicate pushdown, projection pruning) without touching the compiler.

use crate::ast::Ast;

/// A rewrite pass over a compiled AST.
pub trait Optimizer: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str {
        "custom"
    }

    /// Rewrite `ast`. Passes must keep the AST's structural contract.
    fn optimize(&self, ast: Ast) -> Ast;
}

impl<F> Optimizer for F
where
    F: Fn(Ast) -> Ast + Send + Sync,
{
    fn optimize(&self, ast: Ast) -> Ast {
        self(ast)
    }
}

/// Returns the AST unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityOptimizer;

impl Optimizer for IdentityOptimizer {
    fn name(&self) -> &str {
        "identity"
    }

    fn optimize(&self, ast: Ast) -> Ast {
        ast
    }
}

/// The default optimization step: identity.
pub fn optimize(ast: Ast) -> Ast {
    IdentityOptimizer.optimize(ast)
}

/// Runs passes in registration order.
#[derive(Default)]
pub struct OptimizerChain {
    passes: Vec<Box<dyn Optimizer>>,
}

impl OptimizerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pass.
    pub fn register(&mut self, pass: Box<dyn Optimizer>) {
        self.passes.push(pass);
    }

    /// Builder form of [`OptimizerChain::register`].
    pub fn with(mut self, pass: impl Optimizer + 'static) -> Self {
        self.register(Box::new(pass));
        self
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Optimizer for OptimizerChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn optimize(&self, ast: Ast) -> Ast {
        self.passes.iter().fold(ast, |ast, pass| {
            tracing::trace!(pass = pass.name(), "running optimizer pass");
            pass.optimize(ast)
        })
    }
}

impl std::fmt::Debug for OptimizerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.passes.iter().map(|p| p.name()).collect();
        f.debug_struct("OptimizerChain").field("passes", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FieldNode, LimitNode, SelectItem};

    fn sample() -> Ast {
        Ast::new("orders", vec![SelectItem::Field(FieldNode::wildcard())])
    }

    #[test]
    fn test_identity() {
        assert_eq!(optimize(sample()), sample());
        assert_eq!(IdentityOptimizer.name(), "identity");
    }

    #[test]
    fn test_closure_pass() {
        let cap = |mut ast: Ast| {
            ast.limit = Some(LimitNode { value: 100 });
            ast
        };
        assert_eq!(cap.optimize(sample()).limit, Some(LimitNode { value: 100 }));
        assert_eq!(cap.name(), "custom");
    }

    #[test]
    fn test_chain_runs_in_order() {
        let chain = OptimizerChain::new()
            .with(|mut ast: Ast| {
                ast.limit = Some(LimitNode { value: 1 });
                ast
            })
            .with(|mut ast: Ast| {
                let current = ast.limit.map(|l| l.value).unwrap_or_default();
                ast.limit = Some(LimitNode { value: current * 10 });
                ast
            });
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.optimize(sample()).limit, Some(LimitNode { value: 10 }));
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let chain = OptimizerChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.optimize(sample()), sample());
    }
}

//! The full analysis chain in one call.

use crate::{
    analysis::{
        dataflow::{ConstantMap, ConstantPropagation},
        dominance::DominanceFrontier,
        ssa::SsaConverter,
        CfgBuilder, ControlFlowGraph,
    },
    ast::{Ast, AstId},
    config::AnalysisConfig,
    utils::graph::algorithms::DominatorTree,
    Result,
};

/// Runs CFG construction, dominance, SSA conversion and constant propagation.
///
/// # Examples
///
/// ```rust
/// use ssalyze::{analysis::Pipeline, ast::{Ast, Value}, config::AnalysisConfig};
///
/// // x = 1; y = x
/// let mut ast = Ast::new();
/// let one = ast.literal(1.0);
/// let first = ast.assign("x", one);
/// let x = ast.symbol("x");
/// let second = ast.assign("y", x);
/// let root = ast.brace(vec![first, second]);
///
/// let result = Pipeline::new(AnalysisConfig::strict()).run(&ast, root)?;
/// assert_eq!(result.constants().constant("x#1"), Some(&Value::Double(1.0)));
/// assert_eq!(result.constants().constant("y#1"), Some(&Value::Double(1.0)));
/// assert!(!result.cfg().is_ssa());
/// assert!(result.ssa().is_ssa());
/// # Ok::<(), ssalyze::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: AnalysisConfig,
}

impl Pipeline {
    /// Creates a pipeline with the given configuration.
    #[must_use]
    pub const fn new(config: AnalysisConfig) -> Self {
        Pipeline { config }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyzes the tree rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage; see [`CfgBuilder::build`],
    /// [`SsaConverter::convert_in_place`] and [`ConstantPropagation::analyze`].
    pub fn run(&self, ast: &Ast, root: AstId) -> Result<PipelineResult> {
        let cfg = CfgBuilder::build(ast, root)?;
        let dominators = cfg.dominators()?.clone();
        let frontier = cfg.dominance_frontiers()?.clone();

        let ssa = SsaConverter::new(self.config.ssa).convert(&cfg)?;
        let constants = ConstantPropagation::new(self.config.propagation).analyze(&ssa)?;

        log::debug!(
            "analyzed {} blocks, {} of {} names constant",
            cfg.block_count(),
            constants.iter().filter(|(_, value)| value.is_constant()).count(),
            constants.len()
        );

        Ok(PipelineResult {
            cfg,
            ssa,
            dominators,
            frontier,
            constants,
        })
    }
}

/// Everything a [`Pipeline`] run produced.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    cfg: ControlFlowGraph,
    ssa: ControlFlowGraph,
    dominators: DominatorTree,
    frontier: DominanceFrontier,
    constants: ConstantMap,
}

impl PipelineResult {
    /// The control-flow graph before SSA conversion.
    #[must_use]
    pub const fn cfg(&self) -> &ControlFlowGraph {
        &self.cfg
    }

    /// The control-flow graph in SSA form.
    #[must_use]
    pub const fn ssa(&self) -> &ControlFlowGraph {
        &self.ssa
    }

    /// The dominator tree. Conversion does not change the graph's shape, so it holds
    /// for both graphs.
    #[must_use]
    pub const fn dominators(&self) -> &DominatorTree {
        &self.dominators
    }

    /// The dominance frontiers.
    #[must_use]
    pub const fn frontier(&self) -> &DominanceFrontier {
        &self.frontier
    }

    /// The constant propagation result.
    #[must_use]
    pub const fn constants(&self) -> &ConstantMap {
        &self.constants
    }
}

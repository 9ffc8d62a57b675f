//! The control-flow graph container.

use std::{fmt, sync::OnceLock};

use crate::{
    analysis::{
        cfg::{
            block::{BasicBlock, Terminator},
            edge::{CfgEdge, CfgEdgeKind},
        },
        dominance::{self, DominanceFrontier},
        BlockId,
    },
    ast::{Ast, AstId},
    utils::graph::{
        algorithms::{self, DominatorTree},
        DirectedGraph, GraphBase, NodeId, Predecessors, RootedGraph, Successors,
    },
    Error, Result,
};

/// A control-flow graph of basic blocks over its own copy of the AST.
///
/// The graph owns the [`Ast`] arena its statements point into, so cloning a
/// `ControlFlowGraph` is a deep copy: SSA conversion of the clone never touches the
/// original. The invariant "a block's terminator targets are exactly its outgoing edges"
/// is maintained by [`set_terminator`](Self::set_terminator), the only way to change a
/// terminator.
///
/// Dominator information is computed lazily on first access and cached. The cache is
/// reset whenever a terminator changes.
///
/// # Examples
///
/// ```rust
/// use ssalyze::{analysis::CfgBuilder, ast::Ast};
///
/// let mut ast = Ast::new();
/// let condition = ast.symbol("flag");
/// let one = ast.literal(1.0);
/// let then_branch = ast.assign("x", one);
/// let root = ast.if_else(condition, then_branch, None);
///
/// let cfg = CfgBuilder::build(&ast, root)?;
/// assert_eq!(cfg.block_count(), 3);
/// assert_eq!(cfg.successors(cfg.entry()).count(), 2);
///
/// let tree = cfg.dominators()?;
/// assert!(cfg.block_ids().all(|block| tree.dominates(cfg.entry(), block)));
/// # Ok::<(), ssalyze::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ControlFlowGraph {
    /// Blocks and edges
    graph: DirectedGraph<BasicBlock, CfgEdge>,
    /// The block execution starts in
    entry: BlockId,
    /// Arena holding every statement and expression referenced by the blocks
    ast: Ast,
    /// Parameter symbols of the lowered function, defined on entry
    parameters: Vec<AstId>,
    /// Whether the graph has been converted to SSA form
    ssa: bool,
    /// Cached dominator tree
    dominators: OnceLock<DominatorTree>,
    /// Cached dominance frontiers
    dominance_frontiers: OnceLock<DominanceFrontier>,
}

impl ControlFlowGraph {
    /// Creates a graph with a single, unterminated entry block.
    #[must_use]
    pub fn new(ast: Ast) -> Self {
        let mut graph = DirectedGraph::new();
        let entry = graph.add_node(BasicBlock::new(NodeId::new(0), 0));
        ControlFlowGraph {
            graph,
            entry,
            ast,
            parameters: Vec::new(),
            ssa: false,
            dominators: OnceLock::new(),
            dominance_frontiers: OnceLock::new(),
        }
    }

    /// Adds an empty, unterminated block at the given nesting depth.
    pub fn add_block(&mut self, depth: usize) -> BlockId {
        let id = NodeId::new(self.graph.node_count());
        let added = self.graph.add_node(BasicBlock::new(id, depth));
        self.invalidate();
        log::trace!("created block {added} at depth {depth}");
        added
    }

    /// Replaces the terminator of `block` and rewires its outgoing edges to match.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if `block` or any target does not exist.
    pub fn set_terminator(&mut self, block: BlockId, terminator: Terminator) -> Result<()> {
        let targets = terminator.targets();
        for (target, _) in &targets {
            if !self.graph.contains_node(*target) {
                return Err(Error::GraphError(format!(
                    "terminator of {block} targets missing block {target}"
                )));
            }
        }

        self.graph.remove_outgoing_edges(block)?;
        for (target, kind) in targets {
            self.graph.add_edge(block, target, CfgEdge::new(kind))?;
        }

        let data = self
            .graph
            .node_mut(block)
            .ok_or_else(|| Error::GraphError(format!("block {block} does not exist")))?;
        data.terminator = Some(terminator);

        self.invalidate();
        Ok(())
    }

    fn invalidate(&mut self) {
        self.dominators = OnceLock::new();
        self.dominance_frontiers = OnceLock::new();
    }

    /// The entry block.
    #[must_use]
    pub const fn entry(&self) -> BlockId {
        self.entry
    }

    /// Blocks ending in a `Return`.
    #[must_use]
    pub fn exits(&self) -> Vec<BlockId> {
        self.blocks()
            .filter(|(_, block)| block.terminator().is_some_and(Terminator::is_return))
            .map(|(id, _)| id)
            .collect()
    }

    /// Number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the block with the given id.
    #[must_use]
    pub fn block(&self, block: BlockId) -> Option<&BasicBlock> {
        self.graph.node(block)
    }

    /// Returns the block with the given id mutably.
    ///
    /// Body statements and phis can be edited through the returned reference; the
    /// terminator cannot.
    pub fn block_mut(&mut self, block: BlockId) -> Option<&mut BasicBlock> {
        self.graph.node_mut(block)
    }

    /// Iterates over `(id, block)` in ascending id order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &BasicBlock)> + '_ {
        self.graph.nodes()
    }

    /// Iterates over block ids in ascending order.
    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.graph.node_ids()
    }

    /// Successors of `block` in terminator order.
    pub fn successors(&self, block: BlockId) -> impl Iterator<Item = BlockId> + '_ {
        self.graph.successors(block)
    }

    /// Predecessors of `block` in edge creation order.
    pub fn predecessors(&self, block: BlockId) -> impl Iterator<Item = BlockId> + '_ {
        self.graph.predecessors(block)
    }

    /// Outgoing edges of `block` as `(target, kind)`.
    pub fn outgoing_edges(
        &self,
        block: BlockId,
    ) -> impl Iterator<Item = (BlockId, CfgEdgeKind)> + '_ {
        self.graph
            .outgoing_edges(block)
            .map(|(target, edge)| (target, edge.kind()))
    }

    /// The AST arena statements refer to.
    #[must_use]
    pub const fn ast(&self) -> &Ast {
        &self.ast
    }

    /// The AST arena, mutably.
    pub fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    /// Parameter symbols of the lowered function.
    #[must_use]
    pub fn parameters(&self) -> &[AstId] {
        &self.parameters
    }

    pub(crate) fn set_parameters(&mut self, parameters: Vec<AstId>) {
        self.parameters = parameters;
    }

    /// Returns `true` once the graph has been converted to SSA form.
    #[must_use]
    pub const fn is_ssa(&self) -> bool {
        self.ssa
    }

    pub(crate) fn mark_ssa(&mut self) {
        self.ssa = true;
    }

    /// Blocks reachable from the entry, in reverse post-order.
    #[must_use]
    pub fn reverse_postorder(&self) -> Vec<BlockId> {
        algorithms::reverse_postorder(self, self.entry)
    }

    /// Blocks reachable from the entry, in post-order.
    #[must_use]
    pub fn postorder(&self) -> Vec<BlockId> {
        algorithms::postorder(self, self.entry)
    }

    /// Returns the dominator tree, computing it on first access.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Irreducible`] if the graph has a loop with more than one entry.
    pub fn dominators(&self) -> Result<&DominatorTree> {
        if let Some(tree) = self.dominators.get() {
            return Ok(tree);
        }
        let tree = dominance::dominator_tree(self)?;
        Ok(self.dominators.get_or_init(|| tree))
    }

    /// Returns the dominance frontiers, computing them on first access.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Irreducible`] if the graph has a loop with more than one entry.
    pub fn dominance_frontiers(&self) -> Result<&DominanceFrontier> {
        if let Some(frontier) = self.dominance_frontiers.get() {
            return Ok(frontier);
        }
        let frontier = dominance::dominance_frontier(self, self.dominators()?);
        Ok(self.dominance_frontiers.get_or_init(|| frontier))
    }
}

impl GraphBase for ControlFlowGraph {
    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        self.graph.node_ids()
    }
}

impl Successors for ControlFlowGraph {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.graph.successors(node)
    }
}

impl Predecessors for ControlFlowGraph {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.graph.predecessors(node)
    }
}

impl RootedGraph for ControlFlowGraph {
    fn entry(&self) -> NodeId {
        self.entry
    }
}

impl fmt::Display for ControlFlowGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, block) in self.blocks() {
            writeln!(f, "{id} (depth {}):", block.depth())?;
            for phi in block.phis() {
                writeln!(f, "    {phi}")?;
            }
            for statement in block.body() {
                writeln!(f, "    {statement}")?;
            }
            match block.terminator() {
                Some(terminator) => writeln!(f, "    {terminator}")?,
                None => writeln!(f, "    <unterminated>")?,
            }
        }
        Ok(())
    }
}

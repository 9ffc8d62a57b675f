//! Sparse constant propagation over SSA form.
//!
//! Every SSA name starts as [`LatticeValue::Unknown`]. Definitions are evaluated from a
//! worklist; whenever the value of a name changes, every definition that reads the name
//! is queued again. Values are only ever combined with `meet`, so each name changes at
//! most twice and the iteration terminates.
//!
//! # Evaluation
//!
//! - A literal is a constant.
//! - A numbered symbol has the current value of its name. A bare symbol is a free
//!   variable and is not constant.
//! - A call to one of the foldable [`Operator`]s with a matching number of arguments is
//!   folded once all operands are constant. Any other call is not constant.
//! - A phi is not constant if any operand is not constant or has no reaching
//!   definition. Otherwise it is the meet of its operands, with unknown operands
//!   ignored, and stays unknown only while every operand is unknown. A loop-carried
//!   name is constant when every path around the loop assigns it the entry value.
//! - Parameters are not constant.
//!
//! All blocks are treated as executable: branch conditions that fold to a constant do
//! not prune edges.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::{
    analysis::{
        dataflow::lattice::{LatticeValue, MeetSemiLattice},
        ControlFlowGraph,
    },
    ast::{Ast, AstId, NodeKind, Operator, Symbol, Value},
    config::PropagationConfig,
    Error, Result,
};

/// A single change of a name's lattice value, recorded when
/// [`PropagationConfig::record_transitions`] is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// SSA display name
    pub name: String,
    /// Value before the update
    pub from: LatticeValue,
    /// Value after the update
    pub to: LatticeValue,
}

/// Final lattice values keyed by SSA display name (`x#2`).
///
/// No name is left [`Unknown`](LatticeValue::Unknown): names that never received a
/// constant are reported as [`NotConstant`](LatticeValue::NotConstant).
#[derive(Debug, Clone, Default)]
pub struct ConstantMap {
    values: BTreeMap<String, LatticeValue>,
    transitions: Vec<Transition>,
}

impl ConstantMap {
    /// The value of `name`, if it is defined in the analyzed graph.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LatticeValue> {
        self.values.get(name)
    }

    /// The constant held by `name`, if any.
    #[must_use]
    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(LatticeValue::as_constant)
    }

    /// Returns `true` if `name` always holds the same value.
    #[must_use]
    pub fn is_constant(&self, name: &str) -> bool {
        self.get(name).is_some_and(LatticeValue::is_constant)
    }

    /// Iterates over `(name, value)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LatticeValue)> + '_ {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the graph defined no names.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Lattice value changes in the order they happened. Empty unless recording was
    /// enabled.
    #[must_use]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }
}

/// What defines an SSA name.
#[derive(Debug, Clone)]
enum Definition {
    Parameter,
    Assign(AstId),
    Phi(Vec<Option<Symbol>>),
}

/// Constant propagation analysis.
///
/// # Examples
///
/// ```rust
/// use ssalyze::{
///     analysis::{dataflow::ConstantPropagation, ssa::to_ssa, CfgBuilder},
///     ast::{Ast, Value},
///     config::PropagationConfig,
/// };
///
/// // x = 1; y = x + 3
/// let mut ast = Ast::new();
/// let one = ast.literal(1.0);
/// let first = ast.assign("x", one);
/// let x = ast.symbol("x");
/// let three = ast.literal(3.0);
/// let sum = ast.call("+", vec![x, three]);
/// let second = ast.assign("y", sum);
/// let root = ast.brace(vec![first, second]);
///
/// let ssa = to_ssa(&CfgBuilder::build(&ast, root)?)?;
/// let constants = ConstantPropagation::new(PropagationConfig::default()).analyze(&ssa)?;
/// assert_eq!(constants.constant("y#1"), Some(&Value::Double(4.0)));
/// # Ok::<(), ssalyze::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConstantPropagation {
    config: PropagationConfig,
}

impl ConstantPropagation {
    /// Creates the analysis with the given configuration.
    #[must_use]
    pub const fn new(config: PropagationConfig) -> Self {
        ConstantPropagation { config }
    }

    /// Computes the lattice value of every SSA name defined in reachable blocks.
    ///
    /// # Errors
    ///
    /// - [`Error::SsaError`] if `cfg` is not in SSA form.
    /// - [`Error::IterationLimit`] if the worklist runs longer than
    ///   [`PropagationConfig::max_steps`].
    pub fn analyze(&self, cfg: &ControlFlowGraph) -> Result<ConstantMap> {
        if !cfg.is_ssa() {
            return Err(Error::SsaError(
                "constant propagation requires SSA form".to_string(),
            ));
        }

        let ast = cfg.ast();
        let definitions = collect_definitions(cfg);

        // name -> definitions reading it
        let mut uses: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, (_, definition)) in definitions.iter().enumerate() {
            for operand in operands(ast, definition) {
                uses.entry(operand).or_default().push(index);
            }
        }

        let mut values: HashMap<&str, LatticeValue> = definitions
            .iter()
            .map(|(name, _)| (name.as_str(), LatticeValue::Unknown))
            .collect();
        let mut transitions = Vec::new();

        let mut queued = vec![true; definitions.len()];
        let mut worklist: VecDeque<usize> = (0..definitions.len()).collect();
        let mut steps = 0;

        while let Some(index) = worklist.pop_front() {
            queued[index] = false;
            steps += 1;
            if let Some(limit) = self.config.max_steps.filter(|&limit| steps > limit) {
                log::warn!("constant propagation did not settle within {limit} steps");
                return Err(Error::IterationLimit(limit));
            }

            let (name, definition) = &definitions[index];
            let evaluated = match definition {
                Definition::Parameter => LatticeValue::NotConstant,
                Definition::Assign(expr) => evaluate(ast, *expr, &values),
                Definition::Phi(incoming) => evaluate_phi(incoming, &values),
            };

            let old = values
                .get(name.as_str())
                .cloned()
                .unwrap_or(LatticeValue::Unknown);
            let new = old.meet(&evaluated);
            if new == old {
                continue;
            }

            log::trace!("{name}: {old} -> {new}");
            if self.config.record_transitions {
                transitions.push(Transition {
                    name: name.clone(),
                    from: old,
                    to: new.clone(),
                });
            }
            values.insert(name.as_str(), new);

            for &user in uses.get(name.as_str()).into_iter().flatten() {
                if !queued[user] {
                    queued[user] = true;
                    worklist.push_back(user);
                }
            }
        }

        let values: BTreeMap<String, LatticeValue> = values
            .into_iter()
            .map(|(name, value)| {
                let value = if value.is_top() {
                    LatticeValue::NotConstant
                } else {
                    value
                };
                (name.to_string(), value)
            })
            .collect();

        log::debug!(
            "propagated {} names in {} steps, {} constant",
            values.len(),
            steps,
            values.values().filter(|value| value.is_constant()).count()
        );

        Ok(ConstantMap {
            values,
            transitions,
        })
    }
}

/// Runs [`ConstantPropagation`] with the default configuration.
///
/// # Errors
///
/// See [`ConstantPropagation::analyze`].
pub fn propagate_constants(cfg: &ControlFlowGraph) -> Result<ConstantMap> {
    ConstantPropagation::default().analyze(cfg)
}

/// Collects the definitions of the reachable blocks, in reverse post-order.
fn collect_definitions(cfg: &ControlFlowGraph) -> Vec<(String, Definition)> {
    let ast = cfg.ast();
    let mut definitions = Vec::new();

    for &param in cfg.parameters() {
        if let Some(symbol) = ast.as_symbol(param) {
            definitions.push((symbol.name(), Definition::Parameter));
        }
    }

    for block in cfg.reverse_postorder() {
        let Some(data) = cfg.block(block) else {
            continue;
        };
        for phi in data.phis() {
            let incoming = phi.incoming().values().cloned().collect();
            definitions.push((phi.name(), Definition::Phi(incoming)));
        }
        for &statement in data.body() {
            if let Some(NodeKind::Assign { write, read }) = ast.kind(statement) {
                if let Some(symbol) = ast.as_symbol(*write) {
                    definitions.push((symbol.name(), Definition::Assign(*read)));
                }
            }
        }
    }

    definitions
}

/// Numbered names read by a definition.
fn operands(ast: &Ast, definition: &Definition) -> Vec<String> {
    match definition {
        Definition::Parameter => Vec::new(),
        Definition::Assign(expr) => ast
            .reads(*expr)
            .into_iter()
            .filter_map(|read| ast.as_symbol(read))
            .filter(|symbol| symbol.is_versioned())
            .map(Symbol::name)
            .collect(),
        Definition::Phi(incoming) => incoming
            .iter()
            .flatten()
            .filter(|symbol| symbol.is_versioned())
            .map(Symbol::name)
            .collect(),
    }
}

fn value_of(symbol: &Symbol, values: &HashMap<&str, LatticeValue>) -> LatticeValue {
    if !symbol.is_versioned() {
        return LatticeValue::NotConstant;
    }
    values
        .get(symbol.name().as_str())
        .cloned()
        .unwrap_or(LatticeValue::NotConstant)
}

fn evaluate(ast: &Ast, expr: AstId, values: &HashMap<&str, LatticeValue>) -> LatticeValue {
    match ast.kind(expr) {
        Some(NodeKind::Literal(value)) => LatticeValue::Constant(value.clone()),
        Some(NodeKind::Symbol(symbol)) => value_of(symbol, values),
        Some(NodeKind::Call { args, .. }) => {
            let Some(operator) = ast.callee_name(expr).and_then(Operator::from_callee) else {
                return LatticeValue::NotConstant;
            };
            if !operator.accepts_arity(args.len()) {
                return LatticeValue::NotConstant;
            }

            let operands: Vec<LatticeValue> = args
                .iter()
                .map(|&arg| evaluate(ast, arg, values))
                .collect();
            if operands.iter().any(MeetSemiLattice::is_bottom) {
                return LatticeValue::NotConstant;
            }
            if operands.iter().any(MeetSemiLattice::is_top) {
                return LatticeValue::Unknown;
            }

            let constants: Vec<Value> = operands
                .into_iter()
                .filter_map(|operand| match operand {
                    LatticeValue::Constant(value) => Some(value),
                    _ => None,
                })
                .collect();
            operator
                .fold(&constants)
                .map_or(LatticeValue::NotConstant, LatticeValue::Constant)
        }
        _ => LatticeValue::NotConstant,
    }
}

fn evaluate_phi(
    incoming: &[Option<Symbol>],
    values: &HashMap<&str, LatticeValue>,
) -> LatticeValue {
    let mut operands = Vec::with_capacity(incoming.len());
    for definition in incoming {
        let Some(symbol) = definition else {
            return LatticeValue::NotConstant;
        };
        operands.push(value_of(symbol, values));
    }

    // Unknown is the identity of meet: operands not evaluated yet are skipped.
    operands
        .iter()
        .fold(LatticeValue::Unknown, |acc, operand| acc.meet(operand))
}

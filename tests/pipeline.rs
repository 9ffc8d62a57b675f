//! End-to-end tests of the analysis pipeline.
//!
//! Each test builds a small program with the public AST builder, runs the whole chain
//! (CFG construction, dominance, SSA conversion, constant propagation) and checks the
//! resulting constants and graph shapes.

use ssalyze::prelude::*;

/// Runs the default pipeline over the tree rooted at `root`.
fn run(ast: &Ast, root: AstId) -> Result<PipelineResult> {
    Pipeline::new(AnalysisConfig::default()).run(ast, root)
}

/// Asserts that `name` resolved to `NotConstant`.
fn assert_not_constant(constants: &ConstantMap, name: &str) {
    assert_eq!(
        constants.get(name),
        Some(&LatticeValue::NotConstant),
        "expected {name} to be not constant"
    );
}

/// `x = 1; y = x`
fn linear() -> (Ast, AstId) {
    let mut ast = Ast::new();
    let one = ast.literal(1.0);
    let first = ast.assign("x", one);
    let x = ast.symbol("x");
    let second = ast.assign("y", x);
    let root = ast.brace(vec![first, second]);
    (ast, root)
}

/// `x = 42; for (i in 1:10) { x = i }`, optionally followed by `y = x`.
fn counting_loop(read_after: bool) -> (Ast, AstId) {
    let mut ast = Ast::new();
    let answer = ast.literal(42.0);
    let init = ast.assign("x", answer);
    let from = ast.literal(1.0);
    let to = ast.literal(10.0);
    let range = ast.call(":", vec![from, to]);
    let i = ast.symbol("i");
    let update = ast.assign("x", i);
    let body = ast.brace(vec![update]);
    let lp = ast.for_loop("i", range, body);

    let mut statements = vec![init, lp];
    if read_after {
        let x = ast.symbol("x");
        statements.push(ast.assign("y", x));
    }
    let root = ast.brace(statements);
    (ast, root)
}

#[test]
fn test_linear_code() -> Result<()> {
    let (ast, root) = linear();
    let result = run(&ast, root)?;

    let constants = result.constants();
    assert_eq!(constants.len(), 2);
    assert_eq!(constants.constant("x#1"), Some(&Value::Double(1.0)));
    assert_eq!(constants.constant("y#1"), Some(&Value::Double(1.0)));
    assert_eq!(result.cfg().block_count(), 1);
    Ok(())
}

#[test]
fn test_diamond_with_constant_condition() -> Result<()> {
    // if (TRUE) x = 1 else x = 2; y = x
    let mut ast = Ast::new();
    let condition = ast.literal(true);
    let one = ast.literal(1.0);
    let left = ast.assign("x", one);
    let two = ast.literal(2.0);
    let right = ast.assign("x", two);
    let branch = ast.if_else(condition, left, Some(right));
    let x = ast.symbol("x");
    let after = ast.assign("y", x);
    let root = ast.brace(vec![branch, after]);

    let result = run(&ast, root)?;
    let constants = result.constants();

    assert_eq!(constants.constant("x#1"), Some(&Value::Double(1.0)));
    assert_eq!(constants.constant("x#2"), Some(&Value::Double(2.0)));
    assert_not_constant(constants, "x#3");
    assert_not_constant(constants, "y#1");

    let merge = result
        .ssa()
        .blocks()
        .find(|(_, block)| block.phi_for("x").is_some())
        .map(|(id, _)| id);
    assert_eq!(merge, Some(BlockId::new(3)));
    Ok(())
}

#[test]
fn test_diamond_with_unknown_condition() -> Result<()> {
    // x = rnorm(1); if (x > 0) x = 1 else x = 2; y = x
    let mut ast = Ast::new();
    let one = ast.literal(1.0);
    let draw = ast.call("rnorm", vec![one]);
    let init = ast.assign("x", draw);
    let x = ast.symbol("x");
    let zero = ast.literal(0.0);
    let positive = ast.call(">", vec![x, zero]);
    let one = ast.literal(1.0);
    let left = ast.assign("x", one);
    let two = ast.literal(2.0);
    let right = ast.assign("x", two);
    let branch = ast.if_else(positive, left, Some(right));
    let x_after = ast.symbol("x");
    let after = ast.assign("y", x_after);
    let root = ast.brace(vec![init, branch, after]);

    let result = run(&ast, root)?;
    let constants = result.constants();

    assert_not_constant(constants, "x#1");
    assert_eq!(constants.constant("x#2"), Some(&Value::Double(1.0)));
    assert_eq!(constants.constant("x#3"), Some(&Value::Double(2.0)));
    assert_not_constant(constants, "x#4");
    assert_not_constant(constants, "y#1");
    Ok(())
}

#[test]
fn test_agreeing_branches_merge_to_constant() -> Result<()> {
    // x = rnorm(1); if (x > 0) y = 5L else y = 5L; z = y * 2L
    let mut ast = Ast::new();
    let one = ast.literal(1.0);
    let draw = ast.call("rnorm", vec![one]);
    let init = ast.assign("x", draw);
    let x = ast.symbol("x");
    let zero = ast.literal(0.0);
    let positive = ast.call(">", vec![x, zero]);
    let five = ast.literal(5);
    let left = ast.assign("y", five);
    let five = ast.literal(5);
    let right = ast.assign("y", five);
    let branch = ast.if_else(positive, left, Some(right));
    let y = ast.symbol("y");
    let two = ast.literal(2);
    let doubled = ast.call("*", vec![y, two]);
    let after = ast.assign("z", doubled);
    let root = ast.brace(vec![init, branch, after]);

    let result = run(&ast, root)?;
    let constants = result.constants();

    assert_eq!(constants.constant("y#3"), Some(&Value::Integer(5)));
    assert_eq!(constants.constant("z#1"), Some(&Value::Integer(10)));
    Ok(())
}

#[test]
fn test_loop_counter() -> Result<()> {
    let (ast, root) = counting_loop(false);
    let result = run(&ast, root)?;
    let constants = result.constants();

    assert_eq!(constants.constant("x#1"), Some(&Value::Double(42.0)));
    assert_eq!(constants.constant("._counter_1#1"), Some(&Value::Integer(0)));
    assert_not_constant(constants, "._counter_1#2");
    assert_not_constant(constants, "._counter_1#3");
    assert_not_constant(constants, "._iterable_1#1");
    assert_not_constant(constants, "i#1");
    assert_not_constant(constants, "x#2");

    // B0 -> B1 (header) -> B2 (body) -> B1, B1 -> B3 (exit)
    let ssa = result.ssa();
    assert_eq!(ssa.block_count(), 4);
    let header = BlockId::new(1);
    assert!(matches!(
        ssa.block(header).and_then(BasicBlock::terminator),
        Some(Terminator::IterateBranch { .. })
    ));
    assert!(ssa
        .block(header)
        .and_then(|block| block.phi_for("._counter_1"))
        .is_some());

    let dominators = result.dominators();
    assert!(dominators.dominates(header, BlockId::new(2)));
    assert!(dominators.dominates(header, BlockId::new(3)));
    assert!(result.frontier().contains(BlockId::new(2), header));
    Ok(())
}

#[test]
fn test_loop_invariant_constant_survives_the_loop() -> Result<()> {
    // c = rnorm(1); x = 5; for (i in 1:3) { if (c) x = 5 }; y = x
    let mut ast = Ast::new();
    let one = ast.literal(1.0);
    let draw = ast.call("rnorm", vec![one]);
    let c_init = ast.assign("c", draw);
    let five = ast.literal(5.0);
    let x_init = ast.assign("x", five);

    let c = ast.symbol("c");
    let five_again = ast.literal(5.0);
    let reassign = ast.assign("x", five_again);
    let branch = ast.if_else(c, reassign, None);
    let body = ast.brace(vec![branch]);
    let from = ast.literal(1.0);
    let to = ast.literal(3.0);
    let range = ast.call(":", vec![from, to]);
    let lp = ast.for_loop("i", range, body);

    let x = ast.symbol("x");
    let after = ast.assign("y", x);
    let root = ast.brace(vec![c_init, x_init, lp, after]);

    let result = run(&ast, root)?;
    let constants = result.constants();
    assert_not_constant(constants, "c#1");
    assert_eq!(constants.constant("y#1"), Some(&Value::Double(5.0)));

    // Both the loop header phi and the phi after the `if` settle on 5.
    let versions: Vec<&str> = constants
        .iter()
        .map(|(name, _)| name)
        .filter(|name| name.starts_with("x#"))
        .collect();
    assert_eq!(versions.len(), 4);
    for name in versions {
        assert_eq!(constants.constant(name), Some(&Value::Double(5.0)), "{name}");
    }
    Ok(())
}

#[test]
fn test_loop_merges_before_later_read() -> Result<()> {
    let (ast, root) = counting_loop(true);
    let result = run(&ast, root)?;
    let constants = result.constants();

    let header = result.ssa().block(BlockId::new(1));
    let phi = header.and_then(|block| block.phi_for("x"));
    assert_eq!(phi.map(PhiNode::name).as_deref(), Some("x#2"));

    assert_eq!(constants.constant("x#1"), Some(&Value::Double(42.0)));
    assert_not_constant(constants, "x#2");
    assert_not_constant(constants, "x#3");
    assert_not_constant(constants, "y#1");
    Ok(())
}

#[test]
fn test_arithmetic_chain() -> Result<()> {
    // x = 1; y = x + 3; z = (y * 7) / 4
    let mut ast = Ast::new();
    let one = ast.literal(1.0);
    let first = ast.assign("x", one);
    let x = ast.symbol("x");
    let three = ast.literal(3.0);
    let sum = ast.call("+", vec![x, three]);
    let second = ast.assign("y", sum);
    let y = ast.symbol("y");
    let seven = ast.literal(7.0);
    let product = ast.call("*", vec![y, seven]);
    let grouped = ast.call("(", vec![product]);
    let four = ast.literal(4.0);
    let quotient = ast.call("/", vec![grouped, four]);
    let third = ast.assign("z", quotient);
    let root = ast.brace(vec![first, second, third]);

    let constants = run(&ast, root)?.constants().clone();
    assert_eq!(constants.constant("x#1"), Some(&Value::Double(1.0)));
    assert_eq!(constants.constant("y#1"), Some(&Value::Double(4.0)));
    assert_eq!(constants.constant("z#1"), Some(&Value::Double(7.0)));
    Ok(())
}

#[test]
fn test_integer_division_promotes() -> Result<()> {
    // x = 1L; y = x + 3L; z = (y * 7L) / 4L; w = (y * 7L) %/% 4L
    let mut ast = Ast::new();
    let one = ast.literal(1);
    let first = ast.assign("x", one);
    let x = ast.symbol("x");
    let three = ast.literal(3);
    let sum = ast.call("+", vec![x, three]);
    let second = ast.assign("y", sum);
    let y = ast.symbol("y");
    let seven = ast.literal(7);
    let product = ast.call("*", vec![y, seven]);
    let four = ast.literal(4);
    let quotient = ast.call("/", vec![product, four]);
    let third = ast.assign("z", quotient);
    let y = ast.symbol("y");
    let seven = ast.literal(7);
    let product = ast.call("*", vec![y, seven]);
    let four = ast.literal(4);
    let floored = ast.call("%/%", vec![product, four]);
    let fourth = ast.assign("w", floored);
    let root = ast.brace(vec![first, second, third, fourth]);

    let result = run(&ast, root)?;
    let constants = result.constants();
    assert_eq!(constants.constant("y#1"), Some(&Value::Integer(4)));
    assert_eq!(constants.constant("z#1"), Some(&Value::Double(7.0)));
    assert_eq!(constants.constant("w#1"), Some(&Value::Integer(7)));
    Ok(())
}

#[test]
fn test_function_parameters_are_not_constant() -> Result<()> {
    // function(a) { b = a + 1; return(b) }
    let mut ast = Ast::new();
    let a = ast.symbol("a");
    let one = ast.literal(1.0);
    let sum = ast.call("+", vec![a, one]);
    let define = ast.assign("b", sum);
    let b = ast.symbol("b");
    let ret = ast.return_value(Some(b));
    let body = ast.brace(vec![define, ret]);
    let root = ast.function(&["a"], body);

    let result = run(&ast, root)?;
    assert_not_constant(result.constants(), "a#1");
    assert_not_constant(result.constants(), "b#1");
    assert_eq!(result.ssa().exits(), vec![result.ssa().entry()]);
    Ok(())
}

#[test]
fn test_round_trip_is_stable() -> Result<()> {
    let (ast, root) = counting_loop(true);
    let cfg = CfgBuilder::build(&ast, root)?;
    let copy = cfg.clone();

    let first = to_ssa(&cfg)?;
    let second = to_ssa(&copy)?;

    assert_eq!(first.block_count(), second.block_count());
    assert_eq!(first.edge_count(), second.edge_count());
    for ((id, left), (_, right)) in first.blocks().zip(second.blocks()) {
        let left: Vec<String> = left.phis().iter().map(PhiNode::name).collect();
        let right: Vec<String> = right.phis().iter().map(PhiNode::name).collect();
        assert_eq!(left, right, "phis differ in {id}");
    }
    assert_eq!(
        first.dominators()?.idom_map(),
        second.dominators()?.idom_map()
    );

    for index in 0..first.ast().len() {
        let id = AstId::new(index);
        assert_eq!(
            first.ast().as_symbol(id).map(Symbol::name),
            second.ast().as_symbol(id).map(Symbol::name)
        );
    }
    assert_eq!(first.to_string(), second.to_string());
    Ok(())
}

#[test]
fn test_transitions_are_monotone() -> Result<()> {
    let (ast, root) = counting_loop(true);
    let config = AnalysisConfig::debugging();
    let result = Pipeline::new(config).run(&ast, root)?;
    let constants = result.constants();

    assert!(!constants.transitions().is_empty());
    for transition in constants.transitions() {
        assert_ne!(transition.from, transition.to);
        assert!(
            transition.from.precedes_or_equals(&transition.to),
            "{}: {} -> {}",
            transition.name,
            transition.from,
            transition.to
        );
    }

    // Each name moves down the lattice at most twice.
    for (name, _) in constants.iter() {
        let moves = constants
            .transitions()
            .iter()
            .filter(|transition| transition.name == name)
            .count();
        assert!(moves <= 2, "{name} changed {moves} times");
    }
    Ok(())
}

#[test]
fn test_malformed_if_is_structural() {
    let mut ast = Ast::new();
    let one = ast.literal(1.0);
    let then_branch = ast.assign("x", one);
    let broken = ast.add(NodeKind::If {
        condition: None,
        true_branch: Some(then_branch),
        false_branch: None,
    });

    let error = run(&ast, broken).unwrap_err();
    assert!(matches!(error, Error::Structural { node, .. } if node == broken));
}

#[test]
fn test_undefined_variable_is_unresolved() {
    // y = x + 1
    let mut ast = Ast::new();
    let x = ast.symbol("x");
    let one = ast.literal(1.0);
    let sum = ast.call("+", vec![x, one]);
    let root = ast.assign("y", sum);

    let error = run(&ast, root).unwrap_err();
    assert!(matches!(error, Error::UnresolvedName { ref name, .. } if name == "x"));

    let result = Pipeline::new(AnalysisConfig::lenient())
        .run(&ast, root)
        .unwrap();
    assert_not_constant(result.constants(), "y#1");
}

#[test]
fn test_iteration_limit() {
    let (ast, root) = linear();
    let mut config = AnalysisConfig::default();
    config.propagation.max_steps = Some(1);

    let error = Pipeline::new(config).run(&ast, root).unwrap_err();
    assert!(matches!(error, Error::IterationLimit(1)));
}

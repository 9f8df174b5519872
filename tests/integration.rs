//! Integration tests for contind

use contind::{
    evaluate, Call, Config, Delimiters, DetectedStyle, Engine, Fixer, NodeId, Operation, Style,
    StylePolicy, SyntaxTree, TreeBuilder, Verdict,
};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

type Fixture = fn(&str) -> (SyntaxTree, NodeId);

fn if_condition(source: &str) -> (SyntaxTree, NodeId) {
    let mut b = TreeBuilder::new(source);
    let kw = b.token("if").unwrap();
    let a = b.leaf("a").unwrap();
    let rhs = b.leaf("b").unwrap();
    let cond = b.and(a, rhs);
    let foo = b.leaf("foo").unwrap();
    let end = b.token("end").unwrap();
    let node = b.if_node(kw, cond, vec![foo], end);
    (b.finish(node).unwrap(), cond)
}

fn plain_sum(source: &str) -> (SyntaxTree, NodeId) {
    let mut b = TreeBuilder::new(source);
    let x = b.leaf("x").unwrap();
    let plus = b.token("+").unwrap();
    let y = b.leaf("y").unwrap();
    let node = b.binary(x, plus, y);
    (b.finish(node).unwrap(), node)
}

fn assigned_sum(source: &str) -> (SyntaxTree, NodeId) {
    let mut b = TreeBuilder::new(source);
    let foo = b.token("foo").unwrap();
    let bar = b.leaf("bar").unwrap();
    let plus = b.token("+").unwrap();
    let baz = b.leaf("baz").unwrap();
    let sum = b.binary(bar, plus, baz);
    let assign = b.assignment(foo, sum);
    (b.finish(assign).unwrap(), sum)
}

fn chained_condition(source: &str) -> (SyntaxTree, NodeId) {
    let mut b = TreeBuilder::new(source);
    let kw = b.token("while").unwrap();
    let a = b.leaf("a").unwrap();
    let recv = b.leaf("b").unwrap();
    let dot = b.token(".").unwrap();
    let c = b.token("c").unwrap();
    let call = b.method(recv, dot, c);
    let cond = b.or(a, call);
    let end = b.token("end").unwrap();
    let node = b.while_node(kw, cond, vec![], end);
    (b.finish(node).unwrap(), cond)
}

fn for_collection(source: &str) -> (SyntaxTree, NodeId) {
    let mut b = TreeBuilder::new(source);
    let kw = b.token("for").unwrap();
    let x = b.leaf("x").unwrap();
    b.token("in").unwrap();
    let items = b.leaf("items").unwrap();
    let plus = b.token("+").unwrap();
    let more = b.leaf("more").unwrap();
    let collection = b.binary(items, plus, more);
    let end = b.token("end").unwrap();
    let node = b.for_node(kw, x, collection, vec![], end);
    (b.finish(node).unwrap(), collection)
}

fn until_condition(source: &str) -> (SyntaxTree, NodeId) {
    let mut b = TreeBuilder::new(source);
    let kw = b.token("until").unwrap();
    let a = b.leaf("a").unwrap();
    let rhs = b.leaf("b").unwrap();
    let cond = b.or(a, rhs);
    let end = b.token("end").unwrap();
    let node = b.until_node(kw, cond, vec![], end);
    (b.finish(node).unwrap(), cond)
}

fn safe_navigation(source: &str) -> (SyntaxTree, NodeId) {
    let mut b = TreeBuilder::new(source);
    let total = b.token("total").unwrap();
    let items = b.leaf("items").unwrap();
    let dot = b.token("&.").unwrap();
    let sum = b.token("sum").unwrap();
    let call = b.method(items, dot, sum);
    let assign = b.assignment(total, call);
    (b.finish(assign).unwrap(), call)
}

fn check(fixture: Fixture, source: &str, policy: &StylePolicy) -> Verdict {
    let (tree, node) = fixture(source);
    let operation = Operation::of(&tree, node).unwrap();
    evaluate(&tree, &operation, policy)
}

fn indented() -> StylePolicy {
    StylePolicy::new(Style::Indented, 2)
}

fn aligned() -> StylePolicy {
    StylePolicy::new(Style::Aligned, 2)
}

#[test]
fn test_keyword_header_doubling() {
    let verdict = check(if_condition, "if a &&\n  b\n  foo\nend\n", &indented());
    let finding = verdict.into_finding().unwrap();
    assert_eq!(finding.offense.column_delta, 2);
    assert_eq!(
        finding.offense.message,
        "Use 4 (not 2) spaces for indenting a condition in an `if` statement spanning multiple lines."
    );
}

#[test]
fn test_plain_expression_indented_style() {
    assert_eq!(check(plain_sum, "x +\n  y", &indented()), Verdict::Conforming);

    let finding = check(plain_sum, "x +\ny", &indented()).into_finding().unwrap();
    assert_eq!(finding.offense.column_delta, 2);
}

#[test]
fn test_assignment_aligned_style() {
    assert_eq!(
        check(assigned_sum, "foo = bar +\n      baz", &aligned()),
        Verdict::Conforming
    );

    let finding = check(assigned_sum, "foo = bar +\n     baz", &aligned())
        .into_finding()
        .unwrap();
    assert_eq!(finding.offense.column_delta, 1);
    assert_eq!(
        finding.offense.message,
        "Align the operands of an expression in an assignment spanning multiple lines."
    );
}

#[test]
fn test_ambiguity_signal() {
    let finding = check(assigned_sum, "foo = bar +\n  baz", &aligned())
        .into_finding()
        .unwrap();
    assert!(finding.opposite_style_valid);

    let finding = check(assigned_sum, "foo = bar +\n baz", &aligned())
        .into_finding()
        .unwrap();
    assert!(!finding.opposite_style_valid);
}

#[test]
fn test_same_line_operands_never_offend() {
    for source in ["x + y", "  x +   y", "x +y"] {
        assert_eq!(check(plain_sum, source, &indented()), Verdict::NotApplicable);
        assert_eq!(check(plain_sum, source, &aligned()), Verdict::NotApplicable);
    }

    let mut b = TreeBuilder::new("  -a");
    let minus = b.token("-").unwrap();
    let a = b.leaf("a").unwrap();
    let node = b.unary(minus, a);
    let tree = b.finish(node).unwrap();
    let operation = Operation::of(&tree, node).unwrap();
    assert_eq!(evaluate(&tree, &operation, &indented()), Verdict::NotApplicable);
}

fn argument_fixture(source: &str) -> (SyntaxTree, NodeId) {
    let mut b = TreeBuilder::new(source);
    let foo = b.token("foo").unwrap();
    let open = b.token("(").unwrap();
    let a = b.leaf("a").unwrap();
    let rhs = b.leaf("b").unwrap();
    let arg = b.and(a, rhs);
    let c = b.leaf("c").unwrap();
    let close = b.token(")").unwrap();
    let call = b.call(Call {
        receiver: None,
        dot: None,
        selector: foo,
        arguments: vec![arg, c],
        parens: Some(Delimiters { open, close }),
    });
    (b.finish(call).unwrap(), arg)
}

fn grouped_fixture(source: &str) -> (SyntaxTree, NodeId) {
    let mut b = TreeBuilder::new(source);
    let foo = b.token("foo").unwrap();
    let open = b.token("(").unwrap();
    let x = b.leaf("x").unwrap();
    let plus = b.token("+").unwrap();
    let y = b.leaf("y").unwrap();
    let sum = b.binary(x, plus, y);
    let close = b.token(")").unwrap();
    let group = b.parenthesized(open, vec![sum], close);
    let assign = b.assignment(foo, group);
    (b.finish(assign).unwrap(), sum)
}

#[test]
fn test_parenthesized_operands_are_exempt() {
    for indent in ["", " ", "  ", "     ", "          "] {
        let source = format!("foo(a &&\n{}b, c)", indent);
        assert_eq!(check(argument_fixture, &source, &indented()), Verdict::NotApplicable);
        assert_eq!(check(argument_fixture, &source, &aligned()), Verdict::NotApplicable);

        let source = format!("foo = (x +\n{}y)", indent);
        assert_eq!(check(grouped_fixture, &source, &indented()), Verdict::NotApplicable);
        assert_eq!(check(grouped_fixture, &source, &aligned()), Verdict::NotApplicable);
    }
}

fn fix_and_recheck(fixture: Fixture, source: &str, policy: StylePolicy) {
    let (tree, _) = fixture(source);
    let mut config = Config::new();
    config.rule.style = Some(policy.style);
    if policy.style == Style::Indented {
        config.rule.indentation_width = Some(policy.width);
    } else {
        config.layout.indentation_width = Some(policy.width);
    }
    let engine = Engine::new(config).unwrap();

    let before = engine.inspect(Path::new("fixture.rb"), &tree);
    assert!(!before.is_clean(), "expected an offense in {:?}", source);

    let mut fixer = Fixer::new();
    fixer.collect_from_diagnostics(&before.diagnostics);
    let fixed = fixer.apply(source).unwrap();

    let (tree, _) = fixture(&fixed.output);
    let after = engine.inspect(Path::new("fixture.rb"), &tree);
    assert!(after.is_clean(), "still offending after fix: {:?}", fixed.output);
}

#[test]
fn test_fix_is_idempotent() {
    fix_and_recheck(if_condition, "if a &&\n  b\n  foo\nend\n", indented());
    fix_and_recheck(if_condition, "if a &&\n        b\n  foo\nend\n", indented());
    fix_and_recheck(if_condition, "if a &&\nb\n  foo\nend\n", aligned());
    fix_and_recheck(plain_sum, "x +\ny", indented());
    fix_and_recheck(plain_sum, "  x +\n    y\n", StylePolicy::new(Style::Indented, 4));
    fix_and_recheck(assigned_sum, "foo = bar +\n  baz", aligned());
    fix_and_recheck(assigned_sum, "foo = bar +\n      baz", indented());
    fix_and_recheck(chained_condition, "while a ||\n  b.\n      c\nend", indented());
}

#[test]
fn test_fix_shifts_every_line_of_the_operand() {
    let source = "while a ||\n  b.\n      c\nend";
    let (tree, _) = chained_condition(source);
    let engine = Engine::new(Config::new()).unwrap();
    let result = engine.inspect(Path::new("loop.rb"), &tree);

    assert_eq!(result.offense_count(), 1);
    let mut fixer = Fixer::new();
    fixer.collect_from_diagnostics(&result.diagnostics);
    let fixed = fixer.apply(source).unwrap();
    assert_eq!(fixed.output, "while a ||\n    b.\n        c\nend");
}

#[test]
fn test_engine_infers_aligned_code() {
    let sources = [
        "foo = bar +\n      baz",
        "foo = bar +\n      baz\n",
        "   foo = bar +\n         baz",
    ];
    let trees: Vec<(PathBuf, SyntaxTree)> = sources
        .iter()
        .enumerate()
        .map(|(i, s)| (PathBuf::from(format!("{}.rb", i)), assigned_sum(s).0))
        .collect();

    let engine = Engine::new(Config::new()).unwrap();
    let result = engine.inspect_all(&trees);

    assert_eq!(result.offense_count(), 3);
    assert_eq!(result.ambiguous, 3);
    assert_eq!(result.detected_style(), DetectedStyle::Consistent(Style::Aligned));
}

#[test]
fn test_for_collection_aligned_style() {
    let source = "for x in items +\n         more\nend";
    assert_eq!(check(for_collection, source, &aligned()), Verdict::Conforming);

    let finding = check(for_collection, "for x in items +\n    more\nend", &aligned())
        .into_finding()
        .unwrap();
    assert_eq!(finding.offense.column_delta, 5);
    assert!(finding.opposite_style_valid);
    assert_eq!(
        finding.offense.message,
        "Align the operands of a collection in a `for` statement spanning multiple lines."
    );
}

#[test]
fn test_until_condition_aligned_style() {
    assert_eq!(
        check(until_condition, "until a ||\n      b\nend", &aligned()),
        Verdict::Conforming
    );

    let finding = check(until_condition, "until a ||\n  b\nend", &aligned())
        .into_finding()
        .unwrap();
    assert_eq!(finding.offense.column_delta, 4);
    assert!(!finding.opposite_style_valid);
    assert_eq!(
        finding.offense.message,
        "Align the operands of a condition in an `until` statement spanning multiple lines."
    );
}

#[test]
fn test_safe_navigation_selector() {
    let source = "total = items\n  &.sum";
    assert_eq!(check(safe_navigation, source, &indented()), Verdict::Conforming);

    let (tree, node) = safe_navigation(source);
    let operation = Operation::of(&tree, node).unwrap();
    assert_eq!(tree.source().slice(operation.rhs), Some("&.sum"));

    let finding = evaluate(&tree, &operation, &aligned()).into_finding().unwrap();
    assert_eq!(finding.offense.column_delta, 6);
    assert!(finding.opposite_style_valid);
}

//! Structural equality over expressions, arguments, and call chains.
//!
//! Comparison here is shape-based, never identity-based and never a
//! boolean evaluation: two trees are equal when their operators, operand
//! shapes, function names, and leaf values line up. Every comparison is a
//! total function: mismatched node kinds are simply "not equal".

use crate::arg::{Arg, Kwargs};
use crate::record::CallRecord;
use serde::{Deserialize, Serialize};
use sham_expr::Expr;
use std::fmt;

/// Structural equality of two expression trees.
///
/// - binary and unary nodes: equal operator, recursively equal operands
/// - boolean combinations: equal operator, equal-length clause lists
///   compared pairwise in order (clause order is part of the shape)
/// - function calls: equal name, equal-length argument lists compared
///   pairwise
/// - leaves (columns, literals): plain equality of the underlying
///   name/value
/// - anything else, including mismatched node kinds: not equal
pub fn expr_eq(a: &Expr, b: &Expr) -> bool {
    match (a, b) {
        (
            Expr::Binary {
                op: a_op,
                left: a_left,
                right: a_right,
            },
            Expr::Binary {
                op: b_op,
                left: b_left,
                right: b_right,
            },
        ) => a_op == b_op && expr_eq(a_left, b_left) && expr_eq(a_right, b_right),
        (
            Expr::Bool {
                op: a_op,
                clauses: a_clauses,
            },
            Expr::Bool {
                op: b_op,
                clauses: b_clauses,
            },
        ) => {
            a_op == b_op
                && a_clauses.len() == b_clauses.len()
                && a_clauses.iter().zip(b_clauses).all(|(x, y)| expr_eq(x, y))
        }
        (
            Expr::Unary {
                op: a_op,
                operand: a_operand,
            },
            Expr::Unary {
                op: b_op,
                operand: b_operand,
            },
        ) => a_op == b_op && expr_eq(a_operand, b_operand),
        (
            Expr::Func {
                name: a_name,
                args: a_args,
            },
            Expr::Func {
                name: b_name,
                args: b_args,
            },
        ) => {
            a_name == b_name
                && a_args.len() == b_args.len()
                && a_args.iter().zip(b_args).all(|(x, y)| expr_eq(x, y))
        }
        (Expr::Column(a_name), Expr::Column(b_name)) => a_name == b_name,
        (Expr::Value(a_value), Expr::Value(b_value)) => a_value == b_value,
        _ => false,
    }
}

/// Structural equality of two call arguments.
///
/// [`Arg::Any`] on either side matches anything. Nested lists and maps
/// recurse; expressions compare via [`expr_eq`]; plain values by
/// equality; mismatched kinds are not equal.
pub fn arg_eq(a: &Arg, b: &Arg) -> bool {
    match (a, b) {
        (Arg::Any, _) | (_, Arg::Any) => true,
        (Arg::Expr(x), Arg::Expr(y)) => expr_eq(x, y),
        (Arg::Value(x), Arg::Value(y)) => x == y,
        (Arg::List(x), Arg::List(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(i, j)| arg_eq(i, j))
        }
        (Arg::Map(x), Arg::Map(y)) => kwargs_eq(x, y),
        _ => false,
    }
}

fn kwargs_eq(a: &Kwargs, b: &Kwargs) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| arg_eq(value, other)))
}

/// Structural equality of two recorded calls: same name, pairwise-equal
/// positional arguments, and keyword arguments equal key by key.
pub fn call_eq(a: &CallRecord, b: &CallRecord) -> bool {
    a.name == b.name
        && a.args.len() == b.args.len()
        && a.args.iter().zip(&b.args).all(|(x, y)| arg_eq(x, y))
        && kwargs_eq(&a.kwargs, &b.kwargs)
}

/// Structural equality of two call chains: equal length, equal names in
/// order, pairwise-equal arguments.
pub fn chain_eq(a: &[CallRecord], b: &[CallRecord]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| call_eq(x, y))
}

/// Whether `pattern` is a pairwise-equal prefix of `chain`.
pub fn chain_prefix(pattern: &[CallRecord], chain: &[CallRecord]) -> bool {
    pattern.len() <= chain.len() && pattern.iter().zip(chain).all(|(x, y)| call_eq(x, y))
}

/// Wrapper pairing one expression with the structural equality relation.
///
/// `ExprMatcher` compares equal to raw expressions and to other matchers,
/// unwrapping before the structural comparison, so either side of an
/// assertion may be wrapped:
///
/// ```
/// use sham_expr::col;
/// use sham_session::ExprMatcher;
///
/// let matcher = ExprMatcher::new(col("age").gt(21));
/// assert!(matcher == col("age").gt(21));
/// assert!(matcher != col("age").lt(21));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExprMatcher {
    expr: Expr,
}

impl ExprMatcher {
    pub fn new(expr: Expr) -> Self {
        ExprMatcher { expr }
    }

    /// The wrapped expression.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Structural comparison against a raw expression.
    pub fn matches(&self, other: &Expr) -> bool {
        expr_eq(&self.expr, other)
    }
}

impl From<Expr> for ExprMatcher {
    fn from(expr: Expr) -> Self {
        ExprMatcher::new(expr)
    }
}

impl PartialEq for ExprMatcher {
    fn eq(&self, other: &Self) -> bool {
        expr_eq(&self.expr, &other.expr)
    }
}

impl PartialEq<Expr> for ExprMatcher {
    fn eq(&self, other: &Expr) -> bool {
        expr_eq(&self.expr, other)
    }
}

impl PartialEq<ExprMatcher> for Expr {
    fn eq(&self, other: &ExprMatcher) -> bool {
        expr_eq(self, &other.expr)
    }
}

impl fmt::Display for ExprMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::any;
    use sham_expr::{all_of, any_of, col, func, lit, Value};

    #[test]
    fn test_identical_binary_trees_match() {
        let a = col("name").eq("ann");
        let b = col("name").eq("ann");
        assert!(expr_eq(&a, &b));
    }

    #[test]
    fn test_operator_difference_breaks_match() {
        assert!(!expr_eq(&col("age").gt(21), &col("age").lt(21)));
        assert!(!expr_eq(&col("age").gt(21), &col("age").ge(21)));
    }

    #[test]
    fn test_operand_difference_breaks_match() {
        assert!(!expr_eq(&col("age").gt(21), &col("age").gt(22)));
        assert!(!expr_eq(&col("age").gt(21), &col("height").gt(21)));
    }

    #[test]
    fn test_boolean_clause_order_matters() {
        let a = any_of([col("x").eq(1), col("y").eq(2)]);
        let b = any_of([col("y").eq(2), col("x").eq(1)]);
        assert!(!expr_eq(&a, &b));
        assert!(expr_eq(&a, &a.clone()));
    }

    #[test]
    fn test_boolean_clause_count_matters() {
        let a = all_of([col("x").eq(1)]);
        let b = all_of([col("x").eq(1), col("y").eq(2)]);
        assert!(!expr_eq(&a, &b));
    }

    #[test]
    fn test_function_calls_compare_name_and_args() {
        assert!(expr_eq(
            &func("lower", [col("name")]),
            &func("lower", [col("name")]),
        ));
        assert!(!expr_eq(
            &func("lower", [col("name")]),
            &func("upper", [col("name")]),
        ));
        assert!(!expr_eq(
            &func("lower", [col("name")]),
            &func("lower", [col("email")]),
        ));
    }

    #[test]
    fn test_mismatched_kinds_are_not_equal() {
        assert!(!expr_eq(&col("x"), &lit(5)));
        assert!(!expr_eq(&col("x").eq(5), &col("x")));
        assert!(!expr_eq(&all_of([col("x").eq(5)]), &col("x").eq(5)));
    }

    #[test]
    fn test_unary_matching() {
        assert!(expr_eq(&col("age").desc(), &col("age").desc()));
        assert!(!expr_eq(&col("age").desc(), &col("age").asc()));
        assert!(!expr_eq(&col("age").is_null(), &col("age").is_not_null()));
    }

    #[test]
    fn test_leaf_value_equality() {
        assert!(expr_eq(&lit(5), &lit(5)));
        assert!(!expr_eq(&lit(5), &lit("5")));
        assert!(expr_eq(
            &Expr::Value(Value::Null),
            &Expr::Value(Value::Null)
        ));
    }

    #[test]
    fn test_matcher_wrapping_both_sides() {
        let e = col("state").is_in(["open", "closed"]);
        let matcher = ExprMatcher::new(e.clone());
        assert!(matcher == e);
        assert!(e == matcher);
        assert!(matcher == ExprMatcher::new(col("state").is_in(["open", "closed"])));
        assert!(matcher != col("state").is_in(["closed", "open"]));
    }

    #[test]
    fn test_any_wildcard_in_args() {
        assert!(arg_eq(&any(), &Arg::from(col("x").eq(1))));
        assert!(arg_eq(&Arg::from("literal"), &any()));
        assert!(arg_eq(&any(), &any()));
    }

    #[test]
    fn test_nested_arg_containers() {
        let a = Arg::List(vec![Arg::from(col("x").eq(1)), Arg::from(5)]);
        let b = Arg::List(vec![Arg::from(col("x").eq(1)), Arg::from(5)]);
        let c = Arg::List(vec![Arg::from(5), Arg::from(col("x").eq(1))]);
        assert!(arg_eq(&a, &b));
        assert!(!arg_eq(&a, &c));
        assert!(!arg_eq(&a, &Arg::from(5)));
    }

    #[test]
    fn test_call_eq_checks_name_args_kwargs() {
        let a = CallRecord::new("filter", vec![col("x").eq(1).into()]);
        let b = CallRecord::new("filter", vec![col("x").eq(1).into()]);
        let c = CallRecord::new("filter_by", vec![col("x").eq(1).into()]);
        assert!(call_eq(&a, &b));
        assert!(!call_eq(&a, &c));

        let with_kw = CallRecord::with_kwargs(
            "filter_by",
            Vec::new(),
            [("name".to_string(), Arg::from("ann"))].into_iter().collect(),
        );
        let without_kw = CallRecord::new("filter_by", Vec::new());
        assert!(!call_eq(&with_kw, &without_kw));
    }

    #[test]
    fn test_chain_prefix() {
        let query = CallRecord::new("query", vec!["user".into()]);
        let filter = CallRecord::new("filter", vec![col("x").eq(1).into()]);
        let order = CallRecord::new("order_by", vec![col("x").desc().into()]);

        let chain = vec![query.clone(), filter.clone(), order];
        assert!(chain_prefix(&[query.clone(), filter.clone()], &chain));
        assert!(chain_prefix(&chain.clone(), &chain));
        assert!(!chain_prefix(&[filter, query], &chain));
    }
}

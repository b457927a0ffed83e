//! Query expression trees and the builder API that produces them.
//!
//! An [`Expr`] is a plain syntax tree: building one never touches a
//! database and comparing two only ever inspects their shape. The node
//! kinds mirror what a SQL query builder emits: binary comparisons,
//! n-ary boolean combinations, unary operations, function calls, column
//! references, and literals.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    In,
}

impl BinOp {
    fn symbol(self) -> &'static str {
        match self {
            BinOp::Eq => "=",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Like => "LIKE",
            BinOp::In => "IN",
        }
    }
}

/// Boolean combination operator for n-ary clause lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoolOp {
    And,
    Or,
}

/// Unary operator (negation, ordering direction, null checks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnOp {
    Not,
    Asc,
    Desc,
    IsNull,
    IsNotNull,
}

/// A query expression tree.
///
/// Clause order in a [`Expr::Bool`] node is part of the shape: `AND(a, b)`
/// and `AND(b, a)` are different trees.
///
/// Note that `==` on two expressions is the derived comparison; the
/// comparison methods on `Expr` (`eq`, `lt`, ...) build new trees instead,
/// the way a query builder's column DSL does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Expr {
    /// Binary comparison such as `"age" > 21`.
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// N-ary boolean combination such as `AND(a, b, c)`.
    Bool { op: BoolOp, clauses: Vec<Expr> },
    /// Unary operation such as `"age" DESC` or `NOT x`.
    Unary { op: UnOp, operand: Box<Expr> },
    /// Function call such as `lower("name")`.
    Func { name: String, args: Vec<Expr> },
    /// Column reference, identified by name.
    Column(String),
    /// Literal value.
    Value(Value),
}

/// Reference a column by name.
pub fn col(name: impl Into<String>) -> Expr {
    Expr::Column(name.into())
}

/// Wrap a literal value as an expression.
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Value(value.into())
}

/// Build a function-call expression such as `lower("name")`.
pub fn func(name: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Func {
        name: name.into(),
        args: args.into_iter().collect(),
    }
}

/// Combine clauses with `AND`, preserving their order.
pub fn all_of(clauses: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Bool {
        op: BoolOp::And,
        clauses: clauses.into_iter().collect(),
    }
}

/// Combine clauses with `OR`, preserving their order.
pub fn any_of(clauses: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Bool {
        op: BoolOp::Or,
        clauses: clauses.into_iter().collect(),
    }
}

impl Expr {
    fn binary(self, op: BinOp, right: impl Into<Expr>) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(self),
            right: Box::new(right.into()),
        }
    }

    /// `self = other`
    pub fn eq(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinOp::Eq, other)
    }

    /// `self != other`
    pub fn ne(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinOp::Ne, other)
    }

    /// `self < other`
    pub fn lt(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinOp::Lt, other)
    }

    /// `self <= other`
    pub fn le(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinOp::Le, other)
    }

    /// `self > other`
    pub fn gt(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinOp::Gt, other)
    }

    /// `self >= other`
    pub fn ge(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinOp::Ge, other)
    }

    /// `self LIKE pattern`
    pub fn like(self, pattern: impl Into<Expr>) -> Expr {
        self.binary(BinOp::Like, pattern)
    }

    /// `self IN (values...)`
    pub fn is_in<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Expr {
        let list = Value::List(values.into_iter().map(Into::into).collect());
        self.binary(BinOp::In, Expr::Value(list))
    }

    /// Combine with `AND`. Extends the clause list in place when `self` is
    /// already an `AND` node, so `a.and(b).and(c)` builds `AND(a, b, c)`.
    pub fn and(self, other: Expr) -> Expr {
        match self {
            Expr::Bool {
                op: BoolOp::And,
                mut clauses,
            } => {
                clauses.push(other);
                Expr::Bool {
                    op: BoolOp::And,
                    clauses,
                }
            }
            left => all_of([left, other]),
        }
    }

    /// Combine with `OR`. Extends the clause list in place when `self` is
    /// already an `OR` node.
    pub fn or(self, other: Expr) -> Expr {
        match self {
            Expr::Bool {
                op: BoolOp::Or,
                mut clauses,
            } => {
                clauses.push(other);
                Expr::Bool {
                    op: BoolOp::Or,
                    clauses,
                }
            }
            left => any_of([left, other]),
        }
    }

    fn unary(self, op: UnOp) -> Expr {
        Expr::Unary {
            op,
            operand: Box::new(self),
        }
    }

    /// `NOT self`
    pub fn not_(self) -> Expr {
        self.unary(UnOp::Not)
    }

    /// `self ASC`
    pub fn asc(self) -> Expr {
        self.unary(UnOp::Asc)
    }

    /// `self DESC`
    pub fn desc(self) -> Expr {
        self.unary(UnOp::Desc)
    }

    /// `self IS NULL`
    pub fn is_null(self) -> Expr {
        self.unary(UnOp::IsNull)
    }

    /// `self IS NOT NULL`
    pub fn is_not_null(self) -> Expr {
        self.unary(UnOp::IsNotNull)
    }
}

impl From<Value> for Expr {
    fn from(v: Value) -> Self {
        Expr::Value(v)
    }
}

impl From<&str> for Expr {
    fn from(v: &str) -> Self {
        Expr::Value(v.into())
    }
}

impl From<String> for Expr {
    fn from(v: String) -> Self {
        Expr::Value(v.into())
    }
}

impl From<i64> for Expr {
    fn from(v: i64) -> Self {
        Expr::Value(v.into())
    }
}

impl From<i32> for Expr {
    fn from(v: i32) -> Self {
        Expr::Value(v.into())
    }
}

impl From<u32> for Expr {
    fn from(v: u32) -> Self {
        Expr::Value(v.into())
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Value(v.into())
    }
}

impl From<bool> for Expr {
    fn from(v: bool) -> Self {
        Expr::Value(v.into())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary { op, left, right } => {
                write!(f, "{left} {} {right}", op.symbol())
            }
            Expr::Bool { op, clauses } => {
                let sep = match op {
                    BoolOp::And => " AND ",
                    BoolOp::Or => " OR ",
                };
                write!(f, "(")?;
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{sep}")?;
                    }
                    write!(f, "{clause}")?;
                }
                write!(f, ")")
            }
            Expr::Unary { op, operand } => match op {
                UnOp::Not => write!(f, "NOT {operand}"),
                UnOp::Asc => write!(f, "{operand} ASC"),
                UnOp::Desc => write!(f, "{operand} DESC"),
                UnOp::IsNull => write!(f, "{operand} IS NULL"),
                UnOp::IsNotNull => write!(f, "{operand} IS NOT NULL"),
            },
            Expr::Func { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Expr::Column(name) => write!(f, "\"{name}\""),
            Expr::Value(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_builders() {
        let e = col("age").gt(21);
        assert_eq!(
            e,
            Expr::Binary {
                op: BinOp::Gt,
                left: Box::new(Expr::Column("age".to_string())),
                right: Box::new(Expr::Value(Value::Int(21))),
            }
        );

        let e = col("name").eq("ann");
        assert_eq!(
            e,
            Expr::Binary {
                op: BinOp::Eq,
                left: Box::new(Expr::Column("name".to_string())),
                right: Box::new(Expr::Value(Value::Str("ann".to_string()))),
            }
        );
    }

    #[test]
    fn test_in_list() {
        let e = col("state").is_in(["open", "closed"]);
        match e {
            Expr::Binary { op, right, .. } => {
                assert_eq!(op, BinOp::In);
                assert_eq!(
                    *right,
                    Expr::Value(Value::List(vec![
                        Value::Str("open".to_string()),
                        Value::Str("closed".to_string()),
                    ]))
                );
            }
            other => panic!("expected binary IN, got {other:?}"),
        }
    }

    #[test]
    fn test_and_flattens_left_nested() {
        let e = col("a").eq(1).and(col("b").eq(2)).and(col("c").eq(3));
        match e {
            Expr::Bool { op, clauses } => {
                assert_eq!(op, BoolOp::And);
                assert_eq!(clauses.len(), 3);
            }
            other => panic!("expected AND clause list, got {other:?}"),
        }
    }

    #[test]
    fn test_any_of_preserves_order() {
        let e = any_of([col("x").eq(1), col("x").eq(2)]);
        let flipped = any_of([col("x").eq(2), col("x").eq(1)]);
        assert_ne!(e, flipped);
    }

    #[test]
    fn test_display() {
        assert_eq!(col("age").gt(21).to_string(), r#""age" > 21"#);
        assert_eq!(
            all_of([col("a").eq(1), col("b").ne("x")]).to_string(),
            r#"("a" = 1 AND "b" != 'x')"#
        );
        assert_eq!(
            func("lower", [col("name")]).to_string(),
            r#"lower("name")"#
        );
        assert_eq!(col("age").desc().to_string(), r#""age" DESC"#);
        assert_eq!(col("age").is_null().to_string(), r#""age" IS NULL"#);
        assert_eq!(
            col("state").is_in([1, 2]).to_string(),
            r#""state" IN (1, 2)"#
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let e = all_of([col("a").eq(1), func("lower", [col("b")]).eq("x")]);
        let json = serde_json::to_string(&e).unwrap();
        let back: Expr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}

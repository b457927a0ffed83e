//! Call arguments and the conversions that build them.
//!
//! Recorded calls carry positional arguments ([`Arg`]) and keyword
//! arguments ([`Kwargs`]). An argument is either a plain value, an
//! expression tree, a nested container of arguments, or the [`Arg::Any`]
//! wildcard used in registration patterns and assertions.

use serde::{Deserialize, Serialize};
use sham_expr::{Expr, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Keyword arguments of a call, ordered by key.
pub type Kwargs = BTreeMap<String, Arg>;

/// A single positional or keyword argument of a recorded call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Arg {
    /// Plain value, compared by equality.
    Value(Value),
    /// Expression tree, compared structurally.
    Expr(Expr),
    /// Ordered list of arguments, compared pairwise.
    List(Vec<Arg>),
    /// Keyed arguments, compared key by key.
    Map(BTreeMap<String, Arg>),
    /// Wildcard that compares equal to any argument.
    Any,
}

/// Wildcard argument, usable anywhere an argument is expected.
pub fn any() -> Arg {
    Arg::Any
}

impl From<Expr> for Arg {
    fn from(e: Expr) -> Self {
        Arg::Expr(e)
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Value(v.into())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Value(v.into())
    }
}

impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        Arg::Value(v.into())
    }
}

impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        Arg::Value(v.into())
    }
}

impl From<u32> for Arg {
    fn from(v: u32) -> Self {
        Arg::Value(v.into())
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Value(v.into())
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Value(v.into())
    }
}

impl From<Vec<Arg>> for Arg {
    fn from(items: Vec<Arg>) -> Self {
        Arg::List(items)
    }
}

// Tuples become argument lists, which is how composite primary keys are
// recorded by `get`.
impl<A: Into<Arg>, B: Into<Arg>> From<(A, B)> for Arg {
    fn from((a, b): (A, B)) -> Self {
        Arg::List(vec![a.into(), b.into()])
    }
}

impl<A: Into<Arg>, B: Into<Arg>, C: Into<Arg>> From<(A, B, C)> for Arg {
    fn from((a, b, c): (A, B, C)) -> Self {
        Arg::List(vec![a.into(), b.into(), c.into()])
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Value(v) => write!(f, "{v}"),
            Arg::Expr(e) => write!(f, "{e}"),
            Arg::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Arg::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Arg::Any => write!(f, "ANY"),
        }
    }
}

/// Conversion into a positional-argument list.
///
/// Implemented for single arguments, expressions, and homogeneous
/// collections, so call sites read naturally:
/// `chain.filter(col("a").eq(1))` or
/// `chain.filter([col("a").eq(1), col("b").eq(2)])`.
pub trait IntoArgs {
    fn into_args(self) -> Vec<Arg>;
}

impl IntoArgs for () {
    fn into_args(self) -> Vec<Arg> {
        Vec::new()
    }
}

impl IntoArgs for Arg {
    fn into_args(self) -> Vec<Arg> {
        vec![self]
    }
}

impl IntoArgs for Expr {
    fn into_args(self) -> Vec<Arg> {
        vec![self.into()]
    }
}

impl IntoArgs for Value {
    fn into_args(self) -> Vec<Arg> {
        vec![self.into()]
    }
}

impl IntoArgs for &str {
    fn into_args(self) -> Vec<Arg> {
        vec![self.into()]
    }
}

impl IntoArgs for String {
    fn into_args(self) -> Vec<Arg> {
        vec![self.into()]
    }
}

impl IntoArgs for i64 {
    fn into_args(self) -> Vec<Arg> {
        vec![self.into()]
    }
}

impl IntoArgs for i32 {
    fn into_args(self) -> Vec<Arg> {
        vec![self.into()]
    }
}

impl IntoArgs for bool {
    fn into_args(self) -> Vec<Arg> {
        vec![self.into()]
    }
}

impl IntoArgs for Vec<Arg> {
    fn into_args(self) -> Vec<Arg> {
        self
    }
}

impl IntoArgs for Vec<Expr> {
    fn into_args(self) -> Vec<Arg> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Arg>, const N: usize> IntoArgs for [T; N] {
    fn into_args(self) -> Vec<Arg> {
        self.into_iter().map(Into::into).collect()
    }
}

/// Conversion into a keyword-argument map.
///
/// Implemented for pair collections so call sites read like keyword
/// arguments: `chain.filter_by([("name", "ann"), ("active", true)])`.
/// Duplicate keys keep the last value.
pub trait IntoKwargs {
    fn into_kwargs(self) -> Kwargs;
}

impl IntoKwargs for () {
    fn into_kwargs(self) -> Kwargs {
        Kwargs::new()
    }
}

impl IntoKwargs for Kwargs {
    fn into_kwargs(self) -> Kwargs {
        self
    }
}

impl<K: Into<String>, V: Into<Arg>, const N: usize> IntoKwargs for [(K, V); N] {
    fn into_kwargs(self) -> Kwargs {
        self.into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<Arg>> IntoKwargs for Vec<(K, V)> {
    fn into_kwargs(self) -> Kwargs {
        self.into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect()
    }
}

//! Typed query-expression trees for mocking fluent query APIs.
//!
//! This crate provides the expression object model consumed by
//! `sham-session`:
//!
//! - [`Expr`]: the tree (binary comparisons, n-ary boolean combinations,
//!   unary operations, function calls, column references, literals)
//! - [`Value`]: literal leaf values
//! - builder functions ([`col`], [`lit`], [`func`], [`all_of`], [`any_of`])
//!   and comparison methods on [`Expr`]
//!
//! Expressions are inert data. Nothing here parses SQL or talks to a
//! database; the trees exist to be recorded and structurally compared.
//!
//! # Example
//!
//! ```
//! use sham_expr::{col, any_of};
//!
//! let criteria = any_of([col("state").eq("open"), col("owner").is_null()]);
//! assert_eq!(criteria.to_string(), r#"("state" = 'open' OR "owner" IS NULL)"#);
//! ```

mod expr;
mod value;

pub use expr::{all_of, any_of, col, func, lit, BinOp, BoolOp, Expr, UnOp};
pub use value::Value;

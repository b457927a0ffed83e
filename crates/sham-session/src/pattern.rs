//! Constructors for stub-registration criteria patterns.
//!
//! A registration pattern is an ordered list of [`CallRecord`]s mirroring
//! the calls a test is expected to make:
//!
//! ```
//! use sham_expr::col;
//! use sham_session::pattern;
//!
//! let criteria = [
//!     pattern::query("user"),
//!     pattern::filter(col("name").eq("ann")),
//! ];
//! # assert_eq!(criteria[0].name, "query");
//! ```
//!
//! Call names without a dedicated constructor (`join`, `options`,
//! `group_by`, ...) are built with [`call`] or [`call_with`].

use crate::arg::{Arg, IntoArgs, IntoKwargs};
use crate::record::CallRecord;

/// Arbitrary named call.
pub fn call(name: impl Into<String>, args: impl IntoArgs) -> CallRecord {
    CallRecord::new(name, args.into_args())
}

/// Arbitrary named call with keyword arguments.
pub fn call_with(
    name: impl Into<String>,
    args: impl IntoArgs,
    kwargs: impl IntoKwargs,
) -> CallRecord {
    CallRecord::with_kwargs(name, args.into_args(), kwargs.into_kwargs())
}

/// `query(target)`
pub fn query(target: impl Into<Arg>) -> CallRecord {
    CallRecord::new("query", vec![target.into()])
}

/// `filter(criteria...)`
pub fn filter(criteria: impl IntoArgs) -> CallRecord {
    call("filter", criteria)
}

/// `filter_by(key=value, ...)`
pub fn filter_by(kwargs: impl IntoKwargs) -> CallRecord {
    call_with("filter_by", (), kwargs)
}

/// `order_by(criteria...)`
pub fn order_by(criteria: impl IntoArgs) -> CallRecord {
    call("order_by", criteria)
}

/// `limit(n)`
pub fn limit(n: usize) -> CallRecord {
    call("limit", Arg::from(n as i64))
}

/// `offset(n)`
pub fn offset(n: usize) -> CallRecord {
    call("offset", Arg::from(n as i64))
}

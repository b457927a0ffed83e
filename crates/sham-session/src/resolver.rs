//! Stub registrations and resolution of canonical chains against them.

use crate::arg::Arg;
use crate::matcher::{chain_eq, chain_prefix};
use crate::record::CallRecord;
use crate::unify::{unify_calls, UnifyConfig};
use sham_expr::Value;
use tracing::debug;

/// Call names that slice the result window instead of narrowing criteria.
const WINDOW_CALLS: &[&str] = &["limit", "offset"];

/// One stub registration: an expected criteria chain and the rows it
/// yields.
#[derive(Debug, Clone)]
pub struct Stub<T> {
    criteria: Vec<CallRecord>,
    rows: Vec<T>,
}

impl<T> Stub<T> {
    pub fn new(
        criteria: impl IntoIterator<Item = CallRecord>,
        rows: impl IntoIterator<Item = T>,
    ) -> Self {
        Stub {
            criteria: criteria.into_iter().collect(),
            rows: rows.into_iter().collect(),
        }
    }

    pub fn criteria(&self) -> &[CallRecord] {
        &self.criteria
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }
}

/// Outcome of matching a canonical chain against the registration table.
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'a, T> {
    /// A registration matched; its rows apply.
    Stubbed(&'a [T]),
    /// No registration matched. Not an error; the caller applies its
    /// generic default.
    Unconfigured,
}

impl<T> Resolution<'_, T> {
    pub fn is_stubbed(&self) -> bool {
        matches!(self, Resolution::Stubbed(_))
    }
}

/// Select the registration for a criteria chain.
///
/// Registrations are tried in the order given; the first whose unified
/// pattern equals the chain wins. When no exact match exists, the first
/// registration whose pattern is a pairwise-equal proper prefix of the
/// chain wins instead, which lets a chain decorated with extra trailing
/// calls (an `order_by`, say) reuse an undecorated registration. With no
/// match at all the resolution is [`Resolution::Unconfigured`].
pub fn resolve<'a, T>(
    stubs: &'a [Stub<T>],
    chain: &[CallRecord],
    config: &UnifyConfig,
) -> Resolution<'a, T> {
    let patterns: Vec<Vec<CallRecord>> = stubs
        .iter()
        .map(|stub| unify_calls(stub.criteria(), config))
        .collect();

    for (index, pattern) in patterns.iter().enumerate() {
        if chain_eq(pattern, chain) {
            debug!("stub {index} matched the call chain exactly");
            return Resolution::Stubbed(stubs[index].rows());
        }
    }

    for (index, pattern) in patterns.iter().enumerate() {
        if pattern.len() < chain.len() && chain_prefix(pattern, chain) {
            debug!("stub {index} matched a prefix of the call chain");
            return Resolution::Stubbed(stubs[index].rows());
        }
    }

    debug!("no stub matched the call chain, falling back to default rows");
    Resolution::Unconfigured
}

/// Slicing window accumulated from trailing `limit`/`offset` calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl Window {
    /// Apply the window to a row sequence: skip `offset` rows, then take
    /// at most `limit`. Saturates instead of failing when the sequence is
    /// shorter than the window.
    pub fn apply<T: Clone>(&self, rows: &[T]) -> Vec<T> {
        rows.iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}

/// Split the trailing `limit`/`offset` run off a canonical chain.
///
/// Those calls select a window over the stubbed rows rather than being
/// criteria, so they are stripped before registration matching. Repeated
/// window calls keep the last value for each of `limit` and `offset`.
pub fn split_window(chain: &[CallRecord]) -> (&[CallRecord], Window) {
    let mut start = chain.len();
    while start > 0 && WINDOW_CALLS.contains(&chain[start - 1].name.as_str()) {
        start -= 1;
    }

    let mut window = Window::default();
    for record in &chain[start..] {
        match record.name.as_str() {
            "limit" => window.limit = first_int_arg(record),
            "offset" => window.offset = first_int_arg(record).unwrap_or(0),
            _ => {}
        }
    }
    (&chain[..start], window)
}

fn first_int_arg(record: &CallRecord) -> Option<usize> {
    match record.args.first() {
        Some(Arg::Value(Value::Int(n))) => Some((*n).max(0) as usize),
        _ => None,
    }
}

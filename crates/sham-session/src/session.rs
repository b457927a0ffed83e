//! The mocked session: chain recording, terminal operations, assertions.
//!
//! [`MockSession`] is the root stand-in for a fluent query session. Every
//! chained call on it (or on any [`QueryChain`] derived from it) appends
//! to one shared call log; terminal operations unify the current chain
//! segment and resolve it against the registered stubs.

use crate::arg::{Arg, IntoArgs, IntoKwargs, Kwargs};
use crate::error::SessionError;
use crate::matcher::call_eq;
use crate::record::{CallLog, CallRecord};
use crate::resolver::{resolve, split_window, Resolution, Stub};
use crate::unify::{unify_calls, UnifyConfig};
use std::rc::Rc;
use tracing::trace;

/// Call names that end a chain and produce a concrete result.
const BOUNDARY_CALLS: &[&str] = &["all", "first", "one", "get", "count", "iter"];

/// Row type with a primary-key identity, required by [`QueryChain::get`].
pub trait Entity {
    type Key: PartialEq + Clone + Into<Arg>;

    fn primary_key(&self) -> Self::Key;
}

#[derive(Debug)]
struct SessionInner<T> {
    log: CallLog,
    stubs: Vec<Stub<T>>,
    config: UnifyConfig,
    default_rows: Vec<T>,
}

/// Mock of a fluent query session.
///
/// Stubs are registered at construction and immutable afterwards; driving
/// the mock through `query(...).filter(...)...` records every call, and a
/// terminal operation (`all`, `first`, `one`, `get`, `count`, iteration)
/// resolves the accumulated chain against the registrations. Chains that
/// match no registration fall back to the default rows (empty unless
/// configured) instead of failing: stubbing is opt-in.
///
/// # Example
///
/// ```
/// use sham_expr::col;
/// use sham_session::{pattern, MockSession};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct User {
///     id: i64,
///     name: &'static str,
/// }
///
/// let ann = User { id: 1, name: "ann" };
/// let session = MockSession::builder()
///     .stub(
///         [
///             pattern::query("user"),
///             pattern::filter([col("name").eq("ann"), col("active").eq(true)]),
///         ],
///         [ann.clone()],
///     )
///     .build();
///
/// // Split across two filter calls, but it is the same logical chain.
/// let rows = session
///     .query("user")
///     .filter(col("name").eq("ann"))
///     .filter(col("active").eq(true))
///     .all();
/// assert_eq!(rows, vec![ann]);
///
/// let rows = session.query("user").filter(col("name").eq("bob")).all();
/// assert!(rows.is_empty());
/// ```
pub struct MockSession<T> {
    inner: Rc<SessionInner<T>>,
}

impl<T> Clone for MockSession<T> {
    fn clone(&self) -> Self {
        MockSession {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone> Default for MockSession<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> MockSession<T> {
    /// Session with no stubs: every terminal falls back to empty results.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> SessionBuilder<T> {
        SessionBuilder::default()
    }

    /// The root chain node.
    pub fn chain(&self) -> QueryChain<T> {
        QueryChain {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Start a query chain: records `query(target)`.
    pub fn query(&self, target: impl Into<Arg>) -> QueryChain<T> {
        self.chain().query(target)
    }

    /// Record an arbitrary call on the session itself (`add`, `commit`,
    /// `delete`, ...) and keep chaining.
    pub fn call(&self, name: &str, args: impl IntoArgs) -> QueryChain<T> {
        self.chain().call(name, args)
    }

    /// Snapshot of the raw call log, in recording order.
    pub fn calls(&self) -> Vec<CallRecord> {
        self.inner.log.snapshot()
    }

    /// The canonical chain: the call log after unification.
    pub fn canonical_calls(&self) -> Vec<CallRecord> {
        unify_calls(&self.inner.log.snapshot(), &self.inner.config)
    }

    /// Number of canonical calls with the given name.
    pub fn call_count(&self, name: &str) -> usize {
        self.canonical_calls()
            .iter()
            .filter(|record| record.name == name)
            .count()
    }

    /// Whether a canonical call with this name and these positional
    /// arguments was made. Wildcard arguments match anything recorded.
    pub fn was_called_with(&self, name: &str, args: impl IntoArgs) -> bool {
        self.was_called_with_kwargs(name, args, ())
    }

    /// Like [`Self::was_called_with`], with keyword arguments included in
    /// the comparison.
    pub fn was_called_with_kwargs(
        &self,
        name: &str,
        args: impl IntoArgs,
        kwargs: impl IntoKwargs,
    ) -> bool {
        let expected = CallRecord::with_kwargs(name, args.into_args(), kwargs.into_kwargs());
        self.canonical_calls()
            .iter()
            .any(|record| call_eq(record, &expected))
    }

    /// Panic unless a matching canonical call was made. The panic message
    /// prints the expected call and the canonical chain recorded so far.
    pub fn assert_any_call(&self, name: &str, args: impl IntoArgs) {
        let expected = CallRecord::new(name, args.into_args());
        let canonical = self.canonical_calls();
        if !canonical.iter().any(|record| call_eq(record, &expected)) {
            let recorded: Vec<String> = canonical
                .iter()
                .map(|record| format!("  {record}"))
                .collect();
            panic!(
                "expected call not found: {expected}\nrecorded calls:\n{}",
                recorded.join("\n"),
            );
        }
    }
}

/// Builder for [`MockSession`].
pub struct SessionBuilder<T> {
    stubs: Vec<Stub<T>>,
    config: UnifyConfig,
    default_rows: Vec<T>,
}

impl<T> Default for SessionBuilder<T> {
    fn default() -> Self {
        SessionBuilder {
            stubs: Vec::new(),
            config: UnifyConfig::default(),
            default_rows: Vec::new(),
        }
    }
}

impl<T> SessionBuilder<T> {
    /// Register a stub: an expected criteria chain and the rows it
    /// yields. Registrations are matched in registration order.
    pub fn stub(
        mut self,
        criteria: impl IntoIterator<Item = CallRecord>,
        rows: impl IntoIterator<Item = T>,
    ) -> Self {
        self.stubs.push(Stub::new(criteria, rows));
        self
    }

    /// Add a call name to the unify set (default: `filter`, `filter_by`).
    pub fn unify_call(mut self, name: impl Into<String>) -> Self {
        self.config = self.config.unify_call(name);
        self
    }

    /// Replace the unify configuration wholesale.
    pub fn unify_config(mut self, config: UnifyConfig) -> Self {
        self.config = config;
        self
    }

    /// Rows returned by terminals when no registration matches
    /// (default: none).
    pub fn default_rows(mut self, rows: impl IntoIterator<Item = T>) -> Self {
        self.default_rows = rows.into_iter().collect();
        self
    }

    pub fn build(self) -> MockSession<T> {
        MockSession {
            inner: Rc::new(SessionInner {
                log: CallLog::new(),
                stubs: self.stubs,
                config: self.config,
                default_rows: self.default_rows,
            }),
        }
    }
}

/// A chain node: the stand-in for "the result of the previous call".
///
/// Cloning is cheap and every clone keeps writing into the same log as
/// the session it came from.
pub struct QueryChain<T> {
    inner: Rc<SessionInner<T>>,
}

impl<T> Clone for QueryChain<T> {
    fn clone(&self) -> Self {
        QueryChain {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone> QueryChain<T> {
    fn record(&self, name: &str, args: Vec<Arg>, kwargs: Kwargs) {
        let record = CallRecord::with_kwargs(name, args, kwargs);
        trace!("recording chained call {record}");
        self.inner.log.append(record);
    }

    /// Record an arbitrary call and keep chaining.
    pub fn call(&self, name: &str, args: impl IntoArgs) -> QueryChain<T> {
        self.record(name, args.into_args(), Kwargs::new());
        self.clone()
    }

    /// Record an arbitrary call with keyword arguments.
    pub fn call_with(
        &self,
        name: &str,
        args: impl IntoArgs,
        kwargs: impl IntoKwargs,
    ) -> QueryChain<T> {
        self.record(name, args.into_args(), kwargs.into_kwargs());
        self.clone()
    }

    pub fn query(&self, target: impl Into<Arg>) -> QueryChain<T> {
        self.call("query", [target.into()])
    }

    pub fn filter(&self, criteria: impl IntoArgs) -> QueryChain<T> {
        self.call("filter", criteria)
    }

    pub fn filter_by(&self, kwargs: impl IntoKwargs) -> QueryChain<T> {
        self.call_with("filter_by", (), kwargs)
    }

    pub fn order_by(&self, criteria: impl IntoArgs) -> QueryChain<T> {
        self.call("order_by", criteria)
    }

    pub fn join(&self, target: impl IntoArgs) -> QueryChain<T> {
        self.call("join", target)
    }

    pub fn options(&self, args: impl IntoArgs) -> QueryChain<T> {
        self.call("options", args)
    }

    pub fn group_by(&self, criteria: impl IntoArgs) -> QueryChain<T> {
        self.call("group_by", criteria)
    }

    pub fn limit(&self, n: usize) -> QueryChain<T> {
        self.call("limit", Arg::from(n as i64))
    }

    pub fn offset(&self, n: usize) -> QueryChain<T> {
        self.call("offset", Arg::from(n as i64))
    }

    /// All stubbed rows for the current chain.
    pub fn all(&self) -> Vec<T> {
        self.terminal("all", Vec::new())
    }

    /// First stubbed row, or `None` when the result is empty.
    pub fn first(&self) -> Option<T> {
        self.terminal("first", Vec::new()).into_iter().next()
    }

    /// Exactly one stubbed row, or an error distinguishing "no rows" from
    /// "multiple rows".
    pub fn one(&self) -> Result<T, SessionError> {
        let rows = self.terminal("one", Vec::new());
        let count = rows.len();
        let mut iter = rows.into_iter();
        match (iter.next(), count) {
            (Some(row), 1) => Ok(row),
            (None, _) => Err(SessionError::NoRowFound),
            (_, n) => Err(SessionError::MultipleRowsFound { count: n }),
        }
    }

    /// Number of stubbed rows for the current chain.
    pub fn count(&self) -> usize {
        self.terminal("count", Vec::new()).len()
    }

    /// Look up a stubbed row by primary key. `None` when absent.
    pub fn get(&self, key: T::Key) -> Option<T>
    where
        T: Entity,
    {
        let rows = self.terminal("get", vec![key.clone().into()]);
        rows.into_iter().find(|row| row.primary_key() == key)
    }

    fn terminal(&self, name: &str, args: Vec<Arg>) -> Vec<T> {
        self.record(name, args, Kwargs::new());
        let log = self.inner.log.snapshot();
        let segment = current_segment(&log);
        let canonical = unify_calls(segment, &self.inner.config);
        let (criteria, window) = split_window(&canonical);
        let rows = match resolve(&self.inner.stubs, criteria, &self.inner.config) {
            Resolution::Stubbed(rows) => rows,
            Resolution::Unconfigured => self.inner.default_rows.as_slice(),
        };
        window.apply(rows)
    }
}

// Terminal calls are chain boundaries: the criteria for a terminal are
// the calls made since the previous terminal, not the whole log.
fn current_segment(log: &[CallRecord]) -> &[CallRecord] {
    let end = log.len().saturating_sub(1);
    let start = log[..end]
        .iter()
        .rposition(|record| BOUNDARY_CALLS.contains(&record.name.as_str()))
        .map_or(0, |i| i + 1);
    &log[start..end]
}

impl<T: Clone> IntoIterator for QueryChain<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    /// Iterating a chain is a terminal operation, like `all()`.
    fn into_iter(self) -> Self::IntoIter {
        self.terminal("iter", Vec::new()).into_iter()
    }
}

impl<T: Clone> IntoIterator for &QueryChain<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.terminal("iter", Vec::new()).into_iter()
    }
}

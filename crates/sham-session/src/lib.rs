//! Call-chain unifying mock for fluent query sessions.
//!
//! This crate mocks APIs of the shape
//! `session.query(X).filter(Y).filter(Z).all()` without touching a
//! database. It records every chained call into one shared log, folds
//! contiguous same-named calls into a canonical chain, and resolves
//! terminal operations against stub registrations selected by structural
//! match of the accumulated criteria.
//!
//! # Module Structure
//!
//! - `matcher` - structural equality over expressions, args, and chains
//! - `record` - recorded calls and the shared call log
//! - `unify` - canonicalization of raw call logs
//! - `resolver` - stub registrations, matching, and result windows
//! - `session` - the session facade, chain nodes, terminal operations
//! - `pattern` - constructors for registration criteria
//! - `error` - single-row expectation errors
//!
//! # Example
//!
//! ```
//! use sham_expr::col;
//! use sham_session::{pattern, MockSession};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Order {
//!     id: i64,
//! }
//!
//! let session = MockSession::builder()
//!     .stub(
//!         [
//!             pattern::query("order"),
//!             pattern::filter([col("state").eq("open"), col("total").gt(100)]),
//!         ],
//!         [Order { id: 1 }, Order { id: 2 }],
//!     )
//!     .build();
//!
//! // Criteria split across chained calls unify before matching.
//! let rows = session
//!     .query("order")
//!     .filter(col("state").eq("open"))
//!     .filter(col("total").gt(100))
//!     .all();
//! assert_eq!(rows.len(), 2);
//!
//! // The canonical chain is inspectable for assertions.
//! assert_eq!(session.call_count("filter"), 1);
//! ```

mod arg;
mod error;
mod matcher;
pub mod pattern;
mod record;
mod resolver;
mod session;
mod unify;

pub use arg::{any, Arg, IntoArgs, IntoKwargs, Kwargs};
pub use error::SessionError;
pub use matcher::{arg_eq, call_eq, chain_eq, chain_prefix, expr_eq, ExprMatcher};
pub use record::{CallLog, CallRecord};
pub use resolver::{resolve, split_window, Resolution, Stub, Window};
pub use session::{Entity, MockSession, QueryChain, SessionBuilder};
pub use unify::{unify_calls, UnifyConfig};

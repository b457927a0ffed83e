//! Recorded calls and the shared call log.

use crate::arg::{Arg, Kwargs};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// One recorded call: name, positional arguments, keyword arguments.
///
/// Records are immutable once appended to a log; unification produces new
/// records instead of touching recorded ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Arg>,
    #[serde(default, skip_serializing_if = "Kwargs::is_empty")]
    pub kwargs: Kwargs,
}

impl CallRecord {
    /// Record with positional arguments only.
    pub fn new(name: impl Into<String>, args: Vec<Arg>) -> Self {
        Self::with_kwargs(name, args, Kwargs::new())
    }

    /// Record with positional and keyword arguments.
    pub fn with_kwargs(name: impl Into<String>, args: Vec<Arg>, kwargs: Kwargs) -> Self {
        CallRecord {
            name: name.into(),
            args,
            kwargs,
        }
    }
}

impl fmt::Display for CallRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        let mut first = true;
        for arg in &self.args {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{arg}")?;
        }
        for (key, value) in &self.kwargs {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{key}={value}")?;
        }
        write!(f, ")")
    }
}

/// Shared, append-only log of recorded calls.
///
/// Every chain node cloned from the same session root holds the same log
/// through a reference-counted handle, so the root can answer "what
/// calls, in total, were made" no matter which chained node the caller
/// actually drove. The log lives exactly as long as the session that
/// created it.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    records: Rc<RefCell<Vec<CallRecord>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Existing records are never mutated or removed.
    pub fn append(&self, record: CallRecord) {
        self.records.borrow_mut().push(record);
    }

    /// Copy of the log as it stands now, in recording order.
    pub fn snapshot(&self) -> Vec<CallRecord> {
        self.records.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

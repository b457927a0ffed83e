//! Canonicalization of raw call logs.
//!
//! A fluent chain often spreads one logical operation over several calls:
//! `filter(a).filter(b)` means the same as `filter(a, b)`. Unification
//! folds contiguous runs of same-named calls from a configurable set into
//! one canonical call, so registrations and assertions work against the
//! logical chain rather than the incidental call count.

use crate::record::CallRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which call names are merged when they appear contiguously.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifyConfig {
    /// Call names whose contiguous runs collapse into one canonical call.
    pub unify: BTreeSet<String>,
}

impl Default for UnifyConfig {
    fn default() -> Self {
        UnifyConfig::with_calls(["filter", "filter_by"])
    }
}

impl UnifyConfig {
    /// Config with exactly the given unify-set names.
    pub fn with_calls(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        UnifyConfig {
            unify: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a name to the unify set.
    pub fn unify_call(mut self, name: impl Into<String>) -> Self {
        self.unify.insert(name.into());
        self
    }

    pub fn is_unified(&self, name: &str) -> bool {
        self.unify.contains(name)
    }
}

/// Fold a raw call log into its canonical chain.
///
/// Scans in order, merging each contiguous run of same-named unify-set
/// calls into one record: positional arguments are concatenated in call
/// order; keyword arguments merge left to right, with later keys
/// overriding earlier ones on conflict. Calls outside the unify set pass
/// through unchanged, and also break any open run.
///
/// The fold is idempotent, and running it on a prefix of a log yields a
/// prefix-compatible reduction of the full log's canonical chain, so
/// assertions made mid-chain stay valid as more calls are appended.
pub fn unify_calls(log: &[CallRecord], config: &UnifyConfig) -> Vec<CallRecord> {
    let mut canonical: Vec<CallRecord> = Vec::new();
    for record in log {
        if config.is_unified(&record.name) {
            if let Some(open) = canonical.last_mut() {
                if open.name == record.name {
                    open.args.extend(record.args.iter().cloned());
                    for (key, value) in &record.kwargs {
                        open.kwargs.insert(key.clone(), value.clone());
                    }
                    continue;
                }
            }
        }
        canonical.push(record.clone());
    }
    canonical
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::Arg;
    use crate::matcher::chain_eq;
    use crate::pattern;
    use sham_expr::col;

    #[test]
    fn test_contiguous_filters_merge_in_order() {
        let log = vec![
            pattern::query("user"),
            pattern::filter(col("a").eq(1)),
            pattern::filter([col("b").eq(2), col("c").eq(3)]),
        ];
        let canonical = unify_calls(&log, &UnifyConfig::default());

        assert_eq!(canonical.len(), 2);
        assert_eq!(canonical[1].name, "filter");
        assert_eq!(
            canonical[1].args,
            vec![
                Arg::from(col("a").eq(1)),
                Arg::from(col("b").eq(2)),
                Arg::from(col("c").eq(3)),
            ]
        );
    }

    #[test]
    fn test_run_of_n_filters_becomes_one_call() {
        let log: Vec<_> = (0..5).map(|i| pattern::filter(col("x").eq(i))).collect();
        let canonical = unify_calls(&log, &UnifyConfig::default());

        assert_eq!(canonical.len(), 1);
        assert_eq!(canonical[0].args.len(), 5);
    }

    #[test]
    fn test_intervening_call_breaks_the_run() {
        let log = vec![
            pattern::filter(col("a").eq(1)),
            pattern::order_by(col("a").asc()),
            pattern::filter(col("b").eq(2)),
        ];
        let canonical = unify_calls(&log, &UnifyConfig::default());

        assert_eq!(canonical.len(), 3);
        assert_eq!(canonical[0].args.len(), 1);
        assert_eq!(canonical[2].args.len(), 1);
    }

    #[test]
    fn test_different_unify_names_do_not_merge_together() {
        let log = vec![
            pattern::filter(col("a").eq(1)),
            pattern::filter_by([("name", "ann")]),
        ];
        let canonical = unify_calls(&log, &UnifyConfig::default());
        assert_eq!(canonical.len(), 2);
    }

    #[test]
    fn test_kwargs_merge_last_write_wins() {
        let log = vec![
            pattern::filter_by([("name", "ann"), ("active", "yes")]),
            pattern::filter_by([("name", "bob")]),
        ];
        let canonical = unify_calls(&log, &UnifyConfig::default());

        assert_eq!(canonical.len(), 1);
        assert_eq!(canonical[0].kwargs.len(), 2);
        assert_eq!(canonical[0].kwargs["name"], Arg::from("bob"));
        assert_eq!(canonical[0].kwargs["active"], Arg::from("yes"));
    }

    #[test]
    fn test_idempotent() {
        let log = vec![
            pattern::query("user"),
            pattern::filter(col("a").eq(1)),
            pattern::filter(col("b").eq(2)),
            pattern::order_by(col("a").asc()),
            pattern::filter(col("c").eq(3)),
        ];
        let config = UnifyConfig::default();
        let once = unify_calls(&log, &config);
        let twice = unify_calls(&once, &config);
        assert!(chain_eq(&once, &twice));
    }

    #[test]
    fn test_custom_unify_set() {
        let log = vec![
            pattern::order_by(col("a").asc()),
            pattern::order_by(col("b").desc()),
        ];

        let default_canonical = unify_calls(&log, &UnifyConfig::default());
        assert_eq!(default_canonical.len(), 2);

        let config = UnifyConfig::default().unify_call("order_by");
        let canonical = unify_calls(&log, &config);
        assert_eq!(canonical.len(), 1);
        assert_eq!(canonical[0].args.len(), 2);
    }

    #[test]
    fn test_empty_log() {
        assert!(unify_calls(&[], &UnifyConfig::default()).is_empty());
    }
}

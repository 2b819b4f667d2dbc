//! Hash join

use super::{Lifecycle, Operator, schema_ref};
use crate::error::Result;
use crate::planning::predicate::JoinPredicate;
use crate::types::evaluator::{self, JoinKey};
use crate::types::{Schema, Tuple};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Build/probe equi-join. `open` drains the left child into an in-memory
/// hash table keyed on the join column (the documented scaling limit);
/// `next` streams the right child, probing the table and emitting one
/// concatenated row per match.
///
/// Output order: probe rows in right-child order, and within one probe
/// row the matching left rows in build insertion order. Null keys are
/// skipped on both sides. Every bucket hit is re-verified through the
/// shared equality, since canonicalized keys can conflate values the
/// predicate distinguishes.
pub struct HashJoinOperator {
    left: Box<dyn Operator>,
    right: Box<dyn Operator>,
    predicate: JoinPredicate,
    table: HashMap<JoinKey, Vec<Tuple>>,
    pending: Option<PendingMatches>,
    schema: Option<Arc<Schema>>,
    state: Lifecycle,
}

/// Matches still to be emitted for the current probe row.
struct PendingMatches {
    probe: Tuple,
    matches: Vec<Tuple>,
    index: usize,
}

impl HashJoinOperator {
    pub fn new(left: Box<dyn Operator>, right: Box<dyn Operator>, predicate: JoinPredicate) -> Self {
        HashJoinOperator {
            left,
            right,
            predicate,
            table: HashMap::new(),
            pending: None,
            schema: None,
            state: Lifecycle::Created,
        }
    }
}

impl Operator for HashJoinOperator {
    fn open(&mut self) -> Result<()> {
        trace!(operator = "hash_join", predicate = %self.predicate, "open");
        self.left.open()?;
        self.right.open()?;
        let joined = self.left.schema()?.concat(self.right.schema()?)?;
        self.schema = Some(Arc::new(joined));

        // Build phase: drain the left child into the hash table.
        let build_column = self.predicate.left_column().to_string();
        let mut rows = 0usize;
        while let Some(tuple) = self.left.next()? {
            if let Some(key) = evaluator::join_key(tuple.get(&build_column)) {
                self.table.entry(key).or_default().push(tuple);
                rows += 1;
            }
        }
        trace!(
            operator = "hash_join",
            rows,
            buckets = self.table.len(),
            "build phase complete"
        );

        self.state = Lifecycle::Open;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Tuple>> {
        trace!(operator = "hash_join", "next");
        self.state.check_open("hash_join")?;
        let schema = schema_ref(&self.schema, "hash_join")?.clone();

        loop {
            if let Some(mut pending) = self.pending.take() {
                while pending.index < pending.matches.len() {
                    let build = &pending.matches[pending.index];
                    pending.index += 1;
                    if self.predicate.evaluate(build, &pending.probe) {
                        let mut values = build.values().to_vec();
                        values.extend_from_slice(pending.probe.values());
                        let tuple = Tuple::new(values, schema);
                        self.pending = Some(pending);
                        return Ok(Some(tuple));
                    }
                }
                // Current probe row exhausted; fall through to the next.
            }

            match self.right.next()? {
                None => return Ok(None),
                Some(probe) => {
                    let key = evaluator::join_key(probe.get(self.predicate.right_column()));
                    if let Some(bucket) = key.and_then(|key| self.table.get(&key)) {
                        self.pending = Some(PendingMatches {
                            probe,
                            matches: bucket.clone(),
                            index: 0,
                        });
                    }
                    // Null key or empty bucket: discard the probe row.
                }
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        trace!(operator = "hash_join", "close");
        debug_assert!(self.state != Lifecycle::Closed, "hash join closed twice");
        self.state = Lifecycle::Closed;
        self.table = HashMap::new();
        self.pending = None;
        let left = self.left.close();
        let right = self.right.close();
        left?;
        right
    }

    fn schema(&self) -> Result<&Arc<Schema>> {
        schema_ref(&self.schema, "hash_join")
    }
}

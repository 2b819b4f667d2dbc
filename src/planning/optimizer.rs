//! Rule and cost based plan rewriting
//!
//! The optimizer rewrites a plan into an equivalent, cheaper one in four
//! passes: filter pushdown, filter merging, projection collapsing, and
//! cost-based join reordering. Rewrites always produce fresh subtrees;
//! the input plan stays valid and executable, which keeps before/after
//! comparisons cheap.

use super::plan::Node;
use super::predicate::{JoinPredicate, Predicate};
use crate::catalog::Catalog;
use tracing::debug;

/// Selectivity assumed for a single comparison.
const COMPARISON_SELECTIVITY: f64 = 0.3;
/// Selectivity assumed for an equality join.
const EQUI_JOIN_SELECTIVITY: f64 = 0.1;
/// Cardinality assumed for sources the catalog knows nothing about.
const UNKNOWN_CARDINALITY: u64 = 1000;

/// Plan rewriter backed by the statistics catalog.
pub struct Optimizer<'a> {
    catalog: &'a Catalog,
}

impl<'a> Optimizer<'a> {
    /// The catalog must be fully populated before optimization; it is
    /// only read here.
    pub fn new(catalog: &'a Catalog) -> Self {
        Optimizer { catalog }
    }

    /// Rewrites a plan. Pure and deterministic: the input is untouched
    /// and a semantically equivalent tree is returned. Fragments the
    /// rules cannot improve are left unchanged, never rejected.
    pub fn optimize(&self, plan: &Node) -> Node {
        debug!(plan = %plan, "optimizing plan");
        let plan = self.push_down_filters(plan.clone());
        let plan = self.merge_filters(plan);
        let plan = self.collapse_projections(plan);
        let plan = self.reorder_joins(plan);
        debug!(plan = %plan, "optimized plan");
        plan
    }

    /// Pass 1: move filters below joins and projections wherever the
    /// predicate can still be resolved there. Top-down; a filter pushed
    /// into a subtree keeps sinking on the recursive descent.
    fn push_down_filters(&self, node: Node) -> Node {
        match node {
            Node::Filter { source, predicate } => match *source {
                Node::HashJoin {
                    left,
                    right,
                    predicate: join,
                } => {
                    if self.covers(&left, &predicate) {
                        Node::HashJoin {
                            left: Box::new(self.push_down_filters(Node::Filter {
                                source: left,
                                predicate,
                            })),
                            right: Box::new(self.push_down_filters(*right)),
                            predicate: join,
                        }
                    } else if self.covers(&right, &predicate) {
                        Node::HashJoin {
                            left: Box::new(self.push_down_filters(*left)),
                            right: Box::new(self.push_down_filters(Node::Filter {
                                source: right,
                                predicate,
                            })),
                            predicate: join,
                        }
                    } else {
                        Node::Filter {
                            source: Box::new(self.push_down_filters(Node::HashJoin {
                                left,
                                right,
                                predicate: join,
                            })),
                            predicate,
                        }
                    }
                }
                Node::Project {
                    source: inner,
                    columns,
                    distinct,
                } if predicate
                    .referenced_names()
                    .iter()
                    .all(|name| columns.iter().any(|c| c == name)) =>
                {
                    Node::Project {
                        source: Box::new(self.push_down_filters(Node::Filter {
                            source: inner,
                            predicate,
                        })),
                        columns,
                        distinct,
                    }
                }
                other => Node::Filter {
                    source: Box::new(self.push_down_filters(other)),
                    predicate,
                },
            },
            other => self.map_children(other, |child| self.push_down_filters(child)),
        }
    }

    /// Pass 2: collapse adjacent filters into one conjunction, upper
    /// predicate as the left conjunct. Bottom-up, so chains of any
    /// length merge in a single application.
    fn merge_filters(&self, node: Node) -> Node {
        match node {
            Node::Filter { source, predicate } => {
                let source = self.merge_filters(*source);
                if let Node::Filter {
                    source: inner,
                    predicate: below,
                } = source
                {
                    Node::Filter {
                        source: inner,
                        predicate: Predicate::and(predicate, below),
                    }
                } else {
                    Node::Filter {
                        source: Box::new(source),
                        predicate,
                    }
                }
            }
            other => self.map_children(other, |child| self.merge_filters(child)),
        }
    }

    /// Pass 3: collapse stacked projections with the same distinct flag.
    /// Both lists use source names (identity mapping), so the outer list
    /// wins; the collapse only fires when the outer list is a subset of
    /// the inner one, otherwise the rewrite could resurrect a column the
    /// inner projection dropped.
    fn collapse_projections(&self, node: Node) -> Node {
        match node {
            Node::Project {
                source,
                columns,
                distinct,
            } => {
                let source = self.collapse_projections(*source);
                match source {
                    Node::Project {
                        source: inner,
                        columns: inner_columns,
                        distinct: inner_distinct,
                    } if distinct == inner_distinct
                        && columns.iter().all(|c| inner_columns.contains(c)) =>
                    {
                        Node::Project {
                            source: inner,
                            columns,
                            distinct,
                        }
                    }
                    other => Node::Project {
                        source: Box::new(other),
                        columns,
                        distinct,
                    },
                }
            }
            other => self.map_children(other, |child| self.collapse_projections(child)),
        }
    }

    /// Pass 4: bottom-up join reordering. The hash table materializes
    /// the left side, so the smaller estimated input becomes the build
    /// side; equality predicates are the swap-safe kind.
    fn reorder_joins(&self, node: Node) -> Node {
        match node {
            Node::HashJoin {
                left,
                right,
                predicate,
            } => {
                let left = self.reorder_joins(*left);
                let right = self.reorder_joins(*right);
                let swappable = matches!(predicate, JoinPredicate::Equality { .. });
                if swappable && self.estimate_cardinality(&right) < self.estimate_cardinality(&left)
                {
                    Node::HashJoin {
                        left: Box::new(right),
                        right: Box::new(left),
                        predicate: predicate.swapped(),
                    }
                } else {
                    Node::HashJoin {
                        left: Box::new(left),
                        right: Box::new(right),
                        predicate,
                    }
                }
            }
            other => self.map_children(other, |child| self.reorder_joins(child)),
        }
    }

    /// Rebuilds a node with the rewrite applied to each child subtree.
    fn map_children(&self, node: Node, rewrite: impl Fn(Node) -> Node) -> Node {
        match node {
            Node::Scan { .. } => node,
            Node::Filter { source, predicate } => Node::Filter {
                source: Box::new(rewrite(*source)),
                predicate,
            },
            Node::Project {
                source,
                columns,
                distinct,
            } => Node::Project {
                source: Box::new(rewrite(*source)),
                columns,
                distinct,
            },
            Node::HashJoin {
                left,
                right,
                predicate,
            } => Node::HashJoin {
                left: Box::new(rewrite(*left)),
                right: Box::new(rewrite(*right)),
                predicate,
            },
            Node::Sink { source, path } => Node::Sink {
                source: Box::new(rewrite(*source)),
                path,
            },
        }
    }

    /// True when every name the predicate references is produced by the
    /// subtree. Unknown outputs (unregistered scan) block pushdown.
    fn covers(&self, node: &Node, predicate: &Predicate) -> bool {
        match node.output_columns(self.catalog) {
            Some(outputs) => predicate
                .referenced_names()
                .iter()
                .all(|name| outputs.contains(*name)),
            None => false,
        }
    }

    /// Estimated rows produced by a subtree.
    pub fn estimate_cardinality(&self, node: &Node) -> u64 {
        match node {
            Node::Scan { path } => self
                .catalog
                .table_statistics(path)
                .map(|stats| stats.row_count)
                .unwrap_or(UNKNOWN_CARDINALITY),
            Node::Filter { source, predicate } => {
                let input = self.estimate_cardinality(source) as f64;
                (input * Self::selectivity(predicate)).round() as u64
            }
            Node::HashJoin { left, right, .. } => {
                let left = self.estimate_cardinality(left) as f64;
                let right = self.estimate_cardinality(right) as f64;
                (left * right * EQUI_JOIN_SELECTIVITY).round() as u64
            }
            Node::Project {
                source,
                columns,
                distinct,
            } => {
                let input = self.estimate_cardinality(source);
                if *distinct {
                    input.min(10u64.saturating_pow(columns.len() as u32))
                } else {
                    input
                }
            }
            Node::Sink { source, .. } => self.estimate_cardinality(source),
        }
    }

    fn selectivity(predicate: &Predicate) -> f64 {
        match predicate {
            Predicate::Compare { .. } => COMPARISON_SELECTIVITY,
            Predicate::And(left, right) => Self::selectivity(left) * Self::selectivity(right),
        }
    }
}

//! The per-node statistic table shared by all channels
//!
//! Channels draining through a common trunk form a DAG, not a tree, so the
//! same node can be visited by several channels. The table is an explicit
//! index-keyed map with a configurable conflict policy; every duplicate is
//! counted so the policy's effect stays auditable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::channel::NodeId;
use crate::params::DuplicatePolicy;

/// Aggregated chi statistics for one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeStatistic {
    /// Chi coordinate (m)
    pub chi: f64,
    /// Surface elevation (m)
    pub elevation: f64,
    /// Mean fitted slope of elevation against chi
    pub m_chi: f64,
    /// Mean fitted intercept
    pub b_chi: f64,
    /// Variance of the slope across Monte Carlo iterations
    pub m_chi_var: f64,
    /// Variance of the intercept across Monte Carlo iterations
    pub b_chi_var: f64,
    /// Number of Monte Carlo samples behind the means
    pub samples: usize,
}

/// What happened when a statistic was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// First statistic for the node
    Inserted,
    /// Node was already present; the existing statistic was kept
    KeptExisting,
    /// Node was already present; the new statistic replaced it
    Replaced,
    /// Node was already present; old and new statistics were pooled
    Pooled,
}

/// Node id → statistic mapping for one analysis run.
///
/// Keys are ordered so iteration (and therefore export) is deterministic.
#[derive(Debug, Clone, Default)]
pub struct GlobalNodeTable {
    entries: BTreeMap<NodeId, NodeStatistic>,
    duplicates: usize,
}

impl GlobalNodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct nodes in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Statistic for a node, if recorded
    pub fn get(&self, node: NodeId) -> Option<&NodeStatistic> {
        self.entries.get(&node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.contains_key(&node)
    }

    /// How many record calls hit an already-present node
    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    /// Entries in ascending node-id order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeStatistic)> {
        self.entries.iter().map(|(&node, stat)| (node, stat))
    }

    /// Record a statistic for a node, resolving conflicts by `policy`.
    pub fn record(
        &mut self,
        node: NodeId,
        stat: NodeStatistic,
        policy: DuplicatePolicy,
    ) -> RecordOutcome {
        let Some(existing) = self.entries.get_mut(&node) else {
            self.entries.insert(node, stat);
            return RecordOutcome::Inserted;
        };

        self.duplicates += 1;
        match policy {
            DuplicatePolicy::KeepFirst => RecordOutcome::KeptExisting,
            DuplicatePolicy::KeepLast => {
                *existing = stat;
                RecordOutcome::Replaced
            }
            DuplicatePolicy::Average => {
                *existing = pool(existing, &stat);
                RecordOutcome::Pooled
            }
        }
    }
}

/// Sample-count-weighted pooling of two statistics for the same node.
///
/// Means combine as a weighted average; variances combine as the mixture
/// variance (within-group variance plus the spread of the group means).
/// Chi and elevation are node properties, identical on both sides, and
/// kept from the first statistic.
fn pool(first: &NodeStatistic, second: &NodeStatistic) -> NodeStatistic {
    let w1 = first.samples as f64;
    let w2 = second.samples as f64;
    let w = w1 + w2;
    if w == 0.0 {
        return *first;
    }

    let m_chi = (w1 * first.m_chi + w2 * second.m_chi) / w;
    let b_chi = (w1 * first.b_chi + w2 * second.b_chi) / w;

    let m_d1 = first.m_chi - m_chi;
    let m_d2 = second.m_chi - m_chi;
    let b_d1 = first.b_chi - b_chi;
    let b_d2 = second.b_chi - b_chi;

    NodeStatistic {
        chi: first.chi,
        elevation: first.elevation,
        m_chi,
        b_chi,
        m_chi_var: (w1 * (first.m_chi_var + m_d1 * m_d1) + w2 * (second.m_chi_var + m_d2 * m_d2)) / w,
        b_chi_var: (w1 * (first.b_chi_var + b_d1 * b_d1) + w2 * (second.b_chi_var + b_d2 * b_d2)) / w,
        samples: first.samples + second.samples,
    }
}

//! Cross-channel reduction into the global node table
//!
//! Channels that drain through a common trunk all carry statistics for
//! the shared downstream nodes, so a plain union would double-count trunk
//! segments. The merge walks channels in caller order and nodes in
//! profile order (never hash order), resolving every collision through
//! the table's explicit duplicate policy.

use std::collections::HashMap;

use log::debug;
use riverchi_core::{
    ChannelProfile, DuplicatePolicy, GlobalNodeTable, NodeId, NodeStatistic, RecordOutcome,
};

use super::montecarlo::NodeMeans;

/// Fold per-channel node means into one table.
///
/// Channel order is significant under `KeepFirst`/`KeepLast`; two calls
/// with the same order produce identical tables.
pub fn merge_channels<'a, I>(channels: I, policy: DuplicatePolicy) -> GlobalNodeTable
where
    I: IntoIterator<Item = &'a (ChannelProfile, HashMap<NodeId, NodeMeans>)>,
{
    let mut table = GlobalNodeTable::new();

    for (profile, means) in channels {
        for sample in profile.nodes() {
            let Some(node_means) = means.get(&sample.node) else {
                // Node never appeared in any resampled view
                continue;
            };

            let stat = NodeStatistic {
                chi: sample.chi,
                elevation: sample.elevation,
                m_chi: node_means.m_chi,
                b_chi: node_means.b_chi,
                m_chi_var: node_means.m_chi_var,
                b_chi_var: node_means.b_chi_var,
                samples: node_means.samples,
            };

            match table.record(sample.node, stat, policy) {
                RecordOutcome::Inserted => {}
                outcome => debug!(
                    "node {} already recorded: {:?} under {:?}",
                    sample.node, outcome, policy
                ),
            }
        }
    }

    table
}

//! Channel profiles in chi-elevation space
//!
//! A channel is an ordered sequence of flow-network nodes from a source
//! down to an outlet. The chi coordinate is computed by the flow-routing
//! collaborator as the upstream integral of (A₀/A)^(m/n) over flow
//! distance, so it grows upstream: a valid profile has strictly
//! decreasing chi from its first sample (the source) to its last
//! (the outlet).

use crate::error::{Error, Result};

/// Opaque identifier of a node in the external flow network.
pub type NodeId = usize;

/// One sample along a channel.
///
/// Elevation, drainage area and flow distance are looked up from the
/// collaborator's rasters when the channel is extracted; chi is the
/// precomputed transformed coordinate for the node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelNode {
    /// Flow-network node index
    pub node: NodeId,
    /// Chi coordinate (m)
    pub chi: f64,
    /// Surface elevation (m)
    pub elevation: f64,
    /// Upstream drainage area (m²)
    pub drainage_area: f64,
    /// Distance along the flow path from the outlet (m)
    pub flow_distance: f64,
}

/// An ordered sequence of samples from one source node to one outlet node.
///
/// Immutable once built. Construction checks that chi strictly decreases
/// along the sequence; the source and outlet ids are taken from the first
/// and last samples.
#[derive(Debug, Clone)]
pub struct ChannelProfile {
    source: NodeId,
    outlet: NodeId,
    nodes: Vec<ChannelNode>,
}

impl ChannelProfile {
    /// Build a profile from samples ordered source → outlet.
    ///
    /// Fails with [`Error::InsufficientProfileLength`] on an empty sequence
    /// and [`Error::NonMonotonicChi`] if chi does not strictly decrease
    /// (NaN chi also trips the monotonicity check).
    pub fn new(nodes: Vec<ChannelNode>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(Error::InsufficientProfileLength { len: 0, min: 1 });
        }

        for i in 1..nodes.len() {
            if !(nodes[i].chi < nodes[i - 1].chi) {
                return Err(Error::NonMonotonicChi { index: i });
            }
        }

        let source = nodes[0].node;
        let outlet = nodes[nodes.len() - 1].node;

        Ok(Self { source, outlet, nodes })
    }

    /// Source (upstream-most) node id
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Outlet (downstream-most) node id
    pub fn outlet(&self) -> NodeId {
        self.outlet
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the profile has no samples (never true for a built profile)
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All samples, source first
    pub fn nodes(&self) -> &[ChannelNode] {
        &self.nodes
    }

    /// Sample at a given position
    pub fn node(&self, index: usize) -> Option<&ChannelNode> {
        self.nodes.get(index)
    }

    /// Chi coordinates in profile order
    pub fn chi_values(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.chi).collect()
    }

    /// Elevations in profile order
    pub fn elevation_values(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.elevation).collect()
    }
}

//! Seam to the external flow-network collaborator
//!
//! Flow routing, drainage-area accumulation and the chi transform are all
//! computed outside this crate. The analysis engine only needs two things
//! from that layer: extracted channels, and geographic coordinates for
//! export. Implementations wrap whatever raster/flow stack built the
//! network; tests implement the trait over synthetic in-memory channels.

use crate::channel::{ChannelProfile, NodeId};
use crate::error::Result;

/// Access to an externally-built flow network.
pub trait FlowNetwork {
    /// Extract the channel running from `source` down to `outlet`.
    ///
    /// The returned profile carries chi, elevation, drainage area and flow
    /// distance for every node on the path, ordered source first.
    fn channel(&self, source: NodeId, outlet: NodeId) -> Result<ChannelProfile>;

    /// Geographic coordinate (latitude, longitude) of a node.
    ///
    /// Used only when exporting results; `None` if the node cannot be
    /// located.
    fn node_to_geo(&self, node: NodeId) -> Option<(f64, f64)>;
}

//! # RiverChi Core
//!
//! Core types, traits and configuration for the RiverChi channel-profile
//! analysis toolkit.
//!
//! This crate provides:
//! - `ChannelProfile`: ordered chi-elevation samples along one channel
//! - `FlowNetwork`: seam to the external flow-routing collaborator
//! - `ChiAnalysisParams`: validated configuration for an analysis run
//! - `GlobalNodeTable`: the per-node statistic table a run produces
//! - Algorithm traits for consistent API

pub mod channel;
pub mod error;
pub mod network;
pub mod params;
pub mod table;

pub use channel::{ChannelNode, ChannelProfile, NodeId};
pub use error::{Error, Result};
pub use network::FlowNetwork;
pub use params::{ChiAnalysisParams, DuplicatePolicy};
pub use table::{GlobalNodeTable, NodeStatistic, RecordOutcome};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::channel::{ChannelNode, ChannelProfile, NodeId};
    pub use crate::error::{Error, Result};
    pub use crate::network::FlowNetwork;
    pub use crate::params::{ChiAnalysisParams, DuplicatePolicy};
    pub use crate::table::{GlobalNodeTable, NodeStatistic};
    pub use crate::Algorithm;
}

/// Core trait for all analysis algorithms in RiverChi.
///
/// Algorithms are pure functions that transform input data according to
/// parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(
        &self,
        input: Self::Input,
        params: Self::Params,
    ) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}

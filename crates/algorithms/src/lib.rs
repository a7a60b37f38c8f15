//! # RiverChi Algorithms
//!
//! Channel-profile analysis algorithms for RiverChi.
//!
//! ## Available algorithm categories
//!
//! - **chi**: segment fitting, optimal profile partitioning, Monte Carlo
//!   resampling, cross-channel merge and CSV export

pub mod chi;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::chi::{
        chi_profile_analysis, fit_segment, merge_channels, monte_carlo_sample, partition,
        partition_profile, write_chi_csv, FittedSegment, MonteCarloParams, MonteCarloSampler,
        NodeMeans, Partition, PartitionParams, ProfilePartitioner, ProfileSums, SegmentFit,
    };
    pub use riverchi_core::prelude::*;
}

//! Chi-space channel profile analysis
//!
//! The pipeline for one analysis run:
//! 1. The flow-network collaborator extracts one [`ChannelProfile`] per
//!    source/outlet pair (`riverchi_core::FlowNetwork`).
//! 2. Each profile is partitioned into its most likely piecewise-linear
//!    model in chi-elevation space, repeatedly, under Monte Carlo
//!    resampling.
//! 3. Per-node slope/intercept means from all channels are merged into a
//!    single [`GlobalNodeTable`] and exported as CSV.
//!
//! [`ChannelProfile`]: riverchi_core::ChannelProfile
//! [`GlobalNodeTable`]: riverchi_core::GlobalNodeTable

mod driver;
mod export;
mod fit;
mod merge;
mod montecarlo;
mod partition;

pub use driver::chi_profile_analysis;
pub use export::{write_chi_csv, CSV_HEADER};
pub use fit::{fit_segment, ProfileSums, SegmentFit};
pub use merge::merge_channels;
pub use montecarlo::{monte_carlo_sample, MonteCarloParams, MonteCarloSampler, NodeMeans};
pub use partition::{
    partition, partition_profile, FittedSegment, Partition, PartitionParams, ProfilePartitioner,
};

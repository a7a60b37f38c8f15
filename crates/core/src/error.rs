//! Error types for RiverChi

use thiserror::Error;

/// Main error type for RiverChi operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Degenerate fit range [{start}, {end}): chi does not vary")]
    DegenerateRange { start: usize, end: usize },

    #[error("Profile has {len} nodes but at least {min} are required")]
    InsufficientProfileLength { len: usize, min: usize },

    #[error("Chi must strictly decrease from source to outlet, violated at sample {index}")]
    NonMonotonicChi { index: usize },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Channel {from} -> {outlet}: {reason}")]
    Channel {
        from: usize,
        outlet: usize,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for RiverChi operations
pub type Result<T> = std::result::Result<T, Error>;

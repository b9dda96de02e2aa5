/*!
# Errors

All fallible operations of the crate return [`CoverError`]. Errors raised while building a
network or validating parameters are reported before any algorithm runs; a
[`CoverError::PartitionValidation`] always indicates a defect in a covering algorithm.
*/

use thiserror::Error;

/// Errors of network construction, box covering and benchmarking
#[derive(Debug, Error)]
pub enum CoverError {
    /// The network is empty or disconnected
    #[error("invalid network: {0}")]
    InvalidNetwork(String),

    /// The box size is not positive
    #[error("invalid box size {size}: box sizes must be at least 1")]
    InvalidBoxSize { size: u32 },

    /// An algorithm produced a covering that violates its distance bound
    #[error("invalid partition from {algorithm}: {reason}")]
    PartitionValidation { algorithm: String, reason: String },

    /// The distance cache or a population exceeds its memory limit
    #[error("resource exhausted: {0}")]
    ResourceExhaustion(String),

    /// An algorithm requires the distance matrix but it is not held by the network
    #[error("distances of network {0} are not computed")]
    DistancesNotComputed(String),

    /// No algorithm is registered under the requested name
    #[error("unknown algorithm {0}")]
    UnknownAlgorithm(String),

    /// A hyperparameter is out of range
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Shorthand for results of this crate
pub type Result<T> = std::result::Result<T, CoverError>;

/// Returns an [`CoverError::InvalidParameter`] unless `0 <= value <= 1`
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<()> {
    use crate::utils::Probability;
    if value.is_valid_probability() {
        Ok(())
    } else {
        Err(CoverError::InvalidParameter {
            name,
            reason: format!("{value} is not a probability"),
        })
    }
}

/// Returns an [`CoverError::InvalidParameter`] unless `value > 0`
pub(crate) fn check_positive<T>(name: &'static str, value: T) -> Result<()>
where
    T: num::Zero + PartialOrd + std::fmt::Display,
{
    if value > T::zero() {
        Ok(())
    } else {
        Err(CoverError::InvalidParameter {
            name,
            reason: format!("{value} must be positive"),
        })
    }
}

// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Partitioning errors.

All variants are fatal: the mapping pass aborts without emitting partial
artifacts. Resource overflow is reported for the external placer to act
on; the engine never retries with a different split on its own, and a
re-invocation with changed parameters recomputes from scratch.
*/

use synmap_structures::{ResourceOverflow, SynmapDataError};
use synmap_synaptic::SynapticError;

/// Result type for partitioning operations
pub type PartitionResult<T> = Result<T, PartitionError>;

/// Errors raised while partitioning a population
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PartitionError {
    /// Static incompatibility among slice size, synapse-type count,
    /// accumulator width or requested vs. representable delay
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unsupported feature combination
    #[error("Synaptic configuration error: {0}")]
    SynapticConfiguration(String),

    /// A core cannot hold its assignment; placement policy is the caller's
    #[error(transparent)]
    ResourceOverflow(#[from] ResourceOverflow),

    /// Invalid model data reached the partitioner
    #[error(transparent)]
    Data(#[from] SynmapDataError),
}

// Sizing-estimate failures from the addressing layer surface as
// configuration errors: the offending bound is a property of the network
// description.
impl From<SynapticError> for PartitionError {
    fn from(err: SynapticError) -> Self {
        PartitionError::Configuration(err.to_string())
    }
}

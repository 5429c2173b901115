// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Error type for data-model operations.
*/

/// Result type for data-model operations
pub type SynmapDataResult<T> = Result<T, SynmapDataError>;

/// Errors raised while constructing or mutating model types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SynmapDataError {
    /// Invalid parameters provided to a constructor or setter
    #[error("Invalid parameters: {0}")]
    BadParameters(String),

    /// A population was mutated after mapping froze it
    #[error("Population '{0}' is frozen for mapping and can no longer be changed")]
    FrozenPopulation(String),

    /// A slice or a set of slices violates the partition contract
    #[error("Invalid slice: {0}")]
    InvalidSlice(String),

    /// Internal error indicating a bug (please report)
    #[error("Internal error: {0}")]
    Internal(String),
}

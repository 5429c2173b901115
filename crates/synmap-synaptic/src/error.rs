// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Errors raised while building tables and packing matrices.

`UnalignedBlock` and `BlockGeneration` are unreachable with a correct
packer and a correct resource model; hitting one indicates an engine
defect rather than a user error.
*/

/// Result type for table/matrix operations
pub type SynapticResult<T> = Result<T, SynapticError>;

/// Errors from the addressing layer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynapticError {
    /// A block start was not 1024-byte aligned at table build time
    #[error(
        "synaptic block for key {key:#010x} starts at byte {block_start}, \
         which is not 1024-byte aligned"
    )]
    UnalignedBlock { key: u32, block_start: u32 },

    /// The packed matrix exceeded the resource model's reservation
    #[error(
        "synaptic matrix over-consumed its reservation: reserved {reserved} bytes, \
         wrote {actual} bytes"
    )]
    BlockGeneration { reserved: u64, actual: u64 },

    /// Two table entries share one routing key
    #[error("duplicate routing key {0:#010x} in master population table")]
    DuplicateKey(u32),

    /// A block start does not fit the 13-bit address field
    #[error("block start {0} exceeds the 13-bit addressable range")]
    BlockOutOfRange(u32),

    /// A row's data exceeds the largest row-length class
    #[error("row data length {0} words exceeds the largest row-length class")]
    RowTooLong(u32),

    /// A block with no synapses was offered to the packer
    #[error("synaptic block for key {0:#010x} has no synapses")]
    EmptyBlock(u32),

    /// Malformed serialized table bytes
    #[error("failed to deserialize master population table: {0}")]
    Deserialization(String),

    /// Internal error indicating a bug (please report)
    #[error("internal error: {0}")]
    Internal(String),
}

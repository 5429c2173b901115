// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Per-core image fragments: the two serialized regions embedded verbatim
into a synapse-owning core's binary image.
*/

use serde::Serialize;

use crate::error::SynapticResult;
use crate::matrix::PackedMatrix;

/// The serialized addressing regions for one core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoreImage {
    /// Master population table bytes
    pub table_bytes: Vec<u8>,
    /// Synaptic matrix bytes
    pub matrix_bytes: Vec<u8>,
}

impl CoreImage {
    /// Assembles both regions from a packed matrix.
    pub fn assemble(matrix: PackedMatrix) -> SynapticResult<Self> {
        let table = matrix.build_table()?;
        Ok(Self {
            table_bytes: table.serialize(),
            matrix_bytes: matrix.bytes,
        })
    }
}

// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Synaptic matrix packer.

Serializes per-source blocks of synaptic rows into one contiguous region.
Every block starts on the next 1024-byte boundary; rows inside a block are
padded to the block's row-length class. Blocks whose rows are all single
static synapses are packed one bare word per row and flagged single-synapse
(class 0).

The packer is handed the resource model's reservation up front. `finish`
compares actual against reserved: over-consumption is a sizing-estimate
defect in the engine, never a user error, and aborts the pass quoting both
figures.
*/

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{SynapticError, SynapticResult};
use crate::row::{SynapticRow, ROW_HEADER_WORDS};
use crate::row_class::{class_data_words, class_for_data_words, SINGLE_SYNAPSE_CLASS};
use crate::table::{MasterPopulationTable, RoutingKey, TableEntry};

/// Alignment of every block start, in bytes.
pub const BLOCK_ALIGNMENT: usize = 1024;

const WORD_BYTES: u64 = 4;

/// One packed block, ready to become a table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PackedBlock {
    pub key: RoutingKey,
    pub block_start: u32,
    pub row_class: u8,
    pub single_synapse: bool,
    pub n_rows: u32,
}

impl PackedBlock {
    fn table_entry(&self) -> TableEntry {
        TableEntry {
            key: self.key,
            block_start: self.block_start,
            row_class: self.row_class,
            single_synapse: self.single_synapse,
        }
    }
}

/// The finished matrix region plus its block directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackedMatrix {
    pub bytes: Vec<u8>,
    pub blocks: Vec<PackedBlock>,
    /// Alignment padding spent between blocks
    pub padding_bytes: u64,
}

impl PackedMatrix {
    /// Builds the master population table addressing this matrix.
    pub fn build_table(&self) -> SynapticResult<MasterPopulationTable> {
        MasterPopulationTable::build(
            self.blocks.iter().map(PackedBlock::table_entry).collect(),
        )
    }
}

/// Packs per-source row blocks contiguously against a fixed reservation.
pub struct SynapticMatrixPacker {
    reserved_bytes: u64,
    bytes: Vec<u8>,
    blocks: Vec<PackedBlock>,
    padding_bytes: u64,
}

impl SynapticMatrixPacker {
    /// `reserved_bytes` is the resource model's matrix reservation for
    /// this core.
    pub fn new(reserved_bytes: u64) -> Self {
        Self {
            reserved_bytes,
            bytes: Vec::new(),
            blocks: Vec::new(),
            padding_bytes: 0,
        }
    }

    /// Appends the block for one admissible source.
    ///
    /// `rows` is indexed by source atom; a source unit with no synapses
    /// onto this slice still owns a (padded) row so row lookup stays a
    /// multiply.
    pub fn pack_block(&mut self, key: RoutingKey, rows: &[SynapticRow]) -> SynapticResult<()> {
        if rows.is_empty() {
            return Err(SynapticError::EmptyBlock(key));
        }

        self.align_to_block_boundary();
        let block_start = self.bytes.len() as u32;

        let single = rows.iter().all(SynapticRow::is_single_static);
        let row_class = if single {
            self.pack_single_block(rows);
            SINGLE_SYNAPSE_CLASS
        } else {
            let max_data_words = rows.iter().map(SynapticRow::data_words).max().unwrap_or(0);
            let class = class_for_data_words(max_data_words)?;
            let class_words = class_data_words(class);
            for row in rows {
                row.write_padded(&mut self.bytes, class_words)?;
            }
            class
        };

        debug!(
            target: "synmap-synaptic",
            "packed block key={key:#010x} start={block_start} rows={} class={row_class} single={single}",
            rows.len()
        );
        self.blocks.push(PackedBlock {
            key,
            block_start,
            row_class,
            single_synapse: single,
            n_rows: rows.len() as u32,
        });
        Ok(())
    }

    /// Single-synapse packing: one bare fixed-fixed word per source row.
    fn pack_single_block(&mut self, rows: &[SynapticRow]) {
        let mut word = [0u8; 4];
        for row in rows {
            let value = row.fixed_fixed.first().copied().unwrap_or(0);
            LittleEndian::write_u32(&mut word, value);
            self.bytes.extend_from_slice(&word);
        }
    }

    fn align_to_block_boundary(&mut self) {
        let misalignment = self.bytes.len() % BLOCK_ALIGNMENT;
        if misalignment != 0 {
            let padding = BLOCK_ALIGNMENT - misalignment;
            self.bytes.resize(self.bytes.len() + padding, 0);
            self.padding_bytes += padding as u64;
        }
    }

    /// Closes the region, enforcing the reservation.
    pub fn finish(self) -> SynapticResult<PackedMatrix> {
        let actual = self.bytes.len() as u64;
        if actual > self.reserved_bytes {
            return Err(SynapticError::BlockGeneration {
                reserved: self.reserved_bytes,
                actual,
            });
        }
        info!(
            target: "synmap-synaptic",
            "synaptic matrix packed: {actual} of {} reserved bytes, {} padding",
            self.reserved_bytes, self.padding_bytes
        );
        Ok(PackedMatrix {
            bytes: self.bytes,
            blocks: self.blocks,
            padding_bytes: self.padding_bytes,
        })
    }
}

/// Reservation estimate for one block of `n_rows` rows whose longest row
/// carries `max_row_data_words` data words.
///
/// This is the same arithmetic the packer performs, so the partitioner's
/// SDRAM accounting and the packed result cannot drift apart.
pub fn estimate_block_bytes(n_rows: u32, max_row_data_words: u32) -> SynapticResult<u64> {
    let class = class_for_data_words(max_row_data_words.max(1))?;
    let row_words = (ROW_HEADER_WORDS + class_data_words(class)) as u64;
    let raw = n_rows as u64 * row_words * WORD_BYTES;
    Ok(raw.div_ceil(BLOCK_ALIGNMENT as u64) * BLOCK_ALIGNMENT as u64)
}

/// Reservation estimate for a whole matrix of `(n_rows, max_row_data_words)`
/// blocks.
pub fn estimate_matrix_bytes(
    blocks: impl IntoIterator<Item = (u32, u32)>,
) -> SynapticResult<u64> {
    let mut total = 0u64;
    for (n_rows, max_row_data_words) in blocks {
        total += estimate_block_bytes(n_rows, max_row_data_words)?;
    }
    Ok(total)
}

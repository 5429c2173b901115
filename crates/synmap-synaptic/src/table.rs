// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Master population table: per receiving core, the sorted, binary-searchable
index from routing key to where the source's synaptic block lives locally.

Persisted layout (little-endian):

```text
[n_entries]            1 word (u32)
[routing keys]         n_entries words, ascending
[packed entries]       n_entries u16s, zero-padded to a word boundary
```

Each packed entry is 16 bits: a 13-bit `block_start >> 7` field and a
3-bit row-length class. Block starts are 1024-byte aligned, so the shift
is lossless. The single-synapse flag is persisted as the reserved class 0.
*/

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;

use crate::error::{SynapticError, SynapticResult};
use crate::row_class::SINGLE_SYNAPSE_CLASS;

/// Multicast routing key identifying one admissible source.
pub type RoutingKey = u32;

/// Bits of the packed block-start field.
const BLOCK_FIELD_BITS: u32 = 13;
/// The block-start field stores `block_start >> 7`.
const BLOCK_FIELD_SHIFT: u32 = 7;
/// Required alignment of every block start.
const BLOCK_START_ALIGNMENT: u32 = 1024;

/// Largest representable block start: 13 bits of 128-byte units.
pub const MAX_BLOCK_START: u32 = ((1 << BLOCK_FIELD_BITS) - 1) << BLOCK_FIELD_SHIFT;

/// One table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableEntry {
    pub key: RoutingKey,
    /// Byte offset of the source's block, always a multiple of 1024
    pub block_start: u32,
    /// Row-length class index; 0 is the single-synapse marker
    pub row_class: u8,
    pub single_synapse: bool,
}

impl TableEntry {
    /// Packs the entry into its 16-bit persisted form.
    pub fn encode(&self) -> u16 {
        let field = (self.block_start >> BLOCK_FIELD_SHIFT) as u16;
        (field << 3) | (self.row_class as u16 & 0x7)
    }

    /// Unpacks a 16-bit persisted entry for `key`.
    pub fn decode(key: RoutingKey, raw: u16) -> Self {
        let row_class = (raw & 0x7) as u8;
        Self {
            key,
            block_start: ((raw >> 3) as u32) << BLOCK_FIELD_SHIFT,
            row_class,
            single_synapse: row_class == SINGLE_SYNAPSE_CLASS,
        }
    }
}

/// Sorted, binary-searchable routing-key index for one core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MasterPopulationTable {
    entries: Vec<TableEntry>,
}

impl MasterPopulationTable {
    /// Builds the table, sorting by key and checking every invariant.
    ///
    /// A non-1024-aligned block start is an internal invariant failure:
    /// it is unreachable with a correct packer.
    pub fn build(mut entries: Vec<TableEntry>) -> SynapticResult<Self> {
        entries.sort_by_key(|entry| entry.key);
        for pair in entries.windows(2) {
            if pair[0].key == pair[1].key {
                return Err(SynapticError::DuplicateKey(pair[0].key));
            }
        }
        for entry in &entries {
            if entry.block_start % BLOCK_START_ALIGNMENT != 0 {
                return Err(SynapticError::UnalignedBlock {
                    key: entry.key,
                    block_start: entry.block_start,
                });
            }
            if entry.block_start > MAX_BLOCK_START {
                return Err(SynapticError::BlockOutOfRange(entry.block_start));
            }
            let flagged = entry.row_class == SINGLE_SYNAPSE_CLASS;
            if flagged != entry.single_synapse || entry.row_class > 7 {
                return Err(SynapticError::Internal(format!(
                    "entry for key {:#010x} has row class {} with single_synapse={}",
                    entry.key, entry.row_class, entry.single_synapse
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Resolves a routing key in O(log m).
    pub fn resolve(&self, key: RoutingKey) -> Option<&TableEntry> {
        self.entries
            .binary_search_by_key(&key, |entry| entry.key)
            .ok()
            .map(|index| &self.entries[index])
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes the table in its persisted layout.
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::serialized_bytes(self.entries.len()) as usize);
        let mut word = [0u8; 4];
        LittleEndian::write_u32(&mut word, self.entries.len() as u32);
        bytes.extend_from_slice(&word);
        for entry in &self.entries {
            LittleEndian::write_u32(&mut word, entry.key);
            bytes.extend_from_slice(&word);
        }
        let mut half = [0u8; 2];
        for entry in &self.entries {
            LittleEndian::write_u16(&mut half, entry.encode());
            bytes.extend_from_slice(&half);
        }
        if self.entries.len() % 2 == 1 {
            bytes.extend_from_slice(&[0u8; 2]);
        }
        bytes
    }

    /// Reads back a serialized table. Used by loaders and layout tests.
    pub fn deserialize(bytes: &[u8]) -> SynapticResult<Self> {
        if bytes.len() < 4 {
            return Err(SynapticError::Deserialization(
                "table shorter than its count word".to_string(),
            ));
        }
        let n_entries = LittleEndian::read_u32(&bytes[0..4]) as usize;
        if bytes.len() < Self::serialized_bytes(n_entries) as usize {
            return Err(SynapticError::Deserialization(format!(
                "table of {n_entries} entries needs {} bytes, got {}",
                Self::serialized_bytes(n_entries),
                bytes.len()
            )));
        }
        let keys_end = 4 + n_entries * 4;
        let mut entries = Vec::with_capacity(n_entries);
        for index in 0..n_entries {
            let key = LittleEndian::read_u32(&bytes[4 + index * 4..8 + index * 4]);
            let raw = LittleEndian::read_u16(&bytes[keys_end + index * 2..keys_end + index * 2 + 2]);
            entries.push(TableEntry::decode(key, raw));
        }
        Self::build(entries)
    }

    /// Serialized size of an `n_entries` table, padding included.
    pub fn serialized_bytes(n_entries: usize) -> u64 {
        let entry_bytes = 2 * n_entries as u64;
        4 + 4 * n_entries as u64 + entry_bytes + (entry_bytes % 4)
    }
}

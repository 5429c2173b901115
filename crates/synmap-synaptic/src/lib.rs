// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
# synmap-synaptic

Byte-exact addressing structures for synaptic data on one receiving core:

- **Row-length classes**: the fixed ascending enumeration of row data
  lengths a consumer can recover from a 3-bit class index alone.
- **Synaptic rows**: the wire codec for one source unit's connections.
- **Synaptic matrix packer**: serializes per-source blocks contiguously,
  1024-byte aligned, against a fixed reservation.
- **Master population table**: the sorted, binary-searchable index from
  routing key to (block start, row-length class, single-synapse flag).

Determinism is a hard requirement: identical inputs produce byte-identical
regions, because the loader checksums them and on-chip firmware assumes an
exact layout contract.
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod image;
pub mod matrix;
pub mod row;
pub mod row_class;
pub mod table;

pub use error::{SynapticError, SynapticResult};
pub use image::CoreImage;
pub use matrix::{
    estimate_block_bytes, estimate_matrix_bytes, PackedBlock, PackedMatrix,
    SynapticMatrixPacker, BLOCK_ALIGNMENT,
};
pub use row::{SynapticRow, ROW_HEADER_WORDS};
pub use row_class::{
    class_data_words, class_for_data_words, ROW_LENGTH_CLASSES, SINGLE_SYNAPSE_CLASS,
};
pub use table::{MasterPopulationTable, RoutingKey, TableEntry};

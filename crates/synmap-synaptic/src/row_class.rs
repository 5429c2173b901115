// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Row-length classes.

Every block's rows are padded to one of a fixed ascending enumeration of
data lengths, so a consumer recovers the row stride from the 3-bit class
index alone. Classes measure row *data* words (plastic + fixed-fixed +
packed fixed-plastic); the 3 header words are constant and implicit.

Class 0 is reserved: it marks single-synapse blocks, whose rows are one
bare word each with no header. An ordinary block always has a max row
data length of at least 1, so class 0 is unreachable for it.
*/

use crate::error::{SynapticError, SynapticResult};

/// Fixed ascending enumeration of row data lengths, in words.
pub const ROW_LENGTH_CLASSES: [u32; 8] = [0, 1, 8, 16, 32, 64, 128, 256];

/// The reserved class index flagging a single-synapse block.
pub const SINGLE_SYNAPSE_CLASS: u8 = 0;

/// Smallest class whose length covers `words` of row data.
///
/// `words` must be at least 1: empty blocks are not admissible and
/// single-synapse blocks use [`SINGLE_SYNAPSE_CLASS`] directly.
pub fn class_for_data_words(words: u32) -> SynapticResult<u8> {
    if words == 0 {
        return Err(SynapticError::Internal(
            "row-length class requested for an empty block".to_string(),
        ));
    }
    for (index, &class_words) in ROW_LENGTH_CLASSES.iter().enumerate() {
        if class_words >= words {
            return Ok(index as u8);
        }
    }
    Err(SynapticError::RowTooLong(words))
}

/// Row data length of a class, in words.
pub fn class_data_words(class: u8) -> u32 {
    ROW_LENGTH_CLASSES[class as usize]
}

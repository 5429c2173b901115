// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Synaptic row wire codec.

One row holds one source unit's outgoing connections onto the receiving
core's slice, in little-endian 32-bit words:

```text
[n_plastic]                     1 word
[plastic words]                 n_plastic words
[n_fixed_fixed]                 1 word
[n_fixed_plastic]               1 word
[fixed-fixed words]             n_fixed_fixed words
[fixed-plastic half-words]      ceil(n_fixed_plastic / 2) words
[zero padding]                  up to the block's row-length class
```
*/

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;

use crate::error::{SynapticError, SynapticResult};

/// Words of per-row header: plastic count, fixed-fixed count, fixed-plastic count.
pub const ROW_HEADER_WORDS: u32 = 3;

const WORD_BYTES: usize = 4;

fn push_word(out: &mut Vec<u8>, value: u32) {
    let mut buf = [0u8; 4];
    LittleEndian::write_u32(&mut buf, value);
    out.extend_from_slice(&buf);
}

fn push_half_word(out: &mut Vec<u8>, value: u16) {
    let mut buf = [0u8; 2];
    LittleEndian::write_u16(&mut buf, value);
    out.extend_from_slice(&buf);
}

/// One source unit's outgoing connections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SynapticRow {
    /// Plastic synapse words (weights + plastic state)
    pub plastic_words: Vec<u32>,
    /// Fixed-fixed synapse words (static weight, delay, target index)
    pub fixed_fixed: Vec<u32>,
    /// Fixed-plastic control half-words (delay, target index)
    pub fixed_plastic: Vec<u16>,
}

impl SynapticRow {
    /// A purely static row.
    pub fn fixed(fixed_fixed: Vec<u32>) -> Self {
        Self { fixed_fixed, ..Self::default() }
    }

    /// Row data length in words, excluding the constant 3-word header.
    pub fn data_words(&self) -> u32 {
        self.plastic_words.len() as u32
            + self.fixed_fixed.len() as u32
            + (self.fixed_plastic.len() as u32).div_ceil(2)
    }

    /// True when the row is at most one static fixed-fixed synapse —
    /// the shape eligible for single-synapse packing.
    pub fn is_single_static(&self) -> bool {
        self.plastic_words.is_empty()
            && self.fixed_plastic.is_empty()
            && self.fixed_fixed.len() <= 1
    }

    /// Serializes the row padded to `class_words` of data.
    pub fn write_padded(&self, out: &mut Vec<u8>, class_words: u32) -> SynapticResult<()> {
        let data_words = self.data_words();
        if data_words > class_words {
            return Err(SynapticError::Internal(format!(
                "row of {data_words} data words offered to a class of {class_words} words"
            )));
        }

        let start = out.len();
        push_word(out, self.plastic_words.len() as u32);
        for &word in &self.plastic_words {
            push_word(out, word);
        }
        push_word(out, self.fixed_fixed.len() as u32);
        push_word(out, self.fixed_plastic.len() as u32);
        for &word in &self.fixed_fixed {
            push_word(out, word);
        }
        for &half in &self.fixed_plastic {
            push_half_word(out, half);
        }
        if self.fixed_plastic.len() % 2 == 1 {
            push_half_word(out, 0);
        }

        let target_bytes = (ROW_HEADER_WORDS + class_words) as usize * WORD_BYTES;
        out.resize(start + target_bytes, 0);
        Ok(())
    }
}

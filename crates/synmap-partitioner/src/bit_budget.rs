// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Bit-budget calculator.

A receiving core addresses its synaptic input accumulator with a fixed
[`RING_BUFFER_INDEX_BITS`]-bit index split into three fields: atom index,
synapse type index and delay ticks. This module answers whether a given
(atoms, types, delay) combination fits and how much delay the leftover
bits can represent. It never decides remediation — shrinking an input or
delegating excess delay is the splitter's call.
*/

use crate::error::{PartitionError, PartitionResult};

/// Fixed width of the ring-buffer index. A 2^14-entry 16-bit ring buffer
/// is the DTCM ceiling the substrate affords one core.
pub const RING_BUFFER_INDEX_BITS: u32 = 14;

/// Bits needed to index `x` distinct values: `ceil(log2(x))`, with
/// `bits_required(1) == 0`.
pub fn bits_required(x: u32) -> u32 {
    if x <= 1 {
        0
    } else {
        32 - (x - 1).leading_zeros()
    }
}

/// Total index bits consumed by a slice of `atoms` units with
/// `n_synapse_types` types and `max_delay_ticks` of addressable delay.
pub fn consumed_bits(atoms: u32, n_synapse_types: u32, max_delay_ticks: u32) -> u32 {
    bits_required(atoms) + bits_required(n_synapse_types) + bits_required(max_delay_ticks)
}

/// Pure fit check against the fixed index width.
pub fn check_fits(atoms: u32, n_synapse_types: u32, max_delay_ticks: u32) -> PartitionResult<()> {
    let consumed = consumed_bits(atoms, n_synapse_types, max_delay_ticks);
    if consumed > RING_BUFFER_INDEX_BITS {
        return Err(PartitionError::Configuration(format!(
            "{atoms} atoms, {n_synapse_types} synapse types and {max_delay_ticks} delay ticks \
             need {consumed} ring-buffer index bits, only {RING_BUFFER_INDEX_BITS} available"
        )));
    }
    Ok(())
}

/// Delay ticks representable by the bits left once atom and type fields
/// are fixed. Never less than one tick.
pub fn representable_delay(atoms: u32, n_synapse_types: u32) -> u32 {
    let used = bits_required(atoms) + bits_required(n_synapse_types);
    if used >= RING_BUFFER_INDEX_BITS {
        1
    } else {
        1 << (RING_BUFFER_INDEX_BITS - used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_required_edges() {
        assert_eq!(bits_required(1), 0);
        assert_eq!(bits_required(2), 1);
        assert_eq!(bits_required(3), 2);
        assert_eq!(bits_required(128), 7);
        assert_eq!(bits_required(129), 8);
    }

    #[test]
    fn reference_configuration_fits() {
        // 128 atoms (7) + 2 types (1) + 16 ticks (4) = 12 <= 14
        assert_eq!(consumed_bits(128, 2, 16), 12);
        check_fits(128, 2, 16).unwrap();
    }

    #[test]
    fn oversubscription_is_a_configuration_error() {
        // 1024 atoms (10) + 4 types (2) + 8 ticks (3) = 15 > 14
        let err = check_fits(1024, 4, 8).unwrap_err();
        assert!(matches!(err, PartitionError::Configuration(_)));
    }

    #[test]
    fn representable_delay_from_leftover_bits() {
        assert_eq!(representable_delay(128, 2), 64); // 14 - 8 = 6 bits
        assert_eq!(representable_delay(8192, 2), 1); // no bits left
        assert_eq!(representable_delay(1, 1), 1 << 14);
    }
}

// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Weight-scaling calculator ("ring-buffer shifts").

Synaptic weights are accumulated in a 16-bit fixed-point ring buffer. For
each synapse type this module derives the shift that keeps the worst-case
simultaneous summed weight — every incoming connection firing at its
maximum configured weight — inside the accumulator while spending as many
bits as possible on precision:

```text
shift        = max(0, ceil(log2(max(1, max_summed_weight))))
weight_scale = 2^(WEIGHT_FRAC_BITS - shift - 1)
```

With that scale, `round(w * weight_scale)` never exceeds
[`MAX_ACCUMULATOR_MAGNITUDE`] for any admissible `w`; one bit less shift
would overflow at the bound.
*/

use crate::projection::IncomingProjection;

/// Fractional bits of the 16-bit weight accumulator.
pub const WEIGHT_FRAC_BITS: u32 = 16;

/// Largest magnitude the accumulator may reach: one headroom bit below
/// the 16-bit ceiling.
pub const MAX_ACCUMULATOR_MAGNITUDE: u64 = 1 << (WEIGHT_FRAC_BITS - 1);

/// Fixed-point scale for a given shift.
pub fn weight_scale(shift: u32) -> f64 {
    2f64.powi(WEIGHT_FRAC_BITS as i32 - shift as i32 - 1)
}

fn shift_for_summed_weight(max_sum: f64) -> u32 {
    if max_sum <= 1.0 {
        0
    } else {
        max_sum.log2().ceil() as u32
    }
}

/// Per-synapse-type ring-buffer shifts for all projections landing on one
/// core.
///
/// The worst case assumes every connection of a type fires in the same
/// tick at its maximum weight magnitude; excitatory and inhibitory inputs
/// are separate synapse types and so get independent shifts. A type with
/// no incoming weight gets shift 0.
pub fn ring_buffer_shifts(incoming: &[IncomingProjection], n_synapse_types: u32) -> Vec<u32> {
    let mut max_sums = vec![0f64; n_synapse_types as usize];
    for projection in incoming {
        let synapse_type = projection.descriptor.synapse_type() as usize;
        let fanin = projection
            .descriptor
            .connector()
            .max_incoming(projection.source_size) as f64;
        max_sums[synapse_type] += projection.descriptor.weight().max_abs() * fanin;
    }
    max_sums.into_iter().map(shift_for_summed_weight).collect()
}

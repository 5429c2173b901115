// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Per-core cost formulas feeding the splitter's resource accounting.

Matrix and table sizes come from `synmap-synaptic`'s own estimators, so
the reservation the splitter books and the bytes the packer writes share
one source of truth. The remaining constants are the substrate's
per-atom costs.
*/

use synmap_structures::{ResourceUsage, Slice};
use synmap_synaptic::{estimate_matrix_bytes, MasterPopulationTable};

use crate::bit_budget;
use crate::error::PartitionResult;
use crate::projection::IncomingProjection;

pub(crate) const NEURON_PARAMS_BYTES_PER_ATOM: u64 = 32;
pub(crate) const NEURON_DTCM_BYTES_PER_ATOM: u64 = 48;
pub(crate) const NEURON_CYCLES_PER_ATOM_PER_TICK: u64 = 120;
pub(crate) const SYNAPSE_EVENT_CYCLES: u64 = 34;
pub(crate) const TICK_OVERHEAD_CYCLES: u64 = 2_000;
/// Reference block a shared synapse core keeps instead of its own copy
pub(crate) const SYNAPSE_REFERENCE_BYTES: u64 = 1_024;
/// Extra pre-synaptic trace word per plastic row
const STDP_PRE_TRACE_WORDS: u32 = 1;
/// Spare row words reserved for runtime rewiring
const STRUCTURAL_SPARE_ROW_WORDS: u32 = 4;

/// Worst-case row data words one source row of `projection` can carry
/// onto a slice of `slice_len` units.
pub(crate) fn max_row_data_words(projection: &IncomingProjection, slice_len: u32) -> u32 {
    let synapses = projection.descriptor.connector().max_row_synapses(slice_len);
    match projection.descriptor.dynamics() {
        d if d.is_structural() => synapses + STRUCTURAL_SPARE_ROW_WORDS,
        d if d.is_static() => synapses,
        // plastic: one plastic word per synapse plus the pre-trace, and
        // one control half-word per synapse
        _ => synapses + STDP_PRE_TRACE_WORDS + synapses.div_ceil(2),
    }
}

/// SDRAM reservation for the slice's synaptic matrix.
pub(crate) fn matrix_reservation(
    slice_len: u32,
    admissible: &[&IncomingProjection],
) -> PartitionResult<u64> {
    let blocks = admissible
        .iter()
        .map(|p| (p.source_size, max_row_data_words(p, slice_len)));
    Ok(estimate_matrix_bytes(blocks)?)
}

/// Costs of neuron state update for one slice.
pub(crate) fn neuron_core_usage(slice: Slice) -> ResourceUsage {
    let atoms = slice.len() as u64;
    let mut usage = ResourceUsage::new();
    usage.add_sdram("neuron_params", atoms * NEURON_PARAMS_BYTES_PER_ATOM);
    // double-buffered per-tick spike recording, one bit per atom, word padded
    let record_bytes = atoms.div_ceil(32) * 4;
    usage.nest_sdram("spike_recording", record_bytes, 2);
    usage.add_dtcm("neuron_state", atoms * NEURON_DTCM_BYTES_PER_ATOM);
    usage.add_cpu_cycles(atoms * NEURON_CYCLES_PER_ATOM_PER_TICK + TICK_OVERHEAD_CYCLES);
    usage
}

/// Costs of synapse processing for one slice on one core.
///
/// The lead core owns the serialized table and matrix; shared cores hold
/// only a fixed-size reference block.
pub(crate) fn synapse_core_usage(
    lead: bool,
    slice: Slice,
    admissible: &[&IncomingProjection],
    n_synapse_types: u32,
    supported_delay_ticks: u32,
) -> PartitionResult<ResourceUsage> {
    let mut usage = ResourceUsage::new();

    // 16-bit ring buffer indexed by (atom, type, delay)
    let index_bits =
        bit_budget::consumed_bits(slice.len(), n_synapse_types, supported_delay_ticks);
    usage.add_dtcm("ring_buffer", 2u64 << index_bits);

    if lead {
        usage.add_sdram("synaptic_matrix", matrix_reservation(slice.len(), admissible)?);
        usage.add_sdram(
            "master_pop_table",
            MasterPopulationTable::serialized_bytes(admissible.len()),
        );
    } else {
        usage.add_sdram("synaptic_refs", SYNAPSE_REFERENCE_BYTES);
    }

    let worst_events: u64 = admissible
        .iter()
        .map(|p| p.descriptor.connector().max_row_synapses(slice.len()) as u64)
        .sum();
    usage.add_cpu_cycles(worst_events * SYNAPSE_EVENT_CYCLES + TICK_OVERHEAD_CYCLES);
    Ok(usage)
}

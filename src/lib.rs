// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

//! # Synmap - Partitioning & Addressing for Manycore Neural Substrates
//!
//! Synmap turns population-level network descriptions into per-core work
//! assignments for a manycore substrate with fixed per-core budgets: it
//! slices populations, splits synapse and neuron processing across cores,
//! checks every slice against the 16-bit ring-buffer addressing budget,
//! delegates excess delay to relay stages, scales weights into fixed
//! point, and serializes the master population table and synaptic matrix
//! blocks each core loads at boot.
//!
//! ## Crates
//!
//! - [`structures`]: populations, slices, connection descriptors,
//!   resource accounting, mapping configuration
//! - [`partitioner`]: bit budget, weight scaling, slice planner, delay
//!   delegation and the per-population splitter
//! - [`synaptic`]: row classes, master population table and synaptic
//!   matrix serialization, per-core image assembly
//!
//! ## Quick Start
//!
//! ```rust
//! use synmap::prelude::*;
//!
//! let mut pop = Population::new(PopulationId(0), "excitatory", 300, 2)?;
//! pop.set_max_atoms_per_core(128)?;
//!
//! let mut splitter = PopulationSplitter::new(
//!     pop,
//!     SplitMode::Unsplit,
//!     MappingConfig::default(),
//!     vec![],
//! )?;
//! let plan = splitter.plan()?;
//! assert_eq!(plan.assignments.len(), 3);
//! # Ok::<(), synmap::partitioner::PartitionError>(())
//! ```

pub use synmap_partitioner as partitioner;
pub use synmap_structures as structures;
pub use synmap_synaptic as synaptic;

/// Everything a mapping pass typically needs.
pub mod prelude {
    pub use synmap_partitioner::{
        bits_required, consumed_bits, representable_delay, ring_buffer_shifts, weight_scale,
        ComputedDelay, DelayRelayRequest, IncomingProjection, PartitionError, PartitionResult,
        PopulationSplitter, SlicePlanner, SplitMode, SplitPlan, RING_BUFFER_INDEX_BITS,
    };
    pub use synmap_structures::{
        ConnectionDescriptor, ConnectorRule, CoreAssignment, CoreBudget, CoreRole, DelayRangeMs,
        MappingConfig, Population, PopulationId, PopulationKind, ResourceUsage, Slice,
        SynapseDynamics, WeightBounds,
    };
    pub use synmap_synaptic::{
        CoreImage, MasterPopulationTable, PackedMatrix, SynapticMatrixPacker, SynapticRow,
        TableEntry,
    };
}

/// Version of the umbrella crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

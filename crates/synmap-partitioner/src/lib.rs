// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
# synmap-partitioner

The partitioning half of the synmap engine:

- **Bit-budget calculator**: does a slice fit the fixed-width ring-buffer
  index once atoms, synapse types and delay are encoded?
- **Weight-scaling calculator**: per-synapse-type fixed-point shifts that
  keep worst-case summed weights inside the 16-bit accumulator.
- **Slice planner**: deterministic, cached division of a population into
  contiguous per-core index ranges.
- **Delay delegation**: auxiliary relay stages for delays beyond one
  core's addressable window.
- **Population splitter**: the per-population state machine deciding
  combined vs. distributed synapse processing and emitting one immutable
  [`SplitPlan`] per mapping pass.

A splitter instance is exclusively owned by one mapping pass. Splitters of
different populations share no state and may run in parallel externally.
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod bit_budget;
pub mod delay;
pub mod error;
mod estimates;
pub mod projection;
pub mod slice_planner;
pub mod splitter;
pub mod weight_scale;

pub use bit_budget::{
    bits_required, check_fits, consumed_bits, representable_delay, RING_BUFFER_INDEX_BITS,
};
pub use delay::{needs_delegation, plan_relay, DelayRelayPlan, MAX_DELAY_STAGES};
pub use error::{PartitionError, PartitionResult};
pub use projection::IncomingProjection;
pub use slice_planner::SlicePlanner;
pub use splitter::{
    ComputedDelay, DelayRelayRequest, EdgeEndpoint, EdgeKind, InternalEdge,
    PopulationSplitter, SameChipGroup, SplitMode, SplitPlan,
};
pub use weight_scale::{
    ring_buffer_shifts, weight_scale, MAX_ACCUMULATOR_MAGNITUDE, WEIGHT_FRAC_BITS,
};

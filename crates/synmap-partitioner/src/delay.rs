// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Delay delegation.

When a projection needs more delay than the receiving core's ring buffer
can address, an auxiliary relay re-times spikes in `representable`-sized
stages, one stage per additional `representable`-tick window, up to a
fixed stage cap. Relay addressing is independent of, but index-aligned
with, the source population's slices.

Everything here is a pure function of its inputs: unchanged inputs
reproduce the same stage count after any number of `reset()`s.
*/

use serde::Serialize;

use crate::error::{PartitionError, PartitionResult};

/// Fixed cap on relay stages — the relay's re-timing buffer is finite.
pub const MAX_DELAY_STAGES: u32 = 8;

/// A requested auxiliary relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DelayRelayPlan {
    /// Number of re-timing stages, including the window the receiving
    /// core addresses itself
    pub n_stages: u32,
    /// Ticks re-timed per stage
    pub stage_ticks: u32,
}

/// Does `required` delay exceed what one core can address?
pub fn needs_delegation(required_ticks: u32, representable_ticks: u32) -> bool {
    required_ticks > representable_ticks
}

/// Plans a relay for `required` ticks of delay against a
/// `representable`-tick window. Returns `None` when no relay is needed.
///
/// Silent truncation is forbidden: excess that cannot be routed within
/// the stage cap is a fatal configuration error.
pub fn plan_relay(
    population_label: &str,
    required_ticks: u32,
    representable_ticks: u32,
) -> PartitionResult<Option<DelayRelayPlan>> {
    if !needs_delegation(required_ticks, representable_ticks) {
        return Ok(None);
    }
    let n_stages = required_ticks.div_ceil(representable_ticks);
    if n_stages > MAX_DELAY_STAGES {
        return Err(PartitionError::Configuration(format!(
            "population '{population_label}' needs {required_ticks} ticks of delay; \
             {n_stages} relay stages of {representable_ticks} ticks exceed the cap of \
             {MAX_DELAY_STAGES}"
        )));
    }
    Ok(Some(DelayRelayPlan { n_stages, stage_ticks: representable_ticks }))
}

// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Connection descriptors: one projection between two populations.

A descriptor carries the connector rule, the delay and weight bounds and
the synapse dynamics tag. The partitioner only ever reads descriptors; it
never mutates them.
*/

use serde::{Deserialize, Serialize};

use crate::error::{SynmapDataError, SynmapDataResult};
use crate::population::PopulationId;

/// How source units connect to target units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConnectorRule {
    /// Source unit i connects to target unit i
    OneToOne,
    /// Every source unit connects to every target unit
    AllToAll,
    /// Each (source, target) pair connects with probability `p`
    FixedProbability(f64),
    /// Explicit connection list, summarized by its fan bounds
    FromList {
        /// Largest number of connections landing on one target unit
        max_fanin: u32,
        /// Largest number of connections leaving one source unit
        max_fanout: u32,
    },
}

impl ConnectorRule {
    /// Worst-case number of connections onto one target unit.
    ///
    /// Used by the weight-scaling analysis, which assumes every incoming
    /// connection fires simultaneously at its maximum weight.
    pub fn max_incoming(&self, source_size: u32) -> u32 {
        match self {
            ConnectorRule::OneToOne => 1,
            ConnectorRule::AllToAll => source_size,
            // worst case: every pair connects
            ConnectorRule::FixedProbability(_) => source_size,
            ConnectorRule::FromList { max_fanin, .. } => (*max_fanin).min(source_size),
        }
    }

    /// Worst-case number of synapses one source row can carry onto a
    /// target slice of `slice_len` units. Drives matrix sizing.
    pub fn max_row_synapses(&self, slice_len: u32) -> u32 {
        match self {
            ConnectorRule::OneToOne => 1,
            ConnectorRule::AllToAll => slice_len,
            ConnectorRule::FixedProbability(_) => slice_len,
            ConnectorRule::FromList { max_fanout, .. } => (*max_fanout).min(slice_len),
        }
    }
}

/// Configured delay bounds in milliseconds. Invariant: at least one tick
/// once converted, enforced by the splitter's ms-to-ticks conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayRangeMs {
    min_ms: f64,
    max_ms: f64,
}

impl DelayRangeMs {
    pub fn new(min_ms: f64, max_ms: f64) -> SynmapDataResult<Self> {
        if !(min_ms > 0.0) || !(max_ms >= min_ms) {
            return Err(SynmapDataError::BadParameters(format!(
                "delay range [{min_ms}, {max_ms}] ms must be positive and ordered"
            )));
        }
        Ok(Self { min_ms, max_ms })
    }

    pub fn min_ms(&self) -> f64 {
        self.min_ms
    }

    pub fn max_ms(&self) -> f64 {
        self.max_ms
    }
}

/// Configured weight magnitude bound for one projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightBounds {
    max_abs: f64,
}

impl WeightBounds {
    pub fn new(max_abs: f64) -> SynmapDataResult<Self> {
        if !(max_abs >= 0.0) || !max_abs.is_finite() {
            return Err(SynmapDataError::BadParameters(format!(
                "weight bound {max_abs} must be finite and non-negative"
            )));
        }
        Ok(Self { max_abs })
    }

    pub fn max_abs(&self) -> f64 {
        self.max_abs
    }
}

/// Synapse dynamics as a closed tagged variant.
///
/// The splitter switches on the tag through the capability queries below,
/// never on type identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SynapseDynamics {
    /// Fixed weights
    Static,
    /// Spike-timing-dependent plasticity
    Stdp { tau_plus_ms: f64, tau_minus_ms: f64 },
    /// Structural plasticity: synapses are rewired at runtime
    Structural { max_rewires_per_tick: u32 },
}

impl SynapseDynamics {
    pub fn is_static(&self) -> bool {
        matches!(self, SynapseDynamics::Static)
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, SynapseDynamics::Structural { .. })
    }

    /// Non-static dynamics need post-synaptic timing, delivered over a
    /// feedback multicast path from the neuron core to every synapse core.
    pub fn requires_feedback_edge(&self) -> bool {
        !self.is_static()
    }

    pub fn max_rewires_per_tick(&self) -> Option<u32> {
        match self {
            SynapseDynamics::Structural { max_rewires_per_tick } => Some(*max_rewires_per_tick),
            _ => None,
        }
    }
}

/// One projection between two populations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    source: PopulationId,
    target: PopulationId,
    connector: ConnectorRule,
    /// Index into the target population's synapse types
    synapse_type: u32,
    delay: DelayRangeMs,
    weight: WeightBounds,
    dynamics: SynapseDynamics,
}

impl ConnectionDescriptor {
    pub fn new(
        source: PopulationId,
        target: PopulationId,
        connector: ConnectorRule,
        synapse_type: u32,
        delay: DelayRangeMs,
        weight: WeightBounds,
        dynamics: SynapseDynamics,
    ) -> Self {
        Self {
            source,
            target,
            connector,
            synapse_type,
            delay,
            weight,
            dynamics,
        }
    }

    pub fn source(&self) -> PopulationId {
        self.source
    }

    pub fn target(&self) -> PopulationId {
        self.target
    }

    pub fn connector(&self) -> &ConnectorRule {
        &self.connector
    }

    pub fn synapse_type(&self) -> u32 {
        self.synapse_type
    }

    pub fn delay(&self) -> &DelayRangeMs {
        &self.delay
    }

    pub fn weight(&self) -> &WeightBounds {
        &self.weight
    }

    pub fn dynamics(&self) -> &SynapseDynamics {
        &self.dynamics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connector_fan_bounds() {
        assert_eq!(ConnectorRule::OneToOne.max_incoming(1000), 1);
        assert_eq!(ConnectorRule::AllToAll.max_incoming(1000), 1000);
        assert_eq!(ConnectorRule::FixedProbability(0.1).max_incoming(1000), 1000);
        let list = ConnectorRule::FromList { max_fanin: 12, max_fanout: 40 };
        assert_eq!(list.max_incoming(1000), 12);
        assert_eq!(list.max_row_synapses(30), 30);
        assert_eq!(list.max_row_synapses(100), 40);
    }

    #[test]
    fn dynamics_capabilities() {
        assert!(!SynapseDynamics::Static.requires_feedback_edge());
        let stdp = SynapseDynamics::Stdp { tau_plus_ms: 20.0, tau_minus_ms: 20.0 };
        assert!(stdp.requires_feedback_edge());
        assert!(!stdp.is_structural());
        let structural = SynapseDynamics::Structural { max_rewires_per_tick: 4 };
        assert!(structural.is_structural());
        assert_eq!(structural.max_rewires_per_tick(), Some(4));
    }

    #[test]
    fn delay_range_validation() {
        assert!(DelayRangeMs::new(0.0, 1.0).is_err());
        assert!(DelayRangeMs::new(2.0, 1.0).is_err());
        assert!(DelayRangeMs::new(1.0, 37.0).is_ok());
    }
}

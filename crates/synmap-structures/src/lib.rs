// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
# synmap-structures

Foundation data model for the synmap partitioning engine:
- Populations, slices and core assignments
- Connection descriptors and synapse dynamics
- Per-core resource budgets and named resource usage
- Mapping configuration

This crate is pure data: no logging, no I/O, no engine logic. The
partitioning rules that consume these types live in `synmap-partitioner`
and `synmap-synaptic`.
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod assignment;
pub mod config;
pub mod connection;
pub mod error;
pub mod population;
pub mod resources;
pub mod slice;

pub use assignment::{CoreAssignment, CoreRole};
pub use config::{MappingConfig, SplittingConfig, TimingConfig};
pub use connection::{
    ConnectionDescriptor, ConnectorRule, DelayRangeMs, SynapseDynamics, WeightBounds,
};
pub use error::{SynmapDataError, SynmapDataResult};
pub use population::{Population, PopulationId, PopulationKind, DEFAULT_MAX_ATOMS_PER_CORE};
pub use resources::{
    CoreBudget, NestedLayout, ResourceDimension, ResourceOverflow, ResourceUsage,
};
pub use slice::Slice;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_imports() {
        // Just test that re-exports work together
        let pop = Population::new(PopulationId(0), "smoke", 10, 1).unwrap();
        assert_eq!(pop.size(), 10);
    }
}

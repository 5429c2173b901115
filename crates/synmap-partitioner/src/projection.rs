// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Incoming projections: one connection descriptor paired with what the
splitter needs to know about its source population. The projection list a
splitter is built from must be final — delay and scaling decisions are
validated against the complete set.
*/

use serde::Serialize;
use synmap_structures::{ConnectionDescriptor, ConnectorRule, PopulationKind};

/// One projection landing on the population being split.
#[derive(Debug, Clone, Serialize)]
pub struct IncomingProjection {
    pub descriptor: ConnectionDescriptor,
    /// Size of the source population
    pub source_size: u32,
    pub source_kind: PopulationKind,
    /// Whether the source's own splitter can deliver spikes in bulk,
    /// bypassing multicast
    pub source_supports_bulk_delivery: bool,
}

impl IncomingProjection {
    /// One-to-one static input from a bulk-capable Poisson source is
    /// inlined into the target's bulk-delivery channel: no multicast hop,
    /// no table entry, no matrix block.
    pub fn is_bulk_inlined(&self) -> bool {
        matches!(self.descriptor.connector(), ConnectorRule::OneToOne)
            && self.descriptor.dynamics().is_static()
            && self.source_kind == PopulationKind::PoissonSource
            && self.source_supports_bulk_delivery
    }
}

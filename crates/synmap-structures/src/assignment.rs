// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Core assignments: one `(slice, role)` pair bound to one core with its
resource usage. Produced by the splitter, consumed by the external placer.
*/

use serde::{Deserialize, Serialize};

use crate::population::PopulationId;
use crate::resources::ResourceUsage;
use crate::slice::Slice;

/// The role a core plays for its slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoreRole {
    /// Neuron state update (combined synapse processing when unsplit)
    Neuron,
    /// Synapse core owning and serializing the table and matrix
    LeadSynapse,
    /// Synapse core holding only references to the lead's data
    SharedSynapse(u32),
}

impl CoreRole {
    pub fn is_synapse(&self) -> bool {
        matches!(self, CoreRole::LeadSynapse | CoreRole::SharedSynapse(_))
    }
}

impl std::fmt::Display for CoreRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreRole::Neuron => write!(f, "neuron"),
            CoreRole::LeadSynapse => write!(f, "lead-synapse"),
            CoreRole::SharedSynapse(i) => write!(f, "shared-synapse-{i}"),
        }
    }
}

/// One unit of work bound to one physical core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreAssignment {
    pub population: PopulationId,
    pub slice: Slice,
    pub role: CoreRole,
    pub resources: ResourceUsage,
}

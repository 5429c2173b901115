// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Populations: ordered collections of homogeneous simulated units.

A population is created at description time and consumed once per mapping
pass. The `max_atoms_per_core` ceiling stays settable until the first
mapping pass calls [`Population::freeze`]; afterwards any mutation fails
with [`SynmapDataError::FrozenPopulation`].
*/

use serde::{Deserialize, Serialize};

use crate::error::{SynmapDataError, SynmapDataResult};

/// Default per-core atom ceiling when the description does not set one.
pub const DEFAULT_MAX_ATOMS_PER_CORE: u32 = 256;

/// Stable identifier of a population within one network description.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PopulationId(pub u32);

impl std::fmt::Display for PopulationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pop{}", self.0)
    }
}

/// What the population's units are.
///
/// The splitter treats Poisson spike sources specially: one-to-one static
/// projections from them can be inlined into the target's bulk-delivery
/// channel instead of taking a multicast hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopulationKind {
    /// Simulated neurons with state updated every tick
    Neurons,
    /// Poisson-process spike source units
    PoissonSource,
}

/// An application-level population of N homogeneous units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Population {
    id: PopulationId,
    label: String,
    size: u32,
    /// Optional grid shape, outermost dimension first; product must equal `size`
    shape: Option<Vec<u32>>,
    kind: PopulationKind,
    n_synapse_types: u32,
    max_atoms_per_core: u32,
    frozen: bool,
}

impl Population {
    /// Creates a population of `size` units with `n_synapse_types` synapse types.
    pub fn new(
        id: PopulationId,
        label: &str,
        size: u32,
        n_synapse_types: u32,
    ) -> SynmapDataResult<Self> {
        if size == 0 {
            return Err(SynmapDataError::BadParameters(format!(
                "population '{label}' must have at least one unit"
            )));
        }
        if n_synapse_types == 0 {
            return Err(SynmapDataError::BadParameters(format!(
                "population '{label}' must have at least one synapse type"
            )));
        }
        Ok(Self {
            id,
            label: label.to_string(),
            size,
            shape: None,
            kind: PopulationKind::Neurons,
            n_synapse_types,
            max_atoms_per_core: DEFAULT_MAX_ATOMS_PER_CORE,
            frozen: false,
        })
    }

    /// Sets the population kind. Builder-style, description time only.
    pub fn with_kind(mut self, kind: PopulationKind) -> Self {
        self.kind = kind;
        self
    }

    /// Attaches a grid shape (outermost dimension first).
    ///
    /// The slice planner uses the shape to keep slice boundaries on whole
    /// sub-grid rows.
    pub fn with_shape(mut self, shape: Vec<u32>) -> SynmapDataResult<Self> {
        let product: u64 = shape.iter().map(|&d| d as u64).product();
        if shape.is_empty() || shape.contains(&0) || product != self.size as u64 {
            return Err(SynmapDataError::BadParameters(format!(
                "shape {:?} does not describe {} units",
                shape, self.size
            )));
        }
        self.shape = Some(shape);
        Ok(self)
    }

    /// Sets the per-core atom ceiling. Fails after [`Population::freeze`].
    pub fn set_max_atoms_per_core(&mut self, max_atoms: u32) -> SynmapDataResult<()> {
        if self.frozen {
            return Err(SynmapDataError::FrozenPopulation(self.label.clone()));
        }
        if max_atoms == 0 {
            return Err(SynmapDataError::BadParameters(
                "max_atoms_per_core must be at least 1".to_string(),
            ));
        }
        self.max_atoms_per_core = max_atoms;
        Ok(())
    }

    /// Freezes the population for mapping. Idempotent.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn id(&self) -> PopulationId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn shape(&self) -> Option<&[u32]> {
        self.shape.as_deref()
    }

    pub fn kind(&self) -> PopulationKind {
        self.kind
    }

    pub fn n_synapse_types(&self) -> u32 {
        self.n_synapse_types
    }

    pub fn max_atoms_per_core(&self) -> u32 {
        self.max_atoms_per_core
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Synapse/neuron core splitter — the central per-population state machine.

Each slice of a population runs either on one core (`Unsplit`) or on a
group of cooperating cores (`Split`): one neuron core fed by `n` synapse
cores, where core 0 is the Lead owning the serialized table and matrix
and cores 1..n hold only references. The splitter validates dynamics
against the mode, derives the supported delay window, requests delay
relays for the excess, accounts resources per core and per same-chip
group, and emits everything as one immutable [`SplitPlan`].

A splitter is built from the *finalized* incoming projection list; delay
decisions are validated against the complete set rather than guessed
during construction. One instance serves one mapping pass; `reset()`
starts the next generation.
*/

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use synmap_structures::{
    CoreAssignment, CoreRole, MappingConfig, Population, PopulationId, ResourceUsage, Slice,
};

use crate::bit_budget;
use crate::delay;
use crate::error::{PartitionError, PartitionResult};
use crate::estimates;
use crate::projection::IncomingProjection;
use crate::slice_planner::SlicePlanner;
use crate::weight_scale;

/// Combined or distributed synapse processing for every slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SplitMode {
    /// One core per slice does both synapse and neuron work
    Unsplit,
    /// One neuron core plus `n_synapse_cores` synapse cores per slice
    Split { n_synapse_cores: u32 },
}

/// Delivery paths the splitter wires between cores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EdgeKind {
    /// Synapse core hands accumulated input to its neuron core
    SynapticContribution,
    /// Neuron core feeds post-synaptic timing back to a synapse core
    PostSynapticFeedback,
    /// Bulk spike delivery inlined from a source population, no multicast
    BulkDelivery,
}

/// Endpoint of an internal delivery path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EdgeEndpoint {
    /// Index into [`SplitPlan::assignments`]
    Core(usize),
    /// An external population (bulk-delivery sources)
    Population(PopulationId),
}

/// One required inter-core delivery path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InternalEdge {
    pub from: EdgeEndpoint,
    pub to: EdgeEndpoint,
    pub kind: EdgeKind,
}

/// Cores of one split slice that must land on the same chip, with the
/// group-total resource constraint the placer must honor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SameChipGroup {
    /// Indices into [`SplitPlan::assignments`]
    pub members: Vec<usize>,
    pub total: ResourceUsage,
}

/// A relay request for one source population needing more delay than the
/// supported window. Relay slices are index-aligned with the source's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DelayRelayRequest {
    pub source: PopulationId,
    pub n_stages: u32,
    pub stage_ticks: u32,
}

/// The derived delay state, explicit rather than ambient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComputedDelay {
    /// Largest delay any projection asks for, in ticks
    pub required_ticks: u32,
    /// What the ring-buffer index can address once atom/type bits are fixed
    pub representable_ticks: u32,
    /// Window the cores will actually run with
    pub supported_ticks: u32,
}

/// Immutable result of one splitting pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitPlan {
    pub assignments: Vec<CoreAssignment>,
    pub groups: Vec<SameChipGroup>,
    pub edges: Vec<InternalEdge>,
    pub delay_relays: Vec<DelayRelayRequest>,
    /// Per-synapse-type fixed-point shifts
    pub ring_buffer_shifts: Vec<u32>,
    pub delay: ComputedDelay,
}

/// Per-population splitting state machine. Exclusively owned by one
/// mapping pass; not re-entrant within a generation.
#[derive(Debug)]
pub struct PopulationSplitter {
    population: Population,
    mode: SplitMode,
    config: MappingConfig,
    incoming: Vec<IncomingProjection>,
    planner: SlicePlanner,
    computed_delay: Option<ComputedDelay>,
    cached_plan: Option<Arc<SplitPlan>>,
}

impl PopulationSplitter {
    /// Builds a splitter over a finalized projection list and freezes the
    /// population's per-core ceiling.
    pub fn new(
        mut population: Population,
        mode: SplitMode,
        config: MappingConfig,
        incoming: Vec<IncomingProjection>,
    ) -> PartitionResult<Self> {
        if let SplitMode::Split { n_synapse_cores } = mode {
            if n_synapse_cores == 0 {
                return Err(PartitionError::Configuration(format!(
                    "population '{}': split mode needs at least one synapse core",
                    population.label()
                )));
            }
        }
        if !(config.timing.tick_duration_ms > 0.0) {
            return Err(PartitionError::Configuration(format!(
                "tick duration {} ms must be positive",
                config.timing.tick_duration_ms
            )));
        }
        for projection in &incoming {
            if projection.descriptor.target() != population.id() {
                return Err(PartitionError::Configuration(format!(
                    "projection onto {} offered to the splitter of '{}'",
                    projection.descriptor.target(),
                    population.label()
                )));
            }
            if projection.descriptor.synapse_type() >= population.n_synapse_types() {
                return Err(PartitionError::Configuration(format!(
                    "population '{}': synapse type {} out of range ({} types)",
                    population.label(),
                    projection.descriptor.synapse_type(),
                    population.n_synapse_types()
                )));
            }
        }
        population.freeze();
        Ok(Self {
            population,
            mode,
            config,
            incoming,
            planner: SlicePlanner::new(),
            computed_delay: None,
            cached_plan: None,
        })
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn mode(&self) -> SplitMode {
        self.mode
    }

    /// The derived delay state, once `plan()` has computed it.
    pub fn computed_delay(&self) -> Option<ComputedDelay> {
        self.computed_delay
    }

    /// Whether this population's cores can deliver spikes in bulk to a
    /// one-to-one target, letting the target skip a multicast hop.
    pub fn supports_bulk_delivery(&self) -> bool {
        self.population.kind() == synmap_structures::PopulationKind::PoissonSource
            && self.mode == SplitMode::Unsplit
    }

    /// Projections that need a table entry and matrix block (everything
    /// not inlined into the bulk-delivery channel).
    pub fn admissible_projections(&self) -> Vec<&IncomingProjection> {
        self.incoming.iter().filter(|p| !p.is_bulk_inlined()).collect()
    }

    /// Drops the cached plan and derived delay. Starts a new mapping
    /// generation; unchanged inputs re-plan identically.
    pub fn reset(&mut self) {
        self.cached_plan = None;
        self.computed_delay = None;
        self.planner.reset();
    }

    /// Drops only the derived delay state.
    pub fn invalidate_delay(&mut self) {
        self.computed_delay = None;
        self.cached_plan = None;
    }

    /// Runs (or returns the cached result of) one splitting pass.
    ///
    /// Any violation is fatal and reported before mapping proceeds; no
    /// partial plan is ever produced.
    pub fn plan(&mut self) -> PartitionResult<Arc<SplitPlan>> {
        if let Some(plan) = &self.cached_plan {
            return Ok(plan.clone());
        }

        self.validate_dynamics()?;
        let computed = match self.computed_delay {
            Some(computed) => computed,
            None => {
                let computed = self.compute_delay()?;
                self.computed_delay = Some(computed);
                computed
            }
        };
        let delay_relays = self.relay_requests(computed)?;
        let shifts =
            weight_scale::ring_buffer_shifts(&self.incoming, self.population.n_synapse_types());

        let slices = self.planner.plan(&self.population);
        let max_atoms = slices.iter().map(Slice::len).max().unwrap_or(0);
        bit_budget::check_fits(
            max_atoms,
            self.population.n_synapse_types(),
            computed.supported_ticks,
        )
        .map_err(|err| self.with_context(err))?;

        let plan = self.build_plan(&slices, computed, delay_relays, shifts)?;
        info!(
            target: "synmap-partitioner",
            "population '{}': {} slices, {} assignments, {} groups, {} relays",
            self.population.label(),
            slices.len(),
            plan.assignments.len(),
            plan.groups.len(),
            plan.delay_relays.len()
        );
        let plan = Arc::new(plan);
        self.cached_plan = Some(plan.clone());
        Ok(plan)
    }

    /// Structural plasticity rewires rows in place and cannot be shared
    /// across synapse cores.
    fn validate_dynamics(&self) -> PartitionResult<()> {
        if let SplitMode::Split { n_synapse_cores } = self.mode {
            if n_synapse_cores > 1
                && self
                    .incoming
                    .iter()
                    .any(|p| p.descriptor.dynamics().is_structural())
            {
                return Err(PartitionError::SynapticConfiguration(format!(
                    "population '{}': structural plasticity requires a single synapse core, \
                     {n_synapse_cores} were requested",
                    self.population.label()
                )));
            }
        }
        Ok(())
    }

    fn ticks_for_ms(&self, delay_ms: f64) -> u32 {
        let ticks = (delay_ms / self.config.timing.tick_duration_ms).ceil();
        (ticks as u32).max(1)
    }

    fn compute_delay(&self) -> PartitionResult<ComputedDelay> {
        let required_ticks = self
            .incoming
            .iter()
            .filter(|p| !p.is_bulk_inlined())
            .map(|p| self.ticks_for_ms(p.descriptor.delay().max_ms()))
            .max()
            .unwrap_or(1);
        let atoms = self.population.max_atoms_per_core().min(self.population.size());
        let representable_ticks =
            bit_budget::representable_delay(atoms, self.population.n_synapse_types());

        let supported_ticks = match self.config.splitting.fixed_max_support_delay {
            Some(fixed) => {
                if fixed == 0 || fixed > representable_ticks {
                    return Err(PartitionError::Configuration(format!(
                        "population '{}': fixed max support delay {fixed} outside the \
                         representable window of {representable_ticks} ticks",
                        self.population.label()
                    )));
                }
                fixed
            }
            None => required_ticks.min(representable_ticks),
        };
        debug!(
            target: "synmap-partitioner",
            "population '{}': delay required={required_ticks} representable={representable_ticks} \
             supported={supported_ticks}",
            self.population.label()
        );
        Ok(ComputedDelay { required_ticks, representable_ticks, supported_ticks })
    }

    /// One relay request per source whose delay exceeds the supported
    /// window, deduplicated to the largest stage count.
    fn relay_requests(&self, computed: ComputedDelay) -> PartitionResult<Vec<DelayRelayRequest>> {
        let mut by_source: BTreeMap<PopulationId, DelayRelayRequest> = BTreeMap::new();
        for projection in self.incoming.iter().filter(|p| !p.is_bulk_inlined()) {
            let required = self.ticks_for_ms(projection.descriptor.delay().max_ms());
            let Some(relay) =
                delay::plan_relay(self.population.label(), required, computed.supported_ticks)?
            else {
                continue;
            };
            let source = projection.descriptor.source();
            let request = DelayRelayRequest {
                source,
                n_stages: relay.n_stages,
                stage_ticks: relay.stage_ticks,
            };
            by_source
                .entry(source)
                .and_modify(|existing| {
                    if request.n_stages > existing.n_stages {
                        *existing = request;
                    }
                })
                .or_insert(request);
        }
        Ok(by_source.into_values().collect())
    }

    fn build_plan(
        &self,
        slices: &[Slice],
        computed: ComputedDelay,
        delay_relays: Vec<DelayRelayRequest>,
        ring_buffer_shifts: Vec<u32>,
    ) -> PartitionResult<SplitPlan> {
        let admissible = self.admissible_projections();
        let inlined: Vec<PopulationId> = self
            .incoming
            .iter()
            .filter(|p| p.is_bulk_inlined())
            .map(|p| p.descriptor.source())
            .collect();
        let needs_feedback = self
            .incoming
            .iter()
            .any(|p| p.descriptor.dynamics().requires_feedback_edge());

        let mut assignments = Vec::new();
        let mut groups = Vec::new();
        let mut edges = Vec::new();

        for &slice in slices {
            match self.mode {
                SplitMode::Unsplit => {
                    let mut usage = estimates::neuron_core_usage(slice);
                    usage.merge(&estimates::synapse_core_usage(
                        true,
                        slice,
                        &admissible,
                        self.population.n_synapse_types(),
                        computed.supported_ticks,
                    )?);
                    usage.fits(&self.config.budget)?;

                    let core = assignments.len();
                    assignments.push(CoreAssignment {
                        population: self.population.id(),
                        slice,
                        role: CoreRole::Neuron,
                        resources: usage,
                    });
                    for &source in &inlined {
                        edges.push(InternalEdge {
                            from: EdgeEndpoint::Population(source),
                            to: EdgeEndpoint::Core(core),
                            kind: EdgeKind::BulkDelivery,
                        });
                    }
                }
                SplitMode::Split { n_synapse_cores } => {
                    let neuron_core = assignments.len();
                    let neuron_usage = estimates::neuron_core_usage(slice);
                    neuron_usage.fits(&self.config.budget)?;
                    assignments.push(CoreAssignment {
                        population: self.population.id(),
                        slice,
                        role: CoreRole::Neuron,
                        resources: neuron_usage,
                    });
                    let mut members = vec![neuron_core];

                    for synapse_index in 0..n_synapse_cores {
                        let lead = synapse_index == 0;
                        let usage = estimates::synapse_core_usage(
                            lead,
                            slice,
                            &admissible,
                            self.population.n_synapse_types(),
                            computed.supported_ticks,
                        )?;
                        usage.fits(&self.config.budget)?;

                        let core = assignments.len();
                        assignments.push(CoreAssignment {
                            population: self.population.id(),
                            slice,
                            role: if lead {
                                CoreRole::LeadSynapse
                            } else {
                                CoreRole::SharedSynapse(synapse_index)
                            },
                            resources: usage,
                        });
                        members.push(core);

                        edges.push(InternalEdge {
                            from: EdgeEndpoint::Core(core),
                            to: EdgeEndpoint::Core(neuron_core),
                            kind: EdgeKind::SynapticContribution,
                        });
                        if needs_feedback {
                            edges.push(InternalEdge {
                                from: EdgeEndpoint::Core(neuron_core),
                                to: EdgeEndpoint::Core(core),
                                kind: EdgeKind::PostSynapticFeedback,
                            });
                        }
                    }
                    for &source in &inlined {
                        edges.push(InternalEdge {
                            from: EdgeEndpoint::Population(source),
                            to: EdgeEndpoint::Core(neuron_core),
                            kind: EdgeKind::BulkDelivery,
                        });
                    }

                    let total =
                        ResourceUsage::merged(members.iter().map(|&i| &assignments[i].resources));
                    groups.push(SameChipGroup { members, total });
                }
            }
        }

        Ok(SplitPlan {
            assignments,
            groups,
            edges,
            delay_relays,
            ring_buffer_shifts,
            delay: computed,
        })
    }

    fn with_context(&self, err: PartitionError) -> PartitionError {
        match err {
            PartitionError::Configuration(reason) => PartitionError::Configuration(format!(
                "population '{}': {reason}",
                self.population.label()
            )),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synmap_structures::{
        ConnectionDescriptor, ConnectorRule, DelayRangeMs, SynapseDynamics, WeightBounds,
    };

    fn target_population() -> Population {
        let mut pop = Population::new(PopulationId(1), "target", 300, 2).unwrap();
        pop.set_max_atoms_per_core(128).unwrap();
        pop
    }

    fn static_projection(max_delay_ms: f64) -> IncomingProjection {
        IncomingProjection {
            descriptor: ConnectionDescriptor::new(
                PopulationId(0),
                PopulationId(1),
                ConnectorRule::FixedProbability(0.1),
                0,
                DelayRangeMs::new(1.0, max_delay_ms).unwrap(),
                WeightBounds::new(0.5).unwrap(),
                SynapseDynamics::Static,
            ),
            source_size: 200,
            source_kind: synmap_structures::PopulationKind::Neurons,
            source_supports_bulk_delivery: false,
        }
    }

    #[test]
    fn delay_is_derived_from_the_full_projection_set() {
        let mut splitter = PopulationSplitter::new(
            target_population(),
            SplitMode::Unsplit,
            MappingConfig::default(),
            vec![static_projection(3.0), static_projection(16.0)],
        )
        .unwrap();
        assert_eq!(splitter.computed_delay(), None);
        splitter.plan().unwrap();
        let computed = splitter.computed_delay().unwrap();
        assert_eq!(computed.required_ticks, 16);
        assert_eq!(computed.representable_ticks, 64);
        assert_eq!(computed.supported_ticks, 16);
    }

    #[test]
    fn fixed_delay_override_is_validated() {
        let mut config = MappingConfig::default();
        config.splitting.fixed_max_support_delay = Some(1024);
        let err = PopulationSplitter::new(
            target_population(),
            SplitMode::Unsplit,
            config,
            vec![static_projection(4.0)],
        )
        .unwrap()
        .plan()
        .unwrap_err();
        assert!(matches!(err, PartitionError::Configuration(_)));
    }

    #[test]
    fn mismatched_target_rejected_up_front() {
        let mut projection = static_projection(2.0);
        projection.descriptor = ConnectionDescriptor::new(
            PopulationId(0),
            PopulationId(99),
            ConnectorRule::OneToOne,
            0,
            DelayRangeMs::new(1.0, 2.0).unwrap(),
            WeightBounds::new(1.0).unwrap(),
            SynapseDynamics::Static,
        );
        let err = PopulationSplitter::new(
            target_population(),
            SplitMode::Unsplit,
            MappingConfig::default(),
            vec![projection],
        )
        .unwrap_err();
        assert!(matches!(err, PartitionError::Configuration(_)));
    }
}

// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Per-core resource accounting.

[`ResourceUsage`] accumulates named byte costs per SDRAM and DTCM region
plus a scalar CPU cost in cycles per tick. `merge` sums same-named costs;
`nest_sdram` lays out equal-sized per-tick regions contiguously and
returns the aggregate size together with per-region offsets.

[`CoreBudget`] holds the fixed per-core ceilings; `ResourceUsage::fits`
reports the first exceeded dimension with both figures.

Region maps are `BTreeMap`s: iteration order, and therefore every derived
byte layout, is deterministic.
*/

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which ceiling a usage exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceDimension {
    Sdram,
    Dtcm,
    CpuCyclesPerTick,
}

impl std::fmt::Display for ResourceDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceDimension::Sdram => write!(f, "SDRAM"),
            ResourceDimension::Dtcm => write!(f, "DTCM"),
            ResourceDimension::CpuCyclesPerTick => write!(f, "CPU cycles/tick"),
        }
    }
}

/// A core cannot hold the requested usage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{dimension} over budget: requires {required}, budget is {available}")]
pub struct ResourceOverflow {
    pub dimension: ResourceDimension,
    pub required: u64,
    pub available: u64,
}

/// Fixed per-core budget ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreBudget {
    pub sdram_bytes: u64,
    pub dtcm_bytes: u64,
    pub cpu_cycles_per_tick: u64,
}

impl Default for CoreBudget {
    fn default() -> Self {
        Self {
            sdram_bytes: 8 * 1024 * 1024, // per-core share of chip SDRAM
            dtcm_bytes: 64 * 1024,
            cpu_cycles_per_tick: 200_000,
        }
    }
}

/// Layout of nested equal-sized per-tick regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestedLayout {
    pub total_bytes: u64,
    /// Byte offset of each region from the start of the aggregate
    pub offsets: Vec<u64>,
}

/// Named byte/cycle costs accumulated for one core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUsage {
    sdram: BTreeMap<String, u64>,
    dtcm: BTreeMap<String, u64>,
    cpu_cycles_per_tick: u64,
}

impl ResourceUsage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `bytes` to the named SDRAM region.
    pub fn add_sdram(&mut self, region: &str, bytes: u64) {
        *self.sdram.entry(region.to_string()).or_insert(0) += bytes;
    }

    /// Adds `bytes` to the named DTCM region.
    pub fn add_dtcm(&mut self, region: &str, bytes: u64) {
        *self.dtcm.entry(region.to_string()).or_insert(0) += bytes;
    }

    pub fn add_cpu_cycles(&mut self, cycles_per_tick: u64) {
        self.cpu_cycles_per_tick += cycles_per_tick;
    }

    /// Lays out `n_regions` equal-sized per-tick regions contiguously under
    /// one SDRAM region name, returning the aggregate size and offsets.
    pub fn nest_sdram(
        &mut self,
        region: &str,
        bytes_per_region: u64,
        n_regions: usize,
    ) -> NestedLayout {
        let offsets: Vec<u64> = (0..n_regions as u64).map(|i| i * bytes_per_region).collect();
        let total_bytes = bytes_per_region * n_regions as u64;
        self.add_sdram(region, total_bytes);
        NestedLayout { total_bytes, offsets }
    }

    /// Sums same-named costs from `other` into `self`.
    pub fn merge(&mut self, other: &ResourceUsage) {
        for (region, bytes) in &other.sdram {
            *self.sdram.entry(region.clone()).or_insert(0) += bytes;
        }
        for (region, bytes) in &other.dtcm {
            *self.dtcm.entry(region.clone()).or_insert(0) += bytes;
        }
        self.cpu_cycles_per_tick += other.cpu_cycles_per_tick;
    }

    /// Merged copy of several usages.
    pub fn merged<'a>(usages: impl IntoIterator<Item = &'a ResourceUsage>) -> ResourceUsage {
        let mut total = ResourceUsage::new();
        for usage in usages {
            total.merge(usage);
        }
        total
    }

    pub fn sdram_total(&self) -> u64 {
        self.sdram.values().sum()
    }

    pub fn dtcm_total(&self) -> u64 {
        self.dtcm.values().sum()
    }

    pub fn cpu_cycles_per_tick(&self) -> u64 {
        self.cpu_cycles_per_tick
    }

    /// Bytes recorded under one SDRAM region name (0 if absent).
    pub fn sdram_region(&self, region: &str) -> u64 {
        self.sdram.get(region).copied().unwrap_or(0)
    }

    pub fn dtcm_region(&self, region: &str) -> u64 {
        self.dtcm.get(region).copied().unwrap_or(0)
    }

    /// Checks every dimension against `budget`, reporting the first
    /// exceeded one with both figures.
    pub fn fits(&self, budget: &CoreBudget) -> Result<(), ResourceOverflow> {
        let sdram = self.sdram_total();
        if sdram > budget.sdram_bytes {
            return Err(ResourceOverflow {
                dimension: ResourceDimension::Sdram,
                required: sdram,
                available: budget.sdram_bytes,
            });
        }
        let dtcm = self.dtcm_total();
        if dtcm > budget.dtcm_bytes {
            return Err(ResourceOverflow {
                dimension: ResourceDimension::Dtcm,
                required: dtcm,
                available: budget.dtcm_bytes,
            });
        }
        if self.cpu_cycles_per_tick > budget.cpu_cycles_per_tick {
            return Err(ResourceOverflow {
                dimension: ResourceDimension::CpuCyclesPerTick,
                required: self.cpu_cycles_per_tick,
                available: budget.cpu_cycles_per_tick,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_sums_same_named_costs() {
        let mut a = ResourceUsage::new();
        a.add_sdram("synaptic_matrix", 2048);
        a.add_dtcm("ring_buffer", 512);
        a.add_cpu_cycles(100);

        let mut b = ResourceUsage::new();
        b.add_sdram("synaptic_matrix", 1024);
        b.add_sdram("neuron_params", 256);
        b.add_cpu_cycles(50);

        a.merge(&b);
        assert_eq!(a.sdram_region("synaptic_matrix"), 3072);
        assert_eq!(a.sdram_region("neuron_params"), 256);
        assert_eq!(a.sdram_total(), 3328);
        assert_eq!(a.dtcm_total(), 512);
        assert_eq!(a.cpu_cycles_per_tick(), 150);
    }

    #[test]
    fn nest_returns_contiguous_offsets() {
        let mut usage = ResourceUsage::new();
        let layout = usage.nest_sdram("spike_recording", 160, 3);
        assert_eq!(layout.total_bytes, 480);
        assert_eq!(layout.offsets, vec![0, 160, 320]);
        assert_eq!(usage.sdram_region("spike_recording"), 480);
    }

    #[test]
    fn fits_reports_exceeded_dimension() {
        let budget = CoreBudget { sdram_bytes: 1000, dtcm_bytes: 100, cpu_cycles_per_tick: 10 };
        let mut usage = ResourceUsage::new();
        usage.add_sdram("m", 1001);
        let err = usage.fits(&budget).unwrap_err();
        assert_eq!(err.dimension, ResourceDimension::Sdram);
        assert_eq!(err.required, 1001);
        assert_eq!(err.available, 1000);

        let mut usage = ResourceUsage::new();
        usage.add_dtcm("r", 40);
        usage.add_cpu_cycles(5);
        usage.fits(&budget).unwrap();
    }
}

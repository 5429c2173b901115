// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Slice planner.

Divides a population into contiguous per-core index ranges of
`min(max_atoms_per_core, N)` units, last range shorter if needed. Plans
are cached per population id until [`SlicePlanner::reset`]; recomputation
with unchanged inputs is deterministic and identical.

Grid-shaped populations use a dimension-preserving variant: the chunk is
rounded down to a whole multiple of the sub-grid row size so slice
boundaries never cut a row. The disjoint/ordered/covering contract is the
same in both variants.
*/

use std::sync::Arc;

use ahash::AHashMap;
use tracing::debug;

use synmap_structures::{Population, PopulationId, Slice};

/// Deterministic, restartable slice planning with a per-generation cache.
#[derive(Debug, Default)]
pub struct SlicePlanner {
    cache: AHashMap<PopulationId, Arc<[Slice]>>,
}

impl SlicePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans (or returns the cached plan for) one population.
    pub fn plan(&mut self, population: &Population) -> Arc<[Slice]> {
        if let Some(slices) = self.cache.get(&population.id()) {
            return slices.clone();
        }
        let slices: Arc<[Slice]> = Self::compute(population).into();
        debug!(
            target: "synmap-partitioner",
            "planned {} slices for population '{}' ({} units, ceiling {})",
            slices.len(),
            population.label(),
            population.size(),
            population.max_atoms_per_core()
        );
        self.cache.insert(population.id(), slices.clone());
        slices
    }

    /// Drops all cached plans. Ends the current mapping generation.
    pub fn reset(&mut self) {
        self.cache.clear();
    }

    fn compute(population: &Population) -> Vec<Slice> {
        let n = population.size();
        let ceiling = population.max_atoms_per_core().min(n);
        let chunk = match population.shape() {
            Some(shape) => Self::grid_chunk(shape, ceiling),
            None => ceiling,
        };

        let mut slices = Vec::with_capacity(n.div_ceil(chunk) as usize);
        let mut lo = 0u32;
        while lo < n {
            let hi = (lo + chunk).min(n);
            // lo < hi by construction
            slices.push(Slice::new(lo, hi).expect("planner produced an empty slice"));
            lo = hi;
        }
        slices
    }

    /// Largest multiple of the sub-grid row size that fits the ceiling.
    /// Falls back to plain chunking when a single row is already too big.
    fn grid_chunk(shape: &[u32], ceiling: u32) -> u32 {
        let row: u64 = shape.iter().skip(1).map(|&d| d as u64).product();
        if row == 0 || row > ceiling as u64 {
            return ceiling;
        }
        (ceiling as u64 / row * row) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use synmap_structures::PopulationKind;

    fn population(id: u32, size: u32, max_atoms: u32) -> Population {
        let mut pop = Population::new(PopulationId(id), &format!("pop{id}"), size, 1).unwrap();
        pop.set_max_atoms_per_core(max_atoms).unwrap();
        pop
    }

    #[test]
    fn reference_plan_300_by_128() {
        let mut planner = SlicePlanner::new();
        let slices = planner.plan(&population(0, 300, 128));
        let lengths: Vec<u32> = slices.iter().map(Slice::len).collect();
        assert_eq!(lengths, vec![128, 128, 44]);
        Slice::validate_partition(&slices, 300).unwrap();
    }

    #[test]
    fn cached_until_reset() {
        let mut planner = SlicePlanner::new();
        let pop = population(1, 1000, 64);
        let first = planner.plan(&pop);
        let second = planner.plan(&pop);
        assert!(Arc::ptr_eq(&first, &second)); // cache hit, not recomputation

        planner.reset();
        let third = planner.plan(&pop);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(&*first, &*third); // identical after reset
    }

    #[test]
    fn grid_slices_preserve_rows() {
        // 20 x 12 grid: rows of 12, ceiling 50 -> chunks of 48
        let mut pop = Population::new(PopulationId(2), "grid", 240, 1)
            .unwrap()
            .with_shape(vec![20, 12])
            .unwrap();
        pop.set_max_atoms_per_core(50).unwrap();

        let mut planner = SlicePlanner::new();
        let slices = planner.plan(&pop);
        Slice::validate_partition(&slices, 240).unwrap();
        for slice in slices.iter().take(slices.len() - 1) {
            assert_eq!(slice.len(), 48);
            assert_eq!(slice.lo() % 12, 0);
        }
    }

    #[test]
    fn oversized_grid_row_falls_back_to_plain_chunks() {
        let mut pop = Population::new(PopulationId(3), "wide", 600, 1)
            .unwrap()
            .with_shape(vec![3, 200])
            .unwrap();
        pop.set_max_atoms_per_core(128).unwrap();

        let mut planner = SlicePlanner::new();
        let slices = planner.plan(&pop);
        Slice::validate_partition(&slices, 600).unwrap();
        assert_eq!(slices[0].len(), 128);
    }

    #[test]
    fn poisson_sources_plan_like_neurons() {
        let mut pop = Population::new(PopulationId(4), "noise", 100, 1).unwrap();
        pop.set_max_atoms_per_core(40).unwrap();
        let pop = pop.with_kind(PopulationKind::PoissonSource);
        let mut planner = SlicePlanner::new();
        let slices = planner.plan(&pop);
        let lengths: Vec<u32> = slices.iter().map(Slice::len).collect();
        assert_eq!(lengths, vec![40, 40, 20]);
    }

    proptest! {
        /// For all N and K: slices start at 0, K, 2K, ..., each length <= K,
        /// union covers [0, N) with no gaps or overlap.
        #[test]
        fn plan_is_a_partition(n in 1u32..5000, k in 1u32..600) {
            let mut planner = SlicePlanner::new();
            let slices = planner.plan(&population(9, n, k));
            Slice::validate_partition(&slices, n).unwrap();
            for (index, slice) in slices.iter().enumerate() {
                prop_assert_eq!(slice.lo(), index as u32 * k.min(n));
                prop_assert!(slice.len() <= k);
            }
        }
    }
}

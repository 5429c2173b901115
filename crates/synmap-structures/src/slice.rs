// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Slices: half-open index ranges `[lo, hi)` of a population.

The slices of one population must be disjoint, ordered and cover `[0, N)`.
[`Slice::validate_partition`] checks that contract.
*/

use serde::{Deserialize, Serialize};

use crate::error::{SynmapDataError, SynmapDataResult};

/// A contiguous half-open range `[lo, hi)` of population indices.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Slice {
    lo: u32,
    hi: u32,
}

impl Slice {
    pub fn new(lo: u32, hi: u32) -> SynmapDataResult<Self> {
        if lo >= hi {
            return Err(SynmapDataError::InvalidSlice(format!(
                "empty or inverted range [{lo}, {hi})"
            )));
        }
        Ok(Self { lo, hi })
    }

    pub fn lo(&self) -> u32 {
        self.lo
    }

    /// Exclusive upper bound.
    pub fn hi(&self) -> u32 {
        self.hi
    }

    pub fn len(&self) -> u32 {
        self.hi - self.lo
    }

    pub fn is_empty(&self) -> bool {
        false // constructor forbids empty slices
    }

    pub fn contains(&self, index: u32) -> bool {
        self.lo <= index && index < self.hi
    }

    pub fn as_range(&self) -> std::ops::Range<u32> {
        self.lo..self.hi
    }

    /// Checks the partition contract: slices are ordered, disjoint and
    /// their union covers exactly `[0, n)`.
    pub fn validate_partition(slices: &[Slice], n: u32) -> SynmapDataResult<()> {
        let mut expected_lo = 0u32;
        for slice in slices {
            if slice.lo != expected_lo {
                return Err(SynmapDataError::InvalidSlice(format!(
                    "gap or overlap at index {expected_lo}: next slice starts at {}",
                    slice.lo
                )));
            }
            expected_lo = slice.hi;
        }
        if expected_lo != n {
            return Err(SynmapDataError::InvalidSlice(format!(
                "slices cover [0, {expected_lo}) but the population has {n} units"
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Slice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.lo, self.hi)
    }
}

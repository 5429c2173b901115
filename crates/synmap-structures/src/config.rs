// Copyright 2026 Synmap Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Mapping configuration.

Plain serde structs with defaults matching the reference substrate. One
`MappingConfig` is handed to each splitter; the engine never reads ambient
global configuration.
*/

use serde::{Deserialize, Serialize};

use crate::resources::CoreBudget;

/// Root configuration for one mapping pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    pub timing: TimingConfig,
    pub budget: CoreBudget,
    pub splitting: SplittingConfig,
}

/// Simulation timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Duration of one simulation tick in milliseconds
    pub tick_duration_ms: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { tick_duration_ms: 1.0 }
    }
}

/// Splitter tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplittingConfig {
    /// Explicit override of the supported delay window, in ticks.
    /// `None` derives it from the bit budget.
    pub fixed_max_support_delay: Option<u32>,
}

impl Default for SplittingConfig {
    fn default() -> Self {
        Self { fixed_max_support_delay: None }
    }
}

// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Health sampling contracts gating recovery.
//!
//! Two seams live here. [`HealthSignalSource`] supplies raw runtime signals
//! (load, memory, connectivity) and is typically platform-backed.
//! [`HealthMonitor`] turns those signals into a recommendation: the lowest
//! level it currently considers safe to recover to. Both are swappable so a
//! collaborator can substitute domain-specific predicates.

use crate::level::LevelId;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Raw signals read from the running system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthSignals {
    /// Overall computational load, normalized to `0.0..=1.0`.
    pub load: f32,
    /// Fraction of memory in use, normalized to `0.0..=1.0`.
    pub memory_pct: f32,
    /// Whether the network is currently reachable.
    pub network_online: bool,
}

/// Supplies raw health signals on demand.
///
/// An `Err` means the signals could not be read this cycle; the recovery
/// controller treats that as unknown health and skips the cycle rather than
/// recovering blind.
pub trait HealthSignalSource: Send + Sync {
    /// Reads the current signals.
    fn read(&self) -> anyhow::Result<HealthSignals>;
}

/// A point-in-time health measurement plus the monitor's recommendation.
///
/// Produced on demand and not persisted; the controller caches only the most
/// recent sample for its statistics snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSample {
    /// Wall-clock time the sample was taken.
    pub timestamp: SystemTime,
    /// Overall computational load, normalized to `0.0..=1.0`.
    pub load: f32,
    /// Fraction of memory in use, normalized to `0.0..=1.0`.
    pub memory_pct: f32,
    /// Whether the network is currently reachable.
    pub network_online: bool,
    /// The lowest level the monitor considers safe to recover to right now.
    /// Equal to the current level when no recovery is advisable.
    pub recommended_level: LevelId,
}

/// Decides how far the system may safely recover.
///
/// `current_level` is passed in because recommendations are relative: a
/// monitor under middling pressure recommends at most one step up from
/// wherever the controller currently sits (hysteresis), and "hold" is
/// expressed by recommending the current level itself.
pub trait HealthMonitor: Send + Sync {
    /// Takes a health sample.
    fn sample(&self, current_level: LevelId) -> anyhow::Result<HealthSample>;
}

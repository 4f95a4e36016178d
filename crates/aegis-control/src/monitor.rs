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

//! Threshold-based health monitor.
//!
//! Turns raw [`HealthSignals`] into a recommended degradation level using a
//! three-band ladder:
//!
//! 1. load and memory both comfortable: recommend the baseline;
//! 2. both merely acceptable: recommend one level up, but never shallower
//!    than a conservative floor;
//! 3. anything worse (or the network offline): hold the current level.
//!
//! Recommendations are hysteresis-friendly by construction: the monitor
//! never recommends a level deeper than the current one, so it can only
//! suggest recovery or a hold, never a degradation.

use std::sync::Arc;
use std::time::SystemTime;

use aegis_core::health::{HealthMonitor, HealthSample, HealthSignalSource, HealthSignals};
use aegis_core::LevelId;

/// Cut-off points for the recommendation ladder.
///
/// Load and memory are fractions in `0.0..=1.0` of the respective capacity.
#[derive(Debug, Clone)]
pub struct HealthThresholds {
    /// Below this load (together with
    /// [`full_recovery_memory`](Self::full_recovery_memory)) the monitor
    /// recommends a full return to the baseline.
    pub full_recovery_load: f32,
    /// Memory bound paired with [`full_recovery_load`](Self::full_recovery_load).
    pub full_recovery_memory: f32,
    /// Below this load (together with
    /// [`cautious_recovery_memory`](Self::cautious_recovery_memory)) the
    /// monitor recommends a single cautious step towards the baseline.
    pub cautious_recovery_load: f32,
    /// Memory bound paired with [`cautious_recovery_load`](Self::cautious_recovery_load).
    pub cautious_recovery_memory: f32,
    /// Shallowest level a cautious step may recommend. Keeps the system from
    /// oscillating near the baseline while resources are only acceptable.
    pub conservative_floor: LevelId,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            full_recovery_load: 0.70,
            full_recovery_memory: 0.80,
            cautious_recovery_load: 0.80,
            cautious_recovery_memory: 0.90,
            conservative_floor: LevelId(2),
        }
    }
}

/// A [`HealthMonitor`] that applies [`HealthThresholds`] to a signal source.
pub struct ThresholdHealthMonitor {
    source: Arc<dyn HealthSignalSource>,
    thresholds: HealthThresholds,
}

impl ThresholdHealthMonitor {
    /// Creates a monitor with the default thresholds.
    pub fn new(source: Arc<dyn HealthSignalSource>) -> Self {
        Self::with_thresholds(source, HealthThresholds::default())
    }

    /// Creates a monitor with custom thresholds.
    pub fn with_thresholds(source: Arc<dyn HealthSignalSource>, thresholds: HealthThresholds) -> Self {
        Self { source, thresholds }
    }

    fn recommend(&self, signals: &HealthSignals, current: LevelId) -> LevelId {
        let t = &self.thresholds;
        if !signals.network_online {
            return current;
        }
        if signals.load < t.full_recovery_load && signals.memory_pct < t.full_recovery_memory {
            return LevelId::BASELINE;
        }
        if signals.load < t.cautious_recovery_load && signals.memory_pct < t.cautious_recovery_memory
        {
            let one_step = current.relaxed().unwrap_or(LevelId::BASELINE);
            return one_step.max(t.conservative_floor).min(current);
        }
        current
    }
}

impl HealthMonitor for ThresholdHealthMonitor {
    fn sample(&self, current_level: LevelId) -> anyhow::Result<HealthSample> {
        let signals = self.source.read()?;
        let recommended = self.recommend(&signals, current_level);
        log::debug!(
            "Health: load={:.1}%, memory={:.1}%, online={}; recommending level {} (current {}).",
            signals.load * 100.0,
            signals.memory_pct * 100.0,
            signals.network_online,
            recommended,
            current_level
        );
        Ok(HealthSample {
            timestamp: SystemTime::now(),
            load: signals.load,
            memory_pct: signals.memory_pct,
            network_online: signals.network_online,
            recommended_level: recommended,
        })
    }
}

impl std::fmt::Debug for ThresholdHealthMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThresholdHealthMonitor")
            .field("thresholds", &self.thresholds)
            .finish_non_exhaustive()
    }
}

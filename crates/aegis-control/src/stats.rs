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

//! Point-in-time snapshot of the controller, suitable for export.

use std::collections::BTreeSet;
use std::time::Duration;

use aegis_core::health::HealthSample;
use aegis_core::level::DegradationRecord;
use aegis_core::{FeatureId, LevelId};
use serde::Serialize;

/// A consistent snapshot of controller state for dashboards and logs.
///
/// Produced by [`DegradationController::statistics`](crate::DegradationController::statistics);
/// all fields are taken under a single lock so they never contradict each other.
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    /// Degradation level currently in effect.
    pub current_level: LevelId,
    /// Human-readable name of the current level.
    pub level_name: String,
    /// Features currently active.
    pub active_features: BTreeSet<FeatureId>,
    /// Registered features that are not currently active.
    pub disabled_features: BTreeSet<FeatureId>,
    /// Fallback features currently standing in for degraded primaries.
    pub fallback_active: BTreeSet<FeatureId>,
    /// Recent degradation transitions, oldest first.
    pub history: Vec<DegradationRecord>,
    /// Recovery sessions started since the last full return to baseline.
    pub recovery_attempts: u32,
    /// `true` while a recovery session holds the controller.
    pub recovery_in_progress: bool,
    /// Total failed feature hook invocations since construction.
    pub side_effect_failures: u64,
    /// Result of the most recent successful health check, if any.
    pub last_health: Option<HealthSample>,
    /// Time elapsed since the controller was built.
    pub uptime: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_json() {
        let stats = Statistics {
            current_level: LevelId(1),
            level_name: "reduced".to_string(),
            active_features: BTreeSet::from([FeatureId::new("core")]),
            disabled_features: BTreeSet::from([FeatureId::new("export")]),
            fallback_active: BTreeSet::new(),
            history: Vec::new(),
            recovery_attempts: 2,
            recovery_in_progress: false,
            side_effect_failures: 0,
            last_health: None,
            uptime: Duration::from_secs(5),
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["current_level"], 1);
        assert_eq!(json["level_name"], "reduced");
        assert_eq!(json["active_features"][0], "core");
        assert_eq!(json["recovery_attempts"], 2);
    }
}

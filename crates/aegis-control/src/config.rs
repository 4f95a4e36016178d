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

//! Configuration for the controllers and the recovery service.

use std::time::Duration;

use aegis_core::LevelId;

/// Tuning knobs for the [`DegradationController`](crate::DegradationController).
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Soft ceiling for degradation. Requests above it are clamped down to
    /// this level; `None` means the deepest registered level is the ceiling.
    pub max_level: Option<LevelId>,
    /// When `true`, a recovery step is abandoned if every enable hook of the
    /// step reports a hard failure. When `false` (the default), hook failures
    /// are logged and counted but never stop a step from committing.
    pub strict_recovery: bool,
    /// Upper bound on how long a single feature hook may run. A hook that
    /// exceeds it is treated as a failed side effect. `None` disables the
    /// bound entirely.
    pub hook_timeout: Option<Duration>,
    /// Permits levels that exclude essential features. Normally such a
    /// registry is rejected at construction time.
    pub allow_essential_shedding: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_level: None,
            strict_recovery: false,
            hook_timeout: None,
            allow_essential_shedding: false,
        }
    }
}

/// Configuration for the [`RecoveryService`](crate::RecoveryService) loop.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Interval between periodic recovery attempts.
    pub check_interval: Duration,
    /// Level the service tries to recover towards. The session floor is the
    /// stricter of this target and the health monitor's recommendation.
    pub target_level: LevelId,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(30),
            target_level: LevelId::BASELINE,
        }
    }
}

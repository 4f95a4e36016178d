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

//! The recovery controller: health-gated upward transitions.
//!
//! Recovery is deliberately more cautious than degradation. A session runs
//! one level at a time and commits each step independently, so a partial
//! recovery still sticks. At most one session runs at a time (a
//! compare-and-swap gate), every session is health-gated, and a concurrent
//! degradation supersedes the session outright.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use aegis_core::health::HealthMonitor;
use aegis_core::LevelId;

use crate::degrade::{DegradationController, StepOutcome};
use crate::events::ControllerEvent;

/// Drives upward transitions against a shared [`DegradationController`].
pub struct RecoveryController {
    controller: DegradationController,
    monitor: Arc<dyn HealthMonitor>,
}

/// Clears the reentrancy gate when a session ends, however it ends.
struct SessionGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl RecoveryController {
    /// Pairs a controller handle with the health monitor gating recovery.
    pub fn new(controller: DegradationController, monitor: Arc<dyn HealthMonitor>) -> Self {
        Self { controller, monitor }
    }

    /// The degradation controller this recovery side operates on.
    pub fn controller(&self) -> &DegradationController {
        &self.controller
    }

    /// Runs one recovery session towards `target` (the baseline if `None`).
    ///
    /// The session floor is the deeper of `target` and the level the health
    /// monitor recommends, so recovery never outruns measured health. Each
    /// committed step emits [`ControllerEvent::RecoveryStep`]; when the
    /// session ends it emits either `RecoveryCompleted` or `RecoveryHalted`.
    ///
    /// Returns `true` if at least one level was restored. `false` covers
    /// every kind of non-progress: already at the baseline, another session
    /// in flight, health unknown or too poor, or a first step that was
    /// superseded. Errors never escape; an unreadable health source skips
    /// the cycle.
    pub async fn attempt_recovery(&self, target: Option<LevelId>) -> bool {
        let shared = self.controller.shared();

        // ── 1. Fast paths: nothing to recover, or a session in flight ────
        let current = { shared.state.lock().unwrap().current_level };
        if current.is_baseline() {
            return false;
        }
        if shared
            .recovery_in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::debug!("Recovery: a session is already in progress; skipping.");
            return false;
        }
        let _session = SessionGuard {
            flag: &shared.recovery_in_progress,
        };

        {
            let mut state = shared.state.lock().unwrap();
            state.recovery_attempts += 1;
        }

        // ── 2. Health gate ───────────────────────────────────────────────
        let sample = match self.monitor.sample(current) {
            Ok(sample) => sample,
            Err(error) => {
                log::warn!("Recovery: health check failed, skipping this cycle: {error:#}");
                return false;
            }
        };
        *shared.last_health.lock().unwrap() = Some(sample.clone());

        let floor = sample
            .recommended_level
            .max(target.unwrap_or(LevelId::BASELINE));
        if floor >= current {
            log::debug!(
                "Recovery: health recommends level {} at current {current}; holding.",
                sample.recommended_level
            );
            return false;
        }

        log::info!("Recovery: session starting at level {current}, aiming for {floor}.");

        // ── 3. Climb one level at a time ─────────────────────────────────
        let mut reached = current;
        let mut recovered_any = false;
        let mut halted = false;
        while reached > floor {
            let Some(next) = reached.relaxed() else {
                break;
            };
            match self.controller.restore_step(reached, next).await {
                Ok(StepOutcome::Committed) => {
                    reached = next;
                    recovered_any = true;
                }
                Ok(StepOutcome::Superseded) | Ok(StepOutcome::HaltedStrict) => {
                    halted = true;
                    break;
                }
                Err(error) => {
                    log::error!("Recovery: aborting session on registry error: {error}");
                    halted = true;
                    break;
                }
            }
        }

        // ── 4. Close out the session ─────────────────────────────────────
        if halted {
            shared.bus.emit(ControllerEvent::RecoveryHalted {
                level: reached,
                target: floor,
            });
        } else {
            log::info!("Recovery: session complete at level {reached}.");
            shared
                .bus
                .emit(ControllerEvent::RecoveryCompleted { level: reached });
        }
        if reached.is_baseline() {
            let mut state = shared.state.lock().unwrap();
            state.recovery_attempts = 0;
        }
        recovered_any
    }
}

impl std::fmt::Debug for RecoveryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryController")
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FeatureCatalog;
    use crate::config::ControllerConfig;
    use crate::levels::LevelRegistry;
    use aegis_core::feature::{FeatureModule, FeatureToggle, NoopToggle};
    use aegis_core::health::HealthSample;
    use anyhow::anyhow;
    use std::time::SystemTime;

    struct StaticMonitor {
        recommended: LevelId,
    }

    impl HealthMonitor for StaticMonitor {
        fn sample(&self, _current_level: LevelId) -> anyhow::Result<HealthSample> {
            Ok(HealthSample {
                timestamp: SystemTime::now(),
                load: 0.1,
                memory_pct: 0.1,
                network_online: true,
                recommended_level: self.recommended,
            })
        }
    }

    struct FailingMonitor;

    impl HealthMonitor for FailingMonitor {
        fn sample(&self, _current_level: LevelId) -> anyhow::Result<HealthSample> {
            Err(anyhow!("signal source offline"))
        }
    }

    fn controller() -> DegradationController {
        let noop = || Arc::new(NoopToggle) as Arc<dyn FeatureToggle>;
        let levels = LevelRegistry::builder()
            .level("full", "", ["core", "analysis", "export"])
            .level("reduced", "", ["core", "analysis"])
            .level("minimal", "", ["core"])
            .build()
            .unwrap();
        let catalog = FeatureCatalog::builder()
            .register(FeatureModule::new("core").essential(), noop())
            .register(FeatureModule::new("analysis").depends_on("core"), noop())
            .register(FeatureModule::new("export"), noop())
            .build()
            .unwrap();
        DegradationController::new(levels, catalog, ControllerConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn baseline_short_circuits_without_counting_an_attempt() {
        let recovery = RecoveryController::new(
            controller(),
            Arc::new(StaticMonitor {
                recommended: LevelId::BASELINE,
            }),
        );
        assert!(!recovery.attempt_recovery(None).await);
        assert_eq!(recovery.controller().statistics().recovery_attempts, 0);
    }

    #[tokio::test]
    async fn gate_blocks_a_second_session() {
        let recovery = RecoveryController::new(
            controller(),
            Arc::new(StaticMonitor {
                recommended: LevelId::BASELINE,
            }),
        );
        recovery
            .controller()
            .degrade_to_level(LevelId(2), "test", false)
            .await
            .unwrap();

        let shared = recovery.controller().shared();
        shared.recovery_in_progress.store(true, Ordering::SeqCst);
        assert!(!recovery.attempt_recovery(None).await);
        assert_eq!(recovery.controller().current_level(), LevelId(2));

        shared.recovery_in_progress.store(false, Ordering::SeqCst);
        assert!(recovery.attempt_recovery(None).await);
        assert_eq!(recovery.controller().current_level(), LevelId::BASELINE);
    }

    #[tokio::test]
    async fn health_failure_skips_the_cycle_and_clears_the_gate() {
        let recovery = RecoveryController::new(controller(), Arc::new(FailingMonitor));
        recovery
            .controller()
            .degrade_to_level(LevelId(1), "test", false)
            .await
            .unwrap();

        assert!(!recovery.attempt_recovery(None).await);
        let stats = recovery.controller().statistics();
        assert_eq!(stats.current_level, LevelId(1));
        assert_eq!(stats.recovery_attempts, 1);
        assert!(!stats.recovery_in_progress);
        assert!(stats.last_health.is_none());
    }

    #[tokio::test]
    async fn full_session_returns_to_baseline_and_resets_attempts() {
        let recovery = RecoveryController::new(
            controller(),
            Arc::new(StaticMonitor {
                recommended: LevelId::BASELINE,
            }),
        );
        recovery
            .controller()
            .degrade_to_level(LevelId(2), "pressure", false)
            .await
            .unwrap();

        assert!(recovery.attempt_recovery(None).await);
        let stats = recovery.controller().statistics();
        assert_eq!(stats.current_level, LevelId::BASELINE);
        assert_eq!(stats.recovery_attempts, 0);
        assert_eq!(stats.active_features.len(), 3);
        assert!(stats.last_health.is_some());
    }

    #[tokio::test]
    async fn explicit_target_floors_the_session() {
        let recovery = RecoveryController::new(
            controller(),
            Arc::new(StaticMonitor {
                recommended: LevelId::BASELINE,
            }),
        );
        recovery
            .controller()
            .degrade_to_level(LevelId(2), "pressure", false)
            .await
            .unwrap();

        assert!(recovery.attempt_recovery(Some(LevelId(1))).await);
        let stats = recovery.controller().statistics();
        assert_eq!(stats.current_level, LevelId(1));
        // Not at baseline, so the attempt counter is retained.
        assert_eq!(stats.recovery_attempts, 1);
    }
}

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

//! The degradation controller: downward level transitions.
//!
//! The contract is that degrading never fails for runtime reasons. The
//! declared state (level and active set) is committed under the lock first;
//! feature hooks run afterwards, and their failures are logged and counted
//! rather than surfaced. Only configuration mistakes, such as an unknown
//! level id, come back as errors.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use aegis_core::error::{ConfigResult, ConfigurationError};
use aegis_core::event::{EventBus, ListenerId};
use aegis_core::feature::{is_hard_failure, FeatureStatus};
use aegis_core::health::HealthSample;
use aegis_core::level::DegradationRecord;
use aegis_core::{FeatureId, LevelId};
use anyhow::anyhow;

use crate::catalog::FeatureCatalog;
use crate::config::ControllerConfig;
use crate::events::{ControllerEvent, EventKind};
use crate::history::BoundedLog;
use crate::levels::LevelRegistry;
use crate::stats::Statistics;

/// Number of degradation records retained by the bounded history.
pub const HISTORY_CAPACITY: usize = 50;

/// Mutable controller state. Guarded by a single mutex; never held across
/// an await point.
#[derive(Debug)]
pub(crate) struct ControllerState {
    pub(crate) current_level: LevelId,
    pub(crate) active_features: BTreeSet<FeatureId>,
    /// Fallback features currently raised for shed primaries.
    pub(crate) fallback_active: BTreeSet<FeatureId>,
    pub(crate) history: BoundedLog<DegradationRecord>,
    /// Recovery sessions started since the last full return to baseline.
    pub(crate) recovery_attempts: u32,
}

/// State and collaborators shared between the degradation and recovery
/// controllers.
pub(crate) struct ControllerShared {
    pub(crate) levels: LevelRegistry,
    pub(crate) catalog: FeatureCatalog,
    pub(crate) config: ControllerConfig,
    pub(crate) bus: EventBus<ControllerEvent>,
    pub(crate) state: Mutex<ControllerState>,
    /// Set for the duration of a recovery session; the reentrancy gate.
    pub(crate) recovery_in_progress: AtomicBool,
    /// Failed hook invocations since construction.
    pub(crate) side_effect_failures: AtomicU64,
    /// Most recent successful health sample.
    pub(crate) last_health: Mutex<Option<HealthSample>>,
    pub(crate) started_at: Instant,
}

/// Outcome of a single recovery step, reported back to the session loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepOutcome {
    /// The step committed; the controller now sits one level shallower.
    Committed,
    /// A concurrent degradation moved the level; the step was dropped.
    Superseded,
    /// Strict mode abandoned the step because every enable hook hard-failed.
    HaltedStrict,
}

/// Applies degradation levels and owns the controller state.
///
/// Cloning is cheap and yields a handle to the same underlying state, which
/// is how the recovery side shares it.
#[derive(Clone)]
pub struct DegradationController {
    shared: Arc<ControllerShared>,
}

impl DegradationController {
    /// Builds a controller over a validated level ladder and feature catalog.
    ///
    /// Beyond what the registries already guarantee individually, this
    /// checks the two against each other:
    /// - every feature a level allows must be in the catalog;
    /// - every level's allowed set must contain the dependencies of each
    ///   feature it allows;
    /// - essential features must be allowed at the baseline, and at every
    ///   level unless `allow_essential_shedding` is set;
    /// - a configured `max_level` must be a registered level.
    ///
    /// The controller starts at the baseline with its full allowed set
    /// declared active. No enable hooks are run for that initial state.
    pub fn new(
        levels: LevelRegistry,
        catalog: FeatureCatalog,
        config: ControllerConfig,
    ) -> ConfigResult<Self> {
        // 1. Levels may only reference catalogued features, and each allowed
        //    set must be closed under declared dependencies.
        for level in levels.iter() {
            for feature in &level.allowed_features {
                let Some(module) = catalog.get(feature) else {
                    return Err(ConfigurationError::UnknownFeature {
                        level: level.id,
                        feature: feature.clone(),
                    });
                };
                for dependency in &module.dependencies {
                    if !level.allows(dependency) {
                        return Err(ConfigurationError::DependencyNotAllowed {
                            level: level.id,
                            feature: feature.clone(),
                            dependency: dependency.clone(),
                        });
                    }
                }
            }
        }

        // 2. Essential features survive at the baseline, and everywhere else
        //    unless shedding them was explicitly permitted.
        let baseline = levels.allowed_features(LevelId::BASELINE)?.clone();
        for module in catalog.modules() {
            if !module.essential {
                continue;
            }
            if !baseline.contains(&module.id) {
                return Err(ConfigurationError::EssentialNotBaseline {
                    feature: module.id.clone(),
                });
            }
            if !config.allow_essential_shedding {
                for level in levels.iter() {
                    if !level.allows(&module.id) {
                        return Err(ConfigurationError::EssentialExcluded {
                            feature: module.id.clone(),
                            level: level.id,
                        });
                    }
                }
            }
        }

        // 3. The configured ceiling must itself be a registered level.
        if let Some(ceiling) = config.max_level {
            levels.get(ceiling)?;
        }

        Ok(Self {
            shared: Arc::new(ControllerShared {
                levels,
                catalog,
                config,
                bus: EventBus::new(),
                state: Mutex::new(ControllerState {
                    current_level: LevelId::BASELINE,
                    active_features: baseline,
                    fallback_active: BTreeSet::new(),
                    history: BoundedLog::new(HISTORY_CAPACITY),
                    recovery_attempts: 0,
                }),
                recovery_in_progress: AtomicBool::new(false),
                side_effect_failures: AtomicU64::new(0),
                last_health: Mutex::new(None),
                started_at: Instant::now(),
            }),
        })
    }

    /// Degrades to `target`, shedding every feature the level disallows.
    ///
    /// Returns `Ok(true)` when a transition was committed and `Ok(false)`
    /// when the request was a no-op because the effective level is not
    /// deeper than the current one. `force` bypasses that guard and
    /// re-declares the level unconditionally; note that a forced request
    /// for a shallower level re-declares its feature set without running
    /// enable hooks, orderly re-enabling being the recovery side's job.
    ///
    /// The only error is a `target` outside the registered range. The
    /// configured ceiling, by contrast, silently clamps: asking for a
    /// deeper registered level than allowed degrades to the ceiling.
    pub async fn degrade_to_level(
        &self,
        target: LevelId,
        reason: &str,
        force: bool,
    ) -> ConfigResult<bool> {
        // ── 1. Validate the request and apply the ceiling ────────────────
        self.shared.levels.get(target)?;
        let ceiling = self
            .shared
            .config
            .max_level
            .unwrap_or_else(|| self.shared.levels.max_level());
        let effective = target.min(ceiling);
        if effective != target {
            log::debug!("Degrade: request for level {target} clamped to ceiling {effective}.");
        }

        // ── 2. Plan and commit the declared state under the lock ─────────
        let (previous, to_disable, fallbacks) = {
            let mut state = self.shared.state.lock().unwrap();
            if effective <= state.current_level && !force {
                log::debug!(
                    "Degrade: already at level {} (requested {effective}); nothing to do.",
                    state.current_level
                );
                return Ok(false);
            }

            let allowed = self.shared.levels.allowed_features(effective)?.clone();
            let to_disable: BTreeSet<FeatureId> = state
                .active_features
                .difference(&allowed)
                .cloned()
                .collect();

            // Fallbacks wanted at this level: the primary is shed, the
            // fallback is neither allowed as a feature in its own right nor
            // already raised. Earlier failed activations retry here.
            let mut fallbacks: Vec<(FeatureId, FeatureId)> = Vec::new();
            for module in self.shared.catalog.modules() {
                let Some(fallback) = &module.fallback else {
                    continue;
                };
                if allowed.contains(&module.id)
                    || allowed.contains(fallback)
                    || state.fallback_active.contains(fallback)
                    || fallbacks.iter().any(|(_, planned)| planned == fallback)
                {
                    continue;
                }
                fallbacks.push((module.id.clone(), fallback.clone()));
            }

            let previous = state.current_level;
            state.current_level = effective;
            state.active_features = allowed;
            state
                .history
                .push(DegradationRecord::new(effective, previous, reason));
            (previous, to_disable, fallbacks)
        };

        log::warn!(
            "Degrade: entering level {effective} from {previous}, shedding {} feature(s): {reason}",
            to_disable.len()
        );
        self.shared.bus.emit(ControllerEvent::DegradationApplied {
            level: effective,
            previous_level: previous,
            reason: reason.to_string(),
            disabled: to_disable.iter().cloned().collect(),
        });

        // ── 3. Run disable hooks, dependents before their dependencies ───
        for feature in self.shared.catalog.disable_order(&to_disable) {
            let _ = self.run_toggle(&feature, false).await;
        }

        // ── 4. Raise fallbacks for the shed features ─────────────────────
        for (feature, fallback) in fallbacks {
            if self.run_toggle(&fallback, true).await.is_ok() {
                {
                    let mut state = self.shared.state.lock().unwrap();
                    state.fallback_active.insert(fallback.clone());
                }
                log::info!("Degrade: fallback '{fallback}' active for feature '{feature}'.");
                self.shared
                    .bus
                    .emit(ControllerEvent::FallbackActivated { feature, fallback });
            }
        }

        Ok(true)
    }

    /// Restores exactly one level, from `expected_current` to `step`.
    ///
    /// Hooks run before the commit so that a concurrent degradation during
    /// a slow enable wins: the commit is dropped if the level moved in the
    /// meantime.
    pub(crate) async fn restore_step(
        &self,
        expected_current: LevelId,
        step: LevelId,
    ) -> ConfigResult<StepOutcome> {
        // ── 1. Plan the step from a state snapshot ───────────────────────
        let allowed = self.shared.levels.allowed_features(step)?.clone();
        let to_enable: BTreeSet<FeatureId> = {
            let state = self.shared.state.lock().unwrap();
            if state.current_level != expected_current {
                return Ok(StepOutcome::Superseded);
            }
            allowed
                .difference(&state.active_features)
                .cloned()
                .collect()
        };

        // ── 2. Run enable hooks, dependencies first ──────────────────────
        let ordered = self.shared.catalog.enable_order(&to_enable);
        let mut hard_failures = 0usize;
        for feature in &ordered {
            if let Err(error) = self.run_toggle(feature, true).await {
                if is_hard_failure(&error) {
                    hard_failures += 1;
                }
            }
        }
        if self.shared.config.strict_recovery
            && !ordered.is_empty()
            && hard_failures == ordered.len()
        {
            log::warn!(
                "Recovery: every enable hook for level {step} hard-failed; abandoning the step."
            );
            return Ok(StepOutcome::HaltedStrict);
        }

        // ── 3. Commit, unless a degradation got there first ──────────────
        {
            let mut state = self.shared.state.lock().unwrap();
            if state.current_level != expected_current {
                log::warn!(
                    "Recovery: level moved to {} while restoring {step}; step dropped.",
                    state.current_level
                );
                return Ok(StepOutcome::Superseded);
            }
            state.current_level = step;
            state.active_features = allowed.clone();
        }

        // ── 4. Retire fallbacks whose primaries are active again ─────────
        self.retire_fallbacks(&allowed).await;

        log::info!(
            "Recovery: restored level {step} ({} feature(s) re-enabled).",
            ordered.len()
        );
        self.shared.bus.emit(ControllerEvent::RecoveryStep {
            level: step,
            previous_level: expected_current,
            enabled: ordered,
        });
        Ok(StepOutcome::Committed)
    }

    /// Takes down every raised fallback that no shed primary needs anymore.
    async fn retire_fallbacks(&self, active: &BTreeSet<FeatureId>) {
        let to_retire: Vec<(FeatureId, FeatureId)> = {
            let state = self.shared.state.lock().unwrap();
            let mut pairs: Vec<(FeatureId, FeatureId)> = Vec::new();
            for module in self.shared.catalog.modules() {
                let Some(fallback) = &module.fallback else {
                    continue;
                };
                if !active.contains(&module.id) || !state.fallback_active.contains(fallback) {
                    continue;
                }
                // A fallback shared by several primaries stays up while any
                // of them is still shed.
                let still_needed = self
                    .shared
                    .catalog
                    .modules()
                    .any(|other| other.fallback.as_ref() == Some(fallback) && !active.contains(&other.id));
                if still_needed || pairs.iter().any(|(_, planned)| planned == fallback) {
                    continue;
                }
                pairs.push((module.id.clone(), fallback.clone()));
            }
            pairs
        };

        for (feature, fallback) in to_retire {
            let _ = self.run_toggle(&fallback, false).await;
            self.shared
                .state
                .lock()
                .unwrap()
                .fallback_active
                .remove(&fallback);
            log::info!("Recovery: fallback '{fallback}' retired; '{feature}' is active again.");
            self.shared
                .bus
                .emit(ControllerEvent::FallbackDeactivated { feature, fallback });
        }
    }

    /// Runs one feature hook best-effort: failures, panics, and a configured
    /// timeout are counted and logged, then handed back for the few call
    /// sites that care about the error itself.
    async fn run_toggle(&self, feature: &FeatureId, enable: bool) -> anyhow::Result<()> {
        let Some(toggle) = self.shared.catalog.toggle(feature) else {
            // Level and fallback references are validated at construction.
            return Ok(());
        };

        // Each hook runs as its own task so a panicking collaborator
        // unwinds there, never through the controller.
        let toggle = Arc::clone(toggle);
        let mut handle = tokio::spawn(async move {
            if enable {
                toggle.enable().await
            } else {
                toggle.disable().await
            }
        });

        let result = match self.shared.config.hook_timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut handle).await {
                Ok(joined) => join_hook_result(joined),
                Err(_) => {
                    handle.abort();
                    Err(anyhow!(
                        "feature hook exceeded its {}ms budget",
                        limit.as_millis()
                    ))
                }
            },
            None => join_hook_result(handle.await),
        };

        if let Err(error) = &result {
            self.shared
                .side_effect_failures
                .fetch_add(1, Ordering::Relaxed);
            let verb = if enable { "enable" } else { "disable" };
            log::warn!("Toggle: {verb} hook for feature '{feature}' failed: {error:#}");
        }
        result
    }

    /// The level currently in effect.
    pub fn current_level(&self) -> LevelId {
        self.shared.state.lock().unwrap().current_level
    }

    /// Snapshot of the features currently declared active.
    pub fn active_features(&self) -> BTreeSet<FeatureId> {
        self.shared.state.lock().unwrap().active_features.clone()
    }

    /// Declared status of one feature, or `None` if it is not registered.
    ///
    /// A raised fallback reports [`FeatureStatus::Active`] itself, while its
    /// shed primary reports [`FeatureStatus::FallbackActive`].
    pub fn feature_status(&self, feature: &FeatureId) -> Option<FeatureStatus> {
        let module = self.shared.catalog.get(feature)?;
        let state = self.shared.state.lock().unwrap();
        let status = if state.active_features.contains(feature) {
            FeatureStatus::Active
        } else if state.fallback_active.contains(feature) {
            FeatureStatus::Active
        } else if module
            .fallback
            .as_ref()
            .is_some_and(|fallback| state.fallback_active.contains(fallback))
        {
            FeatureStatus::FallbackActive
        } else {
            FeatureStatus::Disabled
        };
        Some(status)
    }

    /// Consistent snapshot of the controller for dashboards and logs.
    pub fn statistics(&self) -> Statistics {
        let state = self.shared.state.lock().unwrap();
        let level_name = self
            .shared
            .levels
            .get(state.current_level)
            .map(|level| level.name.clone())
            .unwrap_or_default();
        let disabled_features = self
            .shared
            .catalog
            .ids()
            .filter(|id| {
                !state.active_features.contains(id) && !state.fallback_active.contains(id)
            })
            .cloned()
            .collect();
        Statistics {
            current_level: state.current_level,
            level_name,
            active_features: state.active_features.clone(),
            disabled_features,
            fallback_active: state.fallback_active.clone(),
            history: state.history.snapshot(),
            recovery_attempts: state.recovery_attempts,
            recovery_in_progress: self.shared.recovery_in_progress.load(Ordering::SeqCst),
            side_effect_failures: self.shared.side_effect_failures.load(Ordering::Relaxed),
            last_health: self.shared.last_health.lock().unwrap().clone(),
            uptime: self.shared.started_at.elapsed(),
        }
    }

    /// Subscribes a listener to one kind of controller event.
    pub fn on(
        &self,
        kind: EventKind,
        listener: impl Fn(&ControllerEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        self.shared.bus.on(kind, listener)
    }

    /// Removes a previously registered listener.
    pub fn off(&self, kind: EventKind, id: ListenerId) -> bool {
        self.shared.bus.off(kind, id)
    }

    /// The underlying event bus, e.g. to tap events into a channel.
    pub fn events(&self) -> &EventBus<ControllerEvent> {
        &self.shared.bus
    }

    pub(crate) fn shared(&self) -> &Arc<ControllerShared> {
        &self.shared
    }
}

impl std::fmt::Debug for DegradationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DegradationController")
            .field("current_level", &self.current_level())
            .finish_non_exhaustive()
    }
}

/// Maps a joined hook task to the hook's own result, turning a panic into
/// an ordinary error.
fn join_hook_result(
    joined: Result<anyhow::Result<()>, tokio::task::JoinError>,
) -> anyhow::Result<()> {
    match joined {
        Ok(result) => result,
        Err(join_error) if join_error.is_panic() => Err(anyhow!("feature hook panicked")),
        Err(join_error) => Err(anyhow!("feature hook task failed: {join_error}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::feature::{FeatureModule, FeatureToggle, NoopToggle};

    fn noop() -> Arc<dyn FeatureToggle> {
        Arc::new(NoopToggle)
    }

    fn ladder() -> LevelRegistry {
        LevelRegistry::builder()
            .level("full", "", ["core", "analysis", "export"])
            .level("reduced", "", ["core", "analysis"])
            .level("minimal", "", ["core"])
            .build()
            .unwrap()
    }

    fn catalog() -> FeatureCatalog {
        FeatureCatalog::builder()
            .register(FeatureModule::new("core").essential(), noop())
            .register(FeatureModule::new("analysis").depends_on("core"), noop())
            .register(FeatureModule::new("export"), noop())
            .build()
            .unwrap()
    }

    #[test]
    fn starts_at_baseline_with_its_allowed_set() {
        let controller =
            DegradationController::new(ladder(), catalog(), ControllerConfig::default()).unwrap();
        assert_eq!(controller.current_level(), LevelId::BASELINE);
        assert_eq!(controller.active_features().len(), 3);
        assert_eq!(
            controller.feature_status(&FeatureId::new("export")),
            Some(FeatureStatus::Active)
        );
        assert_eq!(controller.feature_status(&FeatureId::new("missing")), None);
    }

    #[test]
    fn rejects_levels_referencing_unknown_features() {
        let levels = LevelRegistry::builder()
            .level("full", "", ["core", "ghost"])
            .build()
            .unwrap();
        let err =
            DegradationController::new(levels, catalog(), ControllerConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownFeature {
                level: LevelId(0),
                feature: FeatureId::new("ghost"),
            }
        );
    }

    #[test]
    fn rejects_levels_that_are_not_dependency_closed() {
        let levels = LevelRegistry::builder()
            .level("full", "", ["core", "analysis"])
            .level("odd", "", ["analysis"])
            .build()
            .unwrap();
        let err =
            DegradationController::new(levels, catalog(), ControllerConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::DependencyNotAllowed {
                level: LevelId(1),
                feature: FeatureId::new("analysis"),
                dependency: FeatureId::new("core"),
            }
        );
    }

    #[test]
    fn rejects_essential_feature_missing_from_baseline() {
        let levels = LevelRegistry::builder()
            .level("full", "", ["analysis", "core"])
            .build()
            .unwrap();
        let catalog = FeatureCatalog::builder()
            .register(FeatureModule::new("core"), noop())
            .register(FeatureModule::new("analysis").depends_on("core"), noop())
            .register(FeatureModule::new("audit").essential(), noop())
            .build()
            .unwrap();
        let err =
            DegradationController::new(levels, catalog, ControllerConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::EssentialNotBaseline {
                feature: FeatureId::new("audit"),
            }
        );
    }

    #[test]
    fn essential_shedding_requires_explicit_opt_in() {
        let levels = LevelRegistry::builder()
            .level("full", "", ["core", "export"])
            .level("dark", "", Vec::<FeatureId>::new())
            .build()
            .unwrap();
        let build_catalog = || {
            FeatureCatalog::builder()
                .register(FeatureModule::new("core").essential(), noop())
                .register(FeatureModule::new("export"), noop())
                .build()
                .unwrap()
        };

        let err =
            DegradationController::new(levels.clone(), build_catalog(), ControllerConfig::default())
                .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::EssentialExcluded {
                feature: FeatureId::new("core"),
                level: LevelId(1),
            }
        );

        let config = ControllerConfig {
            allow_essential_shedding: true,
            ..ControllerConfig::default()
        };
        assert!(DegradationController::new(levels, build_catalog(), config).is_ok());
    }

    #[test]
    fn rejects_ceiling_outside_the_registered_range() {
        let config = ControllerConfig {
            max_level: Some(LevelId(7)),
            ..ControllerConfig::default()
        };
        let err = DegradationController::new(ladder(), catalog(), config).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownLevel { .. }));
    }

    #[tokio::test]
    async fn degrade_commits_level_and_sheds_features() {
        let controller =
            DegradationController::new(ladder(), catalog(), ControllerConfig::default()).unwrap();
        let applied = controller
            .degrade_to_level(LevelId(1), "load spike", false)
            .await
            .unwrap();
        assert!(applied);
        assert_eq!(controller.current_level(), LevelId(1));
        assert_eq!(
            controller.feature_status(&FeatureId::new("export")),
            Some(FeatureStatus::Disabled)
        );

        let stats = controller.statistics();
        assert_eq!(stats.history.len(), 1);
        assert_eq!(stats.history[0].reason, "load spike");
        assert_eq!(stats.history[0].previous_level, LevelId::BASELINE);
    }

    #[tokio::test]
    async fn shallower_requests_are_no_ops_without_force() {
        let controller =
            DegradationController::new(ladder(), catalog(), ControllerConfig::default()).unwrap();
        controller
            .degrade_to_level(LevelId(2), "first", false)
            .await
            .unwrap();
        assert!(!controller
            .degrade_to_level(LevelId(2), "again", false)
            .await
            .unwrap());
        assert!(!controller
            .degrade_to_level(LevelId(1), "shallower", false)
            .await
            .unwrap());
        assert_eq!(controller.statistics().history.len(), 1);

        assert!(controller
            .degrade_to_level(LevelId(2), "forced", true)
            .await
            .unwrap());
        assert_eq!(controller.statistics().history.len(), 2);
    }

    #[tokio::test]
    async fn unknown_target_is_an_error_but_ceiling_clamps() {
        let config = ControllerConfig {
            max_level: Some(LevelId(1)),
            ..ControllerConfig::default()
        };
        let controller = DegradationController::new(ladder(), catalog(), config).unwrap();

        let err = controller
            .degrade_to_level(LevelId(99), "bogus", false)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownLevel {
                id: LevelId(99),
                max: LevelId(2),
            }
        );

        // A registered level deeper than the ceiling clamps instead.
        assert!(controller
            .degrade_to_level(LevelId(2), "pressure", false)
            .await
            .unwrap());
        assert_eq!(controller.current_level(), LevelId(1));
    }
}

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

// Walkthrough of the controllers on a mock data-analysis application:
// degrade under simulated pressure, then let the recovery service climb
// back as scripted health improves.
// Run with: RUST_LOG=info cargo run -p sandbox

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use aegis_control::{
    ControllerConfig, ControllerEvent, DegradationController, EventKind, FeatureCatalog,
    LevelRegistry, RecoveryController, RecoveryService, ServiceConfig, ThresholdHealthMonitor,
};
use aegis_core::feature::{FeatureModule, FeatureToggle};
use aegis_core::health::{HealthMonitor, HealthSample};
use aegis_core::LevelId;
use aegis_infra::SysinfoSignalSource;
use async_trait::async_trait;

/// Toggle that just narrates what the real feature would do.
struct LoggingToggle {
    name: &'static str,
}

impl LoggingToggle {
    fn shared(name: &'static str) -> Arc<dyn FeatureToggle> {
        Arc::new(Self { name })
    }
}

#[async_trait]
impl FeatureToggle for LoggingToggle {
    async fn enable(&self) -> anyhow::Result<()> {
        log::info!("[{}] spinning up", self.name);
        Ok(())
    }

    async fn disable(&self) -> anyhow::Result<()> {
        log::info!("[{}] shutting down", self.name);
        Ok(())
    }
}

/// Toggle whose disable hook always fails, to show failure absorption.
struct StubbornToggle {
    name: &'static str,
}

#[async_trait]
impl FeatureToggle for StubbornToggle {
    async fn enable(&self) -> anyhow::Result<()> {
        log::info!("[{}] spinning up", self.name);
        Ok(())
    }

    async fn disable(&self) -> anyhow::Result<()> {
        anyhow::bail!("{} refuses to shut down", self.name)
    }
}

/// Monitor that walks through a scripted list of recommendations, then
/// reports the baseline forever. Stands in for slowly improving health.
struct ImprovingMonitor {
    script: Mutex<VecDeque<LevelId>>,
}

impl ImprovingMonitor {
    fn new(script: impl IntoIterator<Item = u8>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().map(LevelId).collect()),
        }
    }
}

impl HealthMonitor for ImprovingMonitor {
    fn sample(&self, _current_level: LevelId) -> anyhow::Result<HealthSample> {
        let recommended = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(LevelId::BASELINE);
        Ok(HealthSample {
            timestamp: SystemTime::now(),
            load: 0.45,
            memory_pct: 0.55,
            network_online: true,
            recommended_level: recommended,
        })
    }
}

/// Six levels for a mock analysis app, from everything-on to core-only.
fn build_levels() -> anyhow::Result<LevelRegistry> {
    let registry = LevelRegistry::builder()
        .level(
            "full",
            "all features enabled",
            [
                "core",
                "analysis",
                "results",
                "visualizations",
                "animations",
                "export",
                "sharing",
                "real-time-updates",
            ],
        )
        .level(
            "conserving",
            "cosmetic extras off",
            [
                "core",
                "analysis",
                "results",
                "visualizations",
                "export",
                "sharing",
                "real-time-updates",
            ],
        )
        .level(
            "reduced",
            "static views only",
            ["core", "analysis", "results", "export", "sharing"],
        )
        .level(
            "constrained",
            "no outbound work",
            ["core", "analysis", "results"],
        )
        .level("minimal", "analysis without result views", ["core", "analysis"])
        .level("emergency", "core only", ["core"])
        .build()?;
    Ok(registry)
}

fn build_catalog() -> anyhow::Result<FeatureCatalog> {
    let catalog = FeatureCatalog::builder()
        .register(
            FeatureModule::new("core").essential(),
            LoggingToggle::shared("core"),
        )
        .register(
            FeatureModule::new("analysis").depends_on("core"),
            LoggingToggle::shared("analysis"),
        )
        .register(
            FeatureModule::new("results")
                .depends_on("analysis")
                .with_fallback("plain-results"),
            LoggingToggle::shared("results"),
        )
        .register(
            FeatureModule::new("visualizations")
                .depends_on("analysis")
                .with_fallback("text-charts"),
            LoggingToggle::shared("visualizations"),
        )
        .register(
            FeatureModule::new("animations").depends_on("visualizations"),
            LoggingToggle::shared("animations"),
        )
        .register(
            FeatureModule::new("export").depends_on("results"),
            LoggingToggle::shared("export"),
        )
        .register(
            FeatureModule::new("sharing")
                .depends_on("results")
                .with_fallback("copy-link"),
            Arc::new(StubbornToggle { name: "sharing" }),
        )
        .register(
            FeatureModule::new("real-time-updates")
                .depends_on("core")
                .with_fallback("manual-refresh"),
            LoggingToggle::shared("real-time-updates"),
        )
        .register(FeatureModule::new("plain-results"), LoggingToggle::shared("plain-results"))
        .register(FeatureModule::new("text-charts"), LoggingToggle::shared("text-charts"))
        .register(FeatureModule::new("copy-link"), LoggingToggle::shared("copy-link"))
        .register(
            FeatureModule::new("manual-refresh"),
            LoggingToggle::shared("manual-refresh"),
        )
        .build()?;
    Ok(catalog)
}

fn print_statistics(controller: &DegradationController) -> anyhow::Result<()> {
    let stats = controller.statistics();
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Real platform signals, just to show what the box looks like right now.
    // Production wires this monitor into the recovery service directly.
    let platform_monitor = ThresholdHealthMonitor::new(Arc::new(SysinfoSignalSource::new()));
    match platform_monitor.sample(LevelId::BASELINE) {
        Ok(sample) => log::info!(
            "Platform probe: load {:.0}%, memory {:.0}%, online {}; recommended level {}",
            sample.load * 100.0,
            sample.memory_pct * 100.0,
            sample.network_online,
            sample.recommended_level
        ),
        Err(error) => log::warn!("Platform probe failed: {error:#}"),
    }

    let controller =
        DegradationController::new(build_levels()?, build_catalog()?, ControllerConfig::default())?;

    controller.on(EventKind::DegradationApplied, |event| {
        if let ControllerEvent::DegradationApplied { level, reason, disabled, .. } = event {
            log::warn!("observer: level {level} applied ({reason}), shed {disabled:?}");
        }
    });
    controller.on(EventKind::RecoveryStep, |event| {
        if let ControllerEvent::RecoveryStep { level, enabled, .. } = event {
            log::info!("observer: recovered to level {level}, re-enabled {enabled:?}");
        }
    });

    // ── Degradation under simulated pressure ─────────────────────────────
    controller
        .degrade_to_level(LevelId(2), "simulated cpu spike", false)
        .await?;
    controller
        .degrade_to_level(LevelId(4), "simulated memory exhaustion", false)
        .await?;

    if let Err(error) = controller.degrade_to_level(LevelId(99), "typo", false).await {
        log::error!("rejected as expected: {error}");
    }

    println!("--- statistics while degraded ---");
    print_statistics(&controller)?;

    // ── Phased recovery as scripted health improves ──────────────────────
    let recovery = RecoveryController::new(
        controller.clone(),
        Arc::new(ImprovingMonitor::new([2, 1, 0])),
    );
    let mut service = RecoveryService::new(
        recovery,
        ServiceConfig {
            check_interval: Duration::from_secs(1),
            target_level: LevelId::BASELINE,
        },
    );
    service.start();
    tokio::time::sleep(Duration::from_secs(4)).await;
    service.stop().await;

    println!("--- statistics after recovery ---");
    print_statistics(&controller)?;

    Ok(())
}

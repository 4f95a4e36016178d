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

//! Background service running periodic recovery attempts.
//!
//! Owns a tokio task that calls
//! [`RecoveryController::attempt_recovery`] on a fixed interval. The first
//! attempt runs immediately on start, so a process that boots degraded does
//! not wait a full interval before trying to climb.

use std::sync::Arc;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::ServiceConfig;
use crate::recover::RecoveryController;

/// Periodic driver of the recovery controller.
///
/// The service is quiet when there is nothing to do: a tick at the baseline,
/// under poor health, or while a manual session holds the gate is a no-op.
#[derive(Debug)]
pub struct RecoveryService {
    config: ServiceConfig,
    recovery: Arc<RecoveryController>,
    shutdown: Arc<Notify>,
    handle: Option<JoinHandle<()>>,
}

impl RecoveryService {
    /// Creates a stopped service around a recovery controller.
    pub fn new(recovery: RecoveryController, config: ServiceConfig) -> Self {
        Self {
            config,
            recovery: Arc::new(recovery),
            shutdown: Arc::new(Notify::new()),
            handle: None,
        }
    }

    /// The recovery controller the service drives.
    pub fn recovery(&self) -> &RecoveryController {
        &self.recovery
    }

    /// Spawns the periodic task. Must be called within a tokio runtime.
    /// Calling it while the task is already running is a no-op.
    pub fn start(&mut self) {
        if self.handle.as_ref().is_some_and(|handle| !handle.is_finished()) {
            log::warn!("RecoveryService: start() called while already running.");
            return;
        }

        let recovery = Arc::clone(&self.recovery);
        let shutdown = Arc::clone(&self.shutdown);
        let interval = self.config.check_interval;
        let target = self.config.target_level;

        self.handle = Some(tokio::spawn(async move {
            log::info!(
                "RecoveryService: started (interval {}s, target level {target}).",
                interval.as_secs()
            );
            let mut ticker = tokio::time::interval(interval);
            // A late tick reschedules instead of bursting to catch up.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if recovery.attempt_recovery(Some(target)).await {
                            log::debug!("RecoveryService: tick restored at least one level.");
                        }
                    }
                    _ = shutdown.notified() => break,
                }
            }
            log::info!("RecoveryService: stopped.");
        }));
    }

    /// Signals the task to stop and waits for it to finish. Safe to call
    /// when the service was never started.
    pub async fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.shutdown.notify_one();
            let _ = handle.await;
        }
    }

    /// `true` while the periodic task is alive.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for RecoveryService {
    fn drop(&mut self) {
        // No async context here; tell the task to stop and detach it.
        if let Some(handle) = self.handle.take() {
            self.shutdown.notify_one();
            handle.abort();
        }
    }
}

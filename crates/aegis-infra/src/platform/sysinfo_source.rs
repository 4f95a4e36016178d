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

//! sysinfo-based implementation of the HealthSignalSource trait.

use aegis_core::health::{HealthSignalSource, HealthSignals};
use anyhow::bail;
use std::sync::Mutex;
use sysinfo::{Networks, System};

/// A health signal source that uses the `sysinfo` crate.
///
/// CPU usage is computed from the delta between refreshes, so the very
/// first read after construction may under-report the load. Connectivity
/// is a heuristic: any non-loopback interface that has moved traffic.
pub struct SysinfoSignalSource {
    system: Mutex<System>,
}

impl SysinfoSignalSource {
    /// Creates a new SysinfoSignalSource.
    pub fn new() -> Self {
        let mut system = System::new_all();
        system.refresh_all();
        log::debug!(
            "SysinfoSignalSource initialized ({} cpus, {} MiB total memory).",
            system.cpus().len(),
            system.total_memory() / (1024 * 1024)
        );
        Self {
            system: Mutex::new(system),
        }
    }
}

impl HealthSignalSource for SysinfoSignalSource {
    fn read(&self) -> anyhow::Result<HealthSignals> {
        let (load, memory_pct) = {
            let mut system = self.system.lock().unwrap();
            system.refresh_cpu_all();
            system.refresh_memory();

            let load = (system.global_cpu_usage() / 100.0).clamp(0.0, 1.0);
            let total = system.total_memory();
            if total == 0 {
                bail!("platform reports zero total memory");
            }
            let memory_pct = (system.used_memory() as f32 / total as f32).clamp(0.0, 1.0);
            (load, memory_pct)
        };

        let networks = Networks::new_with_refreshed_list();
        let network_online = networks.iter().any(|(name, data)| {
            let lower = name.to_lowercase();
            let loopback = lower == "lo" || lower == "lo0" || lower.contains("loopback");
            !loopback && data.total_received() + data.total_transmitted() > 0
        });

        Ok(HealthSignals {
            load,
            memory_pct,
            network_online,
        })
    }
}

impl Default for SysinfoSignalSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_reports_normalized_fractions() {
        let source = SysinfoSignalSource::new();
        let signals = source.read().unwrap();
        assert!((0.0..=1.0).contains(&signals.load));
        assert!((0.0..=1.0).contains(&signals.memory_pct));
    }

    #[test]
    fn repeated_reads_are_stable() {
        let source = SysinfoSignalSource::new();
        source.read().unwrap();
        let signals = source.read().unwrap();
        assert!((0.0..=1.0).contains(&signals.load));
    }
}

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

//! # Aegis Control
//!
//! Control plane of the Aegis engine: the level and feature registries,
//! the degradation and recovery controllers built on top of them, and the
//! periodic [`RecoveryService`] that drives health-gated recovery.
//!
//! The division of labour mirrors the rest of the workspace:
//! `aegis-core` defines the vocabulary (levels, features, health, events)
//! while this crate owns the state machine that acts on it.

#![warn(missing_docs)]

pub mod catalog;
pub mod config;
pub mod degrade;
pub mod events;
pub mod history;
pub mod levels;
pub mod monitor;
pub mod recover;
pub mod service;
pub mod stats;

pub use catalog::{FeatureCatalog, FeatureCatalogBuilder};
pub use config::{ControllerConfig, ServiceConfig};
pub use degrade::DegradationController;
pub use events::{ControllerEvent, EventKind};
pub use levels::{LevelRegistry, LevelRegistryBuilder};
pub use monitor::{HealthThresholds, ThresholdHealthMonitor};
pub use recover::RecoveryController;
pub use service::RecoveryService;
pub use stats::Statistics;

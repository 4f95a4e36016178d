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

//! Events published by the controllers on the notification bus.

use aegis_core::event::BusEvent;
use aegis_core::{FeatureId, LevelId};

/// Notification emitted by the degradation and recovery controllers.
///
/// Events describe committed state transitions: by the time a listener
/// observes one, the controller already reports the new level.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// The system dropped to a deeper degradation level.
    DegradationApplied {
        /// Level now in effect.
        level: LevelId,
        /// Level that was in effect before the transition.
        previous_level: LevelId,
        /// Operator-supplied reason for the degradation.
        reason: String,
        /// Features shed by this transition.
        disabled: Vec<FeatureId>,
    },
    /// A recovery session restored exactly one level.
    RecoveryStep {
        /// Level now in effect.
        level: LevelId,
        /// Level that was in effect before the step.
        previous_level: LevelId,
        /// Features re-enabled by this step.
        enabled: Vec<FeatureId>,
    },
    /// A recovery session ran to its floor without interruption.
    RecoveryCompleted {
        /// Level the session settled on.
        level: LevelId,
    },
    /// A recovery session stopped short of its floor.
    RecoveryHalted {
        /// Level the session stopped at.
        level: LevelId,
        /// Floor the session was aiming for.
        target: LevelId,
    },
    /// A degraded feature's fallback was brought up.
    FallbackActivated {
        /// Primary feature the fallback stands in for.
        feature: FeatureId,
        /// Fallback feature that is now running.
        fallback: FeatureId,
    },
    /// A fallback was taken down because its primary feature returned.
    FallbackDeactivated {
        /// Primary feature that is active again.
        feature: FeatureId,
        /// Fallback feature that was shut down.
        fallback: FeatureId,
    },
}

/// Discriminant used to subscribe to one class of [`ControllerEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Matches [`ControllerEvent::DegradationApplied`].
    DegradationApplied,
    /// Matches [`ControllerEvent::RecoveryStep`].
    RecoveryStep,
    /// Matches [`ControllerEvent::RecoveryCompleted`].
    RecoveryCompleted,
    /// Matches [`ControllerEvent::RecoveryHalted`].
    RecoveryHalted,
    /// Matches [`ControllerEvent::FallbackActivated`].
    FallbackActivated,
    /// Matches [`ControllerEvent::FallbackDeactivated`].
    FallbackDeactivated,
}

impl BusEvent for ControllerEvent {
    type Kind = EventKind;

    fn kind(&self) -> EventKind {
        match self {
            ControllerEvent::DegradationApplied { .. } => EventKind::DegradationApplied,
            ControllerEvent::RecoveryStep { .. } => EventKind::RecoveryStep,
            ControllerEvent::RecoveryCompleted { .. } => EventKind::RecoveryCompleted,
            ControllerEvent::RecoveryHalted { .. } => EventKind::RecoveryHalted,
            ControllerEvent::FallbackActivated { .. } => EventKind::FallbackActivated,
            ControllerEvent::FallbackDeactivated { .. } => EventKind::FallbackDeactivated,
        }
    }
}

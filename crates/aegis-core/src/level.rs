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

//! Degradation levels and the history records produced when entering one.

use crate::feature::FeatureId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::time::SystemTime;

/// An ordered degradation level identifier.
///
/// Level 0 is the unrestricted baseline; higher ids are more restricted.
/// The total order of ids is the total order of restriction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LevelId(pub u8);

impl LevelId {
    /// The unrestricted baseline level.
    pub const BASELINE: LevelId = LevelId(0);

    /// Returns `true` for the unrestricted baseline level.
    pub fn is_baseline(self) -> bool {
        self.0 == 0
    }

    /// The next less restricted level, or `None` at the baseline.
    pub fn relaxed(self) -> Option<LevelId> {
        self.0.checked_sub(1).map(LevelId)
    }
}

impl Display for LevelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for LevelId {
    fn from(value: u8) -> Self {
        LevelId(value)
    }
}

/// One registered degradation level: an id, human-readable naming, and the
/// set of features still allowed while the system sits at this level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradationLevel {
    /// Position of this level in the restriction order.
    pub id: LevelId,
    /// Short name shown in logs and statistics (e.g. "safe mode").
    pub name: String,
    /// Longer description of what the level is for.
    pub description: String,
    /// Features that remain permitted at this level.
    pub allowed_features: BTreeSet<FeatureId>,
}

impl DegradationLevel {
    /// Returns `true` if `feature` is permitted at this level.
    pub fn allows(&self, feature: &FeatureId) -> bool {
        self.allowed_features.contains(feature)
    }
}

/// A committed level transition, as retained by the bounded history.
///
/// Only degradations are recorded; recovery progress is observable through
/// bus events and the recovery-attempt counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationRecord {
    /// The level that was entered.
    pub level: LevelId,
    /// The level that was left.
    pub previous_level: LevelId,
    /// Caller-supplied reason for the transition.
    pub reason: String,
    /// Wall-clock time of the commit.
    pub timestamp: SystemTime,
}

impl DegradationRecord {
    /// Creates a record stamped with the current wall-clock time.
    pub fn new(level: LevelId, previous_level: LevelId, reason: impl Into<String>) -> Self {
        Self {
            level,
            previous_level,
            reason: reason.into(),
            timestamp: SystemTime::now(),
        }
    }
}

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

//! Configuration-time errors raised by registries and controllers.
//!
//! This is the only error family that crosses the controller boundary as a
//! `Result::Err`. Runtime side-effect failures are absorbed, logged, and
//! counted instead (see the controller crates), because a degradation
//! operation that itself fails would defeat its purpose.

use crate::feature::FeatureId;
use crate::level::LevelId;
use std::fmt::Display;

/// A convenient result alias for configuration-time operations.
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// An error in the static configuration of levels or features.
///
/// Raised at registry construction or when an operation references an id
/// outside the registered range. Never raised for runtime hook failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A level registry was built with no levels at all.
    EmptyLevels,
    /// A level registry was built with more levels than ids can address.
    TooManyLevels {
        /// Number of levels the builder was given.
        count: usize,
    },
    /// A level's allowed-feature set is not a subset of the previous level's.
    ///
    /// Levels are ordered from least to most restricted, so each level may
    /// only remove features relative to the one before it.
    NonMonotonicLevels {
        /// The offending (more restricted) level.
        level: LevelId,
        /// A feature allowed at this level but not at the level before it.
        feature: FeatureId,
    },
    /// The referenced level id is outside the registered range.
    UnknownLevel {
        /// The id that was requested.
        id: LevelId,
        /// The highest registered level id.
        max: LevelId,
    },
    /// Two feature modules were registered under the same id.
    DuplicateFeature {
        /// The id registered twice.
        id: FeatureId,
    },
    /// A feature declares a dependency on an id that is not registered.
    UnknownDependency {
        /// The declaring feature.
        feature: FeatureId,
        /// The missing dependency id.
        dependency: FeatureId,
    },
    /// A feature declares a fallback id that is not registered.
    UnknownFallback {
        /// The declaring feature.
        feature: FeatureId,
        /// The missing fallback id.
        fallback: FeatureId,
    },
    /// A feature depends on itself or names itself as its own fallback.
    SelfReference {
        /// The offending feature.
        feature: FeatureId,
    },
    /// The feature dependency graph contains a cycle.
    DependencyCycle {
        /// One feature known to participate in the cycle.
        feature: FeatureId,
    },
    /// A level's allowed set references a feature missing from the catalog.
    UnknownFeature {
        /// The level whose allowed set holds the reference.
        level: LevelId,
        /// The unregistered feature id.
        feature: FeatureId,
    },
    /// An essential feature is missing from the baseline level's allowed set.
    EssentialNotBaseline {
        /// The essential feature absent from level 0.
        feature: FeatureId,
    },
    /// An essential feature would be shed at some level, and shedding
    /// essentials was not explicitly enabled in the controller config.
    EssentialExcluded {
        /// The essential feature.
        feature: FeatureId,
        /// The first level that excludes it.
        level: LevelId,
    },
    /// A feature is allowed at a level where one of its dependencies is not.
    ///
    /// Every level's allowed set must be closed under declared dependencies,
    /// otherwise the declared state could contain a feature whose dependency
    /// is disabled.
    DependencyNotAllowed {
        /// The level whose allowed set is not dependency-closed.
        level: LevelId,
        /// The feature allowed at that level.
        feature: FeatureId,
        /// Its dependency missing from the same allowed set.
        dependency: FeatureId,
    },
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::EmptyLevels => {
                write!(f, "Level registry must contain at least one level")
            }
            ConfigurationError::TooManyLevels { count } => {
                write!(f, "Level registry holds {count} levels, more than ids can address")
            }
            ConfigurationError::NonMonotonicLevels { level, feature } => {
                write!(
                    f,
                    "Level {level} allows feature '{feature}' that the previous level does not"
                )
            }
            ConfigurationError::UnknownLevel { id, max } => {
                write!(f, "Unknown degradation level {id} (registered range is 0..={max})")
            }
            ConfigurationError::DuplicateFeature { id } => {
                write!(f, "Feature '{id}' registered more than once")
            }
            ConfigurationError::UnknownDependency {
                feature,
                dependency,
            } => {
                write!(f, "Feature '{feature}' depends on unregistered feature '{dependency}'")
            }
            ConfigurationError::UnknownFallback { feature, fallback } => {
                write!(f, "Feature '{feature}' falls back to unregistered feature '{fallback}'")
            }
            ConfigurationError::SelfReference { feature } => {
                write!(f, "Feature '{feature}' references itself")
            }
            ConfigurationError::DependencyCycle { feature } => {
                write!(f, "Feature dependency cycle detected involving '{feature}'")
            }
            ConfigurationError::UnknownFeature { level, feature } => {
                write!(f, "Level {level} allows feature '{feature}' that is not in the catalog")
            }
            ConfigurationError::EssentialNotBaseline { feature } => {
                write!(f, "Essential feature '{feature}' is missing from the baseline level")
            }
            ConfigurationError::EssentialExcluded { feature, level } => {
                write!(
                    f,
                    "Essential feature '{feature}' would be shed at level {level}; \
                     enable allow_essential_shedding to permit this"
                )
            }
            ConfigurationError::DependencyNotAllowed {
                level,
                feature,
                dependency,
            } => {
                write!(
                    f,
                    "Level {level} allows feature '{feature}' but not its dependency '{dependency}'"
                )
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

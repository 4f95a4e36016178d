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

//! Ordered registry of degradation levels.
//!
//! Levels are declared from the unrestricted baseline downwards; the builder
//! assigns contiguous ids in declaration order and rejects ladders where a
//! deeper level allows something a shallower one does not.

use std::collections::BTreeSet;

use aegis_core::error::{ConfigResult, ConfigurationError};
use aegis_core::level::DegradationLevel;
use aegis_core::{FeatureId, LevelId};

/// Immutable, validated ladder of degradation levels.
///
/// Guarantees after construction:
/// - at least one level exists (the baseline, id 0);
/// - ids are contiguous and equal to each level's position;
/// - every level's allowed set is a subset of the previous level's.
#[derive(Debug, Clone)]
pub struct LevelRegistry {
    levels: Vec<DegradationLevel>,
}

impl LevelRegistry {
    /// Starts building a registry. Levels are added in restriction order.
    pub fn builder() -> LevelRegistryBuilder {
        LevelRegistryBuilder { pending: Vec::new() }
    }

    /// Looks up a level by id.
    pub fn get(&self, id: LevelId) -> ConfigResult<&DegradationLevel> {
        self.levels
            .get(usize::from(id.0))
            .ok_or(ConfigurationError::UnknownLevel {
                id,
                max: self.max_level(),
            })
    }

    /// The allowed-feature set of a level.
    pub fn allowed_features(&self, id: LevelId) -> ConfigResult<&BTreeSet<FeatureId>> {
        self.get(id).map(|level| &level.allowed_features)
    }

    /// `true` if `id` is within the registered range.
    pub fn contains(&self, id: LevelId) -> bool {
        usize::from(id.0) < self.levels.len()
    }

    /// The deepest registered level.
    pub fn max_level(&self) -> LevelId {
        // Non-empty is a construction invariant.
        LevelId((self.levels.len() - 1) as u8)
    }

    /// Number of registered levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// `false` always; kept for API symmetry with collection types.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Iterates levels from the baseline to the deepest.
    pub fn iter(&self) -> impl Iterator<Item = &DegradationLevel> {
        self.levels.iter()
    }
}

/// Builder for [`LevelRegistry`]. Validation happens in [`build`](Self::build).
#[derive(Debug, Default)]
pub struct LevelRegistryBuilder {
    pending: Vec<(String, String, BTreeSet<FeatureId>)>,
}

impl LevelRegistryBuilder {
    /// Declares the next level. The first call declares the baseline (id 0),
    /// each following call the next more restricted level.
    pub fn level(
        mut self,
        name: &str,
        description: &str,
        features: impl IntoIterator<Item = impl Into<FeatureId>>,
    ) -> Self {
        let allowed = features.into_iter().map(Into::into).collect();
        self.pending
            .push((name.to_string(), description.to_string(), allowed));
        self
    }

    /// Validates the declared ladder and produces the registry.
    pub fn build(self) -> ConfigResult<LevelRegistry> {
        if self.pending.is_empty() {
            return Err(ConfigurationError::EmptyLevels);
        }
        if self.pending.len() > usize::from(u8::MAX) + 1 {
            return Err(ConfigurationError::TooManyLevels {
                count: self.pending.len(),
            });
        }

        let levels: Vec<DegradationLevel> = self
            .pending
            .into_iter()
            .enumerate()
            .map(|(index, (name, description, allowed_features))| DegradationLevel {
                id: LevelId(index as u8),
                name,
                description,
                allowed_features,
            })
            .collect();

        // Each level may only remove features relative to the previous one;
        // by induction its allowed set is then a subset of every shallower level.
        for pair in levels.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);
            if let Some(extra) = current
                .allowed_features
                .difference(&previous.allowed_features)
                .next()
            {
                return Err(ConfigurationError::NonMonotonicLevels {
                    level: current.id,
                    feature: extra.clone(),
                });
            }
        }

        Ok(LevelRegistry { levels })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_level_ladder() -> LevelRegistry {
        LevelRegistry::builder()
            .level("full", "everything on", ["core", "analysis", "export"])
            .level("reduced", "exports off", ["core", "analysis"])
            .level("minimal", "core only", ["core"])
            .build()
            .unwrap()
    }

    #[test]
    fn assigns_contiguous_ids_in_declaration_order() {
        let registry = three_level_ladder();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.max_level(), LevelId(2));
        let ids: Vec<LevelId> = registry.iter().map(|level| level.id).collect();
        assert_eq!(ids, vec![LevelId(0), LevelId(1), LevelId(2)]);
        assert_eq!(registry.get(LevelId(1)).unwrap().name, "reduced");
    }

    #[test]
    fn rejects_empty_ladder() {
        let err = LevelRegistry::builder().build().unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyLevels);
    }

    #[test]
    fn rejects_level_widening_the_allowed_set() {
        let err = LevelRegistry::builder()
            .level("full", "", ["core", "analysis"])
            .level("odd", "", ["core", "export"])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::NonMonotonicLevels {
                level: LevelId(1),
                feature: FeatureId::new("export"),
            }
        );
    }

    #[test]
    fn unknown_level_reports_the_registered_range() {
        let registry = three_level_ladder();
        let err = registry.get(LevelId(9)).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownLevel {
                id: LevelId(9),
                max: LevelId(2),
            }
        );
        assert!(!registry.contains(LevelId(3)));
        assert!(registry.contains(LevelId(2)));
    }

    #[test]
    fn allowed_features_reflect_declaration() {
        let registry = three_level_ladder();
        let reduced = registry.allowed_features(LevelId(1)).unwrap();
        assert!(reduced.contains(&FeatureId::new("analysis")));
        assert!(!reduced.contains(&FeatureId::new("export")));
    }

    #[test]
    fn empty_allowed_set_is_a_valid_deepest_level() {
        let registry = LevelRegistry::builder()
            .level("full", "", ["core"])
            .level("dark", "nothing runs", Vec::<FeatureId>::new())
            .build()
            .unwrap();
        assert!(registry
            .allowed_features(LevelId(1))
            .unwrap()
            .is_empty());
    }
}

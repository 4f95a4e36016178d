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

//! Registry of feature modules and their runtime toggles.
//!
//! The catalog validates the declared dependency and fallback graph once,
//! at build time, and precomputes the dependency order so the controllers
//! can sequence hook calls without re-sorting on every transition.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use aegis_core::error::{ConfigResult, ConfigurationError};
use aegis_core::feature::{FeatureModule, FeatureToggle};
use aegis_core::graph::topological_sort;
use aegis_core::FeatureId;

/// Immutable, validated set of feature modules with their toggles.
///
/// Guarantees after construction:
/// - feature ids are unique;
/// - every declared dependency and fallback names a registered feature;
/// - no feature references itself;
/// - the dependency graph is acyclic.
pub struct FeatureCatalog {
    modules: BTreeMap<FeatureId, FeatureModule>,
    toggles: HashMap<FeatureId, Arc<dyn FeatureToggle>>,
    /// All feature ids, dependencies before their dependents.
    dependency_order: Vec<FeatureId>,
}

impl FeatureCatalog {
    /// Starts building a catalog.
    pub fn builder() -> FeatureCatalogBuilder {
        FeatureCatalogBuilder { pending: Vec::new() }
    }

    /// Looks up a module declaration by id.
    pub fn get(&self, id: &FeatureId) -> Option<&FeatureModule> {
        self.modules.get(id)
    }

    /// `true` if `id` is registered.
    pub fn contains(&self, id: &FeatureId) -> bool {
        self.modules.contains_key(id)
    }

    /// The runtime toggle registered for `id`.
    pub fn toggle(&self, id: &FeatureId) -> Option<&Arc<dyn FeatureToggle>> {
        self.toggles.get(id)
    }

    /// Number of registered features.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// `true` if no features are registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterates registered ids in lexicographic order.
    pub fn ids(&self) -> impl Iterator<Item = &FeatureId> {
        self.modules.keys()
    }

    /// Iterates module declarations in lexicographic id order.
    pub fn modules(&self) -> impl Iterator<Item = &FeatureModule> {
        self.modules.values()
    }

    /// Full dependency order: every dependency precedes its dependents.
    pub fn dependency_order(&self) -> &[FeatureId] {
        &self.dependency_order
    }

    /// Restricts the dependency order to `subset`, for enabling features.
    pub fn enable_order(&self, subset: &BTreeSet<FeatureId>) -> Vec<FeatureId> {
        self.dependency_order
            .iter()
            .filter(|id| subset.contains(id))
            .cloned()
            .collect()
    }

    /// Reverse dependency order restricted to `subset`, for disabling
    /// features: dependents go down before the features they depend on.
    pub fn disable_order(&self, subset: &BTreeSet<FeatureId>) -> Vec<FeatureId> {
        let mut order = self.enable_order(subset);
        order.reverse();
        order
    }
}

impl fmt::Debug for FeatureCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureCatalog")
            .field("modules", &self.modules)
            .field("dependency_order", &self.dependency_order)
            .finish_non_exhaustive()
    }
}

/// Builder for [`FeatureCatalog`]. Validation happens in [`build`](Self::build).
pub struct FeatureCatalogBuilder {
    pending: Vec<(FeatureModule, Arc<dyn FeatureToggle>)>,
}

impl FeatureCatalogBuilder {
    /// Registers a feature module together with its runtime toggle.
    pub fn register(mut self, module: FeatureModule, toggle: Arc<dyn FeatureToggle>) -> Self {
        self.pending.push((module, toggle));
        self
    }

    /// Validates the declared graph and produces the catalog.
    pub fn build(self) -> ConfigResult<FeatureCatalog> {
        let mut modules: BTreeMap<FeatureId, FeatureModule> = BTreeMap::new();
        let mut toggles: HashMap<FeatureId, Arc<dyn FeatureToggle>> = HashMap::new();

        for (module, toggle) in self.pending {
            if modules.contains_key(&module.id) {
                return Err(ConfigurationError::DuplicateFeature { id: module.id });
            }
            toggles.insert(module.id.clone(), toggle);
            modules.insert(module.id.clone(), module);
        }

        for module in modules.values() {
            for dependency in &module.dependencies {
                if dependency == &module.id {
                    return Err(ConfigurationError::SelfReference {
                        feature: module.id.clone(),
                    });
                }
                if !modules.contains_key(dependency) {
                    return Err(ConfigurationError::UnknownDependency {
                        feature: module.id.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
            if let Some(fallback) = &module.fallback {
                if fallback == &module.id {
                    return Err(ConfigurationError::SelfReference {
                        feature: module.id.clone(),
                    });
                }
                if !modules.contains_key(fallback) {
                    return Err(ConfigurationError::UnknownFallback {
                        feature: module.id.clone(),
                        fallback: fallback.clone(),
                    });
                }
            }
        }

        // BTreeMap iteration keeps node and edge order deterministic, so the
        // computed order is stable across runs.
        let nodes = modules.keys().cloned();
        let edges = modules.values().flat_map(|module| {
            module
                .dependencies
                .iter()
                .map(|dependency| (dependency.clone(), module.id.clone()))
        });
        let dependency_order = topological_sort(nodes, edges)
            .map_err(|cycle| ConfigurationError::DependencyCycle { feature: cycle.node })?;

        Ok(FeatureCatalog {
            modules,
            toggles,
            dependency_order,
        })
    }
}

impl fmt::Debug for FeatureCatalogBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureCatalogBuilder")
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::feature::NoopToggle;

    fn noop() -> Arc<dyn FeatureToggle> {
        Arc::new(NoopToggle)
    }

    fn analysis_stack() -> FeatureCatalog {
        FeatureCatalog::builder()
            .register(FeatureModule::new("core").essential(), noop())
            .register(FeatureModule::new("analysis").depends_on("core"), noop())
            .register(
                FeatureModule::new("visualizations")
                    .depends_on("analysis")
                    .with_fallback("text-only"),
                noop(),
            )
            .register(FeatureModule::new("text-only"), noop())
            .build()
            .unwrap()
    }

    #[test]
    fn registers_and_looks_up_modules() {
        let catalog = analysis_stack();
        assert_eq!(catalog.len(), 4);
        assert!(catalog.contains(&FeatureId::new("analysis")));
        let viz = catalog.get(&FeatureId::new("visualizations")).unwrap();
        assert_eq!(viz.fallback, Some(FeatureId::new("text-only")));
        assert!(catalog.toggle(&FeatureId::new("core")).is_some());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = FeatureCatalog::builder()
            .register(FeatureModule::new("core"), noop())
            .register(FeatureModule::new("core"), noop())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::DuplicateFeature {
                id: FeatureId::new("core"),
            }
        );
    }

    #[test]
    fn rejects_unknown_dependency() {
        let err = FeatureCatalog::builder()
            .register(FeatureModule::new("charts").depends_on("analysis"), noop())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownDependency {
                feature: FeatureId::new("charts"),
                dependency: FeatureId::new("analysis"),
            }
        );
    }

    #[test]
    fn rejects_unknown_fallback() {
        let err = FeatureCatalog::builder()
            .register(FeatureModule::new("sharing").with_fallback("manual-copy"), noop())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownFallback {
                feature: FeatureId::new("sharing"),
                fallback: FeatureId::new("manual-copy"),
            }
        );
    }

    #[test]
    fn rejects_self_reference() {
        let err = FeatureCatalog::builder()
            .register(FeatureModule::new("loop").depends_on("loop"), noop())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::SelfReference {
                feature: FeatureId::new("loop"),
            }
        );
    }

    #[test]
    fn rejects_dependency_cycle() {
        let err = FeatureCatalog::builder()
            .register(FeatureModule::new("a").depends_on("b"), noop())
            .register(FeatureModule::new("b").depends_on("a"), noop())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DependencyCycle { .. }));
    }

    #[test]
    fn enable_order_puts_dependencies_first() {
        let catalog = analysis_stack();
        let subset: BTreeSet<FeatureId> = ["visualizations", "core", "analysis"]
            .into_iter()
            .map(FeatureId::new)
            .collect();
        let order = catalog.enable_order(&subset);
        let position = |id: &str| {
            order
                .iter()
                .position(|f| f == &FeatureId::new(id))
                .unwrap()
        };
        assert!(position("core") < position("analysis"));
        assert!(position("analysis") < position("visualizations"));
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn disable_order_is_reversed() {
        let catalog = analysis_stack();
        let subset: BTreeSet<FeatureId> =
            ["analysis", "core"].into_iter().map(FeatureId::new).collect();
        assert_eq!(
            catalog.disable_order(&subset),
            vec![FeatureId::new("analysis"), FeatureId::new("core")]
        );
    }
}

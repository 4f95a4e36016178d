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

//! Feature modules and the side-effect seam used to toggle them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

/// A unique identifier for a feature module.
///
/// The namespace is open: collaborators pick their own ids at registration
/// time, so this is a string key rather than a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(String);

impl FeatureId {
    /// Creates a new feature id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self {
        FeatureId::new(value)
    }
}

impl From<String> for FeatureId {
    fn from(value: String) -> Self {
        FeatureId(value)
    }
}

/// Declared runtime status of a feature, derived from the controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureStatus {
    /// The feature is in the current level's allowed set.
    Active,
    /// The feature has been shed by the current level.
    Disabled,
    /// The feature is disabled but running through its declared fallback.
    FallbackActive,
}

/// Static description of one toggleable feature module.
///
/// Runtime status is deliberately not stored here: module tables are
/// immutable after construction and the controller state record is the
/// single source of truth for what is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureModule {
    /// Unique id of the feature.
    pub id: FeatureId,
    /// Essential features must survive at the baseline level, and at every
    /// level unless essential shedding is explicitly configured.
    pub essential: bool,
    /// Features that must be active before this one is enabled.
    pub dependencies: BTreeSet<FeatureId>,
    /// Reduced-capability substitute activated while this feature is shed.
    pub fallback: Option<FeatureId>,
}

impl FeatureModule {
    /// Creates a non-essential module with no dependencies and no fallback.
    pub fn new(id: impl Into<FeatureId>) -> Self {
        Self {
            id: id.into(),
            essential: false,
            dependencies: BTreeSet::new(),
            fallback: None,
        }
    }

    /// Marks the module as essential, returning the modified module.
    pub fn essential(mut self) -> Self {
        self.essential = true;
        self
    }

    /// Adds a dependency, returning the modified module.
    pub fn depends_on(mut self, dependency: impl Into<FeatureId>) -> Self {
        self.dependencies.insert(dependency.into());
        self
    }

    /// Declares a fallback, returning the modified module.
    pub fn with_fallback(mut self, fallback: impl Into<FeatureId>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }
}

/// The injected side-effect seam: how a feature is really turned on or off.
///
/// Implemented by the collaborator that owns the feature (UI layer, worker
/// pool, cache, ...). The controller calls these hooks best-effort: an `Err`
/// is logged and counted but never aborts a degradation or recovery, and the
/// declared controller state is committed independently of hook outcomes.
/// Hooks may be called redundantly (e.g. disabling an already-disabled
/// feature on a forced degrade) and must tolerate that.
#[async_trait]
pub trait FeatureToggle: Send + Sync {
    /// Brings the real feature up.
    async fn enable(&self) -> anyhow::Result<()>;

    /// Takes the real feature down.
    async fn disable(&self) -> anyhow::Result<()>;
}

/// A toggle for features with no real side effect. Logs at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopToggle;

#[async_trait]
impl FeatureToggle for NoopToggle {
    async fn enable(&self) -> anyhow::Result<()> {
        log::debug!("NoopToggle: enable");
        Ok(())
    }

    async fn disable(&self) -> anyhow::Result<()> {
        log::debug!("NoopToggle: disable");
        Ok(())
    }
}

/// Marker attached to a toggle error to flag it as a hard failure.
///
/// Soft failures only feed the failure counter. Hard failures additionally
/// halt a strict-mode recovery step when every enable attempt of the step
/// reports one. Attach it with `anyhow::Error::new(HardFailure).context(..)`
/// or by returning it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardFailure;

impl Display for HardFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hard feature-toggle failure")
    }
}

impl std::error::Error for HardFailure {}

/// Returns `true` if `err` carries the [`HardFailure`] marker anywhere in
/// its chain.
pub fn is_hard_failure(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.downcast_ref::<HardFailure>().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn module_builder_collects_declarations() {
        let module = FeatureModule::new("visualizations")
            .depends_on("analysis")
            .depends_on("results")
            .with_fallback("text-only");

        assert_eq!(module.id, FeatureId::new("visualizations"));
        assert!(!module.essential);
        assert_eq!(module.dependencies.len(), 2);
        assert!(module.dependencies.contains(&FeatureId::new("analysis")));
        assert_eq!(module.fallback, Some(FeatureId::new("text-only")));
    }

    #[test]
    fn essential_flag_is_sticky() {
        let module = FeatureModule::new("core").essential();
        assert!(module.essential);
    }

    #[test]
    fn hard_failure_survives_context_wrapping() {
        let err = anyhow::Error::new(HardFailure).context("renderer is gone");
        assert!(is_hard_failure(&err));

        let soft = anyhow::anyhow!("transient hiccup");
        assert!(!is_hard_failure(&soft));
    }

    #[tokio::test]
    async fn noop_toggle_always_succeeds() {
        let toggle = NoopToggle;
        assert!(toggle.enable().await.is_ok());
        assert!(toggle.disable().await.is_ok());
    }

    #[test]
    fn feature_id_serializes_transparently() {
        let id = FeatureId::new("export");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"export\"");
    }
}

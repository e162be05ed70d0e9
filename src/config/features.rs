use std::collections::BTreeSet;

/// Capability advertised by backends that accept streamed image saves.
pub const FEATURE_SAVE_IMAGE_WS: &str = "comfy_saveimage_ws";

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Capabilities the target engine supports, plus the global custom-node restriction.
pub struct FeatureSet {
    /// Enabled capability names.
    #[serde(default)]
    pub enabled: BTreeSet<String>,
    /// When set, only stock engine nodes may be emitted where a choice exists.
    #[serde(default)]
    pub restrict_custom_nodes: bool,
}

impl FeatureSet {
    /// Empty set, custom nodes allowed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: enable `feature`.
    pub fn with(mut self, feature: impl Into<String>) -> Self {
        self.enabled.insert(feature.into());
        self
    }

    /// Builder: set the custom-node restriction.
    pub fn restricted(mut self, restrict: bool) -> Self {
        self.restrict_custom_nodes = restrict;
        self
    }

    /// True when `feature` is enabled.
    pub fn supports(&self, feature: &str) -> bool {
        self.enabled.contains(feature)
    }

    /// True when `feature` is enabled and custom nodes are not restricted.
    pub fn allows_custom(&self, feature: &str) -> bool {
        self.supports(feature) && !self.restrict_custom_nodes
    }
}

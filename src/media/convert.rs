use crate::config::GenConfig;
use crate::config::families::{CompatClass, FALLBACK_VIDEO_FPS, ModelFamilies};
use crate::config::features::FeatureSet;
use crate::config::params::{GenParams, ParamKey, keys};
use crate::foundation::error::{FlowError, FlowResult, misuse_unless};
use crate::graph::node::{InputValue, NodeId, NodeInputs};
use crate::graph::workflow::WorkflowGraph;
use crate::media::handle::{MediaHandle, ModelRef};
use crate::media::kind::MediaKind;

/// Conversion engine over one workflow-building session.
///
/// The converter owns no state of its own. It borrows the graph it appends to and the read-only
/// inputs that steer node-variant selection, so every dependency of an operation is visible at
/// construction time. Handles passed in are never modified; each operation returns a new handle
/// (or the input itself, cloned, when no conversion is needed).
///
/// No node is appended before every precondition of that node has been checked, so a failed
/// operation leaves nothing half-wired for its own emission.
pub struct MediaConverter<'a> {
    pub(crate) graph: &'a mut dyn WorkflowGraph,
    pub(crate) params: &'a GenParams,
    pub(crate) features: &'a FeatureSet,
    pub(crate) families: &'a ModelFamilies,
}

impl<'a> MediaConverter<'a> {
    /// Converter appending to `graph`.
    pub fn new(
        graph: &'a mut dyn WorkflowGraph,
        params: &'a GenParams,
        features: &'a FeatureSet,
        families: &'a ModelFamilies,
    ) -> Self {
        Self {
            graph,
            params,
            features,
            families,
        }
    }

    /// Converter reading every input from one [`GenConfig`].
    pub fn from_config(graph: &'a mut dyn WorkflowGraph, cfg: &'a GenConfig) -> Self {
        Self::new(graph, &cfg.params, &cfg.features, &cfg.families)
    }

    /// The graph being built.
    pub fn graph(&self) -> &dyn WorkflowGraph {
        &*self.graph
    }

    /// Frame rate used for saved video when the data itself does not know its rate.
    ///
    /// Resolution order: the `video_fps` option, the family default for `compat`, then 24.
    pub fn default_video_fps(&self, compat: Option<&CompatClass>) -> i64 {
        self.params
            .try_get(keys::VIDEO_FPS)
            .or_else(|| self.families.default_fps(compat).map(i64::from))
            .unwrap_or(i64::from(FALLBACK_VIDEO_FPS))
    }

    pub(crate) fn emit(
        &mut self,
        class_type: &str,
        inputs: NodeInputs,
        id: Option<&str>,
    ) -> FlowResult<NodeId> {
        let id = self.graph.create_node(class_type, inputs, id)?;
        tracing::debug!(class_type, id = %id, "emitted node");
        Ok(id)
    }

    /// True when the user asked for tiled VAE operations.
    pub(crate) fn tiling_requested(&self) -> bool {
        self.params.is_set(ParamKey::VaeTileSize)
            || self.params.is_set(ParamKey::VaeTemporalTileSize)
    }

    /// Tile inputs shared by tiled encode and decode.
    pub(crate) fn tile_inputs(&self, family: Option<&CompatClass>) -> NodeInputs {
        let temporal_default = if self.families.needs_unbounded_temporal_tile(family) {
            ModelFamilies::UNBOUNDED_TEMPORAL_TILE
        } else {
            32
        };
        NodeInputs::from([
            (
                "tile_size".to_string(),
                InputValue::Int(self.params.get(keys::VAE_TILE_SIZE, 256)),
            ),
            (
                "overlap".to_string(),
                InputValue::Int(self.params.get(keys::VAE_TILE_OVERLAP, 64)),
            ),
            (
                "temporal_size".to_string(),
                InputValue::Int(self.params.get(keys::VAE_TEMPORAL_TILE_SIZE, temporal_default)),
            ),
            (
                "temporal_overlap".to_string(),
                InputValue::Int(self.params.get(keys::VAE_TEMPORAL_TILE_OVERLAP, 4)),
            ),
        ])
    }

    /// Fail unless `handle` belongs to the same family as `encoder`.
    pub(crate) fn ensure_compat(
        &self,
        handle: &MediaHandle,
        encoder: &ModelRef,
    ) -> FlowResult<()> {
        misuse_unless(handle.is_compat(encoder.compat.as_ref()), || {
            format!(
                "{} data has compat class '{}' but the VAE expects '{}', ensure it is correctly decoded first",
                handle.kind(),
                compat_name(handle.compat()),
                compat_name(encoder.compat.as_ref()),
            )
        })
    }
}

/// Family a conversion should be classified by: the model's, else the data's.
pub(crate) fn family<'h>(
    model: &'h ModelRef,
    handle: &'h MediaHandle,
) -> Option<&'h CompatClass> {
    model.compat.as_ref().or(handle.compat())
}

pub(crate) fn compat_name(compat: Option<&CompatClass>) -> &str {
    compat.map_or("unknown", CompatClass::id)
}

/// Unwrap a required model argument.
pub(crate) fn require_model<'m>(
    model: Option<&'m ModelRef>,
    what: &str,
    kind: MediaKind,
) -> FlowResult<&'m ModelRef> {
    model.ok_or_else(|| FlowError::misuse(format!("must provide {what} to convert {kind} data")))
}

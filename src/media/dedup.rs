//! Peephole rules that splice into existing graph wiring instead of emitting an operation whose
//! effect would be undone (or already done) by a node that is already there.

use crate::graph::class;
use crate::graph::node::NodeRef;
use crate::graph::workflow::WorkflowGraph;

/// Shape of a single-output conversion node: which input carries the model and which carries the
/// data being converted.
#[derive(Clone, Copy, Debug)]
pub(crate) struct InverseOp {
    pub(crate) class_type: &'static str,
    pub(crate) model_input: &'static str,
    pub(crate) payload_input: &'static str,
}

const fn op(
    class_type: &'static str,
    model_input: &'static str,
    payload_input: &'static str,
) -> InverseOp {
    InverseOp {
        class_type,
        model_input,
        payload_input,
    }
}

/// Encoders of raw image/video data.
pub(crate) const VISUAL_ENCODE_OPS: &[InverseOp] = &[
    op(class::VAE_ENCODE, "vae", "pixels"),
    op(class::VAE_ENCODE_TILED, "vae", "pixels"),
    op(class::CASCADE_STAGE_C_VAE_ENCODE, "vae", "image"),
];

/// Decoders producing raw image/video data.
pub(crate) const VISUAL_DECODE_OPS: &[InverseOp] = &[
    op(class::VAE_DECODE, "vae", "samples"),
    op(class::VAE_DECODE_TILED, "vae", "samples"),
];

/// Encoders of raw audio.
pub(crate) const AUDIO_ENCODE_OPS: &[InverseOp] = &[
    op(class::VAE_ENCODE_AUDIO, "vae", "audio"),
    op(class::LTXV_AUDIO_VAE_ENCODE, "audio_vae", "audio"),
];

/// Decoders producing raw audio.
pub(crate) const AUDIO_DECODE_OPS: &[InverseOp] = &[
    op(class::VAE_DECODE_AUDIO, "vae", "samples"),
    op(class::LTXV_AUDIO_VAE_DECODE, "audio_vae", "samples"),
];

/// If `location` is the output of one of `inverse_ops` run with the model at `model`, return the
/// location that node consumed.
///
/// Models are matched by location identity. A different loader node for the same family does not
/// cancel.
pub(crate) fn cancel_inverse(
    graph: &dyn WorkflowGraph,
    location: &NodeRef,
    inverse_ops: &[InverseOp],
    model: &NodeRef,
) -> Option<NodeRef> {
    if location.slot != 0 {
        return None;
    }
    let producer = graph.node(&location.node)?;
    let op = inverse_ops
        .iter()
        .find(|op| op.class_type == producer.class_type)?;
    if producer.link(op.model_input) != Some(model) {
        return None;
    }
    let source = producer.link(op.payload_input)?.clone();
    tracing::trace!(
        producer = %location.node,
        class_type = op.class_type,
        source = %source,
        "cancelled inverse conversion"
    );
    Some(source)
}

/// Video and audio latent locations making up the joint latent at `location`, when the graph
/// already has them: either `location` was produced by a concat node, or a separate node already
/// consumes it.
pub(crate) fn find_joint_parts(
    graph: &dyn WorkflowGraph,
    location: &NodeRef,
) -> Option<(NodeRef, NodeRef)> {
    if location.slot == 0
        && let Some(producer) = graph.node(&location.node)
        && producer.class_type == class::LTXV_CONCAT_AV_LATENT
        && let (Some(video), Some(audio)) = (
            producer.link("video_latent"),
            producer.link("audio_latent"),
        )
    {
        tracing::trace!(producer = %location.node, "reused concat inputs as joint latent parts");
        return Some((video.clone(), audio.clone()));
    }

    graph.node_ids().into_iter().find_map(|id| {
        let node = graph.node(&id)?;
        if node.class_type != class::LTXV_SEPARATE_AV_LATENT
            || node.link("av_latent") != Some(location)
        {
            return None;
        }
        tracing::trace!(separate = %id, "reused existing joint latent separation");
        Some((NodeRef::new(id.clone(), 0), NodeRef::new(id, 1)))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/media/dedup.rs"]
mod tests;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
/// Model-family compatibility tag. Two tags are equal iff their ids are equal.
pub struct CompatClass {
    id: String,
}

impl CompatClass {
    /// Tag with the given family id.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Family id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for CompatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Family id of the joint audio-video latent model.
pub const LTXV2: &str = "lightricks-ltx-video-2";
/// Family id of the staged (stage C) image encoder.
pub const CASCADE: &str = "stable-cascade-v1";

/// Frame rate used when neither options nor the family table give one.
pub const FALLBACK_VIDEO_FPS: u32 = 24;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Classification table for model families.
///
/// The engine treats this as an opaque lookup; the defaults cover the families it has special
/// node variants for.
pub struct ModelFamilies {
    /// Families whose audio and video share one joint latent.
    pub joint_audio_video: BTreeSet<String>,
    /// Families encoded through the staged stage-C encoder.
    pub staged_encoder: BTreeSet<String>,
    /// Families always decoded with the tiled variant.
    pub forced_tiled_decode: BTreeSet<String>,
    /// Families whose temporal tiles must cover the whole clip.
    pub unbounded_temporal_tile: BTreeSet<String>,
    /// Default frame rate per family.
    pub video_fps: BTreeMap<String, u32>,
}

impl Default for ModelFamilies {
    fn default() -> Self {
        let set = |ids: &[&str]| ids.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>();
        Self {
            joint_audio_video: set(&[LTXV2]),
            staged_encoder: set(&[CASCADE]),
            forced_tiled_decode: set(&["hunyuan-video"]),
            unbounded_temporal_tile: set(&["wan-21", "wan-21-14b", "wan-22-5b", "wan-22-14b"]),
            video_fps: BTreeMap::from([
                ("wan-21".to_string(), 16),
                ("wan-21-14b".to_string(), 16),
                ("wan-22-14b".to_string(), 16),
                ("wan-22-5b".to_string(), 24),
                (LTXV2.to_string(), 24),
            ]),
        }
    }
}

impl ModelFamilies {
    /// Temporal tile size standing in for "no temporal tiling".
    pub const UNBOUNDED_TEMPORAL_TILE: i64 = 9999;

    fn has(set: &BTreeSet<String>, compat: Option<&CompatClass>) -> bool {
        compat.is_some_and(|c| set.contains(c.id()))
    }

    /// True for the joint audio-video family.
    pub fn is_joint_audio_video(&self, compat: Option<&CompatClass>) -> bool {
        Self::has(&self.joint_audio_video, compat)
    }

    /// True for the staged-encoder family.
    pub fn uses_staged_encoder(&self, compat: Option<&CompatClass>) -> bool {
        Self::has(&self.staged_encoder, compat)
    }

    /// True when decode must always be tiled for this family.
    pub fn forces_tiled_decode(&self, compat: Option<&CompatClass>) -> bool {
        Self::has(&self.forced_tiled_decode, compat)
    }

    /// True when temporal tiles must be effectively unbounded for this family.
    pub fn needs_unbounded_temporal_tile(&self, compat: Option<&CompatClass>) -> bool {
        Self::has(&self.unbounded_temporal_tile, compat)
    }

    /// Family default frame rate, if the table has one.
    pub fn default_fps(&self, compat: Option<&CompatClass>) -> Option<u32> {
        compat.and_then(|c| self.video_fps.get(c.id()).copied())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/families.rs"]
mod tests;

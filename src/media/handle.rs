use crate::config::families::CompatClass;
use crate::foundation::error::{FlowResult, misuse_unless};
use crate::graph::node::NodeRef;
use crate::media::kind::MediaKind;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Reference to a loaded VAE (image/video or audio).
///
/// Inverse-operation cancellation compares encoders by `location` only: two distinct loader
/// nodes for the same family never cancel each other.
pub struct ModelRef {
    /// Output slot carrying the model.
    pub location: NodeRef,
    /// Family the model belongs to.
    #[serde(default)]
    pub compat: Option<CompatClass>,
}

impl ModelRef {
    /// Model at `location` belonging to `compat`.
    pub fn new(location: NodeRef, compat: Option<CompatClass>) -> Self {
        Self { location, compat }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Value describing one output of the workflow graph.
///
/// Handles are never modified after construction. Every conversion hands back a new handle; the
/// `with_*` helpers are clone-and-override and leave `self` untouched.
pub struct MediaHandle {
    location: NodeRef,
    kind: MediaKind,
    compat: Option<CompatClass>,
    width: Option<u32>,
    height: Option<u32>,
    frames: Option<u32>,
    fps: Option<u32>,
    attached_audio: Option<Box<MediaHandle>>,
}

impl MediaHandle {
    /// Handle to `location` holding `kind`, with no metadata.
    pub fn new(location: NodeRef, kind: MediaKind) -> Self {
        Self {
            location,
            kind,
            compat: None,
            width: None,
            height: None,
            frames: None,
            fps: None,
            attached_audio: None,
        }
    }

    /// Output slot this handle points at.
    pub fn location(&self) -> &NodeRef {
        &self.location
    }

    /// Current representation.
    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Family tag, if known.
    pub fn compat(&self) -> Option<&CompatClass> {
        self.compat.as_ref()
    }

    /// Image-space width, if known.
    pub fn width(&self) -> Option<u32> {
        self.width
    }

    /// Image-space height, if known.
    pub fn height(&self) -> Option<u32> {
        self.height
    }

    /// Frame count, if known.
    pub fn frames(&self) -> Option<u32> {
        self.frames
    }

    /// Frame rate, if known.
    pub fn fps(&self) -> Option<u32> {
        self.fps
    }

    /// Separate audio track travelling with this handle.
    pub fn attached_audio(&self) -> Option<&MediaHandle> {
        self.attached_audio.as_deref()
    }

    /// True when the handle holds audio in any form or carries attached audio.
    pub fn has_any_audio(&self) -> bool {
        self.kind.has_audio() || self.attached_audio.is_some()
    }

    /// True when `compat` matches this handle's tag. Unknown on both sides counts as a match.
    pub fn is_compat(&self, compat: Option<&CompatClass>) -> bool {
        self.compat.as_ref() == compat
    }

    /// Copy pointing at a different output, with a different kind.
    ///
    /// Attached audio is kept, except when the new kind is the joint latent.
    pub fn with_location(&self, location: NodeRef, kind: MediaKind) -> Self {
        let attached_audio = match kind {
            MediaKind::LatentAudioVideo => None,
            _ => self.attached_audio.clone(),
        };
        Self {
            location,
            kind,
            attached_audio,
            ..self.clone()
        }
    }

    /// Copy tagged with `compat`.
    pub fn with_compat(&self, compat: Option<CompatClass>) -> Self {
        Self {
            compat,
            ..self.clone()
        }
    }

    /// Copy with image-space dimensions.
    pub fn with_size(&self, width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            width,
            height,
            ..self.clone()
        }
    }

    /// Copy with a frame count.
    pub fn with_frames(&self, frames: Option<u32>) -> Self {
        Self {
            frames,
            ..self.clone()
        }
    }

    /// Copy with a frame rate.
    pub fn with_fps(&self, fps: Option<u32>) -> Self {
        Self {
            fps,
            ..self.clone()
        }
    }

    /// Copy carrying `audio` as its separate audio track.
    ///
    /// Joint audio-video latents already embed their audio and reject attachments, and only
    /// `Audio` or `LatentAudio` handles can be attached.
    pub fn with_attached_audio(&self, audio: MediaHandle) -> FlowResult<Self> {
        misuse_unless(self.kind != MediaKind::LatentAudioVideo, || {
            "cannot attach audio to latent_audio_video data, its audio is already embedded"
                .to_string()
        })?;
        misuse_unless(
            matches!(audio.kind, MediaKind::Audio | MediaKind::LatentAudio),
            || format!("can only attach audio data, but got {}", audio.kind),
        )?;
        Ok(Self {
            attached_audio: Some(Box::new(audio)),
            ..self.clone()
        })
    }

    /// Copy with the attached audio dropped.
    pub fn without_attached_audio(&self) -> Self {
        Self {
            attached_audio: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/handle.rs"]
mod tests;

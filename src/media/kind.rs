use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Representation a graph output is in.
pub enum MediaKind {
    /// Raw image pixels.
    Image,
    /// Raw video frames.
    Video,
    /// Raw audio waveform.
    Audio,
    /// Latent-encoded image.
    LatentImage,
    /// Latent-encoded video.
    LatentVideo,
    /// Latent-encoded audio.
    LatentAudio,
    /// Joint audio-video latent.
    LatentAudioVideo,
}

impl MediaKind {
    /// True for `Image`, `Video` and `Audio`.
    pub fn is_raw(self) -> bool {
        matches!(self, Self::Image | Self::Video | Self::Audio)
    }

    /// True for every latent kind.
    pub fn is_latent(self) -> bool {
        !self.is_raw()
    }

    /// True for audio in any form, joint latents included.
    pub fn has_audio(self) -> bool {
        matches!(
            self,
            Self::Audio | Self::LatentAudio | Self::LatentAudioVideo
        )
    }

    /// Latent counterpart of a raw kind; latent kinds map to themselves.
    pub fn latent(self) -> Self {
        match self {
            Self::Image => Self::LatentImage,
            Self::Video => Self::LatentVideo,
            Self::Audio => Self::LatentAudio,
            other => other,
        }
    }

    /// Raw counterpart of a latent kind; raw kinds map to themselves.
    ///
    /// The joint latent has no single raw counterpart and maps to itself.
    pub fn raw(self) -> Self {
        match self {
            Self::LatentImage => Self::Image,
            Self::LatentVideo => Self::Video,
            Self::LatentAudio => Self::Audio,
            other => other,
        }
    }

    /// Stable snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::LatentImage => "latent_image",
            Self::LatentVideo => "latent_video",
            Self::LatentAudio => "latent_audio",
            Self::LatentAudioVideo => "latent_audio_video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

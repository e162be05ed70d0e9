use crate::config::families::FALLBACK_VIDEO_FPS;
use crate::config::params::keys;
use crate::foundation::error::{FlowError, FlowResult, misuse_unless};
use crate::graph::class;
use crate::graph::node::{InputValue, NodeRef, inputs};
use crate::media::convert::{MediaConverter, compat_name, require_model};
use crate::media::handle::{MediaHandle, ModelRef};
use crate::media::kind::MediaKind;

impl MediaConverter<'_> {
    /// Give image/video data an empty audio track when the model family samples audio and video
    /// jointly.
    ///
    /// Returns `handle` unchanged when no audio VAE is given, when the data already holds or
    /// carries audio, or when the family (the VAE's, else the data's) has no joint latent.
    #[tracing::instrument(level = "debug", skip_all, fields(kind = %handle.kind()))]
    pub fn ensure_audio(
        &mut self,
        handle: &MediaHandle,
        vae: Option<&ModelRef>,
        audio_vae: Option<&ModelRef>,
    ) -> FlowResult<MediaHandle> {
        Ok(self
            .attach_missing_audio(handle, vae, audio_vae)?
            .unwrap_or_else(|| handle.clone()))
    }

    /// Coerce `handle` into the latent form a sampler consumes.
    ///
    /// Joint-family video gets its audio attached (or synthesized) and concatenated into a joint
    /// latent; other families drop attached audio. Latents from a different family than `vae`
    /// are rejected. Applying this twice yields the same handle as applying it once.
    #[tracing::instrument(level = "debug", skip_all, fields(kind = %handle.kind()))]
    pub fn as_sampling_latent(
        &mut self,
        handle: &MediaHandle,
        vae: &ModelRef,
        audio_vae: Option<&ModelRef>,
    ) -> FlowResult<MediaHandle> {
        self.check_sampling_latent(handle, vae, audio_vae)?;
        if let Some(with_audio) = self.attach_missing_audio(handle, Some(vae), audio_vae)? {
            return self.as_sampling_latent(&with_audio, vae, audio_vae);
        }

        let kind = handle.kind();
        match (kind, handle.attached_audio()) {
            (
                MediaKind::LatentImage
                | MediaKind::LatentVideo
                | MediaKind::LatentAudio
                | MediaKind::LatentAudioVideo,
                None,
            ) => Ok(handle.clone()),
            (MediaKind::LatentImage | MediaKind::LatentVideo, Some(audio)) => {
                if !self.families.is_joint_audio_video(vae.compat.as_ref()) {
                    tracing::debug!(
                        family = compat_name(vae.compat.as_ref()),
                        "family has no joint latent, dropping attached audio"
                    );
                    return Ok(handle.without_attached_audio());
                }
                let audio_latent = self.encode(audio, audio_vae)?;
                let id = self.emit(
                    class::LTXV_CONCAT_AV_LATENT,
                    inputs([
                        ("video_latent", handle.location().into()),
                        ("audio_latent", audio_latent.location().into()),
                    ]),
                    None,
                )?;
                Ok(handle
                    .with_location(NodeRef::new(id, 0), MediaKind::LatentAudioVideo)
                    .with_compat(vae.compat.clone()))
            }
            (MediaKind::Image | MediaKind::Video, _) => {
                let latent = self.encode(handle, Some(vae))?;
                if latent.attached_audio().is_some() {
                    return self.as_sampling_latent(&latent, vae, audio_vae);
                }
                Ok(latent)
            }
            (MediaKind::Audio, None) => {
                let audio_vae = require_model(audio_vae, "an audio VAE", kind)?;
                self.encode(handle, Some(audio_vae))
            }
            (MediaKind::Audio | MediaKind::LatentAudio | MediaKind::LatentAudioVideo, Some(_)) => {
                Err(audio_on_audio(kind))
            }
        }
    }

    /// Preconditions of [`MediaConverter::as_sampling_latent`], checked before anything is
    /// emitted.
    ///
    /// Latent audio is matched against `audio_vae` when one is given, else against `vae`.
    fn check_sampling_latent(
        &self,
        handle: &MediaHandle,
        vae: &ModelRef,
        audio_vae: Option<&ModelRef>,
    ) -> FlowResult<()> {
        let kind = handle.kind();
        match (kind, handle.attached_audio()) {
            (MediaKind::Audio | MediaKind::LatentAudio | MediaKind::LatentAudioVideo, Some(_)) => {
                return Err(audio_on_audio(kind));
            }
            (MediaKind::Audio, None) => {
                require_model(audio_vae, "an audio VAE", kind)?;
            }
            (MediaKind::LatentAudio, None) => {
                self.ensure_compat(handle, audio_vae.unwrap_or(vae))?;
            }
            (MediaKind::LatentImage | MediaKind::LatentVideo | MediaKind::LatentAudioVideo, _) => {
                self.ensure_compat(handle, vae)?;
            }
            (MediaKind::Image | MediaKind::Video, _) => {}
        }
        if let Some(audio) = handle.attached_audio()
            && audio.kind() == MediaKind::Audio
            && self.families.is_joint_audio_video(vae.compat.as_ref())
        {
            require_model(audio_vae, "an audio VAE", audio.kind())?;
        }
        Ok(())
    }

    /// Coerce `handle` into a latent image or video, separating joint latents with their audio
    /// attached.
    #[tracing::instrument(level = "debug", skip_all, fields(kind = %handle.kind()))]
    pub fn as_latent_image(
        &mut self,
        handle: &MediaHandle,
        vae: &ModelRef,
    ) -> FlowResult<MediaHandle> {
        let kind = handle.kind();
        match kind {
            MediaKind::LatentImage | MediaKind::LatentVideo => {
                self.ensure_compat(handle, vae)?;
                Ok(handle.clone())
            }
            MediaKind::Image | MediaKind::Video => self.encode(handle, Some(vae)),
            MediaKind::LatentAudioVideo => {
                misuse_unless(self.families.is_joint_audio_video(handle.compat()), || {
                    format!(
                        "cannot convert latent_audio_video data from compat class '{}' to latent video",
                        compat_name(handle.compat())
                    )
                })?;
                let (video, audio) = self.split_joint(handle)?;
                video.with_attached_audio(audio)
            }
            MediaKind::Audio | MediaKind::LatentAudio => Err(FlowError::misuse(format!(
                "cannot convert {kind} data to latent image/video"
            ))),
        }
    }

    /// Coerce `handle` into raw image or video, decoding latents as needed.
    #[tracing::instrument(level = "debug", skip_all, fields(kind = %handle.kind()))]
    pub fn as_raw_image(
        &mut self,
        handle: &MediaHandle,
        vae: Option<&ModelRef>,
    ) -> FlowResult<MediaHandle> {
        let kind = handle.kind();
        match kind {
            MediaKind::Image | MediaKind::Video => Ok(handle.clone()),
            MediaKind::LatentImage | MediaKind::LatentVideo | MediaKind::LatentAudioVideo => {
                self.decode(handle, vae, Some(false))
            }
            MediaKind::Audio | MediaKind::LatentAudio => Err(FlowError::misuse(format!(
                "cannot convert {kind} data to raw image/video"
            ))),
        }
    }

    /// `Some(new handle)` when an empty audio track was attached, `None` when nothing changed.
    fn attach_missing_audio(
        &mut self,
        handle: &MediaHandle,
        vae: Option<&ModelRef>,
        audio_vae: Option<&ModelRef>,
    ) -> FlowResult<Option<MediaHandle>> {
        let Some(audio_vae) = audio_vae else {
            return Ok(None);
        };
        if handle.has_any_audio() {
            return Ok(None);
        }
        let family = vae.and_then(|v| v.compat.as_ref()).or(handle.compat());
        if !self.families.is_joint_audio_video(family) {
            return Ok(None);
        }

        let frames = match handle.frames() {
            Some(frames) => InputValue::from(frames),
            None => {
                let raw = self.as_raw_image(handle, vae)?;
                let id = self.emit(
                    class::COUNT_FRAMES,
                    inputs([("image", raw.location().into())]),
                    None,
                )?;
                InputValue::Link(NodeRef::new(id, 0))
            }
        };
        let frame_rate = handle.fps().map(i64::from).unwrap_or_else(|| {
            self.params
                .get(keys::VIDEO_FPS, i64::from(FALLBACK_VIDEO_FPS))
        });
        let batch_size = self.params.get(keys::BATCH_SIZE, 1);
        let id = self.emit(
            class::LTXV_EMPTY_LATENT_AUDIO,
            inputs([
                ("frames_number", frames),
                ("frame_rate", frame_rate.into()),
                ("batch_size", batch_size.into()),
                ("audio_vae", (&audio_vae.location).into()),
            ]),
            None,
        )?;
        let audio = handle
            .without_attached_audio()
            .with_location(NodeRef::new(id, 0), MediaKind::LatentAudio)
            .with_compat(audio_vae.compat.clone());
        tracing::debug!(audio = %audio.location(), "attached empty audio latent");
        handle.with_attached_audio(audio).map(Some)
    }
}

fn audio_on_audio(kind: MediaKind) -> FlowError {
    FlowError::misuse(format!(
        "cannot convert {kind} data carrying attached audio to a sampling latent"
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/media/coerce.rs"]
mod tests;

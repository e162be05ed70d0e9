use crate::config::features::FEATURE_SAVE_IMAGE_WS;
use crate::config::params::keys;
use crate::foundation::error::{FlowError, FlowResult};
use crate::graph::class;
use crate::graph::node::{InputValue, NodeId, NodeRef, inputs};
use crate::media::convert::{MediaConverter, require_model};
use crate::media::handle::{MediaHandle, ModelRef};
use crate::media::kind::MediaKind;

/// Leading part of generated output filename prefixes.
pub const FILENAME_PREFIX: &str = "mediagraph";

fn random_filename_prefix() -> String {
    format!("{FILENAME_PREFIX}_{:04X}_", rand::random::<u16>())
}

impl MediaConverter<'_> {
    /// Emit the nodes that save `handle` as a generated output and return the output node id.
    ///
    /// Latents are decoded first (`vae` for image/video, `audio_vae` for audio), as is latent
    /// audio attached to video.
    pub fn save(
        &mut self,
        handle: &MediaHandle,
        vae: Option<&ModelRef>,
        audio_vae: Option<&ModelRef>,
    ) -> FlowResult<NodeId> {
        self.save_with_id(handle, vae, audio_vae, None)
    }

    /// [`MediaConverter::save`] with an explicit id for the final output node.
    #[tracing::instrument(level = "debug", skip_all, fields(kind = %handle.kind(), id = ?id))]
    pub fn save_with_id(
        &mut self,
        handle: &MediaHandle,
        vae: Option<&ModelRef>,
        audio_vae: Option<&ModelRef>,
        id: Option<&str>,
    ) -> FlowResult<NodeId> {
        self.check_save(handle, vae, audio_vae)?;
        match handle.kind() {
            MediaKind::LatentImage | MediaKind::LatentVideo | MediaKind::LatentAudioVideo => {
                let raw = self.as_raw_image(handle, vae)?;
                return self.save_with_id(&raw, vae, audio_vae, id);
            }
            MediaKind::LatentAudio => {
                let raw = self.decode(handle, audio_vae, Some(true))?;
                return self.save_with_id(&raw, vae, audio_vae, id);
            }
            MediaKind::Image | MediaKind::Video | MediaKind::Audio => {}
        }

        if let Some(audio) = handle.attached_audio() {
            match audio.kind() {
                MediaKind::Audio => {}
                MediaKind::LatentAudio => {
                    let decoded = self.decode(audio, audio_vae, Some(true))?;
                    let handle = handle.with_attached_audio(decoded)?;
                    return self.save_with_id(&handle, vae, audio_vae, id);
                }
                other => {
                    return Err(FlowError::misuse(format!(
                        "can only attach audio data, but attached audio is of type {other}"
                    )));
                }
            }
        }

        match (handle.kind(), handle.attached_audio()) {
            (MediaKind::Image, None) => self.save_image(handle, id),
            (MediaKind::Image | MediaKind::Video, _) => self.save_animation(handle, id),
            (MediaKind::Audio, Some(_)) => Err(audio_on_audio()),
            (MediaKind::Audio, None) => self.emit(
                class::SAVE_AUDIO_MP3,
                inputs([
                    ("audio", handle.location().into()),
                    ("filename_prefix", random_filename_prefix().into()),
                    ("quality", "V0".into()),
                ]),
                id,
            ),
            (kind, _) => Err(FlowError::misuse(format!(
                "can only save output from raw media data, but data is of type {kind}"
            ))),
        }
    }

    /// Preconditions of [`MediaConverter::save_with_id`], checked before anything is emitted.
    fn check_save(
        &self,
        handle: &MediaHandle,
        vae: Option<&ModelRef>,
        audio_vae: Option<&ModelRef>,
    ) -> FlowResult<()> {
        let kind = handle.kind();
        let attached = handle.attached_audio().map(MediaHandle::kind);
        if attached.is_some() && matches!(kind, MediaKind::Audio | MediaKind::LatentAudio) {
            return Err(audio_on_audio());
        }
        if matches!(
            kind,
            MediaKind::LatentImage | MediaKind::LatentVideo | MediaKind::LatentAudioVideo
        ) {
            require_model(vae, "a VAE", kind)?;
        }
        if matches!(kind, MediaKind::LatentAudio | MediaKind::LatentAudioVideo)
            || attached == Some(MediaKind::LatentAudio)
        {
            require_model(audio_vae, "an audio VAE", kind)?;
        }
        Ok(())
    }

    fn save_image(&mut self, handle: &MediaHandle, id: Option<&str>) -> FlowResult<NodeId> {
        if self.features.allows_custom(FEATURE_SAVE_IMAGE_WS) {
            let bit_depth = self.params.get(keys::BIT_DEPTH, "8bit".to_string());
            return self.emit(
                class::SAVE_IMAGE_WS,
                inputs([
                    ("images", handle.location().into()),
                    ("bit_depth", bit_depth.into()),
                ]),
                id,
            );
        }
        self.emit(
            class::SAVE_IMAGE,
            inputs([
                ("filename_prefix", random_filename_prefix().into()),
                ("images", handle.location().into()),
            ]),
            id,
        )
    }

    fn save_animation(&mut self, handle: &MediaHandle, id: Option<&str>) -> FlowResult<NodeId> {
        let handle = if self.params.get(keys::VIDEO_BOOMERANG, false) {
            self.boomerang(handle)?
        } else {
            handle.clone()
        };

        let fps = handle
            .fps()
            .map(i64::from)
            .unwrap_or_else(|| self.default_video_fps(handle.compat()));
        let format = self.params.get(keys::VIDEO_FORMAT, "h264-mp4".to_string());
        let mut node_inputs = inputs([
            ("images", handle.location().into()),
            ("fps", fps.into()),
            ("lossless", false.into()),
            ("quality", InputValue::Int(95)),
            ("method", "default".into()),
            ("format", format.into()),
        ]);
        if let Some(audio) = handle.attached_audio() {
            node_inputs.insert("audio".to_string(), audio.location().into());
        }
        self.emit(class::SAVE_ANIMATION_WS, node_inputs, id)
    }

    /// Video that plays `handle` forward then backward. Known frame counts double.
    fn boomerang(&mut self, handle: &MediaHandle) -> FlowResult<MediaHandle> {
        let bounced = self.emit(
            class::VIDEO_BOOMERANG,
            inputs([("images", handle.location().into())]),
            None,
        )?;
        Ok(handle
            .with_location(NodeRef::new(bounced, 0), MediaKind::Video)
            .with_frames(handle.frames().map(|f| f.saturating_mul(2))))
    }
}

fn audio_on_audio() -> FlowError {
    FlowError::misuse("cannot attach audio onto other audio")
}

#[cfg(test)]
#[path = "../../tests/unit/media/output.rs"]
mod tests;

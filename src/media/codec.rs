use crate::config::params::keys;
use crate::foundation::error::{FlowResult, misuse_unless};
use crate::graph::class;
use crate::graph::node::{NodeRef, inputs};
use crate::media::convert::{MediaConverter, compat_name, family, require_model};
use crate::media::dedup;
use crate::media::handle::{MediaHandle, ModelRef};
use crate::media::kind::MediaKind;

impl MediaConverter<'_> {
    /// Decode latent data to raw media. Raw data is returned unchanged.
    ///
    /// `want_audio` states which side of joint or audio data the caller needs; `None` leaves it
    /// to the data kind. The result carries the VAE's compat class.
    ///
    /// If `handle` is the direct output of an encode run with the same VAE, no node is emitted and
    /// the handle returned points at that encode's input.
    #[tracing::instrument(level = "debug", skip_all, fields(kind = %handle.kind(), want_audio = ?want_audio))]
    pub fn decode(
        &mut self,
        handle: &MediaHandle,
        vae: Option<&ModelRef>,
        want_audio: Option<bool>,
    ) -> FlowResult<MediaHandle> {
        let kind = handle.kind();
        match kind {
            MediaKind::Image | MediaKind::Video | MediaKind::Audio => {
                if let Some(want_audio) = want_audio {
                    misuse_unless(want_audio == (kind == MediaKind::Audio), || {
                        format!("data is {kind} but want_audio is {want_audio}, mismatched")
                    })?;
                }
                Ok(handle.clone())
            }
            MediaKind::LatentImage | MediaKind::LatentVideo => {
                let vae = require_model(vae, "a VAE", kind)?;
                misuse_unless(want_audio != Some(true), || {
                    format!("data is {kind} but want_audio is true, mismatched")
                })?;
                self.decode_visual(handle, vae)
            }
            MediaKind::LatentAudioVideo => {
                let vae = require_model(vae, "a VAE", kind)?;
                self.decode_joint(handle, vae, want_audio)
            }
            MediaKind::LatentAudio => {
                let vae = require_model(vae, "an audio VAE", kind)?;
                misuse_unless(want_audio != Some(false), || {
                    format!("data is {kind} but want_audio is false, mismatched")
                })?;
                self.decode_audio(handle, vae)
            }
        }
    }

    /// Encode raw media to latent data. Latent data is returned unchanged.
    ///
    /// The result carries the VAE's compat class. If `handle` is the direct output of a decode run
    /// with the same VAE, no node is emitted and the handle returned points at that decode's input.
    #[tracing::instrument(level = "debug", skip_all, fields(kind = %handle.kind()))]
    pub fn encode(
        &mut self,
        handle: &MediaHandle,
        vae: Option<&ModelRef>,
    ) -> FlowResult<MediaHandle> {
        let kind = handle.kind();
        match kind {
            MediaKind::LatentImage
            | MediaKind::LatentVideo
            | MediaKind::LatentAudio
            | MediaKind::LatentAudioVideo => Ok(handle.clone()),
            MediaKind::Image | MediaKind::Video => {
                let vae = require_model(vae, "a VAE", kind)?;
                self.encode_visual(handle, vae)
            }
            MediaKind::Audio => {
                let vae = require_model(vae, "an audio VAE", kind)?;
                self.encode_audio(handle, vae)
            }
        }
    }

    fn decode_visual(&mut self, handle: &MediaHandle, vae: &ModelRef) -> FlowResult<MediaHandle> {
        let raw_kind = handle.kind().raw();
        if let Some(source) = dedup::cancel_inverse(
            &*self.graph,
            handle.location(),
            dedup::VISUAL_ENCODE_OPS,
            &vae.location,
        ) {
            return Ok(handle
                .with_location(source, raw_kind)
                .with_compat(vae.compat.clone()));
        }

        let family = family(vae, handle);
        let forced = self.families.forces_tiled_decode(family)
            && self.params.get(keys::MODEL_SPECIFIC_ENHANCEMENTS, true);
        let mut node_inputs = inputs([
            ("vae", (&vae.location).into()),
            ("samples", handle.location().into()),
        ]);
        let class_type = if self.tiling_requested() || forced {
            node_inputs.extend(self.tile_inputs(family));
            class::VAE_DECODE_TILED
        } else {
            class::VAE_DECODE
        };
        let id = self.emit(class_type, node_inputs, None)?;
        Ok(handle
            .with_location(NodeRef::new(id, 0), raw_kind)
            .with_compat(vae.compat.clone()))
    }

    fn decode_joint(
        &mut self,
        handle: &MediaHandle,
        vae: &ModelRef,
        want_audio: Option<bool>,
    ) -> FlowResult<MediaHandle> {
        misuse_unless(self.families.is_joint_audio_video(handle.compat()), || {
            format!(
                "cannot decode latent_audio_video data from compat class '{}'",
                compat_name(handle.compat())
            )
        })?;
        let (video, audio) = self.split_joint(handle)?;
        if want_audio == Some(true) {
            return self.decode(&audio, Some(vae), Some(true));
        }
        let video = video.with_attached_audio(audio)?;
        self.decode(&video, Some(vae), Some(false))
    }

    fn decode_audio(&mut self, handle: &MediaHandle, vae: &ModelRef) -> FlowResult<MediaHandle> {
        if let Some(source) = dedup::cancel_inverse(
            &*self.graph,
            handle.location(),
            dedup::AUDIO_ENCODE_OPS,
            &vae.location,
        ) {
            return Ok(handle
                .with_location(source, MediaKind::Audio)
                .with_compat(vae.compat.clone()));
        }

        let id = if self.families.is_joint_audio_video(family(vae, handle)) {
            self.emit(
                class::LTXV_AUDIO_VAE_DECODE,
                inputs([
                    ("audio_vae", (&vae.location).into()),
                    ("samples", handle.location().into()),
                ]),
                None,
            )?
        } else {
            self.emit(
                class::VAE_DECODE_AUDIO,
                inputs([
                    ("vae", (&vae.location).into()),
                    ("samples", handle.location().into()),
                ]),
                None,
            )?
        };
        Ok(handle
            .with_location(NodeRef::new(id, 0), MediaKind::Audio)
            .with_compat(vae.compat.clone()))
    }

    fn encode_visual(&mut self, handle: &MediaHandle, vae: &ModelRef) -> FlowResult<MediaHandle> {
        let latent_kind = handle.kind().latent();
        if let Some(source) = dedup::cancel_inverse(
            &*self.graph,
            handle.location(),
            dedup::VISUAL_DECODE_OPS,
            &vae.location,
        ) {
            return Ok(handle
                .with_location(source, latent_kind)
                .with_compat(vae.compat.clone()));
        }

        let id = if self.families.uses_staged_encoder(vae.compat.as_ref()) {
            let compression = self.params.get(keys::CASCADE_LATENT_COMPRESSION, 32);
            self.emit(
                class::CASCADE_STAGE_C_VAE_ENCODE,
                inputs([
                    ("vae", (&vae.location).into()),
                    ("image", handle.location().into()),
                    ("compression", compression.into()),
                ]),
                None,
            )?
        } else if self.tiling_requested() {
            let mut node_inputs = inputs([
                ("vae", (&vae.location).into()),
                ("pixels", handle.location().into()),
            ]);
            node_inputs.extend(self.tile_inputs(family(vae, handle)));
            self.emit(class::VAE_ENCODE_TILED, node_inputs, None)?
        } else {
            self.emit(
                class::VAE_ENCODE,
                inputs([
                    ("vae", (&vae.location).into()),
                    ("pixels", handle.location().into()),
                ]),
                None,
            )?
        };
        Ok(handle
            .with_location(NodeRef::new(id, 0), latent_kind)
            .with_compat(vae.compat.clone()))
    }

    fn encode_audio(&mut self, handle: &MediaHandle, vae: &ModelRef) -> FlowResult<MediaHandle> {
        if let Some(source) = dedup::cancel_inverse(
            &*self.graph,
            handle.location(),
            dedup::AUDIO_DECODE_OPS,
            &vae.location,
        ) {
            return Ok(handle
                .with_location(source, MediaKind::LatentAudio)
                .with_compat(vae.compat.clone()));
        }

        let id = if self.families.is_joint_audio_video(family(vae, handle)) {
            self.emit(
                class::LTXV_AUDIO_VAE_ENCODE,
                inputs([
                    ("audio_vae", (&vae.location).into()),
                    ("audio", handle.location().into()),
                ]),
                None,
            )?
        } else {
            self.emit(
                class::VAE_ENCODE_AUDIO,
                inputs([
                    ("vae", (&vae.location).into()),
                    ("audio", handle.location().into()),
                ]),
                None,
            )?
        };
        Ok(handle
            .with_location(NodeRef::new(id, 0), MediaKind::LatentAudio)
            .with_compat(vae.compat.clone()))
    }

    /// Video and audio latents of a joint latent, reusing existing wiring when present.
    ///
    /// Both parts keep the joint handle's metadata and compat class.
    pub(crate) fn split_joint(
        &mut self,
        handle: &MediaHandle,
    ) -> FlowResult<(MediaHandle, MediaHandle)> {
        let (video, audio) = match dedup::find_joint_parts(&*self.graph, handle.location()) {
            Some(parts) => parts,
            None => {
                let id = self.emit(
                    class::LTXV_SEPARATE_AV_LATENT,
                    inputs([("av_latent", handle.location().into())]),
                    None,
                )?;
                (NodeRef::new(id.clone(), 0), NodeRef::new(id, 1))
            }
        };
        Ok((
            handle.with_location(video, MediaKind::LatentVideo),
            handle.with_location(audio, MediaKind::LatentAudio),
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/codec.rs"]
mod tests;

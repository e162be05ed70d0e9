//! Node class types emitted or recognised by the conversion engine.

pub const VAE_DECODE: &str = "VAEDecode";
pub const VAE_DECODE_TILED: &str = "VAEDecodeTiled";
pub const VAE_DECODE_AUDIO: &str = "VAEDecodeAudio";
pub const LTXV_AUDIO_VAE_DECODE: &str = "LTXVAudioVAEDecode";

pub const VAE_ENCODE: &str = "VAEEncode";
pub const VAE_ENCODE_TILED: &str = "VAEEncodeTiled";
pub const CASCADE_STAGE_C_VAE_ENCODE: &str = "StableCascade_StageC_VAEEncode";
pub const VAE_ENCODE_AUDIO: &str = "VAEEncodeAudio";
pub const LTXV_AUDIO_VAE_ENCODE: &str = "LTXVAudioVAEEncode";

pub const LTXV_SEPARATE_AV_LATENT: &str = "LTXVSeparateAVLatent";
pub const LTXV_CONCAT_AV_LATENT: &str = "LTXVConcatAVLatent";
pub const LTXV_EMPTY_LATENT_AUDIO: &str = "LTXVEmptyLatentAudio";
pub const COUNT_FRAMES: &str = "SwarmCountFrames";

pub const SAVE_IMAGE: &str = "SaveImage";
pub const SAVE_IMAGE_WS: &str = "SwarmSaveImageWS";
pub const SAVE_ANIMATION_WS: &str = "SwarmSaveAnimationWS";
pub const VIDEO_BOOMERANG: &str = "SwarmVideoBoomerang";
pub const SAVE_AUDIO_MP3: &str = "SaveAudioMP3";

use super::*;
use crate::config::families::LTXV2;
use crate::graph::workflow::WorkflowGraph;
use crate::media::test_support::Fixture;

fn str_input<'w>(fx: &'w Fixture, id: &NodeId, name: &str) -> Option<&'w str> {
    fx.wf.node(id).unwrap().input(name).and_then(|v| v.as_str())
}

fn int_input(fx: &Fixture, id: &NodeId, name: &str) -> Option<i64> {
    fx.wf.node(id).unwrap().input(name).and_then(|v| v.as_int())
}

#[test]
fn latent_image_is_decoded_then_saved() {
    let mut fx = Fixture::new();
    let vae = fx.vae("sdxl");
    let latent = fx.source(MediaKind::LatentImage, Some("sdxl"));

    let out = fx.conv().save(&latent, Some(&vae), None).unwrap();
    assert_eq!(fx.wf.node(&out).unwrap().class_type, class::SAVE_IMAGE);
    assert_eq!(fx.wf.count_class(class::VAE_DECODE), 1);
    assert_eq!(fx.wf.count_class(class::VAE_ENCODE), 0);

    let images = fx.wf.node(&out).unwrap().link("images").unwrap().clone();
    assert_eq!(fx.class_of(&images), class::VAE_DECODE);
    let prefix = str_input(&fx, &out, "filename_prefix").unwrap();
    assert!(prefix.starts_with(&format!("{FILENAME_PREFIX}_")));
}

#[test]
fn streamed_image_save_needs_unrestricted_feature() {
    let mut fx = Fixture::new();
    fx.cfg.features = fx.cfg.features.clone().with(FEATURE_SAVE_IMAGE_WS);
    let img = fx.source(MediaKind::Image, None);

    let out = fx.conv().save(&img, None, None).unwrap();
    assert_eq!(fx.wf.node(&out).unwrap().class_type, class::SAVE_IMAGE_WS);
    assert_eq!(str_input(&fx, &out, "bit_depth"), Some("8bit"));

    fx.cfg.params.set(keys::BIT_DEPTH, "16bit".to_string());
    let out = fx.conv().save(&img, None, None).unwrap();
    assert_eq!(str_input(&fx, &out, "bit_depth"), Some("16bit"));

    fx.cfg.features = fx.cfg.features.clone().restricted(true);
    let out = fx.conv().save(&img, None, None).unwrap();
    assert_eq!(fx.wf.node(&out).unwrap().class_type, class::SAVE_IMAGE);
}

#[test]
fn video_save_resolves_frame_rate() {
    let mut fx = Fixture::new();
    let known = fx.source(MediaKind::Video, None).with_fps(Some(30));
    let out = fx.conv().save(&known, None, None).unwrap();
    assert_eq!(
        fx.wf.node(&out).unwrap().class_type,
        class::SAVE_ANIMATION_WS
    );
    assert_eq!(int_input(&fx, &out, "fps"), Some(30));
    assert_eq!(str_input(&fx, &out, "format"), Some("h264-mp4"));
    assert_eq!(int_input(&fx, &out, "quality"), Some(95));
    assert!(fx.wf.node(&out).unwrap().input("audio").is_none());

    let wan = fx.source(MediaKind::Video, Some("wan-21"));
    let out = fx.conv().save(&wan, None, None).unwrap();
    assert_eq!(int_input(&fx, &out, "fps"), Some(16));

    let unknown = fx.source(MediaKind::Video, Some("sdxl"));
    let out = fx.conv().save(&unknown, None, None).unwrap();
    assert_eq!(int_input(&fx, &out, "fps"), Some(24));

    fx.cfg.params.set(keys::VIDEO_FPS, 12);
    fx.cfg.params.set(keys::VIDEO_FORMAT, "webm".to_string());
    let out = fx.conv().save(&wan, None, None).unwrap();
    assert_eq!(int_input(&fx, &out, "fps"), Some(12));
    assert_eq!(str_input(&fx, &out, "format"), Some("webm"));
}

#[test]
fn image_with_audio_saves_as_animation() {
    let mut fx = Fixture::new();
    let audio = fx.source(MediaKind::Audio, None);
    let img = fx
        .source(MediaKind::Image, None)
        .with_attached_audio(audio.clone())
        .unwrap();

    let out = fx.conv().save(&img, None, None).unwrap();
    let node = fx.wf.node(&out).unwrap();
    assert_eq!(node.class_type, class::SAVE_ANIMATION_WS);
    assert_eq!(node.link("audio"), Some(audio.location()));
}

#[test]
fn boomerang_bounces_once() {
    let mut fx = Fixture::new();
    fx.cfg.params.set(keys::VIDEO_BOOMERANG, true);
    let video = fx.source(MediaKind::Video, None).with_frames(Some(40));

    let out = fx.conv().save(&video, None, None).unwrap();
    let images = fx.wf.node(&out).unwrap().link("images").unwrap().clone();
    assert_eq!(fx.class_of(&images), class::VIDEO_BOOMERANG);
    assert_eq!(fx.link(&images, "images"), *video.location());
    assert_eq!(fx.wf.count_class(class::VIDEO_BOOMERANG), 1);
}

#[test]
fn boomerang_doubles_known_frames_only() {
    let mut fx = Fixture::new();
    let known = fx.source(MediaKind::Video, None).with_frames(Some(40));
    let unknown = fx.source(MediaKind::Video, None);

    let bounced = fx.conv().boomerang(&known).unwrap();
    assert_eq!(bounced.frames(), Some(80));
    assert_eq!(bounced.kind(), MediaKind::Video);
    assert_eq!(fx.class_of(bounced.location()), class::VIDEO_BOOMERANG);

    let bounced = fx.conv().boomerang(&unknown).unwrap();
    assert_eq!(bounced.frames(), None);
}

#[test]
fn attached_latent_audio_is_decoded_first() {
    let mut fx = Fixture::new();
    let vae = fx.vae(LTXV2);
    let audio_vae = fx.vae(LTXV2);
    let joint = fx.source(MediaKind::LatentAudioVideo, Some(LTXV2));

    let out = fx
        .conv()
        .save(&joint, Some(&vae), Some(&audio_vae))
        .unwrap();
    assert_eq!(
        fx.wf.node(&out).unwrap().class_type,
        class::SAVE_ANIMATION_WS
    );
    assert_eq!(fx.wf.count_class(class::LTXV_SEPARATE_AV_LATENT), 1);

    let audio = fx.wf.node(&out).unwrap().link("audio").unwrap().clone();
    assert_eq!(fx.class_of(&audio), class::LTXV_AUDIO_VAE_DECODE);
    assert_eq!(fx.link(&audio, "audio_vae"), audio_vae.location);
    let images = fx.wf.node(&out).unwrap().link("images").unwrap().clone();
    assert_eq!(fx.class_of(&images), class::VAE_DECODE);
}

#[test]
fn audio_saves_as_mp3() {
    let mut fx = Fixture::new();
    let audio = fx.source(MediaKind::Audio, None);
    let out = fx.conv().save(&audio, None, None).unwrap();
    assert_eq!(fx.wf.node(&out).unwrap().class_type, class::SAVE_AUDIO_MP3);
    assert_eq!(str_input(&fx, &out, "quality"), Some("V0"));

    let audio_vae = fx.vae("stable-audio");
    let latent = fx.source(MediaKind::LatentAudio, Some("stable-audio"));
    let out = fx.conv().save(&latent, None, Some(&audio_vae)).unwrap();
    let decoded = fx.wf.node(&out).unwrap().link("audio").unwrap().clone();
    assert_eq!(fx.class_of(&decoded), class::VAE_DECODE_AUDIO);
}

#[test]
fn audio_carrying_audio_is_rejected() {
    let mut fx = Fixture::new();
    let extra = fx.source(MediaKind::Audio, None);
    let audio = fx
        .source(MediaKind::Audio, None)
        .with_attached_audio(extra)
        .unwrap();
    let before = fx.wf.len();

    let err = fx.conv().save(&audio, None, None).unwrap_err();
    assert!(err.is_misuse());
    assert!(err.to_string().contains("onto other audio"));
    assert_eq!(fx.wf.len(), before);
}

#[test]
fn explicit_output_id_is_used() {
    let mut fx = Fixture::new();
    let img = fx.source(MediaKind::Image, None);
    let out = fx
        .conv()
        .save_with_id(&img, None, None, Some("9"))
        .unwrap();
    assert_eq!(out, NodeId::from("9"));
    assert!(fx.conv().save_with_id(&img, None, None, Some("9")).is_err());
}

#[test]
fn audio_carrying_latent_audio_fails_before_decoding() {
    let mut fx = Fixture::new();
    let audio_vae = fx.vae("stable-audio");
    let extra = fx.source(MediaKind::LatentAudio, Some("stable-audio"));
    let audio = fx
        .source(MediaKind::Audio, None)
        .with_attached_audio(extra)
        .unwrap();
    let before = fx.wf.len();

    let err = fx.conv().save(&audio, None, Some(&audio_vae)).unwrap_err();
    assert!(err.to_string().contains("onto other audio"));
    assert_eq!(fx.wf.len(), before);
    assert_eq!(fx.wf.count_class(class::VAE_DECODE_AUDIO), 0);
}

#[test]
fn attached_latent_audio_needs_audio_vae_up_front() {
    let mut fx = Fixture::new();
    let vae = fx.vae("sdxl");
    let audio = fx.source(MediaKind::LatentAudio, Some("stable-audio"));
    let latent = fx
        .source(MediaKind::LatentVideo, Some("sdxl"))
        .with_attached_audio(audio)
        .unwrap();
    let before = fx.wf.len();

    let err = fx.conv().save(&latent, Some(&vae), None).unwrap_err();
    assert!(err.to_string().contains("audio VAE"));
    assert_eq!(fx.wf.len(), before);
}

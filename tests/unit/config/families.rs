use super::*;

#[test]
fn compat_equality_is_by_id() {
    assert_eq!(CompatClass::new("sdxl"), CompatClass::new("sdxl"));
    assert_ne!(CompatClass::new("sdxl"), CompatClass::new("sd15"));
}

#[test]
fn default_table_classifies_known_families() {
    let fam = ModelFamilies::default();
    let ltx = CompatClass::new(LTXV2);
    let cascade = CompatClass::new(CASCADE);
    let wan = CompatClass::new("wan-21");

    assert!(fam.is_joint_audio_video(Some(&ltx)));
    assert!(!fam.is_joint_audio_video(Some(&cascade)));
    assert!(!fam.is_joint_audio_video(None));
    assert!(fam.uses_staged_encoder(Some(&cascade)));
    assert!(fam.needs_unbounded_temporal_tile(Some(&wan)));
    assert!(fam.forces_tiled_decode(Some(&CompatClass::new("hunyuan-video"))));
    assert_eq!(fam.default_fps(Some(&wan)), Some(16));
    assert_eq!(fam.default_fps(Some(&CompatClass::new("sdxl"))), None);
}

#[test]
fn partial_json_keeps_other_defaults() {
    let fam: ModelFamilies =
        serde_json::from_str(r#"{"forced_tiled_decode": ["my-video-model"]}"#).unwrap();
    assert!(fam.forces_tiled_decode(Some(&CompatClass::new("my-video-model"))));
    assert!(!fam.forces_tiled_decode(Some(&CompatClass::new("hunyuan-video"))));
    assert!(fam.is_joint_audio_video(Some(&CompatClass::new(LTXV2))));
}

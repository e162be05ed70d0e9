use super::*;

#[test]
fn get_falls_back_to_default_when_unset() {
    let params = GenParams::new();
    assert_eq!(params.get(keys::VAE_TILE_SIZE, 256), 256);
    assert_eq!(params.try_get(keys::VAE_TILE_SIZE), None);
    assert_eq!(
        params.get(keys::VIDEO_FORMAT, "h264-mp4".to_string()),
        "h264-mp4"
    );
}

#[test]
fn set_then_get_round_trips_typed_values() {
    let params = GenParams::new()
        .with(keys::VAE_TILE_SIZE, 512)
        .with(keys::VIDEO_BOOMERANG, true)
        .with(keys::BIT_DEPTH, "16bit".to_string());
    assert_eq!(params.try_get(keys::VAE_TILE_SIZE), Some(512));
    assert!(params.get(keys::VIDEO_BOOMERANG, false));
    assert_eq!(params.get(keys::BIT_DEPTH, "8bit".to_string()), "16bit");
    assert!(params.is_set(ParamKey::VaeTileSize));
    assert!(!params.is_set(ParamKey::VaeTileOverlap));
}

#[test]
fn json_keys_are_snake_case() {
    let params: GenParams = serde_json::from_str(
        r#"{"vae_temporal_tile_size": 16, "video_format": "webm", "video_boomerang": true}"#,
    )
    .unwrap();
    params.validate().unwrap();
    assert_eq!(params.try_get(keys::VAE_TEMPORAL_TILE_SIZE), Some(16));
    assert_eq!(params.get(keys::VIDEO_FORMAT, String::new()), "webm");
    assert!(params.get(keys::VIDEO_BOOMERANG, false));
}

#[test]
fn unknown_key_fails_to_parse() {
    let res: Result<GenParams, _> = serde_json::from_str(r#"{"cfg_scale": 7}"#);
    assert!(res.is_err());
}

#[test]
fn validate_rejects_mistyped_value() {
    let params: GenParams = serde_json::from_str(r#"{"batch_size": "four"}"#).unwrap();
    let err = params.validate().unwrap_err();
    assert!(err.to_string().contains("batch_size"));
}

#[test]
fn unset_removes_value() {
    let mut params = GenParams::new().with(keys::BATCH_SIZE, 4);
    params.unset(ParamKey::BatchSize);
    assert_eq!(params.get(keys::BATCH_SIZE, 1), 1);
}

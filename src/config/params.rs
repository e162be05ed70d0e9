use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use crate::foundation::error::{FlowError, FlowResult};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
/// Names of the user options the conversion engine reads.
pub enum ParamKey {
    /// Spatial VAE tile size. Setting it selects tiled encode/decode.
    VaeTileSize,
    /// Spatial VAE tile overlap.
    VaeTileOverlap,
    /// Temporal VAE tile size. Setting it selects tiled encode/decode.
    VaeTemporalTileSize,
    /// Temporal VAE tile overlap.
    VaeTemporalTileOverlap,
    /// Number of items generated per batch.
    BatchSize,
    /// Frame rate for generated video.
    VideoFps,
    /// Container/codec format for saved video.
    VideoFormat,
    /// Append a reversed copy of saved video.
    VideoBoomerang,
    /// Bit depth for streamed image saves.
    BitDepth,
    /// Stage C latent compression factor for the staged encoder family.
    CascadeLatentCompression,
    /// Allow family-specific safeguards such as forced tiled decode.
    ModelSpecificEnhancements,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Value type a [`ParamKey`] is declared with.
pub enum ParamValueType {
    /// `true` / `false`.
    Bool,
    /// Signed integer.
    Int,
    /// Floating point.
    Float,
    /// Free text.
    Text,
}

impl ParamKey {
    /// Declared value type of this option.
    pub fn value_type(self) -> ParamValueType {
        match self {
            Self::VaeTileSize
            | Self::VaeTileOverlap
            | Self::VaeTemporalTileSize
            | Self::VaeTemporalTileOverlap
            | Self::BatchSize
            | Self::VideoFps
            | Self::CascadeLatentCompression => ParamValueType::Int,
            Self::VideoFormat | Self::BitDepth => ParamValueType::Text,
            Self::VideoBoomerang | Self::ModelSpecificEnhancements => ParamValueType::Bool,
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::VaeTileSize => "vae_tile_size",
            Self::VaeTileOverlap => "vae_tile_overlap",
            Self::VaeTemporalTileSize => "vae_temporal_tile_size",
            Self::VaeTemporalTileOverlap => "vae_temporal_tile_overlap",
            Self::BatchSize => "batch_size",
            Self::VideoFps => "video_fps",
            Self::VideoFormat => "video_format",
            Self::VideoBoomerang => "video_boomerang",
            Self::BitDepth => "bit_depth",
            Self::CascadeLatentCompression => "cascade_latent_compression",
            Self::ModelSpecificEnhancements => "model_specific_enhancements",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
/// A stored option value.
pub enum ParamValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl ParamValue {
    fn value_type(&self) -> ParamValueType {
        match self {
            Self::Bool(_) => ParamValueType::Bool,
            Self::Int(_) => ParamValueType::Int,
            Self::Float(_) => ParamValueType::Float,
            Self::Text(_) => ParamValueType::Text,
        }
    }
}

/// Rust types that can be stored as a [`ParamValue`].
pub trait ParamType: Sized {
    /// Extract from a stored value, `None` on type mismatch.
    fn from_value(v: &ParamValue) -> Option<Self>;
    /// Wrap for storage.
    fn into_value(self) -> ParamValue;
}

impl ParamType for bool {
    fn from_value(v: &ParamValue) -> Option<Self> {
        match v {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn into_value(self) -> ParamValue {
        ParamValue::Bool(self)
    }
}

impl ParamType for i64 {
    fn from_value(v: &ParamValue) -> Option<Self> {
        match v {
            ParamValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    fn into_value(self) -> ParamValue {
        ParamValue::Int(self)
    }
}

impl ParamType for f64 {
    fn from_value(v: &ParamValue) -> Option<Self> {
        match v {
            ParamValue::Float(f) => Some(*f),
            ParamValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    fn into_value(self) -> ParamValue {
        ParamValue::Float(self)
    }
}

impl ParamType for String {
    fn from_value(v: &ParamValue) -> Option<Self> {
        match v {
            ParamValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn into_value(self) -> ParamValue {
        ParamValue::Text(self)
    }
}

/// A [`ParamKey`] tied to the Rust type its value is read as.
pub struct Param<T> {
    key: ParamKey,
    _ty: PhantomData<fn() -> T>,
}

impl<T> Param<T> {
    /// Bind `key` to `T`.
    pub const fn new(key: ParamKey) -> Self {
        Self {
            key,
            _ty: PhantomData,
        }
    }

    /// The untyped key.
    pub fn key(&self) -> ParamKey {
        self.key
    }
}

impl<T> Clone for Param<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Param<T> {}

impl<T> fmt::Debug for Param<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Param({})", self.key)
    }
}

/// Typed handles for every [`ParamKey`].
pub mod keys {
    use super::{Param, ParamKey};

    /// See [`ParamKey::VaeTileSize`].
    pub const VAE_TILE_SIZE: Param<i64> = Param::new(ParamKey::VaeTileSize);
    /// See [`ParamKey::VaeTileOverlap`].
    pub const VAE_TILE_OVERLAP: Param<i64> = Param::new(ParamKey::VaeTileOverlap);
    /// See [`ParamKey::VaeTemporalTileSize`].
    pub const VAE_TEMPORAL_TILE_SIZE: Param<i64> = Param::new(ParamKey::VaeTemporalTileSize);
    /// See [`ParamKey::VaeTemporalTileOverlap`].
    pub const VAE_TEMPORAL_TILE_OVERLAP: Param<i64> =
        Param::new(ParamKey::VaeTemporalTileOverlap);
    /// See [`ParamKey::BatchSize`].
    pub const BATCH_SIZE: Param<i64> = Param::new(ParamKey::BatchSize);
    /// See [`ParamKey::VideoFps`].
    pub const VIDEO_FPS: Param<i64> = Param::new(ParamKey::VideoFps);
    /// See [`ParamKey::VideoFormat`].
    pub const VIDEO_FORMAT: Param<String> = Param::new(ParamKey::VideoFormat);
    /// See [`ParamKey::VideoBoomerang`].
    pub const VIDEO_BOOMERANG: Param<bool> = Param::new(ParamKey::VideoBoomerang);
    /// See [`ParamKey::BitDepth`].
    pub const BIT_DEPTH: Param<String> = Param::new(ParamKey::BitDepth);
    /// See [`ParamKey::CascadeLatentCompression`].
    pub const CASCADE_LATENT_COMPRESSION: Param<i64> =
        Param::new(ParamKey::CascadeLatentCompression);
    /// See [`ParamKey::ModelSpecificEnhancements`].
    pub const MODEL_SPECIFIC_ENHANCEMENTS: Param<bool> =
        Param::new(ParamKey::ModelSpecificEnhancements);
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
/// User option store read by the conversion engine.
///
/// Absent options fall back to the default given at the read site; the store never invents
/// values on its own.
pub struct GenParams {
    values: BTreeMap<ParamKey, ParamValue>,
}

impl GenParams {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `param`, or `default` when it is unset.
    pub fn get<T: ParamType>(&self, param: Param<T>, default: T) -> T {
        self.try_get(param).unwrap_or(default)
    }

    /// Read `param` if it is set to a value of the right type.
    pub fn try_get<T: ParamType>(&self, param: Param<T>) -> Option<T> {
        self.values.get(&param.key).and_then(T::from_value)
    }

    /// True when `key` has any value.
    pub fn is_set(&self, key: ParamKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Store `value` under `param`.
    pub fn set<T: ParamType>(&mut self, param: Param<T>, value: T) {
        self.values.insert(param.key, value.into_value());
    }

    /// Builder form of [`GenParams::set`].
    pub fn with<T: ParamType>(mut self, param: Param<T>, value: T) -> Self {
        self.set(param, value);
        self
    }

    /// Remove `key`.
    pub fn unset(&mut self, key: ParamKey) {
        self.values.remove(&key);
    }

    /// Check that every stored value matches its key's declared type.
    pub fn validate(&self) -> FlowResult<()> {
        for (key, value) in &self.values {
            let want = key.value_type();
            let got = value.value_type();
            let ok = want == got || (want == ParamValueType::Float && got == ParamValueType::Int);
            if !ok {
                return Err(FlowError::config(format!(
                    "option '{key}' expects {want:?} but was given {got:?}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/params.rs"]
mod tests;

use thiserror::Error;

/// Failure to obtain or validate an externally supplied asset.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssetError {
    #[error("asset unavailable: {0}")]
    Unavailable(String),

    #[error("texture {width}x{height} expects {expected} RGBA bytes, got {actual}")]
    TextureSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("failed to decode asset: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum GlobeError {
    #[error("render surface error: {0}")]
    Render(String),

    #[error("frame scheduling failed: {0}")]
    Schedule(String),

    #[error(transparent)]
    Asset(#[from] AssetError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("unknown tuning parameter `{0}`")]
    UnknownParameter(String),

    #[error("parameter `{0}` no longer has a target in the scene")]
    MissingTarget(String),

    #[error("value for `{key}` is not finite: {value}")]
    NotFinite { key: String, value: f32 },

    #[error("tuning bridge is detached")]
    Detached,
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TextureError>;

/// Errors reported while planning, sizing or transcoding RSX textures.
///
/// Every variant is a deterministic function of the texture parameters: retrying the same call
/// with the same inputs fails the same way. Recoverable setups (such as a linear texture declaring
/// a zero pitch) are logged and worked around instead of being reported here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextureError {
    #[error("unsupported texture format 0x{code:x}")]
    UnsupportedFormat { code: u32 },

    #[error("unsupported surface color format 0x{code:x}")]
    UnsupportedSurfaceFormat { code: u32 },

    #[error("unsupported surface antialiasing mode 0x{code:x}")]
    UnsupportedAntialiasing { code: u32 },

    /// Mip count, width or height of zero reached a size computation.
    #[error("texture parameters produce a zero storage size")]
    ZeroSizedTexture,

    #[error("invalid alignment {alignment} (must be non-zero)")]
    InvalidAlignment { alignment: usize },

    #[error("integer overflow while computing texture sizes")]
    SizeOverflow,

    #[error("source out of bounds: offset={offset} len={len} available={available}")]
    SourceOutOfBounds {
        offset: usize,
        len: usize,
        available: usize,
    },

    #[error("destination buffer too small: required={required} available={available}")]
    DestinationTooSmall { required: usize, available: usize },
}

//! Static metadata for RSX (`CELL_GCM_*`) texture and surface formats.
//!
//! A texture is stored as an array of *blocks*: a block is a single texel for the plain formats
//! and a 4×4 texel group for the DXT block-compressed formats.

use tracing::error;

use crate::error::{Result, TextureError};

/// Texture format modifier: rows are stored linearly at the declared pitch (not swizzled).
pub const CELL_GCM_TEXTURE_LN: u32 = 0x20;
/// Texture format modifier: unnormalized texture coordinates. Irrelevant for the memory layout.
pub const CELL_GCM_TEXTURE_UN: u32 = 0x40;

const FORMAT_MODIFIER_MASK: u32 = CELL_GCM_TEXTURE_LN | CELL_GCM_TEXTURE_UN;

/// Strips the `LN`/`UN` modifier bits from a raw texture format word.
pub fn strip_format_modifiers(raw: u32) -> u32 {
    raw & !FORMAT_MODIFIER_MASK
}

/// Texture formats understood by the RSX texture unit.
///
/// Discriminants are the raw `CELL_GCM_TEXTURE_*` codes with the modifier bits cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TextureFormat {
    B8 = 0x81,
    A1R5G5B5 = 0x82,
    A4R4G4B4 = 0x83,
    R5G6B5 = 0x84,
    A8R8G8B8 = 0x85,
    CompressedDxt1 = 0x86,
    CompressedDxt23 = 0x87,
    CompressedDxt45 = 0x88,
    G8B8 = 0x8B,
    R6G5B5 = 0x8F,
    Depth24D8 = 0x90,
    Depth24D8Float = 0x91,
    Depth16 = 0x92,
    Depth16Float = 0x93,
    X16 = 0x94,
    Y16X16 = 0x95,
    R5G5B5A1 = 0x97,
    CompressedHilo8 = 0x98,
    CompressedHiloS8 = 0x99,
    W16Z16Y16X16Float = 0x9A,
    W32Z32Y32X32Float = 0x9B,
    X32Float = 0x9C,
    D1R5G5B5 = 0x9D,
    D8R8G8B8 = 0x9E,
    Y16X16Float = 0x9F,
    CompressedB8R8G8R8 = 0xAD,
    CompressedR8B8R8G8 = 0xAE,
}

impl TextureFormat {
    pub const ALL: [TextureFormat; 27] = [
        Self::B8,
        Self::A1R5G5B5,
        Self::A4R4G4B4,
        Self::R5G6B5,
        Self::A8R8G8B8,
        Self::CompressedDxt1,
        Self::CompressedDxt23,
        Self::CompressedDxt45,
        Self::G8B8,
        Self::R6G5B5,
        Self::Depth24D8,
        Self::Depth24D8Float,
        Self::Depth16,
        Self::Depth16Float,
        Self::X16,
        Self::Y16X16,
        Self::R5G5B5A1,
        Self::CompressedHilo8,
        Self::CompressedHiloS8,
        Self::W16Z16Y16X16Float,
        Self::W32Z32Y32X32Float,
        Self::X32Float,
        Self::D1R5G5B5,
        Self::D8R8G8B8,
        Self::Y16X16Float,
        Self::CompressedB8R8G8R8,
        Self::CompressedR8B8R8G8,
    ];

    /// Decodes a raw texture format word. The `LN`/`UN` modifier bits are ignored.
    pub fn from_raw(raw: u32) -> Result<Self> {
        let code = strip_format_modifiers(raw);
        Self::ALL
            .into_iter()
            .find(|format| *format as u32 == code)
            .ok_or(TextureError::UnsupportedFormat { code })
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn info(self) -> FormatInfo {
        use TextureFormat::*;

        match self {
            B8 => FormatInfo::texel(1),
            X16 | G8B8 | R6G5B5 | R5G6B5 | D1R5G5B5 | R5G5B5A1 | A1R5G5B5 | A4R4G4B4 | Depth16
            | Depth16Float | CompressedHilo8 | CompressedHiloS8 => FormatInfo::texel(2),
            A8R8G8B8 | D8R8G8B8 | Depth24D8 | Depth24D8Float | X32Float | Y16X16 | Y16X16Float
            | CompressedB8R8G8R8 | CompressedR8B8R8G8 => FormatInfo::texel(4),
            W16Z16Y16X16Float => FormatInfo::texel(8),
            W32Z32Y32X32Float => FormatInfo::texel(16),
            CompressedDxt1 => FormatInfo::dxt(8),
            CompressedDxt23 | CompressedDxt45 => FormatInfo::dxt(16),
        }
    }

    pub fn is_dxt(self) -> bool {
        matches!(
            self,
            Self::CompressedDxt1 | Self::CompressedDxt23 | Self::CompressedDxt45
        )
    }

    /// Minimum number of bits a single texel of this format needs.
    pub fn bits_per_texel(self) -> u32 {
        use TextureFormat::*;

        match self {
            CompressedDxt1 => 4,
            B8 | CompressedDxt23 | CompressedDxt45 => 8,
            A1R5G5B5 | A4R4G4B4 | R5G6B5 | G8B8 | R6G5B5 | Depth16 | Depth16Float | X16
            | R5G5B5A1 | CompressedHilo8 | CompressedHiloS8 | D1R5G5B5 => 16,
            // Two texels share one 32-bit block.
            CompressedB8R8G8R8 | CompressedR8B8R8G8 => 16,
            A8R8G8B8 | Depth24D8 | Depth24D8Float | Y16X16 | X32Float | D8R8G8B8
            | Y16X16Float => 32,
            W16Z16Y16X16Float => 64,
            W32Z32Y32X32Float => 128,
        }
    }
}

/// Catalog entry describing how one format is laid out in memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatInfo {
    pub block_size_in_bytes: u8,
    /// Edge length of a block in texels (blocks are square).
    pub block_size_in_texel: u8,
    /// Texel rows encoded by one pitch-length line of bytes.
    pub texel_rows_per_line: u8,
}

impl FormatInfo {
    const fn texel(bytes: u8) -> Self {
        Self {
            block_size_in_bytes: bytes,
            block_size_in_texel: 1,
            texel_rows_per_line: 1,
        }
    }

    const fn dxt(bytes: u8) -> Self {
        Self {
            block_size_in_bytes: bytes,
            block_size_in_texel: 4,
            texel_rows_per_line: 4,
        }
    }
}

pub fn block_size_in_bytes(format: TextureFormat) -> u8 {
    format.info().block_size_in_bytes
}

pub fn block_size_in_texel(format: TextureFormat) -> u8 {
    format.info().block_size_in_texel
}

/// Returns the number of texel lines decoded from one pitch-length number of bytes.
pub fn texel_rows_per_line(format: TextureFormat) -> u8 {
    format.info().texel_rows_per_line
}

/// Block size lookup over a raw format word.
///
/// Unknown codes are logged and reported as 1 byte; callers only use this for estimates.
pub fn block_size_in_bytes_raw(raw: u32) -> u8 {
    match TextureFormat::from_raw(raw) {
        Ok(format) => block_size_in_bytes(format),
        Err(_) => {
            error!(
                "unimplemented block size in bytes for texture format 0x{:x}",
                strip_format_modifiers(raw)
            );
            1
        }
    }
}

pub fn block_size_in_texel_raw(raw: u32) -> u8 {
    match TextureFormat::from_raw(raw) {
        Ok(format) => block_size_in_texel(format),
        Err(_) => {
            error!(
                "unimplemented block size in texels for texture format 0x{:x}",
                strip_format_modifiers(raw)
            );
            1
        }
    }
}

pub fn texel_rows_per_line_raw(raw: u32) -> u8 {
    TextureFormat::from_raw(raw).map_or(1, texel_rows_per_line)
}

/// Byte length of one tightly packed row of `width` texels.
pub fn packed_pitch(format: TextureFormat, width: u16) -> u32 {
    let info = format.info();
    u32::from(width).div_ceil(u32::from(info.block_size_in_texel))
        * u32::from(info.block_size_in_bytes)
}

/// Render surface colour formats (`CELL_GCM_SURFACE_*`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SurfaceColorFormat {
    X1R5G5B5Z1R5G5B5 = 1,
    X1R5G5B5O1R5G5B5 = 2,
    R5G6B5 = 3,
    X8R8G8B8Z8R8G8B8 = 4,
    X8R8G8B8O8R8G8B8 = 5,
    A8R8G8B8 = 8,
    B8 = 9,
    G8B8 = 10,
    W16Z16Y16X16 = 11,
    W32Z32Y32X32 = 12,
    X32 = 13,
    X8B8G8R8Z8B8G8R8 = 14,
    X8B8G8R8O8B8G8R8 = 15,
    A8B8G8R8 = 16,
}

impl SurfaceColorFormat {
    pub fn from_raw(raw: u32) -> Result<Self> {
        use SurfaceColorFormat::*;

        Ok(match raw {
            1 => X1R5G5B5Z1R5G5B5,
            2 => X1R5G5B5O1R5G5B5,
            3 => R5G6B5,
            4 => X8R8G8B8Z8R8G8B8,
            5 => X8R8G8B8O8R8G8B8,
            8 => A8R8G8B8,
            9 => B8,
            10 => G8B8,
            11 => W16Z16Y16X16,
            12 => W32Z32Y32X32,
            13 => X32,
            14 => X8B8G8R8Z8B8G8R8,
            15 => X8B8G8R8O8B8G8R8,
            16 => A8B8G8R8,
            code => return Err(TextureError::UnsupportedSurfaceFormat { code }),
        })
    }
}

pub fn surface_block_size_in_bytes(format: SurfaceColorFormat) -> u8 {
    use SurfaceColorFormat::*;

    match format {
        B8 => 1,
        G8B8 | R5G6B5 | X1R5G5B5O1R5G5B5 | X1R5G5B5Z1R5G5B5 => 2,
        A8B8G8R8 | A8R8G8B8 | X8B8G8R8O8B8G8R8 | X8B8G8R8Z8B8G8R8 | X8R8G8B8O8R8G8B8
        | X8R8G8B8Z8R8G8B8 | X32 => 4,
        W16Z16Y16X16 => 8,
        W32Z32Y32X32 => 16,
    }
}

/// Multisample modes of a render surface (`CELL_GCM_SURFACE_*` antialias codes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SurfaceAntialiasing {
    Center1Sample = 0,
    DiagonalCentered2Samples = 3,
    SquareCentered4Samples = 4,
    SquareRotated4Samples = 5,
}

impl SurfaceAntialiasing {
    pub fn from_raw(raw: u32) -> Result<Self> {
        Ok(match raw {
            0 => Self::Center1Sample,
            3 => Self::DiagonalCentered2Samples,
            4 => Self::SquareCentered4Samples,
            5 => Self::SquareRotated4Samples,
            code => return Err(TextureError::UnsupportedAntialiasing { code }),
        })
    }
}

pub fn sample_count(antialias: SurfaceAntialiasing) -> u8 {
    match antialias {
        SurfaceAntialiasing::Center1Sample => 1,
        SurfaceAntialiasing::DiagonalCentered2Samples => 2,
        SurfaceAntialiasing::SquareCentered4Samples
        | SurfaceAntialiasing::SquareRotated4Samples => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_raw_codes_with_modifiers() {
        assert_eq!(
            TextureFormat::from_raw(0x85).unwrap(),
            TextureFormat::A8R8G8B8
        );
        assert_eq!(
            TextureFormat::from_raw(0x85 | CELL_GCM_TEXTURE_LN).unwrap(),
            TextureFormat::A8R8G8B8
        );
        assert_eq!(
            TextureFormat::from_raw(0x86 | CELL_GCM_TEXTURE_LN | CELL_GCM_TEXTURE_UN).unwrap(),
            TextureFormat::CompressedDxt1
        );
        assert_eq!(
            TextureFormat::from_raw(0x8A),
            Err(TextureError::UnsupportedFormat { code: 0x8A })
        );
        // Modifier bits never reach the reported code.
        assert_eq!(
            TextureFormat::from_raw(0xA0),
            Err(TextureError::UnsupportedFormat { code: 0x80 })
        );
    }

    #[test]
    fn every_format_round_trips_through_its_code() {
        for format in TextureFormat::ALL {
            assert_eq!(TextureFormat::from_raw(format.code()).unwrap(), format);
        }
    }

    #[test]
    fn reports_documented_block_sizes() {
        assert_eq!(block_size_in_bytes(TextureFormat::B8), 1);
        assert_eq!(block_size_in_bytes(TextureFormat::R6G5B5), 2);
        assert_eq!(block_size_in_bytes(TextureFormat::CompressedB8R8G8R8), 4);
        assert_eq!(block_size_in_bytes(TextureFormat::CompressedDxt1), 8);
        assert_eq!(block_size_in_bytes(TextureFormat::W16Z16Y16X16Float), 8);
        assert_eq!(block_size_in_bytes(TextureFormat::CompressedDxt45), 16);
        assert_eq!(block_size_in_bytes(TextureFormat::W32Z32Y32X32Float), 16);

        assert_eq!(block_size_in_texel(TextureFormat::A8R8G8B8), 1);
        assert_eq!(block_size_in_texel(TextureFormat::CompressedDxt23), 4);

        assert_eq!(texel_rows_per_line(TextureFormat::CompressedDxt1), 4);
        assert_eq!(texel_rows_per_line(TextureFormat::X32Float), 1);
    }

    #[test]
    fn unknown_raw_codes_fall_back_to_one() {
        assert_eq!(block_size_in_bytes_raw(0x8A), 1);
        assert_eq!(block_size_in_texel_raw(0x8A), 1);
        assert_eq!(texel_rows_per_line_raw(0x8A), 1);

        assert_eq!(block_size_in_bytes_raw(0x88 | CELL_GCM_TEXTURE_LN), 16);
        assert_eq!(texel_rows_per_line_raw(0x87), 4);
    }

    #[test]
    fn no_format_under_allocates_a_block() {
        for format in TextureFormat::ALL {
            let info = format.info();
            let edge = u32::from(info.block_size_in_texel);
            let block_bits = u32::from(info.block_size_in_bytes) * 8;
            assert!(
                block_bits >= format.bits_per_texel() * edge * edge,
                "{format:?} block too small"
            );
        }
    }

    #[test]
    fn packed_pitch_rounds_up_to_whole_blocks() {
        assert_eq!(packed_pitch(TextureFormat::A8R8G8B8, 3), 12);
        assert_eq!(packed_pitch(TextureFormat::CompressedDxt1, 1), 8);
        assert_eq!(packed_pitch(TextureFormat::CompressedDxt1, 5), 16);
        assert_eq!(packed_pitch(TextureFormat::CompressedDxt45, 16), 64);
    }

    #[test]
    fn surface_formats_and_sample_counts() {
        let b8 = SurfaceColorFormat::from_raw(9).unwrap();
        assert_eq!(surface_block_size_in_bytes(b8), 1);
        assert_eq!(
            surface_block_size_in_bytes(SurfaceColorFormat::W32Z32Y32X32),
            16
        );
        assert_eq!(surface_block_size_in_bytes(SurfaceColorFormat::X32), 4);
        assert!(matches!(
            SurfaceColorFormat::from_raw(6),
            Err(TextureError::UnsupportedSurfaceFormat { code: 6 })
        ));

        assert_eq!(sample_count(SurfaceAntialiasing::Center1Sample), 1);
        assert_eq!(
            sample_count(SurfaceAntialiasing::from_raw(3).unwrap()),
            2
        );
        assert_eq!(
            sample_count(SurfaceAntialiasing::SquareRotated4Samples),
            4
        );
        assert!(SurfaceAntialiasing::from_raw(1).is_err());
    }
}

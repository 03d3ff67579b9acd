//! Per-subresource transcoding from the native encoding into a linear, host-order buffer.

mod channel_pair;
mod copy;
mod rgb655;
mod vtc;

use tracing::{debug, trace, warn};

use crate::endian::{BeU16, BeU32};
use crate::error::{Result, TextureError};
use crate::format::TextureFormat;
use crate::layout::SubresourceLayout;
use crate::pitch::get_row_pitch_in_block;
use crate::swizzle::deswizzle_3d;

pub use channel_pair::decode_pair;
pub use rgb655::rgb655_to_rgb565;

use copy::RowCopy;

/// Knobs of the upload path. Both come from the consumer's graphics backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TranscodeOptions {
    /// The backend samples VTC-tiled compressed volumes natively.
    pub vtc_support: bool,
    /// Destination rows are padded to a multiple of this many bytes.
    pub row_pitch_alignment: usize,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            vtc_support: false,
            row_pitch_alignment: 256,
        }
    }
}

/// Source word representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WordKind {
    HostU8,
    HostU32,
    HostU64,
    HostU128,
    BigEndianU16,
    BigEndianU32,
}

impl WordKind {
    pub fn size(self) -> usize {
        match self {
            WordKind::HostU8 => 1,
            WordKind::BigEndianU16 => 2,
            WordKind::HostU32 | WordKind::BigEndianU32 => 4,
            WordKind::HostU64 => 8,
            WordKind::HostU128 => 16,
        }
    }
}

/// How one subresource is turned into linear texels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecodeStrategy {
    /// Row-by-row copy honouring both pitches.
    Copy { word: WordKind, words_per_block: u8 },
    /// Morton untiling followed by [`DecodeStrategy::Copy`].
    Unswizzle { word: WordKind, words_per_block: u8 },
    /// Plane de-interleaving of a compressed volume.
    VtcDetile { word: WordKind },
    /// `B8R8_G8R8` family; `big_endian` selects the source word order.
    ChannelPair { big_endian: bool },
    /// `R6G5B5` to `R5G6B5`, untiled first when `swizzled`.
    Rgb655 { swizzled: bool },
}

/// Picks the decode strategy for a subresource.
pub fn select_strategy(
    format: TextureFormat,
    is_swizzled: bool,
    vtc_support: bool,
    depth: u16,
) -> DecodeStrategy {
    use TextureFormat::*;

    let tiled = |word: WordKind, words_per_block: u8| {
        if is_swizzled {
            DecodeStrategy::Unswizzle {
                word,
                words_per_block,
            }
        } else {
            DecodeStrategy::Copy {
                word,
                words_per_block,
            }
        }
    };
    // Compressed formats ignore the swizzle bit.
    let compressed = |word: WordKind| {
        if depth > 1 && !vtc_support {
            DecodeStrategy::VtcDetile { word }
        } else {
            DecodeStrategy::Copy {
                word,
                words_per_block: 1,
            }
        }
    };
    let block_size = format.info().block_size_in_bytes;

    match format {
        B8 => tiled(WordKind::HostU8, 1),
        CompressedB8R8G8R8 => DecodeStrategy::ChannelPair { big_endian: true },
        CompressedR8B8R8G8 => DecodeStrategy::ChannelPair { big_endian: false },
        R6G5B5 => DecodeStrategy::Rgb655 {
            swizzled: is_swizzled,
        },
        CompressedHilo8 | CompressedHiloS8 | Depth16 | Depth16Float | D1R5G5B5 | A1R5G5B5
        | A4R4G4B4 | R5G5B5A1 | R5G6B5 | G8B8 => tiled(WordKind::BigEndianU16, 1),
        Depth24D8 | Depth24D8Float => tiled(WordKind::BigEndianU32, 1),
        A8R8G8B8 | D8R8G8B8 => tiled(WordKind::HostU32, 1),
        // Multi-channel data formats keep their channel order; only each channel is swapped.
        X16 | Y16X16 | Y16X16Float | W16Z16Y16X16Float => {
            tiled(WordKind::BigEndianU16, block_size / 2)
        }
        X32Float | W32Z32Y32X32Float => tiled(WordKind::BigEndianU32, block_size / 4),
        CompressedDxt1 => compressed(WordKind::HostU64),
        CompressedDxt23 | CompressedDxt45 => compressed(WordKind::HostU128),
    }
}

/// Size in bytes of one decoded destination element.
pub fn destination_block_size(format: TextureFormat) -> u8 {
    match format {
        TextureFormat::CompressedB8R8G8R8 | TextureFormat::CompressedR8B8R8G8 => 4,
        _ => format.info().block_size_in_bytes,
    }
}

/// Destination row stride, in elements, for a subresource `width_in_block` blocks wide.
pub fn destination_row_pitch_in_block(
    format: TextureFormat,
    width_in_block: u16,
    row_pitch_alignment: usize,
) -> Result<u32> {
    get_row_pitch_in_block(
        u16::from(destination_block_size(format)),
        width_in_block,
        row_pitch_alignment,
    )
}

macro_rules! with_word {
    ($kind:expr, $($func:ident)::+ ( $($arg:expr),* $(,)? )) => {
        match $kind {
            WordKind::HostU8 => $($func)::+::<u8>($($arg),*),
            WordKind::HostU32 => $($func)::+::<u32>($($arg),*),
            WordKind::HostU64 => $($func)::+::<u64>($($arg),*),
            WordKind::HostU128 => $($func)::+::<u128>($($arg),*),
            WordKind::BigEndianU16 => $($func)::+::<BeU16>($($arg),*),
            WordKind::BigEndianU32 => $($func)::+::<BeU32>($($arg),*),
        }
    };
}

fn untile(layout: &SubresourceLayout<'_>, format: TextureFormat, group_bytes: usize) -> Result<Vec<u8>> {
    let len = [
        usize::from(layout.width_in_block),
        usize::from(layout.height_in_block),
        usize::from(layout.depth),
        group_bytes,
    ]
    .into_iter()
    .try_fold(1usize, |acc, f| acc.checked_mul(f))
    .ok_or(TextureError::SizeOverflow)?;

    let mut linear = vec![0u8; len];
    let missing = deswizzle_3d(
        layout.data,
        &mut linear,
        group_bytes,
        layout.width_in_block,
        layout.height_in_block,
        layout.depth,
    )?;
    if missing > 0 {
        warn!(
            ?format,
            missing,
            width = layout.width_in_block,
            height = layout.height_in_block,
            depth = layout.depth,
            "swizzled texels outside the subresource span read as zero"
        );
    }
    Ok(linear)
}

/// Decodes one subresource into `dst`.
///
/// `dst` receives `height_in_block × depth` rows at the pitch given by
/// [`destination_row_pitch_in_block`]; it must be at least
/// [`SubresourceLayout::destination_size`] bytes long. Padding bytes are left untouched.
/// A subresource wider than its pitch is skipped.
pub fn upload_texture_subresource(
    dst: &mut [u8],
    layout: &SubresourceLayout<'_>,
    format: TextureFormat,
    is_swizzled: bool,
    options: &TranscodeOptions,
) -> Result<()> {
    if layout.is_degenerate() {
        trace!(
            ?format,
            width = layout.width_in_block,
            pitch = layout.pitch_in_block,
            "skipping subresource wider than its pitch"
        );
        return Ok(());
    }

    let required = layout.destination_size(format, options.row_pitch_alignment)?;
    if dst.len() < required {
        return Err(TextureError::DestinationTooSmall {
            required,
            available: dst.len(),
        });
    }

    let dst_pitch = destination_row_pitch_in_block(
        format,
        layout.width_in_block,
        options.row_pitch_alignment,
    )? as usize;
    let strategy = select_strategy(format, is_swizzled, options.vtc_support, layout.depth);
    debug!(
        ?format,
        ?strategy,
        layer = layout.layer,
        mip_level = layout.mip_level,
        width = layout.width_in_block,
        height = layout.height_in_block,
        depth = layout.depth,
        "transcoding subresource"
    );

    let width = usize::from(layout.width_in_block);
    let height = usize::from(layout.height_in_block);
    let depth = usize::from(layout.depth);
    let rows = height * depth;
    let src_pitch = layout.pitch_in_block as usize;

    match strategy {
        DecodeStrategy::Copy {
            word,
            words_per_block,
        } => {
            let geometry = RowCopy {
                words_per_block: usize::from(words_per_block),
                width_in_block: width,
                rows,
                src_pitch_in_block: src_pitch,
                dst_pitch_in_block: dst_pitch,
            };
            with_word!(word, copy::copy_unmodified(dst, layout.data, geometry))
        }
        DecodeStrategy::Unswizzle {
            word,
            words_per_block,
        } => {
            let linear = untile(layout, format, word.size() * usize::from(words_per_block))?;
            let geometry = RowCopy {
                words_per_block: usize::from(words_per_block),
                width_in_block: width,
                rows,
                src_pitch_in_block: width,
                dst_pitch_in_block: dst_pitch,
            };
            with_word!(word, copy::copy_unmodified(dst, &linear, geometry))
        }
        DecodeStrategy::VtcDetile { word } => with_word!(
            word,
            vtc::detile(dst, layout.data, width, height, depth, dst_pitch)
        ),
        DecodeStrategy::ChannelPair { big_endian: true } => {
            channel_pair::decode::<BeU16>(dst, layout.data, width, rows, dst_pitch, src_pitch)
        }
        DecodeStrategy::ChannelPair { big_endian: false } => {
            channel_pair::decode::<u16>(dst, layout.data, width, rows, dst_pitch, src_pitch)
        }
        DecodeStrategy::Rgb655 { swizzled: false } => {
            rgb655::remap(dst, layout.data, width, rows, dst_pitch, src_pitch)
        }
        DecodeStrategy::Rgb655 { swizzled: true } => {
            let linear = untile(layout, format, 2)?;
            rgb655::remap(dst, &linear, width, rows, dst_pitch, width)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_format_has_a_strategy_matching_its_block_size() {
        for format in TextureFormat::ALL {
            for swizzled in [false, true] {
                let strategy = select_strategy(format, swizzled, false, 1);
                let bytes = match strategy {
                    DecodeStrategy::Copy {
                        word,
                        words_per_block,
                    }
                    | DecodeStrategy::Unswizzle {
                        word,
                        words_per_block,
                    } => word.size() * usize::from(words_per_block),
                    DecodeStrategy::VtcDetile { word } => word.size(),
                    DecodeStrategy::ChannelPair { .. } => 4,
                    DecodeStrategy::Rgb655 { .. } => 2,
                };
                assert_eq!(bytes, usize::from(destination_block_size(format)), "{format:?}");
            }
        }
    }

    #[test]
    fn swizzle_bit_selects_untiling() {
        assert_eq!(
            select_strategy(TextureFormat::A8R8G8B8, true, false, 1),
            DecodeStrategy::Unswizzle {
                word: WordKind::HostU32,
                words_per_block: 1
            }
        );
        assert_eq!(
            select_strategy(TextureFormat::W16Z16Y16X16Float, false, false, 1),
            DecodeStrategy::Copy {
                word: WordKind::BigEndianU16,
                words_per_block: 4
            }
        );
    }

    #[test]
    fn compressed_volumes_are_detiled_without_vtc_support() {
        let dxt5 = TextureFormat::CompressedDxt45;
        assert_eq!(
            select_strategy(dxt5, true, false, 4),
            DecodeStrategy::VtcDetile {
                word: WordKind::HostU128
            }
        );
        assert_eq!(
            select_strategy(dxt5, true, true, 4),
            DecodeStrategy::Copy {
                word: WordKind::HostU128,
                words_per_block: 1
            }
        );
        assert_eq!(
            select_strategy(TextureFormat::CompressedDxt1, false, false, 1),
            DecodeStrategy::Copy {
                word: WordKind::HostU64,
                words_per_block: 1
            }
        );
    }

    #[test]
    fn channel_pairs_select_their_own_decoder() {
        for swizzled in [false, true] {
            assert_eq!(
                select_strategy(TextureFormat::CompressedB8R8G8R8, swizzled, false, 1),
                DecodeStrategy::ChannelPair { big_endian: true }
            );
            assert_eq!(
                select_strategy(TextureFormat::CompressedR8B8R8G8, swizzled, false, 1),
                DecodeStrategy::ChannelPair { big_endian: false }
            );
        }
    }

    #[test]
    fn default_options() {
        let options = TranscodeOptions::default();
        assert!(!options.vtc_support);
        assert_eq!(options.row_pitch_alignment, 256);
    }
}

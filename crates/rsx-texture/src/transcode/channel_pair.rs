//! `B8R8_G8R8` / `R8B8_R8G8` decoding.
//!
//! Two horizontally adjacent texels share their blue and green channels. Each pair of 16-bit
//! source words expands to two 32-bit BGRA texels with opaque alpha.

use crate::endian::{read_word, write_word, SourceWord};
use crate::error::{Result, TextureError};

/// Expands one pair of source words into two packed `0xAARRGGBB` texels.
pub fn decode_pair(first: u16, second: u16) -> (u32, u32) {
    let blue = u32::from((first & 0xFF00) >> 8);
    let green = u32::from(second & 0xFF00);
    let alpha = 0xFFu32 << 24;
    let left = blue | green | u32::from(first & 0xFF) << 16 | alpha;
    let right = blue | green | u32::from(second & 0xFF) << 16 | alpha;
    (left, right)
}

/// Decodes `rows` rows of `width` texels. Pitches are in texels.
///
/// A trailing unpaired column has no partner to borrow channels from and is not written.
pub(crate) fn decode<W: SourceWord<Host = u16>>(
    dst: &mut [u8],
    src: &[u8],
    width: usize,
    rows: usize,
    dst_pitch: usize,
    src_pitch: usize,
) -> Result<()> {
    let paired_width = width - width % 2;
    for row in 0..rows {
        let src_base = row * src_pitch;
        let dst_base = row * dst_pitch;
        for col in (0..paired_width).step_by(2) {
            let first = read_source::<W>(src, src_base + col)?;
            let second = read_source::<W>(src, src_base + col + 1)?;
            let (left, right) = decode_pair(first, second);
            write_texel(dst, dst_base + col, left)?;
            write_texel(dst, dst_base + col + 1, right)?;
        }
    }
    Ok(())
}

fn read_source<W: SourceWord<Host = u16>>(src: &[u8], index: usize) -> Result<u16> {
    read_word::<W>(src, index)
        .map(SourceWord::to_host)
        .ok_or(TextureError::SourceOutOfBounds {
            offset: index * 2,
            len: 2,
            available: src.len(),
        })
}

fn write_texel(dst: &mut [u8], index: usize, texel: u32) -> Result<()> {
    let available = dst.len();
    write_word(dst, index, texel).ok_or(TextureError::DestinationTooSmall {
        required: (index + 1) * 4,
        available,
    })
}

//! Removal of the VTC tiling used by compressed volume textures.
//!
//! Compressed 3D textures interleave blocks of groups of 4 consecutive planes: block `i` of each of
//! the 4 planes sits next to the other three. A trailing group of fewer than 4 planes is
//! interleaved the same way with its own plane count.

use bytemuck::Pod;

use crate::endian::{read_word, write_word};
use crate::error::{Result, TextureError};

fn move_block<W: Pod>(dst: &mut [u8], src: &[u8], dst_index: usize, src_index: usize) -> Result<()> {
    let size = std::mem::size_of::<W>();
    let value: W = read_word(src, src_index).ok_or(TextureError::SourceOutOfBounds {
        offset: src_index.saturating_mul(size),
        len: size,
        available: src.len(),
    })?;
    let available = dst.len();
    write_word(dst, dst_index, value).ok_or(TextureError::DestinationTooSmall {
        required: dst_index.saturating_add(1).saturating_mul(size),
        available,
    })
}

/// Writes every plane of a VTC-tiled `width×height×depth` block volume to `dst` in row-major
/// order, rows `dst_pitch_in_block` blocks apart.
pub(crate) fn detile<W: Pod>(
    dst: &mut [u8],
    src: &[u8],
    width: usize,
    height: usize,
    depth: usize,
    dst_pitch_in_block: usize,
) -> Result<()> {
    let plane = width * height;
    if plane == 0 {
        return Ok(());
    }
    let grouped_depth = depth / 4 * 4;
    let tail = depth - grouped_depth;
    let mut src_offset = 0usize;

    let dst_index = |d: usize, i: usize| (d * height + i / width) * dst_pitch_in_block + i % width;

    for d in 0..grouped_depth {
        for i in 0..plane {
            move_block::<W>(dst, src, dst_index(d, i), src_offset + i * 4)?;
        }
        if d % 4 == 3 {
            src_offset += plane * 4 - 3;
        } else {
            src_offset += 1;
        }
    }

    for d in grouped_depth..depth {
        for i in 0..plane {
            move_block::<W>(dst, src, dst_index(d, i), src_offset + i * tail)?;
        }
        src_offset += 1;
    }
    Ok(())
}

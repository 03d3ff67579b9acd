use std::ops::Range;

use crate::endian::SourceWord;
use crate::error::{Result, TextureError};

/// Row geometry of a copy pass. Widths and pitches are in blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RowCopy {
    pub words_per_block: usize,
    pub width_in_block: usize,
    pub rows: usize,
    pub src_pitch_in_block: usize,
    pub dst_pitch_in_block: usize,
}

pub(crate) fn row_range(row: usize, stride: usize, len: usize) -> Result<Range<usize>> {
    let start = row.checked_mul(stride).ok_or(TextureError::SizeOverflow)?;
    let end = start.checked_add(len).ok_or(TextureError::SizeOverflow)?;
    Ok(start..end)
}

pub(crate) fn source_slice(src: &[u8], range: Range<usize>) -> Result<&[u8]> {
    let available = src.len();
    let (offset, len) = (range.start, range.len());
    src.get(range).ok_or(TextureError::SourceOutOfBounds {
        offset,
        len,
        available,
    })
}

pub(crate) fn destination_slice(dst: &mut [u8], range: Range<usize>) -> Result<&mut [u8]> {
    let available = dst.len();
    let required = range.end;
    dst.get_mut(range)
        .ok_or(TextureError::DestinationTooSmall {
            required,
            available,
        })
}

/// Copies `rows` rows of blocks, converting every word to host order.
///
/// Host-order words are moved a whole row at a time.
pub(crate) fn copy_unmodified<W: SourceWord>(dst: &mut [u8], src: &[u8], geometry: RowCopy) -> Result<()> {
    let word = std::mem::size_of::<W>();
    let block = geometry.words_per_block * word;
    let row_len = geometry.width_in_block * block;
    let src_stride = geometry.src_pitch_in_block * block;
    let dst_stride = geometry.dst_pitch_in_block * block;

    for row in 0..geometry.rows {
        let src_row = source_slice(src, row_range(row, src_stride, row_len)?)?;
        let dst_row = destination_slice(dst, row_range(row, dst_stride, row_len)?)?;

        if W::BIT_EXACT {
            dst_row.copy_from_slice(src_row);
            continue;
        }
        for (out, bytes) in dst_row.chunks_exact_mut(word).zip(src_row.chunks_exact(word)) {
            let value: W = bytemuck::pod_read_unaligned(bytes);
            out.copy_from_slice(bytemuck::bytes_of(&value.to_host()));
        }
    }
    Ok(())
}

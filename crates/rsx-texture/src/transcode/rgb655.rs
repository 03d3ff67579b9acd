use crate::endian::BeU16;
use crate::error::Result;
use crate::transcode::copy::{destination_slice, row_range, source_slice};

/// Converts an `R6G5B5` texel to `R5G6B5`: red drops its low bit, green gains one.
pub fn rgb655_to_rgb565(bits: u16) -> u16 {
    (bits & 0xF81F) | (bits & 0x03E0) << 1
}

/// Remaps `rows` rows of `width` big-endian texels into host-order `R5G6B5`. Pitches are in texels.
pub(crate) fn remap(
    dst: &mut [u8],
    src: &[u8],
    width: usize,
    rows: usize,
    dst_pitch: usize,
    src_pitch: usize,
) -> Result<()> {
    let row_len = width * 2;
    for row in 0..rows {
        let src_row = source_slice(src, row_range(row, src_pitch * 2, row_len)?)?;
        let dst_row = destination_slice(dst, row_range(row, dst_pitch * 2, row_len)?)?;
        for (out, bytes) in dst_row.chunks_exact_mut(2).zip(src_row.chunks_exact(2)) {
            let texel: BeU16 = bytemuck::pod_read_unaligned(bytes);
            out.copy_from_slice(&rgb655_to_rgb565(texel.get()).to_ne_bytes());
        }
    }
    Ok(())
}

use crate::error::{Result, TextureError};

/// Rounds `value` up to the next multiple of `alignment`. Alignments need not be powers of two.
pub fn align_up(value: usize, alignment: usize) -> Result<usize> {
    if alignment == 0 {
        return Err(TextureError::InvalidAlignment { alignment });
    }
    let rem = value % alignment;
    if rem == 0 {
        return Ok(value);
    }
    value
        .checked_add(alignment - rem)
        .ok_or(TextureError::SizeOverflow)
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Returns the row stride, in blocks, of a destination row holding `width_in_block` blocks.
///
/// The result is the smallest block count `>= width_in_block` whose byte length is a multiple of
/// `alignment_in_bytes`.
pub fn get_row_pitch_in_block(
    block_size_in_bytes: u16,
    width_in_block: u16,
    alignment_in_bytes: usize,
) -> Result<u32> {
    if alignment_in_bytes == 0 {
        return Err(TextureError::InvalidAlignment {
            alignment: alignment_in_bytes,
        });
    }
    let block_size = usize::from(block_size_in_bytes.max(1));

    // Block counts whose byte size is a multiple of the alignment are exactly the multiples of
    // `alignment / gcd(alignment, block_size)`.
    let step = alignment_in_bytes / gcd(alignment_in_bytes, block_size);
    let pitch = usize::from(width_in_block)
        .div_ceil(step)
        .checked_mul(step)
        .ok_or(TextureError::SizeOverflow)?;
    u32::try_from(pitch).map_err(|_| TextureError::SizeOverflow)
}

//! Morton (Z-order) addressing of swizzled RSX textures.
//!
//! A swizzled texture of `w×h×d` elements is stored as if it were padded to the next power of two
//! in every dimension, with the element address formed by interleaving one bit of x, then y, then
//! z, for as long as the corresponding dimension has bits left. For non power-of-two textures
//! part of that padded address space is never backed by memory.

use crate::error::{Result, TextureError};

/// `ceil(log2(value))`, with `ceil_log2(0) == ceil_log2(1) == 0`.
pub fn ceil_log2(value: u32) -> u32 {
    if value <= 1 {
        0
    } else {
        u32::BITS - (value - 1).leading_zeros()
    }
}

/// Element index of `(x, y, z)` inside a swizzled cuboid.
///
/// `log2_*` are the bit widths of the padded dimensions (see [`ceil_log2`]).
pub fn z_index(
    mut x: u32,
    mut y: u32,
    mut z: u32,
    mut log2_width: u32,
    mut log2_height: u32,
    mut log2_depth: u32,
) -> u64 {
    let mut offset = 0u64;
    let mut shift = 0u32;

    while log2_width | log2_height | log2_depth != 0 {
        if log2_width != 0 {
            offset |= u64::from(x & 1) << shift;
            x >>= 1;
            shift += 1;
            log2_width -= 1;
        }
        if log2_height != 0 {
            offset |= u64::from(y & 1) << shift;
            y >>= 1;
            shift += 1;
            log2_height -= 1;
        }
        if log2_depth != 0 {
            offset |= u64::from(z & 1) << shift;
            z >>= 1;
            shift += 1;
            log2_depth -= 1;
        }
    }
    offset
}

/// Untiles a swizzled `width×height×depth` cuboid of `group_bytes`-sized elements from `src`
/// into row-major order at the start of `dst`.
///
/// Elements whose swizzled address falls outside `src` are left as zero. Returns how many were
/// missing so the caller can report it.
pub fn deswizzle_3d(
    src: &[u8],
    dst: &mut [u8],
    group_bytes: usize,
    width: u16,
    height: u16,
    depth: u16,
) -> Result<usize> {
    let (w, h, d) = (usize::from(width), usize::from(height), usize::from(depth));
    let required = [w, h, d, group_bytes]
        .into_iter()
        .try_fold(1usize, |acc, f| acc.checked_mul(f))
        .ok_or(TextureError::SizeOverflow)?;
    if dst.len() < required {
        return Err(TextureError::DestinationTooSmall {
            required,
            available: dst.len(),
        });
    }

    let log2_width = ceil_log2(u32::from(width));
    let log2_height = ceil_log2(u32::from(height));
    let log2_depth = ceil_log2(u32::from(depth));

    let mut missing = 0usize;
    let mut out = dst[..required].chunks_exact_mut(group_bytes.max(1));
    for z in 0..depth {
        for y in 0..height {
            for x in 0..width {
                let Some(group) = out.next() else {
                    return Ok(missing);
                };
                let index = z_index(
                    u32::from(x),
                    u32::from(y),
                    u32::from(z),
                    log2_width,
                    log2_height,
                    log2_depth,
                );
                let start = usize::try_from(index)
                    .ok()
                    .and_then(|i| i.checked_mul(group_bytes));
                match start.and_then(|s| src.get(s..s.checked_add(group_bytes)?)) {
                    Some(bytes) => group.copy_from_slice(bytes),
                    None => {
                        group.fill(0);
                        missing += 1;
                    }
                }
            }
        }
    }
    Ok(missing)
}

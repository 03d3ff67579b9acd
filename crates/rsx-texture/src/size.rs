//! Storage size of whole textures, without materializing their layout.

use tracing::error;

use crate::descriptor::TextureDescriptor;
use crate::error::{Result, TextureError};
use crate::format::{packed_pitch, TextureFormat};
use crate::pitch::align_up;

/// Alignment rules for textures placed into a freshly allocated buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementAlignment {
    /// Every mip level row is padded to a multiple of this many bytes.
    pub row_pitch: usize,
    /// Every mip level starts at a multiple of this many bytes.
    pub mipmap: usize,
}

impl Default for PlacementAlignment {
    fn default() -> Self {
        Self {
            row_pitch: 256,
            mipmap: 512,
        }
    }
}

/// Returns the row pitch to use for a linear texture.
///
/// A declared pitch of 0 is only meaningful for 1×1 textures (the texture unit then just returns
/// texel 0). Anything larger is a malformed setup; it is logged and the texture is treated as
/// tightly packed so decoding can still proceed.
fn linear_pitch_or_packed(format: TextureFormat, width: u16, height: u16, pitch: u32) -> u32 {
    if pitch != 0 {
        return pitch;
    }
    if width > 1 || height > 1 {
        error!(
            width,
            height,
            format = format.code(),
            "invalid texture pitch setup, falling back to packed pitch"
        );
    }
    packed_pitch(format, width)
}

fn checked_mul_all(factors: &[usize]) -> Result<usize> {
    factors.iter().try_fold(1usize, |acc, &f| {
        acc.checked_mul(f).ok_or(TextureError::SizeOverflow)
    })
}

/// Native byte size of a texture as laid out in RSX memory.
///
/// Linear textures keep the base level's pitch for every mip level, so lower levels carry row
/// padding. Swizzled textures are packed: every level uses its own tight row length.
#[allow(clippy::too_many_arguments)]
pub fn get_native_texture_size(
    format: TextureFormat,
    packed: bool,
    width: u16,
    height: u16,
    depth: u16,
    pitch: u32,
    mipmaps: u16,
    layers: u16,
) -> Result<usize> {
    let info = format.info();
    let rows_per_line = usize::from(info.texel_rows_per_line);
    let depth = usize::from(depth);

    let internal_height = usize::from(height).div_ceil(rows_per_line);
    let mut size = 0usize;

    if !packed {
        let pitch = linear_pitch_or_packed(format, width, height, pitch) as usize;
        for _layer in 0..layers {
            let mut mip_height = internal_height;
            for _mip in 0..mipmaps {
                if mip_height == 0 {
                    break;
                }
                size = size
                    .checked_add(checked_mul_all(&[pitch, mip_height, depth])?)
                    .ok_or(TextureError::SizeOverflow)?;
                mip_height = (mip_height / 2).max(1);
            }
        }
    } else {
        let texels_per_block = usize::from(info.block_size_in_texel);
        let bytes_per_block = usize::from(info.block_size_in_bytes);
        let internal_width = usize::from(width).div_ceil(texels_per_block);

        for _layer in 0..layers {
            let mut mip_height = internal_height;
            let mut mip_width = internal_width;
            for _mip in 0..mipmaps {
                if mip_height == 0 {
                    break;
                }
                size = size
                    .checked_add(checked_mul_all(&[
                        mip_width,
                        bytes_per_block,
                        mip_height,
                        depth,
                    ])?)
                    .ok_or(TextureError::SizeOverflow)?;
                mip_height = (mip_height / 2).max(1);
                mip_width = (mip_width / 2).max(1);
            }
        }
    }

    if size == 0 {
        return Err(TextureError::ZeroSizedTexture);
    }
    Ok(size)
}

/// Native byte size of the texture described by `desc`, all layers and mip levels included.
pub fn get_texture_size(desc: &TextureDescriptor) -> Result<usize> {
    let format = desc.texture_format()?;
    let extent = desc.extent();
    get_native_texture_size(
        format,
        desc.is_swizzled(),
        extent.width,
        extent.height,
        extent.depth,
        desc.pitch,
        desc.mipmap_count(),
        u16::from(extent.layers),
    )
}

/// Byte size of a texture re-laid out into a placed buffer with the given alignment rules.
///
/// Unlike [`get_native_texture_size`], every parameter must already be non-zero: a zero total is
/// a caller bug and is reported as [`TextureError::ZeroSizedTexture`].
#[allow(clippy::too_many_arguments)]
pub fn get_placed_texture_storage_size(
    width: u16,
    height: u16,
    depth: u32,
    format: u32,
    mipmap: u16,
    cubemap: bool,
    alignment: PlacementAlignment,
) -> Result<usize> {
    let format = TextureFormat::from_raw(format)?;
    let info = format.info();
    let block_edge = usize::from(info.block_size_in_texel);
    let block_size = usize::from(info.block_size_in_bytes);
    let depth = depth as usize;

    let mut height_in_blocks = usize::from(height).div_ceil(block_edge);
    let mut width_in_blocks = usize::from(width).div_ceil(block_edge);

    let mut result = 0usize;
    for _mip in 0..mipmap {
        let row_pitch = align_up(block_size * width_in_blocks, alignment.row_pitch)?;
        let level = align_up(
            checked_mul_all(&[row_pitch, height_in_blocks, depth])?,
            alignment.mipmap,
        )?;
        result = result
            .checked_add(level)
            .ok_or(TextureError::SizeOverflow)?;
        height_in_blocks = (height_in_blocks / 2).max(1);
        width_in_blocks = (width_in_blocks / 2).max(1);
    }

    if result == 0 {
        return Err(TextureError::ZeroSizedTexture);
    }
    result
        .checked_mul(if cubemap { 6 } else { 1 })
        .ok_or(TextureError::SizeOverflow)
}

/// [`get_placed_texture_storage_size`] for a texture descriptor.
pub fn get_placed_texture_storage_size_for(
    desc: &TextureDescriptor,
    alignment: PlacementAlignment,
) -> Result<usize> {
    let extent = desc.extent();
    get_placed_texture_storage_size(
        extent.width,
        extent.height,
        u32::from(extent.depth),
        desc.format,
        desc.mipmap_count(),
        desc.is_cubemap(),
        alignment,
    )
}

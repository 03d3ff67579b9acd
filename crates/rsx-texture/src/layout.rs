//! Subresource planning: where every (layer, mip level) of a texture lives in its source span.

use tracing::error;

use crate::descriptor::TextureDescriptor;
use crate::error::{Result, TextureError};
use crate::format::TextureFormat;
use crate::transcode::{destination_block_size, destination_row_pitch_in_block};

/// Cubemap faces (and array layers in general) start on this boundary.
pub const LAYER_ALIGNMENT: usize = 128;

/// Size of the source word the planner steps over.
///
/// Same as the catalog block size, except for the channel-pair formats whose two texels are
/// fetched as separate 16-bit words.
pub fn source_block_size_in_bytes(format: TextureFormat) -> u8 {
    match format {
        TextureFormat::CompressedB8R8G8R8 | TextureFormat::CompressedR8B8R8G8 => 2,
        _ => format.info().block_size_in_bytes,
    }
}

/// Placement of one subresource inside a texture's source span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubresourceExtent {
    pub layer: u8,
    pub mip_level: u16,
    pub width_in_block: u16,
    pub height_in_block: u16,
    pub depth: u16,
    /// Source row stride in blocks.
    pub pitch_in_block: u32,
    /// Byte offset from the start of the texture.
    pub offset: usize,
    pub len: usize,
}

/// One subresource together with a view of its source bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubresourceLayout<'a> {
    pub layer: u8,
    pub mip_level: u16,
    pub width_in_block: u16,
    pub height_in_block: u16,
    pub depth: u16,
    pub pitch_in_block: u32,
    pub data: &'a [u8],
}

impl SubresourceLayout<'_> {
    /// `width_in_block > pitch_in_block` is the hardware's way of saying "nothing to fetch".
    pub fn is_degenerate(&self) -> bool {
        u32::from(self.width_in_block) > self.pitch_in_block
    }

    /// Minimum destination length for [`crate::upload_texture_subresource`] to decode this
    /// subresource with rows padded to `row_pitch_alignment` bytes.
    pub fn destination_size(&self, format: TextureFormat, row_pitch_alignment: usize) -> Result<usize> {
        let dst_pitch =
            destination_row_pitch_in_block(format, self.width_in_block, row_pitch_alignment)?;
        [
            dst_pitch as usize,
            usize::from(destination_block_size(format)),
            usize::from(self.height_in_block),
            usize::from(self.depth),
        ]
        .into_iter()
        .try_fold(1usize, |acc, f| acc.checked_mul(f))
        .ok_or(TextureError::SizeOverflow)
    }
}

/// Computes the placement of every subresource of `desc`, layer-major then mip level.
///
/// No memory is touched, so this is suitable for validating a texture against a memory budget
/// before fetching it.
pub fn plan_subresources(desc: &TextureDescriptor) -> Result<Vec<SubresourceExtent>> {
    let format = desc.texture_format()?;
    let block_edge = format.info().block_size_in_texel;
    let block_size = u32::from(source_block_size_in_bytes(format));
    let extent = desc.extent();
    let mipmap_count = desc.mipmap_count();
    let padded = !desc.is_swizzled();

    let base_width_in_block = extent.width.div_ceil(u16::from(block_edge));
    let base_height_in_block = extent.height.div_ceil(u16::from(block_edge));

    let padded_pitch_in_block = if !padded {
        0
    } else if desc.pitch == 0 {
        if extent.width > 1 || extent.height > 1 {
            error!(
                width = extent.width,
                height = extent.height,
                format = format.code(),
                "invalid texture pitch setup, falling back to packed pitch"
            );
        }
        u32::from(base_width_in_block)
    } else {
        desc.pitch / block_size
    };

    let mut extents = Vec::with_capacity(usize::from(extent.layers) * usize::from(mipmap_count));
    let mut offset = 0usize;

    for layer in 0..extent.layers {
        let mut width_in_block = base_width_in_block;
        let mut height_in_block = base_height_in_block;

        for mip_level in 0..mipmap_count {
            let pitch_in_block = if padded {
                padded_pitch_in_block
            } else {
                u32::from(width_in_block)
            };

            let len = [
                pitch_in_block as usize,
                block_size as usize,
                usize::from(height_in_block),
                usize::from(extent.depth),
            ]
            .into_iter()
            .try_fold(1usize, |acc, f| acc.checked_mul(f))
            .ok_or(TextureError::SizeOverflow)?;

            extents.push(SubresourceExtent {
                layer,
                mip_level,
                width_in_block,
                height_in_block,
                depth: extent.depth,
                pitch_in_block,
                offset,
                len,
            });

            offset = offset.checked_add(len).ok_or(TextureError::SizeOverflow)?;
            width_in_block = (width_in_block / 2).max(1);
            height_in_block = (height_in_block / 2).max(1);
        }

        offset = crate::pitch::align_up(offset, LAYER_ALIGNMENT)?;
    }

    Ok(extents)
}

/// Bytes from the texture's first texel to the end of its last planned subresource.
///
/// Unlike [`crate::get_texture_size`] this counts the padding that starts every layer on a
/// [`LAYER_ALIGNMENT`] boundary, so a view of this length always satisfies
/// [`get_subresources_layout`].
pub fn planned_source_size(desc: &TextureDescriptor) -> Result<usize> {
    Ok(plan_subresources(desc)?
        .iter()
        .map(|extent| extent.offset + extent.len)
        .max()
        .unwrap_or(0))
}

/// Plans every subresource of `desc` and slices its bytes out of `source`.
///
/// `source` starts at the texture's first texel, as returned by
/// [`TextureDescriptor::source_span`] or any longer view.
pub fn get_subresources_layout<'a>(
    desc: &TextureDescriptor,
    source: &'a [u8],
) -> Result<Vec<SubresourceLayout<'a>>> {
    plan_subresources(desc)?
        .into_iter()
        .map(|extent| {
            let data = extent
                .offset
                .checked_add(extent.len)
                .and_then(|end| source.get(extent.offset..end))
                .ok_or(TextureError::SourceOutOfBounds {
                    offset: extent.offset,
                    len: extent.len,
                    available: source.len(),
                })?;
            Ok(SubresourceLayout {
                layer: extent.layer,
                mip_level: extent.mip_level,
                width_in_block: extent.width_in_block,
                height_in_block: extent.height_in_block,
                depth: extent.depth,
                pitch_in_block: extent.pitch_in_block,
                data,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TextureDimension;
    use crate::format::CELL_GCM_TEXTURE_LN;

    fn dxt1_cube() -> TextureDescriptor {
        TextureDescriptor {
            format: TextureFormat::CompressedDxt1.code(),
            dimension: TextureDimension::Cubemap,
            width: 16,
            height: 16,
            depth: 1,
            mipmap: 3,
            pitch: 0,
            address: 0,
        }
    }

    #[test]
    fn cubemap_faces_are_layer_major_and_aligned() {
        let extents = plan_subresources(&dxt1_cube()).unwrap();
        assert_eq!(extents.len(), 6 * 3);

        // 4x4, 2x2 and 1x1 blocks of 8 bytes = 168, rounded up to 256.
        let face0: Vec<_> = extents.iter().take(3).map(|e| (e.offset, e.len)).collect();
        assert_eq!(face0, vec![(0, 128), (128, 32), (160, 8)]);
        assert_eq!(extents[3].offset, 256);
        assert_eq!(extents[3].layer, 1);
        assert_eq!(extents[3].mip_level, 0);
        for e in &extents {
            assert_eq!(e.pitch_in_block, u32::from(e.width_in_block));
        }
    }

    #[test]
    fn linear_pitch_is_constant_across_levels() {
        let desc = TextureDescriptor {
            format: TextureFormat::A8R8G8B8.code() | CELL_GCM_TEXTURE_LN,
            dimension: TextureDimension::Texture2d,
            width: 8,
            height: 4,
            depth: 1,
            mipmap: 3,
            pitch: 64,
            address: 0,
        };
        let extents = plan_subresources(&desc).unwrap();
        let shape: Vec<_> = extents
            .iter()
            .map(|e| (e.width_in_block, e.height_in_block, e.pitch_in_block, e.len))
            .collect();
        assert_eq!(shape, vec![(8, 4, 16, 256), (4, 2, 16, 128), (2, 1, 16, 64)]);
    }

    #[test]
    fn linear_zero_pitch_uses_packed_rows() {
        let desc = TextureDescriptor {
            format: TextureFormat::R5G6B5.code() | CELL_GCM_TEXTURE_LN,
            dimension: TextureDimension::Texture2d,
            width: 6,
            height: 2,
            depth: 1,
            mipmap: 1,
            pitch: 0,
            address: 0,
        };
        let extents = plan_subresources(&desc).unwrap();
        assert_eq!(extents[0].pitch_in_block, 6);
        assert_eq!(extents[0].len, 6 * 2 * 2);
    }

    #[test]
    fn channel_pair_formats_step_over_16_bit_words() {
        assert_eq!(source_block_size_in_bytes(TextureFormat::CompressedR8B8R8G8), 2);
        assert_eq!(source_block_size_in_bytes(TextureFormat::X16), 2);
        assert_eq!(source_block_size_in_bytes(TextureFormat::CompressedDxt45), 16);
    }

    #[test]
    fn layouts_borrow_the_planned_bytes() {
        let desc = dxt1_cube();
        let source: Vec<u8> = (0..6 * 256).map(|i| i as u8).collect();
        let layouts = get_subresources_layout(&desc, &source).unwrap();
        assert_eq!(layouts[1].data, &source[128..160]);
        assert_eq!(layouts[16].data, &source[5 * 256 + 128..5 * 256 + 160]);

        assert_eq!(
            get_subresources_layout(&desc, &source[..5 * 256 + 150]),
            Err(TextureError::SourceOutOfBounds {
                offset: 5 * 256 + 128,
                len: 32,
                available: 5 * 256 + 150,
            })
        );
    }

    #[test]
    fn destination_size_accounts_for_row_padding() {
        let desc = TextureDescriptor {
            format: TextureFormat::CompressedB8R8G8R8.code() | CELL_GCM_TEXTURE_LN,
            dimension: TextureDimension::Texture2d,
            width: 6,
            height: 3,
            depth: 1,
            mipmap: 1,
            pitch: 12,
            address: 0,
        };
        let source = [0u8; 36];
        let layouts = get_subresources_layout(&desc, &source).unwrap();
        // Decoded texels are 4 bytes; 6 texels padded to 64 bytes per row.
        assert_eq!(
            layouts[0]
                .destination_size(TextureFormat::CompressedB8R8G8R8, 64)
                .unwrap(),
            64 * 3
        );
    }

    #[test]
    fn unknown_formats_cannot_be_planned() {
        let mut desc = dxt1_cube();
        desc.format = 0x8A;
        assert_eq!(
            plan_subresources(&desc),
            Err(TextureError::UnsupportedFormat { code: 0x8A })
        );
    }
}

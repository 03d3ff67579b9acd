//! Texture descriptors as latched from the RSX texture registers.

use crate::error::{Result, TextureError};
use crate::format::{TextureFormat, CELL_GCM_TEXTURE_LN};
use crate::layout::planned_source_size;

/// Dimensionality of a texture, after the cubemap bit has been folded in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureDimension {
    Texture1d,
    Texture2d,
    Cubemap,
    Texture3d,
}

/// Self-contained description of one texture in RSX memory.
///
/// Fields are stored as the hardware reports them. The RSX ignores unused dimensions and
/// applications sometimes leave them at 0, so consumers go through the normalized accessors
/// ([`Self::extent`], [`Self::mipmap_count`]) rather than reading the raw fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureDescriptor {
    /// Raw format word, including the `LN`/`UN` modifier bits.
    pub format: u32,
    pub dimension: TextureDimension,
    pub width: u16,
    pub height: u16,
    pub depth: u16,
    pub mipmap: u16,
    /// Row pitch in bytes for linear textures. Ignored for swizzled (packed) textures.
    pub pitch: u32,
    /// Offset of the first texel inside the memory view handed to [`Self::source_span`].
    pub address: u32,
}

/// Normalized texel extent of a texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureExtent {
    pub width: u16,
    pub height: u16,
    pub depth: u16,
    pub layers: u8,
}

impl TextureDescriptor {
    pub fn texture_format(&self) -> Result<TextureFormat> {
        TextureFormat::from_raw(self.format)
    }

    /// Swizzled textures are stored in Morton order with tightly packed rows.
    pub fn is_swizzled(&self) -> bool {
        self.format & CELL_GCM_TEXTURE_LN == 0
    }

    pub fn is_cubemap(&self) -> bool {
        self.dimension == TextureDimension::Cubemap
    }

    pub fn layer_count(&self) -> u8 {
        self.extent().layers
    }

    /// Number of mip levels actually encoded in memory.
    ///
    /// The register value is clamped to the length of the mip chain the extent allows. For DXT
    /// formats the chain ends as soon as either block dimension reaches 1.
    pub fn mipmap_count(&self) -> u16 {
        let extent = self.extent();
        let chain_length = match self.texture_format() {
            Ok(format) if format.is_dxt() => {
                let blocks = (extent.width / 4).min(extent.height / 4).max(1);
                blocks.ilog2() as u16 + 1
            }
            _ => extent.width.max(extent.height).ilog2() as u16 + 1,
        };
        self.mipmap.clamp(1, chain_length)
    }

    pub fn extent(&self) -> TextureExtent {
        let width = self.width.max(1);
        let height = self.height.max(1);
        let depth = self.depth.max(1);

        let (height, depth, layers) = match self.dimension {
            TextureDimension::Texture1d => (1, 1, 1),
            TextureDimension::Texture2d => (height, 1, 1),
            TextureDimension::Cubemap => (height, 1, 6),
            TextureDimension::Texture3d => (height, depth, 1),
        };

        TextureExtent {
            width,
            height,
            depth,
            layers,
        }
    }

    /// Resolves the bytes backing this texture inside `memory`.
    ///
    /// The span runs to the end of the last planned subresource, layer padding included.
    pub fn source_span<'a>(&self, memory: &'a [u8]) -> Result<&'a [u8]> {
        let offset = self.address as usize;
        let len = planned_source_size(self)?;
        let end = offset.checked_add(len).ok_or(TextureError::SizeOverflow)?;
        memory.get(offset..end).ok_or(TextureError::SourceOutOfBounds {
            offset,
            len,
            available: memory.len(),
        })
    }
}

//! Layout planning, storage sizing and linear transcoding of RSX native texture encodings.
//!
//! Textures in RSX memory are described by a [`TextureDescriptor`]. From it this crate can:
//!
//! - split the texture into one [`SubresourceLayout`] per (layer, mip level), each borrowing its
//!   bytes from the caller's memory view;
//! - compute the native storage size of a texture, or the size it needs once re-laid out into a
//!   buffer with row and mip alignment rules;
//! - decode every subresource into linear, host-endian rows with a caller-chosen row alignment,
//!   undoing Morton swizzling, VTC volume tiling and the packed channel formats on the way.
//!
//! Everything is synchronous and stateless. Inputs come from guest memory and are treated as
//! untrusted: malformed setups are either logged and worked around or reported as a
//! [`TextureError`], never a panic.

#![forbid(unsafe_code)]

mod descriptor;
mod endian;
mod error;
pub mod format;
mod layout;
mod pitch;
mod size;
pub mod swizzle;
mod transcode;


pub use crate::descriptor::{TextureDescriptor, TextureDimension, TextureExtent};
pub use crate::endian::{BeU16, BeU32};
pub use crate::error::{Result, TextureError};
pub use crate::format::{
    block_size_in_bytes, block_size_in_texel, packed_pitch, sample_count,
    surface_block_size_in_bytes, texel_rows_per_line, FormatInfo, SurfaceAntialiasing,
    SurfaceColorFormat, TextureFormat, CELL_GCM_TEXTURE_LN, CELL_GCM_TEXTURE_UN,
};
pub use crate::layout::{
    get_subresources_layout, plan_subresources, planned_source_size, source_block_size_in_bytes,
    SubresourceExtent, SubresourceLayout, LAYER_ALIGNMENT,
};
pub use crate::pitch::{align_up, get_row_pitch_in_block};
pub use crate::size::{
    get_native_texture_size, get_placed_texture_storage_size,
    get_placed_texture_storage_size_for, get_texture_size, PlacementAlignment,
};
pub use crate::transcode::{
    decode_pair, destination_block_size, destination_row_pitch_in_block, rgb655_to_rgb565,
    select_strategy, upload_texture_subresource, DecodeStrategy, TranscodeOptions, WordKind,
};

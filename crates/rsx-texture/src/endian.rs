//! Source word types.
//!
//! RSX memory is big-endian. Words that the texture unit reads as numbers are wrapped in
//! [`BeU16`]/[`BeU32`] so that the conversion to host order happens at the point of read and a
//! missing conversion does not type-check. Formats that are copied as opaque bytes (8-bit texels,
//! byte-ordered ARGB, DXT blocks) use the plain host types, for which the conversion is the
//! identity.

use bytemuck::{Pod, Zeroable};

/// A big-endian `u16` as stored in RSX memory.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct BeU16([u8; 2]);

impl BeU16 {
    pub const fn new(value: u16) -> Self {
        Self(value.to_be_bytes())
    }

    pub const fn get(self) -> u16 {
        u16::from_be_bytes(self.0)
    }
}

/// A big-endian `u32` as stored in RSX memory.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct BeU32([u8; 4]);

impl BeU32 {
    pub const fn new(value: u32) -> Self {
        Self(value.to_be_bytes())
    }

    pub const fn get(self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

/// One word of source texture data and its host representation.
pub(crate) trait SourceWord: Pod {
    type Host: Pod;

    /// `true` when the host representation has the same bytes as the source, which allows
    /// whole rows to be copied without looking at individual words.
    const BIT_EXACT: bool;

    fn to_host(self) -> Self::Host;
}

macro_rules! host_order_word {
    ($($ty:ty),*) => {
        $(
            impl SourceWord for $ty {
                type Host = $ty;
                const BIT_EXACT: bool = true;

                fn to_host(self) -> $ty {
                    self
                }
            }
        )*
    };
}

host_order_word!(u8, u16, u32, u64, u128);

impl SourceWord for BeU16 {
    type Host = u16;
    const BIT_EXACT: bool = false;

    fn to_host(self) -> u16 {
        self.get()
    }
}

impl SourceWord for BeU32 {
    type Host = u32;
    const BIT_EXACT: bool = false;

    fn to_host(self) -> u32 {
        self.get()
    }
}

/// Reads the `index`-th word of type `W` from an unaligned byte slice.
///
/// Returns `None` when the word is not fully contained in `bytes`.
pub(crate) fn read_word<W: Pod>(bytes: &[u8], index: usize) -> Option<W> {
    let size = std::mem::size_of::<W>();
    let start = index.checked_mul(size)?;
    let end = start.checked_add(size)?;
    bytes.get(start..end).map(bytemuck::pod_read_unaligned)
}

/// Writes `value` as the `index`-th word of an unaligned byte slice.
pub(crate) fn write_word<W: Pod>(bytes: &mut [u8], index: usize, value: W) -> Option<()> {
    let size = std::mem::size_of::<W>();
    let start = index.checked_mul(size)?;
    let end = start.checked_add(size)?;
    bytes
        .get_mut(start..end)?
        .copy_from_slice(bytemuck::bytes_of(&value));
    Some(())
}

//! Bounds-checked backing storage for a leaf node.
//!
//! The source represents a vector as a flexible-array-member struct
//! (`ODIN_vector_structure_t`) read through a raw `void*`. Here the count
//! header and the element bytes are the same owned `Vec<u8>`, but every
//! access goes through these helpers instead of a pointer cast.

extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

/// Number of bytes a [`crate::node::LeafKind::Vector`]'s count header occupies.
pub const VECTOR_HEADER_LEN: usize = 2;

/// Allocate zeroed storage for a scalar of `width` bytes.
pub fn scalar(width: u16) -> Vec<u8> {
    vec![0u8; width as usize]
}

/// Allocate zeroed storage for a fixed array of `max_elements` elements of
/// `width` bytes each (spec.md §3 invariant 3).
pub fn fixed_array(max_elements: u16, width: u16) -> Vec<u8> {
    vec![0u8; max_elements as usize * width as usize]
}

/// Allocate zeroed storage for a vector: a 2-byte little-endian count
/// header followed by room for `max_elements` elements (spec.md §3
/// invariant 2).
pub fn vector(max_elements: u16, width: u16) -> Vec<u8> {
    vec![0u8; VECTOR_HEADER_LEN + max_elements as usize * width as usize]
}

/// Read the vector's stored element count, without clamping to
/// `max_elements` (the caller applies the clamp — spec.md §3, scenario 5).
pub fn vector_count(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

/// Overwrite the vector's count header.
pub fn set_vector_count(bytes: &mut [u8], count: u16) {
    bytes[0..VECTOR_HEADER_LEN].copy_from_slice(&count.to_le_bytes());
}

/// The element bytes following a vector's count header.
pub fn vector_data(bytes: &[u8]) -> &[u8] {
    &bytes[VECTOR_HEADER_LEN..]
}

/// Mutable view of the element bytes following a vector's count header.
pub fn vector_data_mut(bytes: &mut [u8]) -> &mut [u8] {
    &mut bytes[VECTOR_HEADER_LEN..]
}

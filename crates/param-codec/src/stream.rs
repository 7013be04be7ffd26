//! The payload contract of the length-prefixed submessage codec (spec.md
//! §4.8/§6). The varint tag/length framing itself is an external concern —
//! implementers supply a [`ByteSink`]/[`ByteSource`] and drive the generic
//! encoder/decoder their framework provides; this module only fixes what
//! goes *inside* each submessage.

extern crate alloc;

use param_core::node::GroupNode;
use param_core::{lookup, pipeline};
use param_types::{AccessGroup, Error, GlobalId, Result};

/// Submessage field number of the parameter's global id.
pub const FIELD_ID: u32 = 1;
/// Submessage field number of the length-delimited element data.
pub const FIELD_DATA: u32 = 2;

/// A byte sink a submessage encoder writes frames to. Returns `true` only
/// when every byte was accepted — mirrors the source's file-backed sink,
/// which fails the whole write on a short write.
pub trait ByteSink {
    fn write_bytes(&mut self, bytes: &[u8]) -> bool;
}

/// A byte source a submessage decoder reads frames from.
pub trait ByteSource {
    fn read_bytes(&mut self, out: &mut [u8]) -> bool;
    fn bytes_left(&self) -> usize;
}

/// Produce the `data` field content for one parameter's submessage: the raw
/// element bytes, exactly as [`param_core::pipeline::read_into_buffer`]
/// would return them.
pub fn encode_submessage_data(
    node: &param_core::node::ParamNode,
    buf: &mut [u8],
    group: AccessGroup,
) -> Result<usize> {
    pipeline::read_into_buffer(node, buf, group)
}

/// Apply one decoded submessage `{id, data}` to the tree rooted at `root`,
/// triggering the same lookup-and-write sequence as the TLV codec
/// (spec.md §4.7 steps 3-4).
pub fn decode_submessage(root: &GroupNode, id: u32, data: &[u8], group: AccessGroup) -> Result<usize> {
    let node = lookup::by_id(root, GlobalId(id)).ok_or_else(|| {
        tracing::warn!(id, "no parameter for submessage id");
        Error::ParameterNotFound
    })?;
    let leaf = node.as_leaf().ok_or_else(|| {
        tracing::warn!(id, "submessage id resolves to a group, not a leaf");
        Error::ParameterNotFound
    })?;
    pipeline::write(leaf, data, group)
}

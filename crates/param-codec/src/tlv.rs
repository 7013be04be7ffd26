//! The tag-length-value wire codec (spec.md §4.7): `{u32 id, u16 length,
//! payload}`, little-endian, packed, no padding. A `Group` emits no frame of
//! its own — the hierarchy is reconstructed at decode time from id prefixes.

extern crate alloc;

use param_core::node::{GroupNode, Node, ParamNode};
use param_core::{lookup, pipeline};
use param_types::{AccessGroup, Error, GlobalId, Result};

/// Size in bytes of one frame's header.
pub const HEADER_LEN: usize = 6;

/// Encode `node` — a leaf or a whole subtree — into `buf`, returning the
/// number of bytes written.
pub fn encode(node: &Node, buf: &mut [u8], group: AccessGroup) -> Result<usize> {
    match node {
        Node::Leaf(leaf) => encode_leaf(leaf, buf, group),
        Node::Group(g) => encode_group(g, buf, group),
    }
}

fn encode_group(group: &GroupNode, buf: &mut [u8], access: AccessGroup) -> Result<usize> {
    let mut total = 0;
    for child in group.children() {
        total += encode(child, &mut buf[total..], access)?;
    }
    Ok(total)
}

fn encode_leaf(leaf: &ParamNode, buf: &mut [u8], group: AccessGroup) -> Result<usize> {
    if buf.len() < HEADER_LEN {
        tracing::warn!(parameter = leaf.name(), "buffer too small for a TLV header");
        return Err(Error::SizeMismatch);
    }

    let k = pipeline::read_into_buffer(leaf, &mut buf[HEADER_LEN..], group)?;
    buf[0..4].copy_from_slice(&u32::from(leaf.global_id()).to_le_bytes());
    buf[4..6].copy_from_slice(&(k as u16).to_le_bytes());
    Ok(HEADER_LEN + k)
}

/// Decode a sequence of frames from `buf`, writing each to the matching
/// node found from `root` (spec.md §4.5). Returns the total bytes consumed.
/// An unknown id is always a hard error — the codec never skips a frame.
pub fn decode(root: &GroupNode, buf: &[u8], group: AccessGroup) -> Result<usize> {
    let mut consumed = 0;

    while consumed < buf.len() {
        let remaining = buf.len() - consumed;
        if remaining < HEADER_LEN {
            tracing::warn!(remaining, "truncated TLV header");
            return Err(Error::SizeMismatch);
        }

        let id = u32::from_le_bytes(buf[consumed..consumed + 4].try_into().unwrap());
        let length = u16::from_le_bytes(buf[consumed + 4..consumed + 6].try_into().unwrap()) as usize;

        if remaining < HEADER_LEN + length {
            tracing::warn!(id, length, remaining, "truncated TLV payload");
            return Err(Error::SizeMismatch);
        }

        let payload = &buf[consumed + HEADER_LEN..consumed + HEADER_LEN + length];
        let node = lookup::by_id(root, GlobalId(id)).ok_or_else(|| {
            tracing::warn!(id, "no parameter for TLV frame id");
            Error::ParameterNotFound
        })?;
        let leaf = node.as_leaf().ok_or_else(|| {
            tracing::warn!(id, "TLV frame id resolves to a group, not a leaf");
            Error::ParameterNotFound
        })?;

        pipeline::write(leaf, payload, group)?;
        consumed += HEADER_LEN + length;
    }

    Ok(consumed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use param_core::builder::GroupBuilder;
    use param_core::node::LeafKind;
    use param_core::ParamNode;
    use param_types::{AccessFlags, ElementKind, Operation};

    fn rw() -> AccessFlags {
        AccessFlags::NONE
            .allow_all_groups(Operation::Read)
            .allow_all_groups(Operation::Write)
    }

    fn group0() -> AccessGroup {
        AccessGroup::external(0).unwrap()
    }

    fn scalar(id: u32, kind: ElementKind, name: &str, flags: AccessFlags) -> ParamNode {
        ParamNode::new(
            GlobalId(id),
            LeafKind::Scalar,
            kind,
            kind.width(),
            1,
            flags,
            Some(param_core::storage::scalar(kind.width())),
            name,
            "",
            alloc::vec![],
        )
    }

    /// spec.md §8 scenario 1.
    #[test]
    fn single_u32_round_trips_through_the_wire() {
        let tree = GroupBuilder::new(GlobalId(0x0100_0000), 32, "root")
            .leaf(scalar(0x0100_0000, ElementKind::U32, "x", rw()))
            .unwrap()
            .build()
            .unwrap();
        let node = tree.children()[0].as_leaf().unwrap();
        pipeline::write(node, &[0xDE, 0xAD, 0xBE, 0xEF], group0()).unwrap();

        let mut buf = [0u8; 10];
        let n = encode_leaf(node, &mut buf, group0()).unwrap();
        assert_eq!(n, 10);
        assert_eq!(buf, [0x00, 0x00, 0x00, 0x01, 0x04, 0x00, 0xDE, 0xAD, 0xBE, 0xEF]);

        pipeline::write(node, &[0, 0, 0, 0], group0()).unwrap();
        decode(&tree, &buf, group0()).unwrap();
        let mut out = [0u8; 4];
        pipeline::read(node, &mut out, group0()).unwrap();
        assert_eq!(out, [0xDE, 0xAD, 0xBE, 0xEF]);
    }

    /// spec.md §8 scenario 2.
    #[test]
    fn group_encodes_children_in_left_to_right_order() {
        let a = scalar(0x1000_0000, ElementKind::U8, "a", rw());
        let b = scalar(0x2000_0000, ElementKind::U8, "b", rw());
        pipeline::write(&a, &[0x11], group0()).unwrap();
        pipeline::write(&b, &[0x22], group0()).unwrap();

        let group = GroupBuilder::new(GlobalId(0), 0, "root")
            .leaf(a)
            .unwrap()
            .leaf(b)
            .unwrap()
            .build()
            .unwrap();

        let mut buf = [0u8; 14];
        let root_node = Node::Group(alloc::rc::Rc::new(group));
        let n = encode(&root_node, &mut buf, group0()).unwrap();
        assert_eq!(n, 14);
        assert_eq!(
            buf,
            [0x00, 0x00, 0x00, 0x10, 0x01, 0x00, 0x11, 0x00, 0x00, 0x00, 0x20, 0x01, 0x00, 0x22]
        );
    }

    /// spec.md §8 scenario 3.
    #[test]
    fn decode_of_an_unknown_id_is_parameter_not_found() {
        let group = GroupBuilder::new(GlobalId(0), 0, "root")
            .leaf(scalar(0x1000_0000, ElementKind::U8, "a", rw()))
            .unwrap()
            .build()
            .unwrap();

        let frame = [0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x00, 0x00];
        assert_eq!(decode(&group, &frame, group0()), Err(Error::ParameterNotFound));
    }

    /// spec.md §8 scenario 4.
    #[test]
    fn decode_respects_access_control() {
        let flags = AccessFlags::NONE.allow(0, Operation::Read);
        let node = scalar(0x1000_0000, ElementKind::U8, "a", flags);
        let group = GroupBuilder::new(GlobalId(0), 0, "root").leaf(node).unwrap().build().unwrap();

        let frame = [0x00, 0x00, 0x00, 0x10, 0x01, 0x00, 0x42];
        assert_eq!(decode(&group, &frame, group0()), Err(Error::PermissionDenied));

        let mut out = [0u8; 1];
        let leaf = group.children()[0].as_leaf().unwrap();
        pipeline::read(leaf, &mut out, group0()).unwrap();
        assert_eq!(out, [0]);
    }

    #[test]
    fn encode_into_a_too_small_buffer_is_a_size_mismatch() {
        let node = scalar(0x1000_0000, ElementKind::U32, "a", rw());
        let mut buf = [0u8; 9];
        assert_eq!(encode_leaf(&node, &mut buf, group0()), Err(Error::SizeMismatch));
    }

    #[test]
    fn decode_of_a_truncated_frame_is_a_size_mismatch() {
        let group = GroupBuilder::new(GlobalId(0), 0, "root")
            .leaf(scalar(0x1000_0000, ElementKind::U32, "a", rw()))
            .unwrap()
            .build()
            .unwrap();
        let frame = [0x00, 0x00, 0x00, 0x10, 0x04, 0x00, 0xDE, 0xAD, 0xBE];
        assert_eq!(decode(&group, &frame, group0()), Err(Error::SizeMismatch));
    }
}

//! The human-readable text codec (spec.md §4.10) and the recursive tree
//! dump it's built on (SPEC_FULL.md §14, folding in the source's
//! `ODIN_dump_recursive_tree`/`ODIN_dump_parameter`).

extern crate alloc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{self, Write as _};

use param_core::node::{GroupNode, LeafKind, Node, ParamNode};
use param_core::{numeric, pipeline};
use param_types::{AccessGroup, ElementKind, Error, Result};

/// Render one element's bytes as text, per its kind.
///
/// `Custom` has no kind-level rendering — only a node's own `StringCodec`
/// extension can render it — so this always fails with `NotSupported` for
/// `Custom`; use [`encode_to_text`] for a node, which consults the
/// extension first.
pub fn element_to_text(kind: ElementKind, bytes: &[u8], out: &mut dyn fmt::Write) -> Result<()> {
    if bytes.len() != kind.width() as usize {
        return Err(Error::SizeMismatch);
    }

    let result = match kind {
        ElementKind::Bool => write!(out, "{}", bytes[0] != 0),
        ElementKind::Hex8 => write!(out, "0x{:02x}", bytes[0]),
        ElementKind::U8 => write!(out, "{}", bytes[0]),
        ElementKind::I8 => write!(out, "{}", bytes[0] as i8),
        ElementKind::U16 => write!(out, "{}", u16::from_le_bytes(bytes.try_into().unwrap())),
        ElementKind::I16 => write!(out, "{}", i16::from_le_bytes(bytes.try_into().unwrap())),
        ElementKind::U32 => write!(out, "{}", u32::from_le_bytes(bytes.try_into().unwrap())),
        ElementKind::I32 => write!(out, "{}", i32::from_le_bytes(bytes.try_into().unwrap())),
        ElementKind::U64 => write!(out, "{}", u64::from_le_bytes(bytes.try_into().unwrap())),
        ElementKind::I64 => write!(out, "{}", i64::from_le_bytes(bytes.try_into().unwrap())),
        ElementKind::F32 => write!(out, "{:.6}", f32::from_le_bytes(bytes.try_into().unwrap())),
        ElementKind::F64 => write!(out, "{:.6}", f64::from_le_bytes(bytes.try_into().unwrap())),
        ElementKind::Char => write!(out, "{}", bytes[0] as char),
        ElementKind::Custom { .. } => return Err(Error::NotSupported),
    };
    result.map_err(|_| Error::Error)
}

/// An adapter that truncates writes past `max_len`, appending `...` once.
/// Decouples the bounded-buffer truncation spec.md §4.10 describes from
/// element formatting itself — wrap the sink passed to [`encode_to_text`]
/// in one of these when the destination is a fixed-capacity buffer.
pub struct BoundedWriter<'a> {
    buf: &'a mut String,
    max_len: usize,
    truncated: bool,
}

impl<'a> BoundedWriter<'a> {
    pub fn new(buf: &'a mut String, max_len: usize) -> Self {
        BoundedWriter {
            buf,
            max_len,
            truncated: false,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl<'a> fmt::Write for BoundedWriter<'a> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }
        let remaining = self.max_len.saturating_sub(self.buf.len());
        if s.len() <= remaining {
            self.buf.push_str(s);
            return Ok(());
        }
        let marker = "...";
        let keep = remaining.saturating_sub(marker.len());
        let mut boundary = keep.min(s.len());
        while boundary > 0 && !s.is_char_boundary(boundary) {
            boundary -= 1;
        }
        self.buf.push_str(&s[..boundary]);
        self.buf.push_str(marker);
        self.truncated = true;
        Ok(())
    }
}

fn read_node_bytes(node: &ParamNode, group: AccessGroup) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; node.max_data_size()];
    let len = pipeline::read_into_buffer(node, &mut bytes, group)?;
    bytes.truncate(len);
    Ok(bytes)
}

/// Render `node`'s current value as text (spec.md §4.10).
pub fn encode_to_text(node: &ParamNode, out: &mut dyn fmt::Write, group: AccessGroup) -> Result<()> {
    if let ElementKind::Custom { .. } = node.element_kind() {
        let codec = node.string_codec().ok_or(Error::NotSupported)?;
        let bytes = read_node_bytes(node, group)?;
        return codec.to_text(node, &bytes, out);
    }

    match node.kind() {
        LeafKind::Scalar => {
            let bytes = read_node_bytes(node, group)?;
            element_to_text(node.element_kind(), &bytes, out)
        }
        LeafKind::FixedArray | LeafKind::Vector if node.element_kind() == ElementKind::Char => {
            let bytes = read_node_bytes(node, group)?;
            write!(out, "\"").map_err(|_| Error::Error)?;
            for &b in &bytes {
                write!(out, "{}", b as char).map_err(|_| Error::Error)?;
            }
            write!(out, "\"").map_err(|_| Error::Error)
        }
        LeafKind::FixedArray | LeafKind::Vector => {
            let bytes = read_node_bytes(node, group)?;
            let width = node.element_width() as usize;
            write!(out, "[").map_err(|_| Error::Error)?;
            for (i, chunk) in bytes.chunks(width).enumerate() {
                if i > 0 {
                    write!(out, ", ").map_err(|_| Error::Error)?;
                }
                element_to_text(node.element_kind(), chunk, out)?;
            }
            write!(out, "]").map_err(|_| Error::Error)
        }
    }
}

/// Parse `text` and write it to `node` (spec.md §4.10). Only scalars are
/// supported; arrays and vectors fail with `NotSupported`.
pub fn decode_from_text(node: &ParamNode, text: &str, group: AccessGroup) -> Result<()> {
    if node.kind() != LeafKind::Scalar {
        return Err(Error::NotSupported);
    }

    if let ElementKind::Custom { .. } = node.element_kind() {
        let codec = node.string_codec().ok_or(Error::NotSupported)?;
        let mut bytes = vec![0u8; node.element_width() as usize];
        codec.from_text(node, text, &mut bytes)?;
        pipeline::write(node, &bytes, group)?;
        return Ok(());
    }

    let kind = node.element_kind();
    let mut bytes = vec![0u8; kind.width() as usize];

    match kind {
        ElementKind::Bool => bytes[0] = (text == "true") as u8,
        ElementKind::Hex8 => {
            let digits = text.strip_prefix("0x").unwrap_or(text);
            bytes[0] = u8::from_str_radix(digits, 16).map_err(|_| Error::InvalidArgument)?;
        }
        ElementKind::Char => bytes[0] = text.chars().next().ok_or(Error::InvalidArgument)? as u8,
        _ => {
            let value: f64 = text.parse().map_err(|_| Error::InvalidArgument)?;
            numeric::decode_from_float(kind, &mut bytes, value)?;
        }
    }

    pipeline::write(node, &bytes, group)
}

/// Walk `root` depth-first, rendering each leaf as `path = text` and each
/// group as a bare header line (the source's `ODIN_dump_recursive_tree`,
/// generalized from a `printf_like` function pointer to a `fmt::Write`
/// sink).
pub fn dump_tree(root: &GroupNode, group: AccessGroup, out: &mut dyn fmt::Write) -> Result<()> {
    dump_group(root, "", group, out)
}

fn dump_group(node: &GroupNode, prefix: &str, group: AccessGroup, out: &mut dyn fmt::Write) -> Result<()> {
    for child in node.children() {
        let path = if prefix.is_empty() {
            String::from(child.name())
        } else {
            alloc::format!("{prefix}.{}", child.name())
        };
        match child {
            Node::Leaf(leaf) => {
                write!(out, "{path} = ").map_err(|_| Error::Error)?;
                match encode_to_text(leaf, out, group) {
                    Ok(()) => writeln!(out).map_err(|_| Error::Error)?,
                    Err(e) => writeln!(out, "<{e}>").map_err(|_| Error::Error)?,
                }
            }
            Node::Group(subgroup) => {
                writeln!(out, "{path}:").map_err(|_| Error::Error)?;
                dump_group(subgroup, &path, group, out)?;
            }
        }
    }
    Ok(())
}

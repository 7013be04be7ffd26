//! Constructs a validated [`GroupNode`] tree, replacing the source's
//! hand-laid static tables (SPEC_FULL.md §12).
//!
//! A [`GroupBuilder`] fails fast with a descriptive [`Error`] rather than
//! panicking or letting a malformed tree reach the lookup/pipeline code.

extern crate alloc;
use alloc::collections::BTreeSet;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use param_types::{Error, GlobalId, Result};

use crate::node::{GroupNode, LeafKind, Node, ParamNode};

/// Builds one [`GroupNode`] and validates its direct children as they're
/// added. `shift` is the per-level number of high-order id bits *this*
/// group contributes (spec.md §3/§4.5), not a cumulative one: it is the
/// window this group uses to distinguish its own children from each other,
/// so a child's id is free to vary within it. `parent_shift` — the bits
/// already fixed by this group's ancestors, threaded in by
/// [`GroupBuilder::nested`] — is what a child's id must agree with;
/// [`GroupBuilder::cumulative_shift`] hands that sum down to a nested
/// child builder the way the source threads `parent_shift` through
/// `ODIN_get_generic_parameter_by_id`.
pub struct GroupBuilder {
    global_id: GlobalId,
    shift: u8,
    parent_shift: u8,
    name: String,
    children: Vec<Node>,
    seen_names: BTreeSet<String>,
    seen_ids: BTreeSet<u32>,
}

impl GroupBuilder {
    /// Build a root-level group: no ancestor has fixed any high-order bits.
    pub fn new(global_id: GlobalId, shift: u8, name: impl Into<String>) -> Self {
        Self::nested(global_id, shift, name, 0)
    }

    /// Build a group nested under a parent that has already fixed
    /// `parent_shift` high-order id bits (the parent's own
    /// [`cumulative_shift`](Self::cumulative_shift)).
    pub fn nested(global_id: GlobalId, shift: u8, name: impl Into<String>, parent_shift: u8) -> Self {
        GroupBuilder {
            global_id,
            shift,
            parent_shift,
            name: name.into(),
            children: Vec::new(),
            seen_names: BTreeSet::new(),
            seen_ids: BTreeSet::new(),
        }
    }

    /// The total number of high-order id bits fixed by this group and its
    /// ancestors combined — the `parent_shift` a builder for one of this
    /// group's own children should be constructed with.
    pub fn cumulative_shift(&self) -> u8 {
        self.parent_shift + self.shift
    }

    /// Add a leaf. Rejects a leaf whose id doesn't share the prefix already
    /// fixed by this group's ancestors, whose storage size disagrees with
    /// its declared shape, or whose name/id repeats an existing sibling.
    pub fn leaf(mut self, leaf: ParamNode) -> Result<Self> {
        self.check_prefix(leaf.global_id())?;
        self.check_shape(&leaf)?;
        self.reserve_sibling(leaf.global_id(), leaf.name())?;
        self.children.push(Node::Leaf(Rc::new(leaf)));
        Ok(self)
    }

    /// Add an already-built subgroup. Rejects a subgroup whose id falls
    /// outside the prefix this group's ancestors have fixed, or whose
    /// name/id repeats an existing sibling.
    pub fn group(mut self, group: GroupNode) -> Result<Self> {
        self.check_prefix(group.global_id())?;
        self.reserve_sibling(group.global_id(), group.name())?;
        self.children.push(Node::Group(Rc::new(group)));
        Ok(self)
    }

    /// A child's id must agree with this group's own id on the bits already
    /// fixed by this group's ancestors (`parent_shift`). This group's own
    /// `shift` window is exactly what's left free to distinguish children
    /// from one another, so it is deliberately excluded from this check.
    fn check_prefix(&self, candidate: GlobalId) -> Result<()> {
        if !candidate.matches_prefix(self.global_id, self.parent_shift) {
            return Err(Error::InvalidArgument);
        }
        Ok(())
    }

    fn check_shape(&self, leaf: &ParamNode) -> Result<()> {
        if leaf.element_width() != leaf.element_kind().width() {
            return Err(Error::SizeMismatch);
        }
        match leaf.kind() {
            LeafKind::Scalar => {
                if leaf.max_elements() != 1 {
                    return Err(Error::InvalidArgument);
                }
            }
            LeafKind::FixedArray | LeafKind::Vector => {
                if leaf.max_elements() == 0 {
                    return Err(Error::InvalidArgument);
                }
            }
        }
        let expected_storage = leaf.storage().map(|s| s.borrow().len());
        if let Some(len) = expected_storage {
            let header = if leaf.kind() == LeafKind::Vector {
                crate::storage::VECTOR_HEADER_LEN
            } else {
                0
            };
            if len != header + leaf.max_data_size() {
                return Err(Error::SizeMismatch);
            }
        }
        Ok(())
    }

    fn reserve_sibling(&mut self, id: GlobalId, name: &str) -> Result<()> {
        if !self.seen_ids.insert(id.0) {
            return Err(Error::InvalidArgument);
        }
        if !self.seen_names.insert(String::from(name)) {
            return Err(Error::InvalidArgument);
        }
        Ok(())
    }

    pub fn build(self) -> Result<GroupNode> {
        Ok(GroupNode::new(self.global_id, self.shift, self.name, self.children))
    }
}

//! The parameter tree: typed leaf cells and the groups that hold them.

extern crate alloc;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use param_types::{AccessFlags, ElementKind, GlobalId};

use crate::extension::Extension;

/// The three leaf shapes a [`ParamNode`] can take (`Group` lives in
/// [`GroupNode`] instead, since it carries children rather than element
/// storage).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    /// One element.
    Scalar,
    /// Exactly `max_elements` elements, no count header.
    FixedArray,
    /// Up to `max_elements` elements, with a 16-bit count header.
    Vector,
}

/// A typed, permission-tagged cell in the registry, backed by raw memory or
/// serviced entirely by an IO extension (spec.md §3).
pub struct ParamNode {
    global_id: GlobalId,
    kind: LeafKind,
    element_kind: ElementKind,
    element_width: u16,
    max_elements: u16,
    flags: AccessFlags,
    storage: Option<RefCell<Vec<u8>>>,
    name: String,
    description: String,
    extensions: Vec<Extension>,
}

impl ParamNode {
    /// Build a leaf node. Callers normally go through [`crate::builder::GroupBuilder`],
    /// which additionally checks the id-prefix invariant against its parent group.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        global_id: GlobalId,
        kind: LeafKind,
        element_kind: ElementKind,
        element_width: u16,
        max_elements: u16,
        flags: AccessFlags,
        storage: Option<Vec<u8>>,
        name: impl Into<String>,
        description: impl Into<String>,
        extensions: Vec<Extension>,
    ) -> Self {
        ParamNode {
            global_id,
            kind,
            element_kind,
            element_width,
            max_elements,
            flags,
            storage: storage.map(RefCell::new),
            name: name.into(),
            description: description.into(),
            extensions,
        }
    }

    pub fn global_id(&self) -> GlobalId {
        self.global_id
    }

    pub fn kind(&self) -> LeafKind {
        self.kind
    }

    pub fn element_kind(&self) -> ElementKind {
        self.element_kind
    }

    pub fn element_width(&self) -> u16 {
        self.element_width
    }

    pub fn max_elements(&self) -> u16 {
        self.max_elements
    }

    pub fn flags(&self) -> AccessFlags {
        self.flags
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The node's backing storage, or `None` if every access must go
    /// through an IO extension.
    pub(crate) fn storage(&self) -> Option<&RefCell<Vec<u8>>> {
        self.storage.as_ref()
    }

    /// The first extension of `predicate`'s type in chain order, if any
    /// (spec.md §3 invariant 5: at most one extension of each type is
    /// consulted per operation).
    pub(crate) fn find_extension<'a, T>(&'a self, pick: impl Fn(&'a Extension) -> Option<T>) -> Option<T> {
        self.extensions.iter().find_map(pick)
    }

    /// This node's `StringCodec` extension, if any — consulted by the text
    /// codec for `Custom`-kind elements (spec.md §4.10).
    pub fn string_codec(&self) -> Option<&dyn crate::extension::StringCodec> {
        self.find_extension(|e| e.as_string_codec())
    }

    /// The number of elements currently stored, already clamped to
    /// `max_elements` (spec.md §4.4 step 5 / §8 scenario 5).
    pub fn effective_element_count(&self) -> u16 {
        match self.kind {
            LeafKind::Scalar => 1,
            LeafKind::FixedArray => self.max_elements,
            LeafKind::Vector => {
                let count = self
                    .storage
                    .as_ref()
                    .map(|s| crate::storage::vector_count(&s.borrow()))
                    .unwrap_or(0);
                count.min(self.max_elements)
            }
        }
    }

    /// The size in bytes of the data currently held (`ODIN_get_data_size`).
    pub fn data_size(&self) -> usize {
        self.effective_element_count() as usize * self.element_width as usize
    }

    /// The maximum possible size in bytes this node could ever report
    /// (`ODIN_get_max_data_size`).
    pub fn max_data_size(&self) -> usize {
        match self.kind {
            LeafKind::Scalar => self.element_width as usize,
            LeafKind::FixedArray | LeafKind::Vector => self.max_elements as usize * self.element_width as usize,
        }
    }
}

/// A named, ordered sequence of child nodes. Contributes `shift` bits of the
/// global id at this level of the tree (spec.md §3/§4.5) — not cumulative;
/// [`lookup::by_id`](crate::lookup::by_id) and [`GroupBuilder`](crate::builder::GroupBuilder)
/// sum each level's own `shift` against the bits already fixed by its
/// ancestors, mirroring the source's `parent_shift` accumulation.
pub struct GroupNode {
    global_id: GlobalId,
    shift: u8,
    name: String,
    children: Vec<Node>,
}

impl GroupNode {
    pub(crate) fn new(global_id: GlobalId, shift: u8, name: impl Into<String>, children: Vec<Node>) -> Self {
        GroupNode {
            global_id,
            shift,
            name: name.into(),
            children,
        }
    }

    pub fn global_id(&self) -> GlobalId {
        self.global_id
    }

    pub fn shift(&self) -> u8 {
        self.shift
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

/// Either shape a child of a [`GroupNode`] can take.
#[derive(Clone)]
pub enum Node {
    Leaf(Rc<ParamNode>),
    Group(Rc<GroupNode>),
}

impl Node {
    pub fn global_id(&self) -> GlobalId {
        match self {
            Node::Leaf(p) => p.global_id(),
            Node::Group(g) => g.global_id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Leaf(p) => p.name(),
            Node::Group(g) => g.name(),
        }
    }

    pub fn as_leaf(&self) -> Option<&Rc<ParamNode>> {
        match self {
            Node::Leaf(p) => Some(p),
            Node::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Rc<GroupNode>> {
        match self {
            Node::Group(g) => Some(g),
            Node::Leaf(_) => None,
        }
    }
}

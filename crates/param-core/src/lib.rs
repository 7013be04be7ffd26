//! The parameter/group node model, access control, extension dispatch and
//! the read/write/lookup operations built on top of them.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod builder;
pub mod extension;
pub mod lookup;
pub mod node;
pub mod numeric;
pub mod pipeline;
pub mod storage;

pub use builder::GroupBuilder;
pub use extension::{Extension, IoHandler, MappedScalar, RangeValidator, StringCodec, Validator};
pub use node::{GroupNode, LeafKind, Node, ParamNode};

pub use param_types::{AccessFlags, AccessGroup, ElementKind, Error, GlobalId, Operation, Result};

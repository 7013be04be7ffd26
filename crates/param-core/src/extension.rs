//! Pluggable validation, IO-override and text-codec capabilities.
//!
//! The source models an extension as `{type, void *ops, void *data, next}`
//! and casts `ops` by hand according to `type`. Here the type tag and its
//! operations are the same value: a tagged sum of trait objects, so there is
//! nothing to cast (spec.md §9 design note).

extern crate alloc;
use alloc::boxed::Box;
use alloc::rc::Rc;

use param_types::{AccessGroup, Result};

use crate::node::ParamNode;
use crate::numeric;

/// Validates a value before it is written, without mutating storage.
pub trait Validator {
    /// Inspect the would-be write and accept or reject it.
    fn validate(&self, node: &ParamNode, data: &[u8], group: AccessGroup) -> Result<()>;
}

/// Fully replaces the default memcpy read/write for a node.
pub trait IoHandler {
    fn read(&self, node: &ParamNode, out: &mut [u8], group: AccessGroup) -> Result<usize>;
    fn write(&self, node: &ParamNode, data: &[u8], group: AccessGroup) -> Result<usize>;
}

/// Renders/parses a `Custom`-kind element to and from text; consulted only
/// by the text codec (spec.md §4.10).
pub trait StringCodec {
    fn to_text(&self, node: &ParamNode, data: &[u8], out: &mut dyn core::fmt::Write) -> Result<()>;
    fn from_text(&self, node: &ParamNode, text: &str, out: &mut [u8]) -> Result<()>;
}

/// One extension in a node's chain.
pub enum Extension {
    Validate(Box<dyn Validator>),
    Io(Box<dyn IoHandler>),
    StringCodec(Box<dyn StringCodec>),
}

impl Extension {
    pub(crate) fn as_validator(&self) -> Option<&dyn Validator> {
        match self {
            Extension::Validate(v) => Some(v.as_ref()),
            _ => None,
        }
    }

    pub(crate) fn as_io(&self) -> Option<&dyn IoHandler> {
        match self {
            Extension::Io(v) => Some(v.as_ref()),
            _ => None,
        }
    }

    pub(crate) fn as_string_codec(&self) -> Option<&dyn StringCodec> {
        match self {
            Extension::StringCodec(v) => Some(v.as_ref()),
            _ => None,
        }
    }
}

/// Reference IO extension (spec.md §4.3): presents another node's value,
/// scaled and offset, as this node's own.
///
/// `write` goes straight to the reference's storage rather than back
/// through [`crate::pipeline::write`], matching the source's
/// `io_extension.c`: the mapping bypasses the reference's own access
/// control and validators.
pub struct MappedScalar {
    reference: Rc<ParamNode>,
    scale: f64,
    offset: f64,
}

impl MappedScalar {
    pub fn new(reference: Rc<ParamNode>, scale: f64, offset: f64) -> Self {
        MappedScalar {
            reference,
            scale,
            offset,
        }
    }
}

impl IoHandler for MappedScalar {
    fn read(&self, node: &ParamNode, out: &mut [u8], _group: AccessGroup) -> Result<usize> {
        let reference_bytes = self
            .reference
            .storage()
            .ok_or(param_types::Error::InvalidAction)?
            .borrow();
        let value = numeric::encode_to_float(self.reference.element_kind(), &reference_bytes)?;
        let value = value * self.scale + self.offset;
        numeric::decode_from_float(node.element_kind(), out, value)?;
        Ok(out.len())
    }

    fn write(&self, node: &ParamNode, data: &[u8], _group: AccessGroup) -> Result<usize> {
        let value = numeric::encode_to_float(node.element_kind(), data)?;
        let value = (value - self.offset) / self.scale;
        let mut reference_bytes = self
            .reference
            .storage()
            .ok_or(param_types::Error::InvalidAction)?
            .borrow_mut();
        numeric::decode_from_float(self.reference.element_kind(), &mut reference_bytes, value)?;
        Ok(data.len())
    }
}

/// Reference Validate extension (spec.md §4.3): rejects writes whose
/// numeric-carrier value falls outside `[min, max]`.
pub struct RangeValidator {
    pub min: f64,
    pub max: f64,
}

impl Validator for RangeValidator {
    fn validate(&self, node: &ParamNode, data: &[u8], _group: AccessGroup) -> Result<()> {
        let value = numeric::encode_to_float(node.element_kind(), data)?;
        if value < self.min || value > self.max {
            return Err(param_types::Error::Validation);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::LeafKind;
    use param_types::{AccessFlags, ElementKind, GlobalId};

    fn scalar_f32(id: u32, value: f32) -> Rc<ParamNode> {
        let mut bytes = crate::storage::scalar(4);
        bytes.copy_from_slice(&value.to_le_bytes());
        Rc::new(ParamNode::new(
            GlobalId(id),
            LeafKind::Scalar,
            ElementKind::F32,
            4,
            1,
            AccessFlags::NONE.allow_all_groups(param_types::Operation::Read).allow_all_groups(param_types::Operation::Write),
            Some(bytes),
            "x",
            "",
            alloc::vec![],
        ))
    }

    #[test]
    fn mapped_scalar_reads_the_scaled_reference() {
        let reference = scalar_f32(1, 3.0);
        let mapped = MappedScalar::new(reference.clone(), 2.0, 1.0);
        let node = scalar_f32(2, 0.0);

        let mut out = [0u8; 4];
        let group = AccessGroup::external(0).unwrap();
        mapped.read(&node, &mut out, group).unwrap();
        assert_eq!(f32::from_le_bytes(out), 7.0);
    }

    #[test]
    fn mapped_scalar_write_updates_the_reference() {
        let reference = scalar_f32(1, 0.0);
        let mapped = MappedScalar::new(reference.clone(), 2.0, 1.0);
        let node = scalar_f32(2, 0.0);

        let data = 11.0f32.to_le_bytes();
        let group = AccessGroup::external(0).unwrap();
        mapped.write(&node, &data, group).unwrap();

        let stored = f32::from_le_bytes(reference.storage().unwrap().borrow().as_slice().try_into().unwrap());
        assert_eq!(stored, 5.0);
    }

    #[test]
    fn range_validator_accepts_bounds_and_rejects_outside() {
        let validator = RangeValidator { min: 0.0, max: 10.0 };
        let node = scalar_f32(1, 0.0);
        let group = AccessGroup::external(0).unwrap();

        assert!(validator.validate(&node, &0.0f32.to_le_bytes(), group).is_ok());
        assert!(validator.validate(&node, &10.0f32.to_le_bytes(), group).is_ok());
        assert_eq!(
            validator.validate(&node, &10.1f32.to_le_bytes(), group),
            Err(param_types::Error::Validation)
        );
        assert_eq!(
            validator.validate(&node, &(-0.1f32).to_le_bytes(), group),
            Err(param_types::Error::Validation)
        );
    }
}

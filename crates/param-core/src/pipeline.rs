//! The read/write pipeline (spec.md §4.4): validation, extension dispatch,
//! then a bounds-checked copy against the node's backing storage.

use param_types::{AccessGroup, Error, Operation, Result};

use crate::node::{LeafKind, ParamNode};
use crate::storage;

/// `allowed(node, group, op)` (spec.md §4.1).
pub fn check_access(node: &ParamNode, group: AccessGroup, op: Operation) -> bool {
    node.flags().check(group, op)
}

/// `validate_access`: returns [`Error::PermissionDenied`] when denied,
/// logging the refusal the way the source's `printf` call did.
pub fn validate_access(node: &ParamNode, group: AccessGroup, op: Operation) -> Result<()> {
    if !check_access(node, group, op) {
        tracing::warn!(parameter = node.name(), ?op, "permission denied");
        return Err(Error::PermissionDenied);
    }
    Ok(())
}

/// Read a node's current value into `out` (spec.md §4.4).
pub fn read(node: &ParamNode, out: &mut [u8], group: AccessGroup) -> Result<usize> {
    validate_access(node, group, Operation::Read)?;

    if let Some(io) = node.find_extension(|e| e.as_io()) {
        return io.read(node, out, group);
    }

    let storage = node.storage().ok_or_else(|| {
        tracing::warn!(parameter = node.name(), "read of a node with no storage and no IO extension");
        Error::InvalidAction
    })?;

    let effective_len = node.data_size();
    let ok_len = match node.kind() {
        LeafKind::Vector => out.len() >= effective_len,
        LeafKind::Scalar | LeafKind::FixedArray => out.len() == effective_len,
    };
    if !ok_len {
        tracing::warn!(parameter = node.name(), out_len = out.len(), effective_len, "size mismatch on read");
        return Err(Error::SizeMismatch);
    }

    let bytes = storage.borrow();
    let source = match node.kind() {
        LeafKind::Vector => storage::vector_data(&bytes),
        LeafKind::Scalar | LeafKind::FixedArray => &bytes[..],
    };
    out[..effective_len].copy_from_slice(&source[..effective_len]);
    Ok(effective_len)
}

/// Write `data` as a node's new value (spec.md §4.4).
pub fn write(node: &ParamNode, data: &[u8], group: AccessGroup) -> Result<usize> {
    validate_access(node, group, Operation::Write)?;

    if let Some(validator) = node.find_extension(|e| e.as_validator()) {
        validator.validate(node, data, group).map_err(|e| {
            tracing::warn!(parameter = node.name(), error = ?e, "extension validation failed");
            e
        })?;
    }

    if let Some(io) = node.find_extension(|e| e.as_io()) {
        return io.write(node, data, group);
    }

    let storage = node.storage().ok_or_else(|| {
        tracing::warn!(parameter = node.name(), "write to a node with no storage and no IO extension");
        Error::InvalidAction
    })?;

    let width = node.element_width() as usize;
    let max_write = node.max_data_size();

    match node.kind() {
        LeafKind::Vector => {
            if data.len() > max_write {
                tracing::warn!(parameter = node.name(), len = data.len(), max_write, "write too large");
                return Err(Error::SizeMismatch);
            }
            if width == 0 || data.len() % width != 0 {
                tracing::warn!(parameter = node.name(), len = data.len(), width, "write not a multiple of element width");
                return Err(Error::SizeMismatch);
            }
            let mut bytes = storage.borrow_mut();
            storage::vector_data_mut(&mut bytes)[..data.len()].copy_from_slice(data);
            storage::set_vector_count(&mut bytes, (data.len() / width) as u16);
        }
        LeafKind::Scalar | LeafKind::FixedArray => {
            if data.len() != max_write {
                tracing::warn!(parameter = node.name(), len = data.len(), max_write, "write size mismatch");
                return Err(Error::SizeMismatch);
            }
            storage.borrow_mut().copy_from_slice(data);
        }
    }

    Ok(data.len())
}

/// Read a single element of a fixed array. No extension is consulted
/// (spec.md §4.4).
pub fn array_read_element(node: &ParamNode, index: u16, out: &mut [u8], group: AccessGroup) -> Result<usize> {
    if node.kind() != LeafKind::FixedArray {
        return Err(Error::InvalidArgument);
    }
    validate_access(node, group, Operation::Read)?;
    array_element_bounds_check(node, index, out.len())?;

    let offset = index as usize * node.element_width() as usize;
    let width = node.element_width() as usize;
    let bytes = node.storage().ok_or(Error::InvalidAction)?.borrow();
    out.copy_from_slice(&bytes[offset..offset + width]);
    Ok(width)
}

/// Write a single element of a fixed array. No extension is consulted
/// (spec.md §4.4).
pub fn array_write_element(node: &ParamNode, index: u16, data: &[u8], group: AccessGroup) -> Result<usize> {
    if node.kind() != LeafKind::FixedArray {
        return Err(Error::InvalidArgument);
    }
    validate_access(node, group, Operation::Write)?;
    array_element_bounds_check(node, index, data.len())?;

    let offset = index as usize * node.element_width() as usize;
    let width = node.element_width() as usize;
    let mut bytes = node.storage().ok_or(Error::InvalidAction)?.borrow_mut();
    bytes[offset..offset + width].copy_from_slice(data);
    Ok(width)
}

fn array_element_bounds_check(node: &ParamNode, index: u16, len: usize) -> Result<()> {
    if index >= node.max_elements() {
        return Err(Error::SizeMismatch);
    }
    if len != node.element_width() as usize {
        return Err(Error::SizeMismatch);
    }
    Ok(())
}

/// Convenience wrapper: checks `out.len() >= max_data_size(node)` up front,
/// returning [`Error::BufferTooSmall`] rather than letting [`read`] report a
/// plain size mismatch (spec.md §4.4).
pub fn read_into_buffer(node: &ParamNode, out: &mut [u8], group: AccessGroup) -> Result<usize> {
    if out.len() < node.max_data_size() {
        return Err(Error::BufferTooSmall);
    }
    let effective_len = node.data_size();
    read(node, &mut out[..effective_len], group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::LeafKind;
    use alloc::rc::Rc;
    use param_types::{AccessFlags, ElementKind, GlobalId};

    fn rw_flags() -> AccessFlags {
        AccessFlags::NONE
            .allow_all_groups(Operation::Read)
            .allow_all_groups(Operation::Write)
    }

    fn group0() -> AccessGroup {
        AccessGroup::external(0).unwrap()
    }

    fn scalar_u32(flags: AccessFlags) -> Rc<ParamNode> {
        Rc::new(ParamNode::new(
            GlobalId(1),
            LeafKind::Scalar,
            ElementKind::U32,
            4,
            1,
            flags,
            Some(crate::storage::scalar(4)),
            "x",
            "",
            alloc::vec![],
        ))
    }

    #[test]
    fn scalar_write_then_read_round_trips() {
        let node = scalar_u32(rw_flags());
        let bytes = [0xDE, 0xAD, 0xBE, 0xEF];
        write(&node, &bytes, group0()).unwrap();

        let mut out = [0u8; 4];
        let n = read(&node, &mut out, group0()).unwrap();
        assert_eq!(n, 4);
        assert_eq!(out, bytes);
    }

    #[test]
    fn read_or_write_without_grant_is_denied_and_storage_is_untouched() {
        let node = scalar_u32(AccessFlags::NONE.allow(0, Operation::Read));
        let group = group0();

        assert_eq!(write(&node, &[1, 2, 3, 4], group), Err(Error::PermissionDenied));
        let mut out = [0xAAu8; 4];
        assert_eq!(read(&node, &mut out, group), Ok(4));
        assert_eq!(out, [0, 0, 0, 0]);
    }

    #[test]
    fn scalar_size_mismatch_on_wrong_length() {
        let node = scalar_u32(rw_flags());
        assert_eq!(write(&node, &[1, 2, 3], group0()), Err(Error::SizeMismatch));
        let mut out = [0u8; 3];
        assert_eq!(read(&node, &mut out, group0()), Err(Error::SizeMismatch));
    }

    #[test]
    fn vector_write_updates_the_clamped_count() {
        let node = Rc::new(ParamNode::new(
            GlobalId(1),
            LeafKind::Vector,
            ElementKind::U16,
            2,
            4,
            rw_flags(),
            Some(crate::storage::vector(4, 2)),
            "v",
            "",
            alloc::vec![],
        ));

        write(&node, &[1, 0, 2, 0, 3, 0], group0()).unwrap();
        let mut out = [0u8; 6];
        let n = read(&node, &mut out, group0()).unwrap();
        assert_eq!(n, 6);
        assert_eq!(out, [1, 0, 2, 0, 3, 0]);
    }

    #[test]
    fn vector_write_not_a_multiple_of_width_is_rejected() {
        let node = Rc::new(ParamNode::new(
            GlobalId(1),
            LeafKind::Vector,
            ElementKind::U16,
            2,
            4,
            rw_flags(),
            Some(crate::storage::vector(4, 2)),
            "v",
            "",
            alloc::vec![],
        ));
        assert_eq!(write(&node, &[1, 2, 3], group0()), Err(Error::SizeMismatch));
    }

    #[test]
    fn corrupted_vector_count_is_clamped_on_read() {
        let node = Rc::new(ParamNode::new(
            GlobalId(1),
            LeafKind::Vector,
            ElementKind::U16,
            2,
            4,
            rw_flags(),
            Some(crate::storage::vector(4, 2)),
            "v",
            "",
            alloc::vec![],
        ));
        {
            let storage = node.storage().unwrap();
            let mut bytes = storage.borrow_mut();
            crate::storage::set_vector_count(&mut bytes, 9);
        }
        let mut out = [0u8; 8];
        let n = read(&node, &mut out, group0()).unwrap();
        assert_eq!(n, 8);
    }

    #[test]
    fn array_element_read_write_targets_only_its_index() {
        let node = Rc::new(ParamNode::new(
            GlobalId(1),
            LeafKind::FixedArray,
            ElementKind::U8,
            1,
            4,
            rw_flags(),
            Some(crate::storage::fixed_array(4, 1)),
            "a",
            "",
            alloc::vec![],
        ));

        array_write_element(&node, 2, &[0x42], group0()).unwrap();
        let mut out = [0u8; 1];
        array_read_element(&node, 2, &mut out, group0()).unwrap();
        assert_eq!(out, [0x42]);

        array_read_element(&node, 0, &mut out, group0()).unwrap();
        assert_eq!(out, [0]);
    }

    #[test]
    fn array_index_out_of_bounds_is_a_size_mismatch() {
        let node = Rc::new(ParamNode::new(
            GlobalId(1),
            LeafKind::FixedArray,
            ElementKind::U8,
            1,
            4,
            rw_flags(),
            Some(crate::storage::fixed_array(4, 1)),
            "a",
            "",
            alloc::vec![],
        ));
        let mut out = [0u8; 1];
        assert_eq!(array_read_element(&node, 4, &mut out, group0()), Err(Error::SizeMismatch));
    }

    #[test]
    fn read_into_buffer_rejects_a_too_small_buffer() {
        let node = scalar_u32(rw_flags());
        let mut out = [0u8; 3];
        assert_eq!(read_into_buffer(&node, &mut out, group0()), Err(Error::BufferTooSmall));
    }
}

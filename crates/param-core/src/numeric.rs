//! The canonical numeric carrier (spec.md §4.2): every scalar conversion
//! passes through `f64`, the reference implementation's `f32` widened for
//! less precision loss.

use param_types::{ElementKind, Error, Result};

fn check_width(kind: ElementKind, bytes_len: usize) -> Result<()> {
    if bytes_len != kind.width() as usize {
        return Err(Error::SizeMismatch);
    }
    Ok(())
}

/// Reinterpret `bytes` as `kind` and widen it to the canonical float.
///
/// `Bool` round-trips through `0.0` / non-zero (spec.md §4.2); `Char` and
/// `Custom` are not numeric and fail with [`Error::NotSupported`].
pub fn encode_to_float(kind: ElementKind, bytes: &[u8]) -> Result<f64> {
    if !kind.is_numeric() {
        return Err(Error::NotSupported);
    }
    check_width(kind, bytes.len())?;

    Ok(match kind {
        ElementKind::Bool => {
            if bytes[0] != 0 {
                1.0
            } else {
                0.0
            }
        }
        ElementKind::Hex8 | ElementKind::U8 => bytes[0] as f64,
        ElementKind::I8 => bytes[0] as i8 as f64,
        ElementKind::U16 => u16::from_le_bytes(bytes.try_into().unwrap()) as f64,
        ElementKind::I16 => i16::from_le_bytes(bytes.try_into().unwrap()) as f64,
        ElementKind::U32 => u32::from_le_bytes(bytes.try_into().unwrap()) as f64,
        ElementKind::I32 => i32::from_le_bytes(bytes.try_into().unwrap()) as f64,
        ElementKind::U64 => u64::from_le_bytes(bytes.try_into().unwrap()) as f64,
        ElementKind::I64 => i64::from_le_bytes(bytes.try_into().unwrap()) as f64,
        ElementKind::F32 => f32::from_le_bytes(bytes.try_into().unwrap()) as f64,
        ElementKind::F64 => f64::from_le_bytes(bytes.try_into().unwrap()),
        ElementKind::Char | ElementKind::Custom { .. } => unreachable!("filtered above"),
    })
}

/// Write a truncating cast of `value` back into `bytes`, per `kind`.
pub fn decode_from_float(kind: ElementKind, bytes: &mut [u8], value: f64) -> Result<()> {
    if !kind.is_numeric() {
        return Err(Error::NotSupported);
    }
    check_width(kind, bytes.len())?;

    match kind {
        ElementKind::Bool => bytes[0] = (value != 0.0) as u8,
        ElementKind::Hex8 | ElementKind::U8 => bytes[0] = value as u8,
        ElementKind::I8 => bytes[0] = (value as i8) as u8,
        ElementKind::U16 => bytes.copy_from_slice(&(value as u16).to_le_bytes()),
        ElementKind::I16 => bytes.copy_from_slice(&(value as i16).to_le_bytes()),
        ElementKind::U32 => bytes.copy_from_slice(&(value as u32).to_le_bytes()),
        ElementKind::I32 => bytes.copy_from_slice(&(value as i32).to_le_bytes()),
        ElementKind::U64 => bytes.copy_from_slice(&(value as u64).to_le_bytes()),
        ElementKind::I64 => bytes.copy_from_slice(&(value as i64).to_le_bytes()),
        ElementKind::F32 => bytes.copy_from_slice(&(value as f32).to_le_bytes()),
        ElementKind::F64 => bytes.copy_from_slice(&value.to_le_bytes()),
        ElementKind::Char | ElementKind::Custom { .. } => unreachable!("filtered above"),
    }
    Ok(())
}

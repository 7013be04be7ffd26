//! Atomic types shared by the parameter registry: element/node kinds, the
//! access-group and operation bit algebra, the hierarchical id scheme, and
//! the closed set of ABI error codes.
#![cfg_attr(not(feature = "std"), no_std)]

mod access;
mod element;
mod error;
mod id;

pub use access::{AccessFlags, AccessGroup, Operation};
pub use element::ElementKind;
pub use error::Error;
pub use id::GlobalId;

/// `Result` alias used throughout the registry: `Ok(n)` carries a byte count
/// or other non-negative size, matching the source's "non-negative on
/// success" convention without resorting to signed return codes.
pub type Result<T> = core::result::Result<T, Error>;

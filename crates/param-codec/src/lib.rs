//! TLV, length-prefixed stream, schema and text codecs over a parameter
//! tree built with `param-core`.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod schema;
pub mod stream;
pub mod text;
pub mod tlv;

pub use param_types::{Error, Result};

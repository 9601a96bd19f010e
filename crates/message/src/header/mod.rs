//! Header collection shared by every message type.
//!
//! - [`HeaderStore`]: the case-insensitive, display-case-preserving, ordered
//!   store with copy-on-write `with_*` operations
//! - [`HeaderValues`]: the raw value input, one string or a list of strings
//!
//! Conversions to and from `http::HeaderMap` and untyped JSON live in the
//! private `convert` module as `TryFrom` implementations.

mod convert;
mod store;
mod values;

pub use store::HeaderEntry;
pub use store::HeaderStore;
pub use values::HeaderValues;

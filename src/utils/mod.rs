//! Shared utilities.

mod hash;

pub use hash::{content_hash, hash_json_value};

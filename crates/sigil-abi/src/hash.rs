//! Schema content hashing.
//!
//! A schema's identifier is the SHA-256 of its rendered text document,
//! so any change to the field tree, description, or version produces a
//! different id. Attestation records carry this id and callers use it to
//! reject payloads encoded against a different schema revision.

use std::fmt::Write;

use sha2::{Digest, Sha256};
use sigil_schema::Schema;

use crate::text::schema_text;

/// Compute the content id of a schema: SHA-256 of its text document as a
/// 64-character lowercase hex string.
pub fn schema_id(schema: &Schema) -> String {
    hash_bytes(schema_text(schema).as_bytes())
}

/// Hash raw bytes with SHA-256, returning lowercase hex.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex_encode(&hasher.finalize())
}

/// Whether a string is a well-formed schema id (64 hex characters).
pub fn is_valid_schema_id(id: &str) -> bool {
    id.len() == 64 && id.chars().all(|c| c.is_ascii_hexdigit())
}

/// Convert bytes to a lowercase hex string.
pub fn hex_encode(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(hex, "{:02x}", byte);
    }
    hex
}

//! # Sigil Schema
//!
//! Field type system and schema model for Sigil attestations.
//!
//! This crate provides:
//! - The closed [`FieldType`] set, including the two recursive kinds
//!   (tagged unions and nested structures)
//! - [`Schema`] construction with ordered fields
//! - Recursive validation
//!
//! ## Example
//!
//! ```rust
//! use sigil_schema::{validate, FieldType, Schema, SchemaField};
//!
//! let schema = Schema::new("identity_badge", 1)
//!     .with_field(SchemaField::new("holder", FieldType::Address))
//!     .with_field(SchemaField::new("note", FieldType::String));
//!
//! validate(&schema).unwrap();
//! ```

pub mod error;
pub mod types;
pub mod validation;

pub use error::*;
pub use types::*;
pub use validation::*;

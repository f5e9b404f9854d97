//! # Sigil ABI
//!
//! Flat-element ABI, payload serialization, and schema text rendering.
//!
//! This crate provides:
//! - The 32-byte wire [`Element`] and typed payload [`Value`]s
//! - [`StructABI`], the flattened lookup projection of a schema
//! - [`serialize`] / [`deserialize`] between payloads and element
//!   sequences, with a strict round-trip law
//! - [`schema_text`] rendering and [`schema_id`] content hashing
//!
//! ## Example
//!
//! ```rust
//! use sigil_abi::{deserialize, serialize, Address, Value};
//! use sigil_schema::{FieldType, Schema, SchemaField};
//!
//! let schema = Schema::new("note", 1)
//!     .with_field(SchemaField::new("subject", FieldType::Address))
//!     .with_field(SchemaField::new("note", FieldType::String));
//!
//! let payload = vec![
//!     Value::Address(Address::from_low_u64(0xab)),
//!     Value::String("hi".to_string()),
//! ];
//!
//! let elements = serialize(&schema, &payload).unwrap();
//! assert_eq!(deserialize(&schema, &elements).unwrap(), payload);
//! ```

pub mod abi;
pub mod element;
pub mod error;
pub mod hash;
pub mod text;
pub mod wire;

pub use abi::{ABIField, StructABI};
pub use element::{Address, Element, Value, ELEMENT_WIDTH};
pub use error::WireError;
pub use hash::{hash_bytes, is_valid_schema_id, schema_id};
pub use text::schema_text;
pub use wire::{deserialize, serialize};

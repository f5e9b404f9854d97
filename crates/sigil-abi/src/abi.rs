//! Flattened ABI projection of a schema.
//!
//! [`StructABI`] is a lossy, lookup-oriented view: every top-level field
//! becomes one size-annotated [`ABIField`], with nested variant/struct
//! shapes reachable only through the original [`Schema`]. It exists for
//! name lookup and size accounting, not for round-tripping.

use serde::{Deserialize, Serialize};
use sigil_schema::{FieldType, Schema, SchemaField};

/// One flattened field: name, canonical type name, and fixed width
/// (0 for variable-width and recursive kinds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ABIField {
    pub name: String,
    pub type_name: String,
    pub size_bytes: u32,
}

impl ABIField {
    fn from_schema_field(field: &SchemaField) -> Self {
        Self {
            name: field.name.clone(),
            type_name: field.field_type.type_name().to_string(),
            size_bytes: abi_width(field.field_type),
        }
    }
}

/// Width a field contributes to the ABI projection. Recursive kinds
/// project to 0 like variable-width leaves; their shape lives on the
/// schema, not here.
fn abi_width(field_type: FieldType) -> u32 {
    match field_type {
        FieldType::ShortString => 32,
        FieldType::String => 0,
        FieldType::Uint64 => 8,
        FieldType::Uint128 => 16,
        FieldType::Uint256 => 32,
        FieldType::Int64 => 8,
        FieldType::Int128 => 16,
        FieldType::Int256 => 32,
        FieldType::Address => 32,
        FieldType::Bool => 1,
        FieldType::Bytes => 0,
        FieldType::Enum => 0,
        FieldType::Struct => 0,
    }
}

/// The flattened, size-annotated projection of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructABI {
    pub name: String,
    fields: Vec<ABIField>,
    total_size: u32,
}

impl StructABI {
    /// Flatten a schema's top-level fields.
    pub fn from_schema(schema: &Schema) -> Self {
        let fields: Vec<ABIField> = schema
            .fields
            .iter()
            .map(ABIField::from_schema_field)
            .collect();
        let mut abi = Self {
            name: schema.name.clone(),
            fields,
            total_size: 0,
        };
        abi.recompute_total();
        abi
    }

    /// First field with the given name, if any. The schema model rejects
    /// duplicate sibling names, so order among duplicates is not defined.
    pub fn get_field(&self, name: &str) -> Option<&ABIField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Append a field. The total size is recomputed from scratch; it is
    /// never patched incrementally.
    pub fn push_field(&mut self, field: ABIField) {
        self.fields.push(field);
        self.recompute_total();
    }

    pub fn fields(&self) -> &[ABIField] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Sum of the fixed widths of all fields; variable-size fields
    /// contribute 0.
    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    fn recompute_total(&mut self) {
        self.total_size = self.fields.iter().map(|f| f.size_bytes).sum();
    }
}

//! Core types for Sigil schemas.
//!
//! A [`Schema`] describes the payload shape of one attestation type as an
//! ordered list of [`SchemaField`]s. Field order is serialization order and
//! is never reordered.

use serde::{Deserialize, Serialize};

/// The closed set of field kinds a schema may use.
///
/// `Enum` and `Struct` are the only recursive kinds; every other variant is
/// a leaf. Consumers match exhaustively on this enum so that adding a
/// variant fails compilation at every consumer instead of silently falling
/// through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// A string packed into a single 32-byte element.
    ShortString,
    /// A variable-length UTF-8 string (length-prefixed on the wire).
    String,
    Uint64,
    Uint128,
    Uint256,
    Int64,
    Int128,
    Int256,
    /// An opaque 32-byte principal.
    Address,
    Bool,
    /// Variable-length raw bytes (length-prefixed on the wire).
    Bytes,
    /// A tagged union; the field carries the variant set.
    Enum,
    /// A nested record; the field carries the struct definition.
    Struct,
}

impl FieldType {
    /// Canonical type name as it appears in the rendered schema document.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::ShortString => "ShortString",
            FieldType::String => "String",
            FieldType::Uint64 => "Uint64",
            FieldType::Uint128 => "Uint128",
            FieldType::Uint256 => "Uint256",
            FieldType::Int64 => "Int64",
            FieldType::Int128 => "Int128",
            FieldType::Int256 => "Int256",
            FieldType::Address => "Address",
            FieldType::Bool => "Bool",
            FieldType::Bytes => "Bytes",
            FieldType::Enum => "Enum",
            FieldType::Struct => "Struct",
        }
    }

    /// Fixed byte width of the value, or the `0` sentinel for
    /// variable-width and recursive kinds.
    pub fn fixed_size(&self) -> u32 {
        match self {
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

    /// Whether values of this kind occupy a statically known byte width.
    pub fn is_fixed_width(&self) -> bool {
        match self {
            FieldType::ShortString => true,
            FieldType::String => false,
            FieldType::Uint64 => true,
            FieldType::Uint128 => true,
            FieldType::Uint256 => true,
            FieldType::Int64 => true,
            FieldType::Int128 => true,
            FieldType::Int256 => true,
            FieldType::Address => true,
            FieldType::Bool => true,
            FieldType::Bytes => false,
            FieldType::Enum => false,
            FieldType::Struct => false,
        }
    }

    /// Whether this kind nests further field lists.
    pub fn is_recursive(&self) -> bool {
        matches!(self, FieldType::Enum | FieldType::Struct)
    }
}

/// One field of a schema.
///
/// `enum_variants` is present iff `field_type == Enum`; `struct_definition`
/// is present iff `field_type == Struct`. Validation enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    #[serde(default = "default_required")]
    pub required: bool,

    pub size_bytes: u32,

    #[serde(default)]
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_variants: Option<Vec<EnumVariant>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub struct_definition: Option<StructDefinition>,
}

fn default_required() -> bool {
    true
}

impl SchemaField {
    /// Create a field of a non-recursive kind. The size is taken from the
    /// field type's fixed width (0 for String/Bytes).
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            size_bytes: field_type.fixed_size(),
            description: String::new(),
            enum_variants: None,
            struct_definition: None,
        }
    }

    /// Create a tagged-union field with the given variant set.
    pub fn enumeration(name: impl Into<String>, variants: Vec<EnumVariant>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Enum,
            required: true,
            size_bytes: 0,
            description: String::new(),
            enum_variants: Some(variants),
            struct_definition: None,
        }
    }

    /// Create a nested-record field with the given definition.
    pub fn structure(name: impl Into<String>, definition: StructDefinition) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Struct,
            required: true,
            size_bytes: 0,
            description: String::new(),
            enum_variants: None,
            struct_definition: Some(definition),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the field as optional metadata rather than a required claim.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// One arm of a tagged union. An empty field list is a unit variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumVariant {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub fields: Vec<SchemaField>,
}

impl EnumVariant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            fields: vec![],
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_field(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self
    }
}

/// A nested record shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDefinition {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub fields: Vec<SchemaField>,
}

impl StructDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            fields: vec![],
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_field(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self
    }
}

/// A named, versioned attestation payload shape.
///
/// The version is an opaque monotonically-non-decreasing tag; the schema
/// model carries it through serialization untouched and never interprets
/// it. Interpreting version semantics is consumer policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub version: u32,

    pub fields: Vec<SchemaField>,
}

impl Schema {
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version,
            fields: vec![],
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a field. Insertion order is serialization order.
    pub fn with_field(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self
    }

    /// Parse a schema from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, crate::error::ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the schema to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, crate::error::ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

//! Schema validation.
//!
//! Validation is recursive: it descends into every enum variant and struct
//! definition, so a schema is accepted only if its entire field tree is
//! well-formed. Construction errors are fatal to schema registration and
//! are surfaced to the caller, never coerced to a default.

use std::collections::HashSet;

use thiserror::Error;

use crate::types::{FieldType, Schema, SchemaField};

/// Errors that can occur while validating a schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("empty name at '{path}'")]
    EmptyName { path: String },

    #[error("invalid variant set at '{path}': {reason}")]
    InvalidVariantSet { path: String, reason: String },

    #[error("duplicate field name '{name}' within '{path}'")]
    DuplicateFieldName { path: String, name: String },
}

/// Validate a schema.
///
/// # Errors
///
/// - [`SchemaError::EmptyName`] if the schema, any field, any variant, or
///   any struct definition has an empty name.
/// - [`SchemaError::InvalidVariantSet`] if an `Enum` field lacks variants,
///   a `Struct` field lacks a definition, or either is present on a field
///   of any other kind.
/// - [`SchemaError::DuplicateFieldName`] if two sibling fields in the same
///   field list share a name. The same name in different scopes is fine.
pub fn validate(schema: &Schema) -> Result<(), SchemaError> {
    if schema.name.is_empty() {
        return Err(SchemaError::EmptyName {
            path: "schema".to_string(),
        });
    }

    validate_fields(&schema.fields, &schema.name)
}

fn validate_fields(fields: &[SchemaField], path: &str) -> Result<(), SchemaError> {
    let mut seen: HashSet<&str> = HashSet::new();

    for field in fields {
        if field.name.is_empty() {
            return Err(SchemaError::EmptyName {
                path: path.to_string(),
            });
        }

        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateFieldName {
                path: path.to_string(),
                name: field.name.clone(),
            });
        }

        validate_field(field, path)?;
    }

    Ok(())
}

fn validate_field(field: &SchemaField, parent: &str) -> Result<(), SchemaError> {
    let path = format!("{}.{}", parent, field.name);

    match field.field_type {
        FieldType::Enum => {
            if field.struct_definition.is_some() {
                return Err(SchemaError::InvalidVariantSet {
                    path,
                    reason: "enum field carries a struct definition".to_string(),
                });
            }
            let variants = match &field.enum_variants {
                Some(v) if !v.is_empty() => v,
                _ => {
                    return Err(SchemaError::InvalidVariantSet {
                        path,
                        reason: "enum field has no variants".to_string(),
                    })
                }
            };

            let mut seen: HashSet<&str> = HashSet::new();
            for variant in variants {
                if variant.name.is_empty() {
                    return Err(SchemaError::EmptyName { path: path.clone() });
                }
                if !seen.insert(variant.name.as_str()) {
                    return Err(SchemaError::InvalidVariantSet {
                        path,
                        reason: format!("duplicate variant name '{}'", variant.name),
                    });
                }
                let variant_path = format!("{}::{}", path, variant.name);
                validate_fields(&variant.fields, &variant_path)?;
            }
            Ok(())
        }
        FieldType::Struct => {
            if field.enum_variants.is_some() {
                return Err(SchemaError::InvalidVariantSet {
                    path,
                    reason: "struct field carries enum variants".to_string(),
                });
            }
            let definition = match &field.struct_definition {
                Some(d) => d,
                None => {
                    return Err(SchemaError::InvalidVariantSet {
                        path,
                        reason: "struct field has no definition".to_string(),
                    })
                }
            };

            if definition.name.is_empty() {
                return Err(SchemaError::EmptyName { path });
            }
            validate_fields(&definition.fields, &path)
        }
        FieldType::ShortString
        | FieldType::String
        | FieldType::Uint64
        | FieldType::Uint128
        | FieldType::Uint256
        | FieldType::Int64
        | FieldType::Int128
        | FieldType::Int256
        | FieldType::Address
        | FieldType::Bool
        | FieldType::Bytes => {
            if field.enum_variants.is_some() || field.struct_definition.is_some() {
                return Err(SchemaError::InvalidVariantSet {
                    path,
                    reason: format!(
                        "{} field carries variant or struct payload",
                        field.field_type.type_name()
                    ),
                });
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EnumVariant, StructDefinition};

    fn tier_variants() -> Vec<EnumVariant> {
        vec![
            EnumVariant::new("private")
                .with_field(SchemaField::new("commitment", FieldType::Uint256)),
            EnumVariant::new("public").with_field(SchemaField::new("name", FieldType::String)),
        ]
    }

    #[test]
    fn test_valid_schema() {
        let schema = Schema::new("badge", 1)
            .with_field(SchemaField::new("holder", FieldType::Address))
            .with_field(SchemaField::enumeration("tier", tier_variants()));
        assert!(validate(&schema).is_ok());
    }

    #[test]
    fn test_empty_schema_name() {
        let schema = Schema::new("", 1);
        assert!(matches!(
            validate(&schema),
            Err(SchemaError::EmptyName { .. })
        ));
    }

    #[test]
    fn test_empty_field_name() {
        let schema = Schema::new("badge", 1).with_field(SchemaField::new("", FieldType::Bool));
        assert!(matches!(
            validate(&schema),
            Err(SchemaError::EmptyName { .. })
        ));
    }

    #[test]
    fn test_enum_without_variants() {
        let mut field = SchemaField::new("tier", FieldType::Enum);
        field.enum_variants = None;
        let schema = Schema::new("badge", 1).with_field(field);
        assert!(matches!(
            validate(&schema),
            Err(SchemaError::InvalidVariantSet { .. })
        ));
    }

    #[test]
    fn test_enum_with_empty_variant_list() {
        let schema =
            Schema::new("badge", 1).with_field(SchemaField::enumeration("tier", vec![]));
        assert!(matches!(
            validate(&schema),
            Err(SchemaError::InvalidVariantSet { .. })
        ));
    }

    #[test]
    fn test_struct_without_definition() {
        let mut field = SchemaField::new("meta", FieldType::Struct);
        field.struct_definition = None;
        let schema = Schema::new("badge", 1).with_field(field);
        assert!(matches!(
            validate(&schema),
            Err(SchemaError::InvalidVariantSet { .. })
        ));
    }

    #[test]
    fn test_leaf_field_with_variants_rejected() {
        let mut field = SchemaField::new("count", FieldType::Uint64);
        field.enum_variants = Some(tier_variants());
        let schema = Schema::new("badge", 1).with_field(field);
        assert!(matches!(
            validate(&schema),
            Err(SchemaError::InvalidVariantSet { .. })
        ));
    }

    #[test]
    fn test_enum_field_with_struct_definition_rejected() {
        let mut field = SchemaField::enumeration("tier", tier_variants());
        field.struct_definition = Some(StructDefinition::new("meta"));
        let schema = Schema::new("badge", 1).with_field(field);
        assert!(matches!(
            validate(&schema),
            Err(SchemaError::InvalidVariantSet { .. })
        ));
    }

    #[test]
    fn test_duplicate_sibling_names() {
        let schema = Schema::new("badge", 1)
            .with_field(SchemaField::new("holder", FieldType::Address))
            .with_field(SchemaField::new("holder", FieldType::Bool));
        assert!(matches!(
            validate(&schema),
            Err(SchemaError::DuplicateFieldName { .. })
        ));
    }

    #[test]
    fn test_same_name_in_different_scopes_allowed() {
        // "name" appears at top level and inside a variant; different lists.
        let schema = Schema::new("badge", 1)
            .with_field(SchemaField::new("name", FieldType::ShortString))
            .with_field(SchemaField::enumeration("tier", tier_variants()));
        assert!(validate(&schema).is_ok());
    }

    #[test]
    fn test_duplicate_inside_variant_rejected() {
        let schema = Schema::new("badge", 1).with_field(SchemaField::enumeration(
            "tier",
            vec![EnumVariant::new("public")
                .with_field(SchemaField::new("name", FieldType::String))
                .with_field(SchemaField::new("name", FieldType::Uint64))],
        ));
        assert!(matches!(
            validate(&schema),
            Err(SchemaError::DuplicateFieldName { .. })
        ));
    }

    #[test]
    fn test_duplicate_inside_nested_struct_rejected() {
        let definition = StructDefinition::new("meta")
            .with_field(SchemaField::new("seq", FieldType::Uint64))
            .with_field(SchemaField::new("seq", FieldType::Uint64));
        let schema =
            Schema::new("badge", 1).with_field(SchemaField::structure("meta", definition));
        assert!(matches!(
            validate(&schema),
            Err(SchemaError::DuplicateFieldName { .. })
        ));
    }

    #[test]
    fn test_duplicate_variant_names_rejected() {
        let schema = Schema::new("badge", 1).with_field(SchemaField::enumeration(
            "tier",
            vec![EnumVariant::new("public"), EnumVariant::new("public")],
        ));
        assert!(matches!(
            validate(&schema),
            Err(SchemaError::InvalidVariantSet { .. })
        ));
    }

    #[test]
    fn test_validation_descends_through_struct_into_enum() {
        let inner_enum = SchemaField::enumeration("kind", vec![]);
        let definition = StructDefinition::new("meta").with_field(inner_enum);
        let schema =
            Schema::new("badge", 1).with_field(SchemaField::structure("meta", definition));
        assert!(matches!(
            validate(&schema),
            Err(SchemaError::InvalidVariantSet { .. })
        ));
    }
}

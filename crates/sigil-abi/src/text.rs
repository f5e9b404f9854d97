//! Schema text rendering.
//!
//! Renders a schema as a compact JSON document with a fixed key order
//! (name, type, required, size, description, then variants/struct), so the
//! output is byte-stable and suitable for content hashing. Nested variant
//! and struct shapes render inline, recursively, with no depth limit
//! beyond the schema's own structure.

use std::fmt::Write as FmtWrite;

use sigil_schema::{EnumVariant, Schema, SchemaField, StructDefinition};

/// Render a schema to its canonical text document.
pub fn schema_text(schema: &Schema) -> String {
    let mut out = String::new();
    write_schema(&mut out, schema);
    out
}

fn write_schema(out: &mut String, schema: &Schema) {
    out.push('{');
    write_key(out, "name");
    write_string(out, &schema.name);
    out.push(',');
    write_key(out, "description");
    write_string(out, &schema.description);
    out.push(',');
    write_key(out, "version");
    let _ = write!(out, "{}", schema.version);
    out.push(',');
    write_key(out, "fields");
    write_fields(out, &schema.fields);
    out.push('}');
}

fn write_fields(out: &mut String, fields: &[SchemaField]) {
    out.push('[');
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_field(out, field);
    }
    out.push(']');
}

fn write_field(out: &mut String, field: &SchemaField) {
    out.push('{');
    write_key(out, "name");
    write_string(out, &field.name);
    out.push(',');
    write_key(out, "type");
    write_string(out, field.field_type.type_name());
    out.push(',');
    write_key(out, "required");
    out.push_str(if field.required { "true" } else { "false" });
    out.push(',');
    write_key(out, "size");
    let _ = write!(out, "{}", field.size_bytes);
    out.push(',');
    write_key(out, "description");
    write_string(out, &field.description);

    if let Some(variants) = &field.enum_variants {
        out.push(',');
        write_key(out, "variants");
        out.push('[');
        for (i, variant) in variants.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_variant(out, variant);
        }
        out.push(']');
    }

    if let Some(definition) = &field.struct_definition {
        out.push(',');
        write_key(out, "struct");
        write_struct(out, definition);
    }

    out.push('}');
}

fn write_variant(out: &mut String, variant: &EnumVariant) {
    out.push('{');
    write_key(out, "name");
    write_string(out, &variant.name);
    out.push(',');
    write_key(out, "description");
    write_string(out, &variant.description);
    out.push(',');
    write_key(out, "fields");
    write_fields(out, &variant.fields);
    out.push('}');
}

fn write_struct(out: &mut String, definition: &StructDefinition) {
    out.push('{');
    write_key(out, "name");
    write_string(out, &definition.name);
    out.push(',');
    write_key(out, "description");
    write_string(out, &definition.description);
    out.push(',');
    write_key(out, "fields");
    write_fields(out, &definition.fields);
    out.push('}');
}

fn write_key(out: &mut String, key: &str) {
    write_string(out, key);
    out.push(':');
}

/// JSON string with standard escaping.
fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

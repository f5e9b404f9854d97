//! Payload serialization to and from flat element sequences.
//!
//! Encoding follows schema declaration order. Fixed-width leaves occupy
//! one element each; String/Bytes emit a byte-count length element
//! followed by left-aligned 32-byte chunks; Struct fields inline their
//! nested field list with no prefix; Enum fields emit the zero-based
//! discriminant and then only the chosen arm's fields.
//!
//! Decoding is the strict inverse. The whole input must be consumed; the
//! explicit length element, never the chunk count, recovers the exact
//! byte count of variable-length data.

use sigil_schema::{EnumVariant, FieldType, Schema, SchemaField, StructDefinition};

use crate::element::{Element, Value, ELEMENT_WIDTH};
use crate::error::WireError;

/// Encode a payload against a schema.
///
/// # Errors
///
/// [`WireError::TypeMismatch`] if a value's kind does not match its field
/// (including arity mismatches against a nested field list) and
/// [`WireError::ValueTooWide`] if a short string exceeds one element.
pub fn serialize(schema: &Schema, values: &[Value]) -> Result<Vec<Element>, WireError> {
    let mut out = Vec::new();
    encode_fields(&schema.fields, values, "", &mut out)?;
    Ok(out)
}

/// Decode an element sequence against a schema.
///
/// # Errors
///
/// [`WireError::TruncatedInput`] if elements run out mid-field,
/// [`WireError::TrailingElements`] if elements remain after the last
/// field, [`WireError::DiscriminantOutOfRange`] for unknown enum arms,
/// and [`WireError::TypeMismatch`] if an element does not fit its
/// declared range.
pub fn deserialize(schema: &Schema, elements: &[Element]) -> Result<Vec<Value>, WireError> {
    let mut cursor = Cursor { elements, pos: 0 };
    let values = decode_fields(&schema.fields, "", &mut cursor)?;

    let remaining = cursor.remaining();
    if remaining != 0 {
        return Err(WireError::TrailingElements { remaining });
    }
    Ok(values)
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

fn encode_fields(
    fields: &[SchemaField],
    values: &[Value],
    parent: &str,
    out: &mut Vec<Element>,
) -> Result<(), WireError> {
    if fields.len() != values.len() {
        return Err(WireError::TypeMismatch {
            field: if parent.is_empty() {
                "payload".to_string()
            } else {
                parent.to_string()
            },
            expected: format!("{} value(s)", fields.len()),
            got: format!("{} value(s)", values.len()),
        });
    }

    for (field, value) in fields.iter().zip(values) {
        encode_field(field, value, parent, out)?;
    }
    Ok(())
}

fn encode_field(
    field: &SchemaField,
    value: &Value,
    parent: &str,
    out: &mut Vec<Element>,
) -> Result<(), WireError> {
    let path = join(parent, &field.name);

    let mismatch = |got: &Value| WireError::TypeMismatch {
        field: path.clone(),
        expected: field.field_type.type_name().to_string(),
        got: got.kind().to_string(),
    };

    match field.field_type {
        FieldType::ShortString => match value {
            Value::ShortString(s) => {
                let element =
                    Element::from_short_bytes(s.as_bytes()).ok_or(WireError::ValueTooWide {
                        field: path.clone(),
                        len: s.len(),
                        max: ELEMENT_WIDTH,
                    })?;
                out.push(element);
                Ok(())
            }
            other => Err(mismatch(other)),
        },
        FieldType::String => match value {
            Value::String(s) => {
                encode_var_bytes(s.as_bytes(), out);
                Ok(())
            }
            other => Err(mismatch(other)),
        },
        FieldType::Uint64 => match value {
            Value::Uint64(v) => {
                out.push(Element::from_u64(*v));
                Ok(())
            }
            other => Err(mismatch(other)),
        },
        FieldType::Uint128 => match value {
            Value::Uint128(v) => {
                out.push(Element::from_u128(*v));
                Ok(())
            }
            other => Err(mismatch(other)),
        },
        FieldType::Uint256 => match value {
            Value::Uint256(word) => {
                out.push(*word);
                Ok(())
            }
            other => Err(mismatch(other)),
        },
        FieldType::Int64 => match value {
            Value::Int64(v) => {
                out.push(Element::from_i64(*v));
                Ok(())
            }
            other => Err(mismatch(other)),
        },
        FieldType::Int128 => match value {
            Value::Int128(v) => {
                out.push(Element::from_i128(*v));
                Ok(())
            }
            other => Err(mismatch(other)),
        },
        FieldType::Int256 => match value {
            Value::Int256(word) => {
                out.push(*word);
                Ok(())
            }
            other => Err(mismatch(other)),
        },
        FieldType::Address => match value {
            Value::Address(a) => {
                out.push(a.to_element());
                Ok(())
            }
            other => Err(mismatch(other)),
        },
        FieldType::Bool => match value {
            Value::Bool(b) => {
                out.push(Element::from_bool(*b));
                Ok(())
            }
            other => Err(mismatch(other)),
        },
        FieldType::Bytes => match value {
            Value::Bytes(data) => {
                encode_var_bytes(data, out);
                Ok(())
            }
            other => Err(mismatch(other)),
        },
        FieldType::Enum => match value {
            Value::Enum { variant, values } => {
                let variants = enum_variants(field, &path)?;
                let arm = variants.get(*variant as usize).ok_or_else(|| {
                    WireError::DiscriminantOutOfRange {
                        field: path.clone(),
                        got: u64::from(*variant),
                        variant_count: variants.len(),
                    }
                })?;
                out.push(Element::from_u64(u64::from(*variant)));
                encode_fields(&arm.fields, values, &join(&path, &arm.name), out)
            }
            other => Err(mismatch(other)),
        },
        FieldType::Struct => match value {
            Value::Struct(values) => {
                let definition = struct_definition(field, &path)?;
                encode_fields(&definition.fields, values, &path, out)
            }
            other => Err(mismatch(other)),
        },
    }
}

/// One byte-count length element, then `ceil(len / 32)` left-aligned
/// chunks with a zero-padded tail.
fn encode_var_bytes(data: &[u8], out: &mut Vec<Element>) {
    out.push(Element::from_u64(data.len() as u64));
    for chunk in data.chunks(ELEMENT_WIDTH) {
        out.push(Element::from_chunk(chunk));
    }
}

struct Cursor<'a> {
    elements: &'a [Element],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, field: &str) -> Result<Element, WireError> {
        match self.elements.get(self.pos) {
            Some(e) => {
                self.pos += 1;
                Ok(*e)
            }
            None => Err(WireError::TruncatedInput {
                field: field.to_string(),
                needed: 1,
            }),
        }
    }

    fn take_n(&mut self, field: &str, n: usize) -> Result<&'a [Element], WireError> {
        let available = self.elements.len() - self.pos;
        if n > available {
            return Err(WireError::TruncatedInput {
                field: field.to_string(),
                needed: n - available,
            });
        }
        let slice = &self.elements[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn remaining(&self) -> usize {
        self.elements.len() - self.pos
    }
}

fn decode_fields(
    fields: &[SchemaField],
    parent: &str,
    cursor: &mut Cursor<'_>,
) -> Result<Vec<Value>, WireError> {
    let mut values = Vec::with_capacity(fields.len());
    for field in fields {
        values.push(decode_field(field, parent, cursor)?);
    }
    Ok(values)
}

fn decode_field(
    field: &SchemaField,
    parent: &str,
    cursor: &mut Cursor<'_>,
) -> Result<Value, WireError> {
    let path = join(parent, &field.name);

    let range_mismatch = |expected: &str, element: &Element| WireError::TypeMismatch {
        field: path.clone(),
        expected: expected.to_string(),
        got: element.to_string(),
    };

    match field.field_type {
        FieldType::ShortString => {
            let element = cursor.take(&path)?;
            let text = std::str::from_utf8(element.short_bytes())
                .map_err(|_| range_mismatch("utf-8 short string", &element))?;
            Ok(Value::ShortString(text.to_string()))
        }
        FieldType::String => {
            let bytes = decode_var_bytes(&path, cursor)?;
            let text = String::from_utf8(bytes).map_err(|_| WireError::TypeMismatch {
                field: path.clone(),
                expected: "utf-8 string bytes".to_string(),
                got: "invalid utf-8".to_string(),
            })?;
            Ok(Value::String(text))
        }
        FieldType::Uint64 => {
            let element = cursor.take(&path)?;
            let v = element
                .to_u64()
                .ok_or_else(|| range_mismatch("uint64-range element", &element))?;
            Ok(Value::Uint64(v))
        }
        FieldType::Uint128 => {
            let element = cursor.take(&path)?;
            let v = element
                .to_u128()
                .ok_or_else(|| range_mismatch("uint128-range element", &element))?;
            Ok(Value::Uint128(v))
        }
        FieldType::Uint256 => Ok(Value::Uint256(cursor.take(&path)?)),
        FieldType::Int64 => {
            let element = cursor.take(&path)?;
            let v = element
                .to_i64()
                .ok_or_else(|| range_mismatch("sign-extended int64 element", &element))?;
            Ok(Value::Int64(v))
        }
        FieldType::Int128 => {
            let element = cursor.take(&path)?;
            let v = element
                .to_i128()
                .ok_or_else(|| range_mismatch("sign-extended int128 element", &element))?;
            Ok(Value::Int128(v))
        }
        FieldType::Int256 => Ok(Value::Int256(cursor.take(&path)?)),
        FieldType::Address => {
            let element = cursor.take(&path)?;
            Ok(Value::Address(crate::element::Address::from_element(
                element,
            )))
        }
        FieldType::Bool => {
            let element = cursor.take(&path)?;
            let v = element
                .to_bool()
                .ok_or_else(|| range_mismatch("boolean element (0 or 1)", &element))?;
            Ok(Value::Bool(v))
        }
        FieldType::Bytes => Ok(Value::Bytes(decode_var_bytes(&path, cursor)?)),
        FieldType::Enum => {
            let variants = enum_variants(field, &path)?;
            let element = cursor.take(&path)?;
            let discriminant = element
                .to_u64()
                .ok_or_else(|| range_mismatch("discriminant element", &element))?;
            let arm = usize::try_from(discriminant)
                .ok()
                .and_then(|i| variants.get(i))
                .ok_or_else(|| WireError::DiscriminantOutOfRange {
                    field: path.clone(),
                    got: discriminant,
                    variant_count: variants.len(),
                })?;
            let values = decode_fields(&arm.fields, &join(&path, &arm.name), cursor)?;
            Ok(Value::Enum {
                variant: discriminant as u32,
                values,
            })
        }
        FieldType::Struct => {
            let definition = struct_definition(field, &path)?;
            let values = decode_fields(&definition.fields, &path, cursor)?;
            Ok(Value::Struct(values))
        }
    }
}

fn decode_var_bytes(path: &str, cursor: &mut Cursor<'_>) -> Result<Vec<u8>, WireError> {
    let length_element = cursor.take(path)?;
    let byte_len = length_element
        .to_u64()
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| WireError::TypeMismatch {
            field: path.to_string(),
            expected: "byte-count length element".to_string(),
            got: length_element.to_string(),
        })?;

    let chunk_count = byte_len / ELEMENT_WIDTH + usize::from(byte_len % ELEMENT_WIDTH != 0);
    let chunks = cursor.take_n(path, chunk_count)?;

    let mut bytes = Vec::with_capacity(byte_len);
    let mut left = byte_len;
    for chunk in chunks {
        let take = left.min(ELEMENT_WIDTH);
        bytes.extend_from_slice(&chunk.as_bytes()[..take]);
        left -= take;
    }
    Ok(bytes)
}

/// The variant set of an enum field. Validation guarantees presence; an
/// unvalidated schema surfaces as a type mismatch rather than a panic.
fn enum_variants<'a>(field: &'a SchemaField, path: &str) -> Result<&'a [EnumVariant], WireError> {
    field
        .enum_variants
        .as_deref()
        .ok_or_else(|| WireError::TypeMismatch {
            field: path.to_string(),
            expected: "enum field with a variant set".to_string(),
            got: "enum field without variants".to_string(),
        })
}

fn struct_definition<'a>(
    field: &'a SchemaField,
    path: &str,
) -> Result<&'a StructDefinition, WireError> {
    field
        .struct_definition
        .as_ref()
        .ok_or_else(|| WireError::TypeMismatch {
            field: path.to_string(),
            expected: "struct field with a definition".to_string(),
            got: "struct field without a definition".to_string(),
        })
}

//! Decodes the external parser's YAML-shaped provisional tree.
//!
//! Every node arrives as either a single-entry mapping from tag to
//! payload or a bare tag string, which is shorthand for `{tag: true}`.
//! This is the boundary where an unrecognized tag surfaces as an
//! unknown-node error; past it, the type system keeps the tag sets
//! closed.

use serde_yaml::Value;

use crate::ast::Raw;
use crate::error::CoreError;

/// Parse YAML text from the external parser and decode it.
pub fn decode_str(text: &str) -> Result<Raw, CoreError> {
    let value: Value = serde_yaml::from_str(text)?;
    decode(&value)
}

pub fn decode(value: &Value) -> Result<Raw, CoreError> {
    match value {
        Value::Mapping(map) if map.len() == 1 => {
            let (tag, payload) = map
                .iter()
                .next()
                .ok_or_else(|| CoreError::Internal("empty single-entry mapping".to_string()))?;
            let tag = tag.as_str().ok_or_else(|| {
                CoreError::InvalidTree(format!("node tag must be a string, got {tag:?}"))
            })?;
            decode_tagged(tag, payload)
        }
        // Bare tag shorthand for `{tag: true}`.
        Value::String(tag) => decode_tagged(tag, &Value::Bool(true)),
        // An absent pair value shows up as a YAML null.
        Value::Null => Ok(Raw::Empty),
        other => Err(CoreError::InvalidTree(format!(
            "expected a tagged node, got {other:?}"
        ))),
    }
}

fn decode_tagged(tag: &str, payload: &Value) -> Result<Raw, CoreError> {
    match tag {
        "Pairs" => Ok(Raw::Pairs(decode_children(tag, payload)?)),
        "Forms" => Ok(Raw::Forms(decode_children(tag, payload)?)),
        "Lst" => Ok(Raw::Lst(decode_children(tag, payload)?)),
        "Vec" => Ok(Raw::Vec(decode_children(tag, payload)?)),
        "Map" => Ok(Raw::Map(decode_children(tag, payload)?)),
        "Str" => Ok(Raw::Str(decode_text(tag, payload)?)),
        "Chr" => Ok(Raw::Chr(decode_text(tag, payload)?)),
        "Spc" => Ok(Raw::Spc(decode_text(tag, payload)?)),
        "Sym" => Ok(Raw::Sym(decode_text(tag, payload)?)),
        "Tok" => Ok(Raw::Tok(decode_text(tag, payload)?)),
        "Key" => Ok(Raw::Key(decode_text(tag, payload)?)),
        "Int" => Ok(Raw::Int(decode_text(tag, payload)?)),
        "Flt" => Ok(Raw::Flt(decode_text(tag, payload)?)),
        "Bln" => match payload {
            Value::Bool(value) => Ok(Raw::Bln(*value)),
            other => Err(CoreError::InvalidTree(format!(
                "Bln payload must be a boolean, got {other:?}"
            ))),
        },
        "Nil" => Ok(Raw::Nil),
        "Empty" => Ok(Raw::Empty),
        _ => Err(CoreError::UnknownNode(format!("{tag}: {payload:?}"))),
    }
}

fn decode_children(tag: &str, payload: &Value) -> Result<Vec<Raw>, CoreError> {
    let seq = payload.as_sequence().ok_or_else(|| {
        CoreError::InvalidTree(format!("{tag} payload must be a sequence, got {payload:?}"))
    })?;
    seq.iter().map(decode).collect()
}

fn decode_text(tag: &str, payload: &Value) -> Result<String, CoreError> {
    match payload {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(CoreError::InvalidTree(format!(
            "{tag} payload must be textual, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_tagged_tree() {
        let raw = decode_str("Pairs:\n- Sym: say\n- Str: hi\n").expect("decode");
        assert_eq!(
            raw,
            Raw::Pairs(vec![Raw::sym("say"), Raw::Str("hi".into())])
        );
    }

    #[test]
    fn bare_tag_is_shorthand_for_tag_true() {
        assert_eq!(decode_str("Nil\n").expect("decode"), Raw::Nil);
        assert_eq!(decode_str("Bln\n").expect("decode"), Raw::Bln(true));
        assert_eq!(
            decode_str("Nil\n").expect("decode"),
            decode_str("Nil: true\n").expect("decode")
        );
    }

    #[test]
    fn numeric_payloads_keep_their_text() {
        let raw = decode_str("Int: 42\n").expect("decode");
        assert_eq!(raw, Raw::Int("42".into()));
        let raw = decode_str("Flt: 3.5\n").expect("decode");
        assert_eq!(raw, Raw::Flt("3.5".into()));
    }

    #[test]
    fn null_stands_for_an_absent_value() {
        let raw = decode_str("Pairs:\n- Str: hello\n- null\n").expect("decode");
        assert_eq!(raw, Raw::Pairs(vec![Raw::Str("hello".into()), Raw::Empty]));
    }

    #[test]
    fn unknown_tag_is_reported_with_the_offending_node() {
        let err = decode_str("Wat: 1\n").unwrap_err();
        match err {
            CoreError::UnknownNode(message) => assert!(message.contains("Wat")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_node_shapes_are_rejected() {
        assert!(matches!(
            decode_str("- 1\n- 2\n").unwrap_err(),
            CoreError::InvalidTree(_)
        ));
        assert!(matches!(
            decode_str("Lst: 3\n").unwrap_err(),
            CoreError::InvalidTree(_)
        ));
        assert!(matches!(
            decode_str("Bln: 3\n").unwrap_err(),
            CoreError::InvalidTree(_)
        ));
    }
}

//! Renders [`Value`]s back to text

use crate::value::Value;
use std::fmt::Write;

/// Append the textual form of `value` to `out`
pub fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Undefined => out.push_str("undefined"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(out, *n),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                write_value(out, item);
            }
            out.push('}');
        }
    }
}

fn write_number(out: &mut String, n: f64) {
    if n.is_finite() {
        // Display is the shortest text that parses back to the same f64
        let _ = write!(out, "{}", n);
    } else {
        out.push_str("null");
    }
}

/// Quote a string, escaping exactly the set the lexer decodes.
fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueMap;

    fn render(value: &Value) -> String {
        let mut out = String::new();
        write_value(&mut out, value);
        out
    }

    #[test]
    fn test_primitives() {
        assert_eq!(render(&Value::Null), "null");
        assert_eq!(render(&Value::Undefined), "undefined");
        assert_eq!(render(&Value::Bool(false)), "false");
        assert_eq!(render(&Value::Number(10.0)), "10");
        assert_eq!(render(&Value::Number(-0.25)), "-0.25");
    }

    #[test]
    fn test_non_finite_numbers_render_as_null() {
        assert_eq!(render(&Value::Number(f64::NAN)), "null");
        assert_eq!(render(&Value::Number(f64::INFINITY)), "null");
    }

    #[test]
    fn test_object_keeps_insertion_order() {
        let mut map = ValueMap::new();
        map.insert("b".into(), Value::from(1));
        map.insert("a".into(), Value::from(vec![true, false]));
        assert_eq!(render(&Value::Object(map)), r#"{"b":1,"a":[true,false]}"#);
    }

    #[test]
    fn test_string_escaping() {
        let s = Value::from("say \"hi\"\\\n");
        assert_eq!(render(&s), r#""say \"hi\"\\\n""#);
    }
}

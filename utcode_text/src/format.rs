use utcode::Value;

/// Layout of the rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// One entry per line, indented by nesting depth.
    Pretty,
    /// Everything on a single line.
    Compact,
}

/// Formats a Value as human-readable text.
pub fn to_text(value: &Value, style: Style) -> String {
    let mut output = String::new();
    format_value(&mut output, value, 0, style);
    output
}

/// Formats a value with the given indentation level.
fn format_value(output: &mut String, value: &Value, indent: usize, style: Style) {
    match value {
        Value::Absent => output.push_str("nil"),
        Value::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        Value::Integer(n) => output.push_str(&n.to_string()),
        Value::Float(f) => output.push_str(&format!("{f:?}")),
        Value::Text(s) => format_string_literal(output, s),
        Value::Bytes(b) => {
            output.push_str("bytes(");
            for byte in b {
                output.push_str(&format!("{byte:02x}"));
            }
            output.push(')');
        }

        Value::List(items) => {
            format_container(output, ('[', ']'), items, indent, style, |output, item| {
                format_value(output, item, indent + 1, style);
            });
        }

        Value::Dict(entries) => {
            format_container(
                output,
                ('{', '}'),
                entries,
                indent,
                style,
                |output, (key, value)| {
                    format_string_literal(output, key);
                    output.push_str(": ");
                    format_value(output, value, indent + 1, style);
                },
            );
        }
    }
}

fn format_container<I, F>(
    output: &mut String,
    (open, close): (char, char),
    items: I,
    indent: usize,
    style: Style,
    mut format_item: F,
) where
    I: IntoIterator,
    F: FnMut(&mut String, I::Item),
{
    output.push(open);
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        output.push(close);
        return;
    }

    match style {
        Style::Pretty => {
            let indent_str = "  ".repeat(indent);
            output.push('\n');
            for item in items {
                output.push_str(&indent_str);
                output.push_str("  ");
                format_item(output, item);
                output.push_str(",\n");
            }
            output.push_str(&indent_str);
        }
        Style::Compact => {
            let mut first = true;
            for item in items {
                if !first {
                    output.push_str(", ");
                }
                first = false;
                format_item(output, item);
            }
        }
    }
    output.push(close);
}

/// Formats a string as a quoted literal with escapes.
fn format_string_literal(output: &mut String, s: &str) {
    output.push('"');
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_ascii_control() => output.push_str(&format!("\\x{:02x}", c as u32)),
            c => output.push(c),
        }
    }
    output.push('"');
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use bytes::Bytes;
    use utcode::Value;

    use super::{Style, to_text};

    fn pretty(value: &Value) -> String {
        to_text(value, Style::Pretty)
    }

    #[test]
    fn test_format_scalars() {
        assert_eq!(pretty(&Value::Absent), "nil");
        assert_eq!(pretty(&Value::Bool(true)), "true");
        assert_eq!(pretty(&Value::Bool(false)), "false");
        assert_eq!(pretty(&Value::Integer(-42)), "-42");
        assert_eq!(pretty(&Value::Float(2.0)), "2.0");
        assert_eq!(pretty(&Value::Float(f64::NEG_INFINITY)), "-inf");
        assert_eq!(
            pretty(&Value::Bytes(Bytes::from_static(&[0xDE, 0xAD]))),
            "bytes(dead)"
        );
    }

    #[test]
    fn test_format_string() {
        assert_eq!(pretty(&Value::from("Hello")), "\"Hello\"");
        assert_eq!(pretty(&Value::from("Hello\nWorld")), "\"Hello\\nWorld\"");
        assert_eq!(pretty(&Value::from("a\u{1}")), "\"a\\x01\"");
    }

    #[test]
    fn test_format_list() {
        let list = Value::List(vec![Value::Integer(1), Value::Absent, Value::from("x")]);
        assert_eq!(pretty(&list), "[\n  1,\n  nil,\n  \"x\",\n]");
        assert_eq!(to_text(&list, Style::Compact), "[1, nil, \"x\"]");
        assert_eq!(pretty(&Value::List(Vec::new())), "[]");
    }

    #[test]
    fn test_format_nested_dict() {
        let inner = BTreeMap::from([("n".to_string(), Value::Integer(3))]);
        let outer = Value::Dict(BTreeMap::from([
            ("inner".to_string(), Value::Dict(inner)),
            ("empty".to_string(), Value::Dict(BTreeMap::new())),
        ]));
        assert_eq!(
            pretty(&outer),
            "{\n  \"empty\": {},\n  \"inner\": {\n    \"n\": 3,\n  },\n}"
        );
        assert_eq!(
            to_text(&outer, Style::Compact),
            "{\"empty\": {}, \"inner\": {\"n\": 3}}"
        );
    }
}

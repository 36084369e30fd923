use serde_json::{Map, Number, Value};

use crate::types::{Event, FieldValue};

/// Encode an event for transmission to a third-party endpoint.
///
/// The output is stable: equal events encode to byte-identical strings.
/// Field names are emitted in lower camel case, absent values as explicit
/// `null`, and the type tag as its textual name under `eventType`.
///
/// Payloads may end up decoded into HTML by browser-based consumers, so
/// `<`, `>`, `&` and the JS line separators are always emitted as `\uXXXX`
/// escapes. There is no relaxed mode.
pub fn encode_event(event: &Event) -> String {
    let mut map = Map::new();
    map.insert(
        "eventType".to_string(),
        Value::String(event.event_type.as_str().to_string()),
    );
    for (name, value) in &event.fields {
        map.insert(to_lower_camel(name), field_to_json(value));
    }

    escape_html_unsafe_chars(&Value::Object(map).to_string())
}

fn field_to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(text) => Value::String(text.clone()),
        FieldValue::Integer(n) => Value::Number(Number::from(*n)),
        FieldValue::Float(n) => Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null),
        FieldValue::Bool(b) => Value::Bool(*b),
        FieldValue::Address(addr) => Value::String(addr.to_string()),
        FieldValue::Null => Value::Null,
    }
}

/// Convert an internal field name (snake_case, kebab-case, or PascalCase)
/// to lower camel case.
fn to_lower_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;

    for ch in name.chars() {
        if ch == '_' || ch == '-' || ch == ' ' {
            upper_next = !out.is_empty();
            continue;
        }
        if out.is_empty() {
            out.extend(ch.to_lowercase());
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }

    out
}

/// Replace characters that are unsafe inside HTML or `<script>` contexts.
///
/// serde_json leaves these through; in JSON output they can only occur
/// inside string literals, so a plain character walk is sufficient.
fn escape_html_unsafe_chars(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(ch),
        }
    }
    out
}

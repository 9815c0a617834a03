use std::fmt;

use serde_json::{Map, Value};

/// A property path expressed as dot/bracket segments (e.g. `profile.name`).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct JsonPath(Vec<String>);

impl JsonPath {
    fn parse_segmented(input: &str) -> Vec<String> {
        let mut segments = Vec::new();
        let mut buffer = String::new();
        let mut chars = input.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '.' => {
                    if !buffer.is_empty() {
                        segments.push(std::mem::take(&mut buffer));
                    }
                }
                '[' => {
                    if !buffer.is_empty() {
                        segments.push(std::mem::take(&mut buffer));
                    }
                    let mut index = String::new();
                    for next in chars.by_ref() {
                        if next == ']' {
                            break;
                        }
                        index.push(next);
                    }
                    if !index.is_empty() {
                        segments.push(index);
                    }
                }
                _ => buffer.push(ch),
            }
        }

        if !buffer.is_empty() {
            segments.push(buffer);
        }

        segments
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Navigate a document, returning the value at this path if present.
    pub fn get<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        let mut cursor = doc;
        for part in &self.0 {
            cursor = match cursor {
                Value::Object(map) => map.get(part)?,
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(cursor)
    }

    /// Write a value at this path, creating intermediate objects as needed.
    pub fn set(&self, doc: &mut Value, value: Value) {
        let Some((last, parents)) = self.0.split_last() else {
            return;
        };
        let mut cursor = doc;
        for part in parents {
            cursor = ensure_object(cursor)
                .entry(part.clone())
                .or_insert(Value::Null);
        }
        ensure_object(cursor).insert(last.clone(), value);
    }
}

fn ensure_object(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    slot.as_object_mut().expect("slot coerced to object")
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<&str> for JsonPath {
    fn from(value: &str) -> Self {
        Self(Self::parse_segmented(value))
    }
}

impl From<String> for JsonPath {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Vec<String>> for JsonPath {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}

impl<'a> From<&'a [&'a str]> for JsonPath {
    fn from(value: &'a [&'a str]) -> Self {
        Self(value.iter().map(|segment| segment.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_dotted_and_bracketed_segments() {
        let path = JsonPath::from("profile.emails[0].address");
        assert_eq!(path.parts(), ["profile", "emails", "0", "address"]);
    }

    #[test]
    fn gets_nested_values() {
        let doc = json!({"profile": {"emails": [{"address": "a@x"}]}});
        let path = JsonPath::from("profile.emails[0].address");
        assert_eq!(path.get(&doc), Some(&json!("a@x")));
        assert_eq!(JsonPath::from("profile.missing").get(&doc), None);
    }

    #[test]
    fn set_creates_intermediate_objects() {
        let mut doc = json!({});
        JsonPath::from("profile.name").set(&mut doc, json!("Ada"));
        assert_eq!(doc, json!({"profile": {"name": "Ada"}}));

        JsonPath::from("profile.name").set(&mut doc, json!("Grace"));
        assert_eq!(doc, json!({"profile": {"name": "Grace"}}));
    }
}

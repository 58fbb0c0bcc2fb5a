//! `application/x-www-form-urlencoded` decoding with bracket keys
//!
//! `a=1&b[]=2&b[]=3&c[d]=4` becomes `{"a":"1","b":["2","3"],"c":{"d":"4"}}`,
//! which is how micropub clients encode multi-valued properties.

use serde_json::{Map, Value};

/// Decode a form body into a JSON object
pub fn parse_form(raw: &str) -> Map<String, Value> {
    let mut out = Map::new();

    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        if key.is_empty() {
            continue;
        }
        let segments = split_key(&key);
        insert(&mut out, &segments, Value::String(value.into_owned()));
    }

    out
}

/// `a[b][]` -> `["a", "b", ""]`; malformed brackets keep the key whole
fn split_key(key: &str) -> Vec<&str> {
    let Some(open) = key.find('[') else {
        return vec![key];
    };
    if open == 0 {
        return vec![key];
    }

    let mut segments = vec![&key[..open]];
    let mut rest = &key[open..];
    while let Some(stripped) = rest.strip_prefix('[') {
        let Some(close) = stripped.find(']') else {
            return vec![key];
        };
        segments.push(&stripped[..close]);
        rest = &stripped[close + 1..];
    }

    if rest.is_empty() { segments } else { vec![key] }
}

fn insert(map: &mut Map<String, Value>, segments: &[&str], value: Value) {
    let (head, tail) = match segments.split_first() {
        Some(split) => split,
        None => return,
    };

    if tail.is_empty() {
        map.insert((*head).to_string(), value);
        return;
    }

    let slot = map.entry((*head).to_string()).or_insert(Value::Null);
    insert_nested(slot, tail, value);
}

fn insert_nested(slot: &mut Value, segments: &[&str], value: Value) {
    let (head, tail) = match segments.split_first() {
        Some(split) => split,
        None => {
            *slot = value;
            return;
        }
    };

    if head.is_empty() {
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        if let Value::Array(items) = slot {
            if tail.is_empty() {
                items.push(value);
            } else {
                let mut child = Value::Object(Map::new());
                insert_nested(&mut child, tail, value);
                items.push(child);
            }
        }
        return;
    }

    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(children) = slot {
        let child = children
            .entry((*head).to_string())
            .or_insert(Value::Null);
        insert_nested(child, tail, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_keys_last_value_wins() {
        let parsed = parse_form("h=entry&content=hello+world&h=card");
        assert_eq!(Value::Object(parsed), json!({"h": "card", "content": "hello world"}));
    }

    #[test]
    fn bracket_arrays_collect_values() {
        let parsed = parse_form("category[]=rust&category[]=indieweb");
        assert_eq!(
            Value::Object(parsed),
            json!({"category": ["rust", "indieweb"]})
        );
    }

    #[test]
    fn nested_properties() {
        let parsed = parse_form(
            "properties%5Blike-of%5D%5B%5D=https%3A%2F%2Fexample.org%2Fa&access_token=abc",
        );
        assert_eq!(
            Value::Object(parsed),
            json!({
                "properties": {"like-of": ["https://example.org/a"]},
                "access_token": "abc"
            })
        );
    }

    #[test]
    fn malformed_brackets_keep_the_raw_key() {
        let parsed = parse_form("a[b=1&[x]=2&c]d=3");
        assert_eq!(
            Value::Object(parsed),
            json!({"a[b": "1", "[x]": "2", "c]d": "3"})
        );
    }

    #[test]
    fn empty_input_is_empty_object() {
        assert!(parse_form("").is_empty());
    }
}

//! Recursive key-case transforms for JSON payloads.
//!
//! API responses arrive with `snake_case` keys while the application works in
//! `camelCase`. The helpers here rewrite every object key in a
//! [`serde_json::Value`] tree, leaving leaves untouched.
//!
//! # Example
//!
//! ```
//! use launchpad_core::case::{camel_case_object, snake_case_object};
//! use serde_json::json;
//!
//! let camel = camel_case_object(json!({ "what_now": "brown cow" }));
//! assert_eq!(camel, json!({ "whatNow": "brown cow" }));
//!
//! let snake = snake_case_object(camel);
//! assert_eq!(snake, json!({ "what_now": "brown cow" }));
//! ```

use serde_json::{Map, Value};
use std::collections::HashMap;

/// Rebuild `value` with every object key passed through `modify`.
///
/// Arrays are mapped element-wise and objects are rebuilt with rewritten keys
/// and recursively transformed values. Any other value is returned as-is.
/// When two keys rewrite to the same name, the one visited last wins.
pub fn modify_object_keys<F>(value: Value, modify: &F) -> Value
where
    F: Fn(&str) -> String + ?Sized,
{
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| modify_object_keys(item, modify))
                .collect(),
        ),
        Value::Object(entries) => {
            let mut result = Map::with_capacity(entries.len());
            for (key, inner) in entries {
                result.insert(modify(&key), modify_object_keys(inner, modify));
            }
            Value::Object(result)
        }
        leaf => leaf,
    }
}

/// Rewrite every key in `value` to lower camel case.
#[must_use]
pub fn camel_case_object(value: Value) -> Value {
    modify_object_keys(value, &camel_case)
}

/// Rewrite every key in `value` to snake case.
#[must_use]
pub fn snake_case_object(value: Value) -> Value {
    modify_object_keys(value, &snake_case)
}

/// Rename keys found in `names`; keys missing from the lookup are kept.
///
/// ```
/// use launchpad_core::case::convert_key_names;
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// let names = HashMap::from([("two".to_string(), "blue".to_string())]);
/// let converted = convert_key_names(json!({ "one": { "two": { "three": "four" } } }), &names);
/// assert_eq!(converted, json!({ "one": { "blue": { "three": "four" } } }));
/// ```
#[must_use]
pub fn convert_key_names<S: std::hash::BuildHasher>(
    value: Value,
    names: &HashMap<String, String, S>,
) -> Value {
    let rename = |key: &str| names.get(key).cloned().unwrap_or_else(|| key.to_string());
    modify_object_keys(value, &rename)
}

/// Convert a single identifier to lower camel case.
///
/// ```
/// use launchpad_core::case::camel_case;
///
/// assert_eq!(camel_case("field_errors"), "fieldErrors");
/// assert_eq!(camel_case("Foo Bar"), "fooBar");
/// assert_eq!(camel_case("XMLHttpRequest"), "xmlHttpRequest");
/// ```
#[must_use]
pub fn camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (index, word) in split_words(input).iter().enumerate() {
        let lower = word.to_lowercase();
        if index == 0 {
            out.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

/// Convert a single identifier to snake case.
///
/// ```
/// use launchpad_core::case::snake_case;
///
/// assert_eq!(snake_case("fieldErrors"), "field_errors");
/// assert_eq!(snake_case("--Foo-Bar--"), "foo_bar");
/// ```
#[must_use]
pub fn snake_case(input: &str) -> String {
    split_words(input)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Lower,
    Upper,
    Digit,
    Other,
}

fn classify(c: char) -> CharClass {
    if c.is_lowercase() {
        CharClass::Lower
    } else if c.is_uppercase() {
        CharClass::Upper
    } else if c.is_numeric() {
        CharClass::Digit
    } else if c.is_alphabetic() {
        // Caseless letters (CJK and friends) group with lowercase.
        CharClass::Lower
    } else {
        CharClass::Other
    }
}

/// Split an identifier into words.
///
/// Boundaries: any non-alphanumeric run, a lower-to-upper transition
/// (`fooBar`), the end of an acronym (`XMLHttp` splits before `Http`), and
/// letter/digit transitions (`foo2bar`).
fn split_words(input: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut words = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &(offset, c)) in chars.iter().enumerate() {
        let class = classify(c);
        if class == CharClass::Other {
            if let Some(begin) = start.take() {
                words.push(&input[begin..offset]);
            }
            continue;
        }

        let Some(begin) = start else {
            start = Some(offset);
            continue;
        };

        let prev = classify(chars[i - 1].1);
        let next = chars.get(i + 1).map(|&(_, n)| classify(n));
        let boundary = match (prev, class) {
            (CharClass::Lower, CharClass::Upper)
            | (CharClass::Digit, CharClass::Lower | CharClass::Upper)
            | (CharClass::Lower | CharClass::Upper, CharClass::Digit) => true,
            (CharClass::Upper, CharClass::Upper) => next == Some(CharClass::Lower),
            _ => false,
        };

        if boundary {
            words.push(&input[begin..offset]);
            start = Some(offset);
        }
    }

    if let Some(begin) = start {
        words.push(&input[begin..]);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_case_words() {
        assert_eq!(camel_case("what_now"), "whatNow");
        assert_eq!(camel_case("field_errors"), "fieldErrors");
        assert_eq!(camel_case("__FOO_BAR__"), "fooBar");
        assert_eq!(camel_case("alreadyCamel"), "alreadyCamel");
        assert_eq!(camel_case("foo2bar"), "foo2Bar");
        assert_eq!(camel_case("user_id"), "userId");
        assert_eq!(camel_case(""), "");
    }

    #[test]
    fn test_snake_case_words() {
        assert_eq!(snake_case("whatNow"), "what_now");
        assert_eq!(snake_case("fieldErrors"), "field_errors");
        assert_eq!(snake_case("XMLHttpRequest"), "xml_http_request");
        assert_eq!(snake_case("foo2bar"), "foo_2_bar");
        assert_eq!(snake_case("Foo Bar"), "foo_bar");
        assert_eq!(snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn test_single_letter_words_do_not_round_trip() {
        assert_eq!(camel_case("a_a_a"), "aAA");
        assert_eq!(snake_case("aAA"), "a_aa");
        assert_eq!(snake_case(&camel_case("a_a_a")), "a_aa");
    }

    #[test]
    fn test_leaves_pass_through() {
        for leaf in [json!(null), json!(true), json!(42), json!(1.5), json!("text")] {
            assert_eq!(camel_case_object(leaf.clone()), leaf);
            assert_eq!(snake_case_object(leaf.clone()), leaf);
        }
    }

    #[test]
    fn test_empty_containers_preserved() {
        assert_eq!(camel_case_object(json!({})), json!({}));
        assert_eq!(camel_case_object(json!([])), json!([]));
    }

    #[test]
    fn test_nested_arrays_and_objects() {
        let input = json!({
            "field_errors": [
                { "user_message": "bad", "nested_list": [{ "deep_key": 1 }] }
            ],
            "some_value": null
        });

        let expected = json!({
            "fieldErrors": [
                { "userMessage": "bad", "nestedList": [{ "deepKey": 1 }] }
            ],
            "someValue": null
        });

        assert_eq!(camel_case_object(input), expected);
    }

    #[test]
    fn test_collisions_keep_one_key() {
        let output = camel_case_object(json!({ "foo_bar": 1, "fooBar": 2 }));
        let object = output.as_object().cloned().unwrap_or_default();
        assert_eq!(object.len(), 1);
        assert!(object.contains_key("fooBar"));
    }

    #[test]
    fn test_convert_key_names_leaves_unmapped() {
        let names = HashMap::from([("two".to_string(), "blue".to_string())]);
        let converted = convert_key_names(
            json!({ "one": { "two": { "three": "four" } }, "list": [{ "two": 2 }] }),
            &names,
        );
        assert_eq!(
            converted,
            json!({ "one": { "blue": { "three": "four" } }, "list": [{ "blue": 2 }] })
        );
    }

    #[test]
    fn test_inverse_lookups_round_trip() {
        let forward = HashMap::from([("a".to_string(), "b".to_string())]);
        let backward = HashMap::from([("b".to_string(), "a".to_string())]);
        let original = json!({ "a": { "c": [ { "a": 1 } ] } });

        let round_trip = convert_key_names(convert_key_names(original.clone(), &forward), &backward);
        assert_eq!(round_trip, original);
    }
}

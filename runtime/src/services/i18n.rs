//! Internationalization service contract and message catalogs.

use crate::error::Result;
use launchpad_core::AppConfig;
use serde_json::{Map, Value};

/// Translated messages supplied at initialization.
///
/// Applications often assemble their catalog from several packages; a list
/// of catalogs is deep-merged in order, later entries winning.
#[derive(Debug, Clone, PartialEq)]
pub enum Messages {
    /// A single catalog, used as-is.
    Catalog(Value),
    /// Several catalogs merged with [`merge_messages`].
    Catalogs(Vec<Value>),
}

impl Messages {
    /// The catalog handed to the i18n service.
    #[must_use]
    pub fn merged(&self) -> Value {
        match self {
            Self::Catalog(catalog) => catalog.clone(),
            Self::Catalogs(catalogs) => merge_messages(catalogs),
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::Catalog(Value::Object(Map::new()))
    }
}

impl From<Value> for Messages {
    fn from(catalog: Value) -> Self {
        Self::Catalog(catalog)
    }
}

impl From<Vec<Value>> for Messages {
    fn from(catalogs: Vec<Value>) -> Self {
        Self::Catalogs(catalogs)
    }
}

/// Deep-merge `catalogs` into a fresh object.
///
/// Objects merge key by key, arrays merge index by index, and any other
/// value from a later catalog replaces the earlier one.
///
/// ```
/// use launchpad_runtime::services::merge_messages;
/// use serde_json::json;
///
/// let merged = merge_messages(&[
///     json!({ "en": { "greeting": "Hi" } }),
///     json!({ "en": { "farewell": "Bye" }, "fr": { "greeting": "Salut" } }),
/// ]);
/// assert_eq!(merged, json!({
///     "en": { "greeting": "Hi", "farewell": "Bye" },
///     "fr": { "greeting": "Salut" },
/// }));
/// ```
#[must_use]
pub fn merge_messages(catalogs: &[Value]) -> Value {
    let mut merged = Value::Object(Map::new());
    for catalog in catalogs {
        merge_into(&mut merged, catalog);
    }
    merged
}

fn merge_into(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(into), Value::Object(from)) => {
            for (key, value) in from {
                match into.get_mut(key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        into.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (Value::Array(into), Value::Array(from)) => {
            for (index, value) in from.iter().enumerate() {
                match into.get_mut(index) {
                    Some(existing) => merge_into(existing, value),
                    None => into.push(value.clone()),
                }
            }
        }
        (target, source) => *target = source.clone(),
    }
}

/// Internationalization service.
pub trait I18nService: Send + Sync {
    /// Install the message catalog and locale settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be installed.
    fn configure(&self, config: &AppConfig, messages: &Value) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_catalog_is_used_as_is() {
        let messages = Messages::from(json!({ "en": { "a": "b" } }));
        assert_eq!(messages.merged(), json!({ "en": { "a": "b" } }));
    }

    #[test]
    fn test_later_catalog_wins() {
        let merged = merge_messages(&[
            json!({ "en": { "a": "first" } }),
            json!({ "en": { "a": "second" } }),
        ]);
        assert_eq!(merged, json!({ "en": { "a": "second" } }));
    }

    #[test]
    fn test_arrays_merge_by_index() {
        let merged = merge_messages(&[json!({ "l": [1, 2, 3] }), json!({ "l": [9] })]);
        assert_eq!(merged, json!({ "l": [9, 2, 3] }));
    }

    #[test]
    fn test_empty_list_is_empty_object() {
        assert_eq!(Messages::Catalogs(Vec::new()).merged(), json!({}));
        assert_eq!(Messages::default().merged(), json!({}));
    }
}

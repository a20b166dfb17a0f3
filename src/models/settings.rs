/// Account settings: a dotted-path flattened map with tree reconstitution
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form per-account settings, opaque to the auth core.
///
/// Stored flat as `"ui.theme" -> "dark"` pairs; `to_tree` rebuilds the nested
/// structure the host application works with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(BTreeMap<String, String>);

impl Settings {
    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn set(&mut self, path: impl Into<String>, value: impl Into<String>) {
        self.0.insert(path.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reconstitute the nested tree from the dotted keys.
    ///
    /// A later key that descends through an existing leaf replaces it with a
    /// branch; ordering within the map makes that deterministic.
    pub fn to_tree(&self) -> Value {
        let mut root = Map::new();
        for (path, value) in &self.0 {
            let mut node = &mut root;
            let mut parts = path.split('.').peekable();
            while let Some(part) = parts.next() {
                if parts.peek().is_none() {
                    node.insert(part.to_string(), Value::String(value.clone()));
                } else {
                    let entry = node
                        .entry(part.to_string())
                        .or_insert_with(|| Value::Object(Map::new()));
                    if !entry.is_object() {
                        *entry = Value::Object(Map::new());
                    }
                    let Value::Object(next) = entry else { break };
                    node = next;
                }
            }
        }
        Value::Object(root)
    }

    /// Flatten a nested tree into dotted keys, the inverse of `to_tree`.
    pub fn from_tree(tree: &Value) -> Self {
        let mut settings = Settings::default();
        flatten("", tree, &mut settings);
        settings
    }
}

fn flatten(prefix: &str, node: &Value, out: &mut Settings) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        Value::String(s) => out.set(prefix, s.clone()),
        other => out.set(prefix, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tree_round_trip() {
        let mut settings = Settings::default();
        settings.set("ui.theme", "dark");
        settings.set("ui.sidebar.width", "240");
        settings.set("locale", "ru");

        let tree = settings.to_tree();
        assert_eq!(
            tree,
            json!({
                "ui": { "theme": "dark", "sidebar": { "width": "240" } },
                "locale": "ru",
            })
        );
        assert_eq!(Settings::from_tree(&tree), settings);
    }

    #[test]
    fn test_empty_settings_make_empty_tree() {
        assert_eq!(Settings::default().to_tree(), json!({}));
    }
}

//! Trims state attributes down to what belongs in configuration
//!
//! State records computed attributes (`id`, timestamps) next to configurable
//! ones. Rules match either the raw key or its snake_case form.

use serde_json::{Map, Value};

use crate::config::ImportConfig;
use crate::hcl::normalize;

pub struct AttributeShaper<'a> {
    config: &'a ImportConfig,
}

impl<'a> AttributeShaper<'a> {
    pub fn new(config: &'a ImportConfig) -> Self {
        Self { config }
    }

    /// Top-level attributes of `resource_type` that should be written.
    ///
    /// Returns `None` when the instance attributes are not an object.
    pub fn shape(&self, resource_type: &str, attributes: &Value) -> Option<Map<String, Value>> {
        let map = attributes.as_object()?;
        let rule = self.config.shape_for(resource_type);

        let shaped = map
            .iter()
            .filter(|(key, _)| {
                let normalized = normalize(key);
                let matches = |names: &Vec<String>| {
                    names.iter().any(|n| n == *key || *n == normalized)
                };

                if matches(&self.config.exclude_attributes) {
                    return false;
                }
                match rule {
                    Some(rule) if matches(&rule.exclude) => false,
                    Some(rule) if !rule.include.is_empty() => matches(&rule.include),
                    _ => true,
                }
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(shaped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShapeRule;
    use serde_json::json;

    fn keys(map: &Map<String, Value>) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_default_drops_id_only() {
        let config = ImportConfig::default();
        let shaper = AttributeShaper::new(&config);

        let shaped = shaper
            .shape("app", &json!({"id": "1", "name": "x", "visible": true}))
            .unwrap();
        assert_eq!(keys(&shaped), vec!["name", "visible"]);
    }

    #[test]
    fn test_include_rule_keeps_order_of_state() {
        let mut config = ImportConfig::default();
        config.shapes.insert(
            "app".to_string(),
            ShapeRule {
                include: vec!["name".to_string(), "connector_id".to_string()],
                exclude: vec![],
            },
        );
        let shaper = AttributeShaper::new(&config);

        let shaped = shaper
            .shape("app", &json!({"connectorId": 5, "extra": 1, "name": "x"}))
            .unwrap();
        assert_eq!(keys(&shaped), vec!["connectorId", "name"]);

        let other = shaper.shape("user", &json!({"extra": 1})).unwrap();
        assert_eq!(keys(&other), vec!["extra"]);
    }

    #[test]
    fn test_exclude_rule() {
        let mut config = ImportConfig::default();
        config.exclude_attributes.clear();
        config.shapes.insert(
            "user".to_string(),
            ShapeRule {
                include: vec![],
                exclude: vec!["last_login".to_string()],
            },
        );
        let shaper = AttributeShaper::new(&config);

        let shaped = shaper
            .shape("user", &json!({"id": "7", "lastLogin": "yesterday", "email": "a@b"}))
            .unwrap();
        assert_eq!(keys(&shaped), vec!["id", "email"]);
    }

    #[test]
    fn test_non_object_attributes() {
        let config = ImportConfig::default();
        let shaper = AttributeShaper::new(&config);

        assert!(shaper.shape("app", &Value::Null).is_none());
        assert!(shaper.shape("app", &json!([1, 2])).is_none());
    }
}

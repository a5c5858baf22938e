//! Layering of configuration files.
//!
//! # Merge Rules
//!
//! - Mappings are merged recursively, so `settings` keys override one by one
//! - Sequences are replaced entirely: a later `requirements` list wins whole
//! - A null value deletes the key (`requirements: ~` restores the built-ins)
//! - Scalars in the overlay replace scalars in the base

use serde_yaml::Value;

/// Deep merge `overlay` onto `base`.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut result = base_map.clone();

            for (key, overlay_value) in overlay_map {
                if overlay_value.is_null() {
                    result.remove(key);
                } else if let Some(base_value) = base_map.get(key) {
                    result.insert(key.clone(), deep_merge(base_value, overlay_value));
                } else {
                    result.insert(key.clone(), overlay_value.clone());
                }
            }

            Value::Mapping(result)
        }

        // Overlay is not a mapping, or base is not a mapping: overlay wins
        (_, overlay) => overlay.clone(),
    }
}

/// Merge configs in order; the last has the highest priority.
///
/// An empty file parses to null and leaves the accumulated value alone.
pub fn merge_configs(configs: &[Value]) -> Value {
    configs
        .iter()
        .filter(|c| !c.is_null())
        .fold(Value::Mapping(Default::default()), |acc, config| {
            deep_merge(&acc, config)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn settings_merge_key_by_key() {
        let base = yaml("settings:\n  output: verbose\n  check_network: false\n");
        let overlay = yaml("settings:\n  output: quiet\n");

        let result = deep_merge(&base, &overlay);

        assert_eq!(result["settings"]["output"], "quiet");
        assert_eq!(result["settings"]["check_network"], false);
    }

    #[test]
    fn requirement_lists_are_replaced() {
        let base = yaml("requirements:\n  - name: node\n  - name: claude\n");
        let overlay = yaml("requirements:\n  - name: rg\n");

        let result = deep_merge(&base, &overlay);
        let list = result["requirements"].as_sequence().unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["name"], "rg");
    }

    #[test]
    fn null_removes_key() {
        let base = yaml("requirements:\n  - name: node\nsettings:\n  output: quiet\n");
        let overlay = yaml("requirements: ~\n");

        let result = deep_merge(&base, &overlay);

        assert!(result.get("requirements").is_none());
        assert_eq!(result["settings"]["output"], "quiet");
    }

    #[test]
    fn merge_configs_applies_in_order_and_skips_empty_files() {
        let configs = vec![
            yaml("settings:\n  output: verbose\n"),
            Value::Null,
            yaml("settings:\n  output: silent\n"),
        ];
        let result = merge_configs(&configs);
        assert_eq!(result["settings"]["output"], "silent");
    }

    #[test]
    fn merge_of_nothing_is_empty_mapping() {
        assert!(merge_configs(&[]).is_mapping());
    }
}

//! Project label rendering

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Display;

/// Render labels as `k=v,k=v`, sorted by key
pub fn display_labels<K, V, I>(labels: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Display,
{
    let sorted: BTreeMap<String, String> = labels
        .into_iter()
        .map(|(k, v)| (k.into(), v.to_string()))
        .collect();

    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Labels of a project payload; non-string values are skipped
pub fn project_labels(project: &Value) -> BTreeMap<String, String> {
    project
        .get("labels")
        .and_then(|v| v.as_object())
        .map(|labels| {
            labels
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_sorted_by_key() {
        let labels: HashMap<&str, &str> = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(display_labels(labels), "a=1,b=2");
    }

    #[test]
    fn test_empty_labels() {
        assert_eq!(display_labels(Vec::<(String, String)>::new()), "");
    }

    #[test]
    fn test_project_labels() {
        let project = json!({
            "projectId": "p",
            "labels": {"env": "prod", "team": "infra", "bogus": 3}
        });
        let labels = project_labels(&project);
        assert_eq!(display_labels(&labels), "env=prod,team=infra");
        assert!(project_labels(&json!({"projectId": "p"})).is_empty());
    }
}

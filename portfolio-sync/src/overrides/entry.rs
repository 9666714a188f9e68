//! A single override entry.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Operator-authored metadata for one repository.
///
/// Every field is optional; set fields take precedence over what GitHub
/// reports. Keys this tool does not know about are kept so the file
/// survives a rewrite unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Override {
    /// Short description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Technologies shown on the project card.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,

    /// Gallery filter category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Whether the project is pinned to the top of the gallery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,

    /// Absolute URL or repository-relative path of a preview image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mockup: Option<String>,

    /// Long-form description shown in the project dialog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,

    /// Explicit visibility. `None` leaves the decision to the staleness rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,

    /// Unrecognised keys, and known keys whose value had the wrong type.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Override {
    /// Reads one entry of the override file.
    ///
    /// Fields are read independently. A field with the wrong type is logged
    /// and not applied, but stays in [`Override::extra`] so a rewrite keeps
    /// it; the rest of the entry still applies. Returns `None` when the entry
    /// is not a JSON object.
    pub fn from_value(repo: &str, value: Value) -> Option<Self> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                warn!(repo, value = %other, "Ignoring override entry that is not an object");
                return None;
            }
        };

        let mut entry = Self::default();
        for (key, value) in fields {
            let applied = match key.as_str() {
                "description" => read(&value).map(|v| entry.description = v),
                "techStack" => read(&value).map(|v| entry.tech_stack = v),
                "category" => read(&value).map(|v| entry.category = v),
                "featured" => read(&value).map(|v| entry.featured = v),
                "mockup" => read(&value).map(|v| entry.mockup = v),
                "longDescription" => read(&value).map(|v| entry.long_description = v),
                "hidden" => read(&value).map(|v| entry.hidden = v),
                _ => {
                    entry.extra.insert(key, value);
                    continue;
                }
            };

            if let Err(e) = applied {
                warn!(repo, field = %key, error = %e, "Ignoring override field with unexpected type");
                entry.extra.insert(key, value);
            }
        }

        Some(entry)
    }
}

fn read<T: DeserializeOwned>(value: &Value) -> Result<T, serde_json::Error> {
    Deserialize::deserialize(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hidden_is_tri_state() {
        let shown = Override::from_value("a", json!({ "hidden": false })).unwrap();
        let hidden = Override::from_value("a", json!({ "hidden": true })).unwrap();
        let unset = Override::from_value("a", json!({})).unwrap();

        assert_eq!(shown.hidden, Some(false));
        assert_eq!(hidden.hidden, Some(true));
        assert_eq!(unset.hidden, None);
    }

    #[test]
    fn keeps_unknown_keys_on_rewrite() {
        let value = json!({
            "techStack": ["Rust", "Tokio"],
            "category": "Tools",
            "notes": "keep me"
        });
        let entry = Override::from_value("a", value.clone()).unwrap();

        assert_eq!(
            entry.tech_stack,
            Some(vec!["Rust".to_string(), "Tokio".to_string()])
        );
        assert_eq!(entry.extra.get("notes"), Some(&json!("keep me")));
        assert_eq!(serde_json::to_value(&entry).unwrap(), value);
    }

    #[test]
    fn ill_typed_field_is_skipped_and_kept() {
        let value = json!({
            "featured": "yes",
            "category": "Games",
            "hidden": false
        });
        let entry = Override::from_value("a", value.clone()).unwrap();

        assert_eq!(entry.featured, None);
        assert_eq!(entry.category.as_deref(), Some("Games"));
        assert_eq!(entry.hidden, Some(false));
        assert_eq!(serde_json::to_value(&entry).unwrap(), value);
    }

    #[test]
    fn null_field_counts_as_unset() {
        let entry = Override::from_value("a", json!({ "description": null })).unwrap();

        assert_eq!(entry.description, None);
        assert!(entry.extra.is_empty());
    }

    #[test]
    fn non_object_entry_is_ignored() {
        assert_eq!(Override::from_value("a", json!("hidden")), None);
        assert_eq!(Override::from_value("a", json!(null)), None);
    }
}

use serde::{Deserialize, Serialize};

/// A label used to classify spending records, either bundled with the seed data or added by the
/// user.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Category {
    pub(crate) id: u64,
    /// The category name. Unique across seed and custom categories.
    #[serde(rename = "category")]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) description: String,
}

impl Category {
    pub fn new(id: u64, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }

    /// Creates a user-defined category with the standard description.
    pub fn custom(id: u64, name: impl Into<String>) -> Self {
        let name = name.into();
        let description = format!("Custom category: {name}");
        Self::new(id, name, description)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_description() {
        let c = Category::custom(9, "Pets");
        assert_eq!(c.description(), "Custom category: Pets");
    }

    #[test]
    fn test_json_field_names() {
        let c: Category =
            serde_json::from_str(r#"{"id": 1, "category": "Food", "description": "Meals"}"#)
                .unwrap();
        assert_eq!(c.name(), "Food");
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["category"], "Food");
    }

    #[test]
    fn test_missing_description_defaults_to_empty() {
        let c: Category = serde_json::from_str(r#"{"id": 2, "category": "Rent"}"#).unwrap();
        assert_eq!(c.description(), "");
    }
}

//! Category records and their partial updates.

use serde::{Deserialize, Deserializer, Serialize};

use gearlog_core::{CategoryId, Entity};

/// A named grouping of inventory items, optionally with a display image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// URI of the display image, as handed over by the image picker.
    pub image: Option<String>,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Case-insensitive name comparison, ignoring surrounding whitespace.
    pub fn is_named(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }

    /// Merge the fields present in `patch` into this record.
    pub fn apply(&mut self, patch: &CategoryPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(image) = &patch.image {
            self.image = image.clone();
        }
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Partial update for a [`Category`]. `None` leaves the field untouched.
///
/// `image: Some(None)` clears the image and is written as `"image": null`;
/// an absent key leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_field"
    )]
    pub image: Option<Option<String>>,
}

impl CategoryPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn image(image: Option<String>) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = Some(image);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.image.is_none()
    }
}

// Only called when the key is present, so an explicit null becomes `Some(None)`.
fn present_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_only_touches_patched_fields() {
        let mut cat = Category::new("1", "Laptops").with_image("laptop.png");
        cat.apply(&CategoryPatch::name("Notebooks"));
        assert_eq!(cat.name, "Notebooks");
        assert_eq!(cat.image.as_deref(), Some("laptop.png"));

        cat.apply(&CategoryPatch::image(None));
        assert_eq!(cat.name, "Notebooks");
        assert_eq!(cat.image, None);
    }

    #[test]
    fn name_matching_ignores_case_and_padding() {
        let cat = Category::new("2", "Keyboards");
        assert!(cat.is_named("keyboards"));
        assert!(cat.is_named("  KEYBOARDS "));
        assert!(!cat.is_named("Keyboard"));
    }

    #[test]
    fn serializes_in_camel_case() {
        let cat = Category::new("3", "Monitors");
        let json = serde_json::to_value(&cat).unwrap();
        assert_eq!(json["id"], "3");
        assert_eq!(json["name"], "Monitors");
        assert!(json["image"].is_null());
    }

    #[test]
    fn clearing_patch_survives_json() {
        let patch = CategoryPatch::image(None);
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"image":null}"#);

        let decoded: CategoryPatch = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, patch);

        let mut cat = Category::new("1", "Laptops").with_image("laptop.png");
        cat.apply(&decoded);
        assert_eq!(cat.image, None);
    }

    #[test]
    fn absent_keys_leave_fields_untouched() {
        assert_eq!(serde_json::to_string(&CategoryPatch::default()).unwrap(), "{}");
        let decoded: CategoryPatch = serde_json::from_str(r#"{"name":"Notebooks"}"#).unwrap();
        assert_eq!(decoded, CategoryPatch::name("Notebooks"));
    }
}

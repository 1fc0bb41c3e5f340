use marketdesk_core::{AppError, AppResult, RecordId};
use serde::{Deserialize, Serialize};

use crate::resource::{MutationKind, Record, Resource, ResourceInput};
use crate::upload::UploadFile;
use crate::view::{FieldValue, Queryable};

/// Product category shown to suppliers and clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Record identifier.
    pub id: RecordId,
    /// English name.
    pub name: String,
    /// Arabic name.
    #[serde(default)]
    pub name_ar: String,
    /// Icon path or URL, when one was uploaded.
    #[serde(default)]
    pub icon: Option<String>,
    /// Whether the category is offered.
    #[serde(default)]
    pub is_active: bool,
}

impl Category {
    /// Returns the icon to render, falling back to a placeholder.
    #[must_use]
    pub fn icon_or_placeholder(&self) -> &str {
        self.icon
            .as_deref()
            .filter(|icon| !icon.trim().is_empty())
            .unwrap_or(CATEGORY_ICON_PLACEHOLDER)
    }
}

/// Placeholder rendered when a category has no usable icon.
pub const CATEGORY_ICON_PLACEHOLDER: &str = "/static/category-placeholder.svg";

/// Searchable and sortable category fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    /// English name.
    Name,
    /// Arabic name.
    NameAr,
    /// Active flag.
    IsActive,
}

impl Queryable for Category {
    type Field = CategoryField;

    fn search_fields() -> &'static [CategoryField] {
        &[CategoryField::Name, CategoryField::NameAr]
    }

    fn field_value(&self, field: CategoryField) -> FieldValue {
        match field {
            CategoryField::Name => FieldValue::text(self.name.as_str()),
            CategoryField::NameAr => FieldValue::text(self.name_ar.as_str()),
            CategoryField::IsActive => FieldValue::Bool(self.is_active),
        }
    }
}

impl Record for Category {
    const LABEL: &'static str = "category";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Category form payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInput {
    /// English name.
    pub name: String,
    /// Arabic name.
    pub name_ar: String,
    /// Whether the category is offered.
    pub is_active: bool,
    /// Newly picked icon; sent as multipart when present.
    #[serde(skip)]
    pub icon: Option<UploadFile>,
}

impl ResourceInput for CategoryInput {
    fn validate(&self, _kind: MutationKind) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_owned()));
        }

        if self.name_ar.trim().is_empty() {
            return Err(AppError::Validation("name_ar is required".to_owned()));
        }

        Ok(())
    }

    fn upload(&self) -> Option<(&'static str, &UploadFile)> {
        self.icon.as_ref().map(|icon| ("icon", icon))
    }
}

impl Resource for Category {
    type Input = CategoryInput;

    fn provisional(id: RecordId, input: &CategoryInput) -> Self {
        Self {
            id,
            name: input.name.trim().to_owned(),
            name_ar: input.name_ar.trim().to_owned(),
            icon: None,
            is_active: input.is_active,
        }
    }

    fn merged(&self, input: &CategoryInput) -> Self {
        Self {
            icon: self.icon.clone(),
            ..Self::provisional(self.id, input)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::UploadRule;

    fn input(name: &str, name_ar: &str) -> CategoryInput {
        CategoryInput {
            name: name.to_owned(),
            name_ar: name_ar.to_owned(),
            is_active: true,
            icon: None,
        }
    }

    #[test]
    fn both_names_are_required() {
        assert!(input("Drinks", "مشروبات").validate(MutationKind::Create).is_ok());
        assert!(input("Drinks", " ").validate(MutationKind::Create).is_err());
        assert!(input("", "مشروبات").validate(MutationKind::Update).is_err());
    }

    #[test]
    fn merge_keeps_existing_icon() {
        let category = Category {
            id: RecordId::new(3),
            name: "Drinks".to_owned(),
            name_ar: "مشروبات".to_owned(),
            icon: Some("/icons/drinks.png".to_owned()),
            is_active: true,
        };
        let merged = category.merged(&input("Beverages", "مشروبات"));
        assert_eq!(merged.name, "Beverages");
        assert_eq!(merged.icon.as_deref(), Some("/icons/drinks.png"));
    }

    #[test]
    fn icon_upload_uses_icon_field() {
        let icon = UploadFile::new("i.png", "image/png", vec![1], UploadRule::ICON)
            .unwrap_or_else(|_| panic!("test"));
        let input = CategoryInput {
            icon: Some(icon),
            ..input("Drinks", "مشروبات")
        };
        assert_eq!(input.upload().map(|(field, _)| field), Some("icon"));
        let json = serde_json::to_value(&input).unwrap_or_default();
        assert!(json.get("icon").is_none());
    }

    #[test]
    fn blank_icon_falls_back_to_placeholder() {
        let category = Category {
            id: RecordId::new(1),
            name: "Snacks".to_owned(),
            name_ar: "وجبات".to_owned(),
            icon: Some(String::new()),
            is_active: false,
        };
        assert_eq!(category.icon_or_placeholder(), CATEGORY_ICON_PLACEHOLDER);
    }
}

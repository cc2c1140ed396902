use serde::Deserialize;
use validator::Validate;

use crate::domain::category::NewCategory;
use crate::domain::types::{CategoryName, CategorySlug};
use crate::forms::{FormError, check, non_blank, validation_errors};

fn default_true() -> bool {
    true
}

/// Body of the create and update category endpoints.
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 1, max = 255, message = "The name must be 1 to 255 characters."))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "The slug must be 1 to 255 characters."))]
    pub slug: String,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFormPayload {
    pub category: NewCategory,
}

impl TryFrom<CategoryForm> for CategoryFormPayload {
    type Error = FormError;

    fn try_from(value: CategoryForm) -> Result<Self, Self::Error> {
        let mut errors = validation_errors(&value);

        let name = check(&mut errors, "name", CategoryName::new(value.name));
        let slug = check(&mut errors, "slug", CategorySlug::new(value.slug));

        let (Some(name), Some(slug)) = (name, slug) else {
            return Err(errors.into());
        };
        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(Self {
            category: NewCategory {
                name,
                slug,
                description: non_blank(value.description),
                is_active: value.is_active,
            },
        })
    }
}

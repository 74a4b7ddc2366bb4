use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::NewCategory;
use crate::forms::sanitize_inline_text;

/// Result type returned by the admin form helpers.
pub type AdminFormResult<T> = Result<T, AdminFormError>;

/// Errors that can occur while processing admin forms.
#[derive(Debug, Error)]
pub enum AdminFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("category name cannot be empty")]
    EmptyName,
}

/// Form payload emitted when adding a category.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCategoryForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

impl AddCategoryForm {
    /// Validates and sanitizes the payload into a domain `NewCategory`.
    pub fn into_new_category(self) -> AdminFormResult<NewCategory> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(AdminFormError::EmptyName);
        }

        Ok(NewCategory::new(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_form_trims_the_name() {
        let form = AddCategoryForm {
            name: "  Dairy  ".to_string(),
        };

        let new_category = form.into_new_category().expect("expected success");
        assert_eq!(new_category.name, "Dairy");
    }

    #[test]
    fn category_form_rejects_blank_names() {
        let form = AddCategoryForm {
            name: "   ".to_string(),
        };

        assert!(matches!(
            form.into_new_category(),
            Err(AdminFormError::EmptyName)
        ));
    }
}

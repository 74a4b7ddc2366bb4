use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::user::{NewUser, UpdateProfile, UserRole};
use crate::forms::{sanitize_inline_text, sanitize_multiline_text};

/// Result type returned by the account form helpers.
pub type AuthFormResult<T> = Result<T, AuthFormError>;

/// Errors that can occur while processing account forms.
#[derive(Debug, Error)]
pub enum AuthFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("name cannot be empty")]
    EmptyName,
    /// Registration asked for a role that cannot be self-assigned.
    #[error("invalid role `{value}`")]
    InvalidRole { value: String },
}

/// Form payload emitted by the login page.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl LoginForm {
    /// Normalizes the email for lookup and validates the payload.
    pub fn normalized(mut self) -> AuthFormResult<Self> {
        self.email = self.email.trim().to_lowercase();
        self.validate()?;
        Ok(self)
    }
}

/// Form payload emitted by the registration page.
///
/// Only farmer and customer accounts can be self-registered.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(max = 15))]
    pub phone: Option<String>,
    pub role: String,
    #[validate(length(max = 100))]
    pub farm_name: Option<String>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
}

impl RegisterForm {
    /// The role requested by the form.
    pub fn requested_role(&self) -> AuthFormResult<UserRole> {
        match self.role.trim() {
            "farmer" => Ok(UserRole::Farmer),
            "customer" => Ok(UserRole::Customer),
            other => Err(AuthFormError::InvalidRole {
                value: other.to_string(),
            }),
        }
    }

    /// Validates and sanitizes the payload into a domain `NewUser`.
    ///
    /// The password is hashed by the caller; only the hash reaches the
    /// domain payload.
    pub fn into_new_user(self, password_hash: String) -> AuthFormResult<NewUser> {
        self.validate()?;

        let role = self.requested_role()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(AuthFormError::EmptyName);
        }

        let mut new_user = NewUser::new(name, self.email.trim(), password_hash, role);

        if let Some(phone) = nonempty(self.phone.as_deref()) {
            new_user = new_user.with_phone(phone);
        }

        if role == UserRole::Farmer {
            if let Some(farm_name) = nonempty(self.farm_name.as_deref()) {
                new_user = new_user.with_farm_name(farm_name);
            }
            if let Some(location) = nonempty(self.location.as_deref()) {
                new_user = new_user.with_location(location);
            }
        }

        Ok(new_user)
    }
}

/// Form payload emitted by the profile editor.
#[derive(Debug, Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 15))]
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub farm_name: Option<String>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
}

impl ProfileForm {
    /// Validates and sanitizes the payload into a domain `UpdateProfile`.
    ///
    /// Empty optional fields clear the stored value. Farm details are only
    /// applied to farmer accounts.
    pub fn into_update_profile(self, role: UserRole) -> AuthFormResult<UpdateProfile> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(AuthFormError::EmptyName);
        }

        let mut updates = UpdateProfile::new()
            .name(name)
            .phone(nonempty(self.phone.as_deref()))
            .bio(nonempty_multiline(self.bio.as_deref()))
            .address(nonempty_multiline(self.address.as_deref()));

        if role == UserRole::Farmer {
            updates = updates
                .farm_name(nonempty(self.farm_name.as_deref()))
                .location(nonempty(self.location.as_deref()));
        }

        Ok(updates)
    }
}

fn nonempty(value: Option<&str>) -> Option<String> {
    value
        .map(sanitize_inline_text)
        .filter(|value| !value.is_empty())
}

fn nonempty_multiline(value: Option<&str>) -> Option<String> {
    value
        .map(sanitize_multiline_text)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_form(role: &str) -> RegisterForm {
        RegisterForm {
            name: "  Greta  Greenfield ".to_string(),
            email: "Greta@Farm.example".to_string(),
            password: "correct horse".to_string(),
            phone: Some(" 555-0101 ".to_string()),
            role: role.to_string(),
            farm_name: Some("Greenfield Farm".to_string()),
            location: Some("Springfield".to_string()),
        }
    }

    #[test]
    fn register_form_builds_farmer_payload() {
        let new_user = register_form("farmer")
            .into_new_user("hash".to_string())
            .expect("expected success");

        assert_eq!(new_user.name, "Greta Greenfield");
        assert_eq!(new_user.email, "greta@farm.example");
        assert_eq!(new_user.role, UserRole::Farmer);
        assert_eq!(new_user.phone.as_deref(), Some("555-0101"));
        assert_eq!(new_user.farm_name.as_deref(), Some("Greenfield Farm"));
        assert!(!new_user.is_approved);
    }

    #[test]
    fn register_form_rejects_admin_role() {
        let result = register_form("admin").into_new_user("hash".to_string());

        assert!(matches!(
            result,
            Err(AuthFormError::InvalidRole { value }) if value == "admin"
        ));
    }

    #[test]
    fn register_form_rejects_short_password() {
        let mut form = register_form("customer");
        form.password = "short".to_string();

        assert!(matches!(
            form.into_new_user("hash".to_string()),
            Err(AuthFormError::Validation(_))
        ));
    }

    #[test]
    fn profile_form_clears_emptied_fields() {
        let form = ProfileForm {
            name: "Greta".to_string(),
            phone: Some("  ".to_string()),
            bio: Some("Growing greens.".to_string()),
            address: None,
            farm_name: Some("Greenfield Farm".to_string()),
            location: None,
        };

        let updates = form
            .into_update_profile(UserRole::Customer)
            .expect("expected success");

        assert_eq!(updates.name.as_deref(), Some("Greta"));
        assert!(matches!(updates.phone, Some(None)));
        assert_eq!(
            updates.bio.as_ref().and_then(|value| value.as_deref()),
            Some("Growing greens.")
        );
        // farm details are ignored for non-farmers
        assert!(updates.farm_name.is_none());
        assert!(updates.location.is_none());
    }
}

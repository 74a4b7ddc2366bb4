use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Roles a marketplace account can hold.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Moderates farmers, products and categories.
    Admin,
    /// Lists produce for sale; must be approved before logging in.
    Farmer,
    /// Browses and buys.
    Customer,
}

impl From<&str> for UserRole {
    fn from(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            "farmer" => Self::Farmer,
            _ => Self::Customer,
        }
    }
}

impl From<UserRole> for &'static str {
    fn from(value: UserRole) -> Self {
        match value {
            UserRole::Admin => "admin",
            UserRole::Farmer => "farmer",
            UserRole::Customer => "customer",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(<&str>::from(*self))
    }
}

/// Domain representation of a marketplace account.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    /// Unique identifier of the user.
    pub id: i32,
    /// Display name shown across the site.
    pub name: String,
    /// Login email, stored lowercased.
    pub email: String,
    /// Argon2 hash of the password; never rendered.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role held by this account.
    pub role: UserRole,
    /// Optional contact phone number.
    pub phone: Option<String>,
    /// Optional free-form profile text.
    pub bio: Option<String>,
    /// Optional postal address, prefilled at checkout.
    pub address: Option<String>,
    /// Farm name, for farmer accounts.
    pub farm_name: Option<String>,
    /// Farm location, for farmer accounts.
    pub location: Option<String>,
    /// Whether the account may log in. Farmers start unapproved.
    pub is_approved: bool,
    /// Timestamp for when the account was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the account.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub farm_name: Option<String>,
    pub location: Option<String>,
    /// Farmers wait for an admin; everyone else is approved at once.
    pub is_approved: bool,
}

impl NewUser {
    /// Build a new account payload. Approval is derived from the role.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into().to_lowercase(),
            password_hash: password_hash.into(),
            role,
            phone: None,
            farm_name: None,
            location: None,
            is_approved: role != UserRole::Farmer,
        }
    }

    /// Attach a contact phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Attach a farm name for a farmer account.
    pub fn with_farm_name(mut self, farm_name: impl Into<String>) -> Self {
        self.farm_name = Some(farm_name.into());
        self
    }

    /// Attach a farm location for a farmer account.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Patch data applied when a user edits their own profile.
#[derive(Debug, Clone)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub phone: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub farm_name: Option<Option<String>>,
    pub location: Option<Option<String>>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateProfile {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        Self {
            name: None,
            phone: None,
            bio: None,
            address: None,
            farm_name: None,
            location: None,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    /// Update the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Update the phone number, using `None` to clear it.
    pub fn phone(mut self, phone: Option<impl Into<String>>) -> Self {
        self.phone = Some(phone.map(|value| value.into()));
        self
    }

    /// Update the profile text, using `None` to clear it.
    pub fn bio(mut self, bio: Option<impl Into<String>>) -> Self {
        self.bio = Some(bio.map(|value| value.into()));
        self
    }

    /// Update the postal address, using `None` to clear it.
    pub fn address(mut self, address: Option<impl Into<String>>) -> Self {
        self.address = Some(address.map(|value| value.into()));
        self
    }

    /// Update the farm name, using `None` to clear it.
    pub fn farm_name(mut self, farm_name: Option<impl Into<String>>) -> Self {
        self.farm_name = Some(farm_name.map(|value| value.into()));
        self
    }

    /// Update the farm location, using `None` to clear it.
    pub fn location(mut self, location: Option<impl Into<String>>) -> Self {
        self.location = Some(location.map(|value| value.into()));
        self
    }
}

/// Query definition used to list accounts.
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    /// Optional role filter.
    pub role: Option<UserRole>,
}

impl UserListQuery {
    /// Construct a query matching every account.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by role.
    pub fn role(mut self, role: UserRole) -> Self {
        self.role = Some(role);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_text() {
        for role in [UserRole::Admin, UserRole::Farmer, UserRole::Customer] {
            let text: &str = role.into();
            assert_eq!(UserRole::from(text), role);
        }
    }

    #[test]
    fn unknown_role_text_falls_back_to_customer() {
        assert_eq!(UserRole::from("superuser"), UserRole::Customer);
    }

    #[test]
    fn farmers_start_unapproved() {
        let farmer = NewUser::new("Ann", "ANN@Farm.example", "hash", UserRole::Farmer);
        assert!(!farmer.is_approved);
        assert_eq!(farmer.email, "ann@farm.example");

        let customer = NewUser::new("Bob", "bob@example.com", "hash", UserRole::Customer);
        assert!(customer.is_approved);
    }
}

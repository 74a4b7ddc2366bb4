use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Domain representation of a product category.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Category {
    /// Unique identifier of the category.
    pub id: i32,
    /// Unique human-readable name.
    pub name: String,
    /// Timestamp for when the category was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the category.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Domain representation of a produce listing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Owning farmer identifier.
    pub farmer_id: i32,
    /// Optional category reference.
    pub category_id: Option<i32>,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional longer description shown to customers.
    pub description: Option<String>,
    /// Price in cents.
    pub price_cents: i32,
    /// Units currently on hand. Decremented only by a committed checkout.
    pub quantity: i32,
    /// Whether an admin has approved the listing for sale.
    pub is_approved: bool,
    /// Timestamp for when the listing was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the listing.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new listing. Listings start unapproved.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub farmer_id: i32,
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i32,
    pub quantity: i32,
}

impl NewProduct {
    /// Build a new listing payload with the supplied details.
    pub fn new(farmer_id: i32, name: impl Into<String>, price_cents: i32, quantity: i32) -> Self {
        Self {
            farmer_id,
            category_id: None,
            name: name.into(),
            description: None,
            price_cents,
            quantity,
        }
    }

    /// Attach a descriptive text to the listing payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a category to the listing payload.
    pub fn with_category(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Patch data applied when updating an existing listing.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    /// Optional name update.
    pub name: Option<String>,
    /// Optional description update.
    pub description: Option<Option<String>>,
    /// Optional price update in cents.
    pub price_cents: Option<i32>,
    /// Optional stock update.
    pub quantity: Option<i32>,
    /// Optional category update, using `None` to clear the value.
    pub category_id: Option<Option<i32>>,
    /// Optional approval change.
    pub is_approved: Option<bool>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateProduct {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateProduct {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        Self {
            name: None,
            description: None,
            price_cents: None,
            quantity: None,
            category_id: None,
            is_approved: None,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    /// Update the product name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Update the description, using `None` to clear an existing value.
    pub fn description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = Some(description.map(|value| value.into()));
        self
    }

    /// Update the price.
    pub fn price_cents(mut self, price_cents: i32) -> Self {
        self.price_cents = Some(price_cents);
        self
    }

    /// Update the stock on hand.
    pub fn quantity(mut self, quantity: i32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Update the category, using `None` to clear the value.
    pub fn category_id(mut self, category_id: Option<i32>) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Approve or unapprove the listing.
    pub fn approved(mut self, is_approved: bool) -> Self {
        self.is_approved = Some(is_approved);
        self
    }
}

/// Query definition used to list products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Optional owning-farmer filter.
    pub farmer_id: Option<i32>,
    /// Optional category filter.
    pub category_id: Option<i32>,
    /// When set, only approved listings are returned.
    pub approved_only: bool,
    /// Optional name or description search term.
    pub search: Option<String>,
}

impl ProductListQuery {
    /// Construct a query matching every listing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by owning farmer.
    pub fn farmer(mut self, farmer_id: i32) -> Self {
        self.farmer_id = Some(farmer_id);
        self
    }

    /// Filter the results by category.
    pub fn category(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Restrict the results to approved listings.
    pub fn approved_only(mut self) -> Self {
        self.approved_only = true;
        self
    }

    /// Filter the results by a search term applied to the name or description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}

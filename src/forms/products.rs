use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, UpdateProduct};
use crate::forms::{sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: u64 = 128;

/// Largest accepted whole-unit price; keeps the cents total inside `i32`.
const PRICE_MAX_WHOLE_DIGITS: usize = 7;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("product name cannot be empty")]
    EmptyName,
    /// The provided price is not a non-negative decimal amount.
    #[error("invalid price `{value}`")]
    InvalidPrice { value: String },
    /// The provided category id is not a number.
    #[error("invalid category `{value}`")]
    InvalidCategory { value: String },
}

/// Form payload emitted when adding or editing a listing.
///
/// The same form backs both flows; an edit overwrites every field, the way
/// the listing editor presents it.
#[derive(Debug, Deserialize, Validate)]
pub struct ProductForm {
    /// Name entered by the farmer.
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Price as a decimal string, e.g. `4.50`.
    pub price: String,
    /// Units offered for sale.
    #[validate(range(min = 0))]
    pub quantity: i32,
    /// Category select value; an empty string means "no category".
    pub category_id: Option<String>,
}

impl ProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self, farmer_id: i32) -> ProductFormResult<NewProduct> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let price_cents = parse_price_cents(&self.price)?;
        let category_id = parse_category_id(self.category_id.as_deref())?;

        let mut new_product = NewProduct::new(farmer_id, name, price_cents, self.quantity);

        if let Some(description) = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty())
        {
            new_product = new_product.with_description(description);
        }

        if let Some(category_id) = category_id {
            new_product = new_product.with_category(category_id);
        }

        Ok(new_product)
    }

    /// Validates and sanitizes the payload into a domain `UpdateProduct`.
    ///
    /// Every field is overwritten; an empty description or category clears
    /// the stored value.
    pub fn into_update_product(self) -> ProductFormResult<UpdateProduct> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let price_cents = parse_price_cents(&self.price)?;
        let category_id = parse_category_id(self.category_id.as_deref())?;

        let description = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty());

        Ok(UpdateProduct::new()
            .name(name)
            .description(description)
            .price_cents(price_cents)
            .quantity(self.quantity)
            .category_id(category_id))
    }
}

/// Parses a non-negative decimal amount like `12`, `12.5` or `12.50` into cents.
fn parse_price_cents(input: &str) -> ProductFormResult<i32> {
    let invalid = || ProductFormError::InvalidPrice {
        value: input.trim().to_string(),
    };

    let trimmed = input.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }

    if whole.len() > PRICE_MAX_WHOLE_DIGITS
        || !whole.chars().all(|ch| ch.is_ascii_digit())
        || fraction.len() > 2
        || !fraction.chars().all(|ch| ch.is_ascii_digit())
    {
        return Err(invalid());
    }

    let whole: i32 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };

    let cents: i32 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i32>().map_err(|_| invalid())? * 10,
        _ => fraction.parse().map_err(|_| invalid())?,
    };

    Ok(whole * 100 + cents)
}

/// Parses the category select value; empty means "no category".
fn parse_category_id(input: Option<&str>) -> ProductFormResult<Option<i32>> {
    let Some(raw) = input.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    raw.parse::<i32>()
        .map(Some)
        .map_err(|_| ProductFormError::InvalidCategory {
            value: raw.to_string(),
        })
}

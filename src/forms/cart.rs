use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::forms::sanitize_multiline_text;

/// Result type returned by the cart form helpers.
pub type CartFormResult<T> = Result<T, CartFormError>;

/// Errors that can occur while processing cart forms.
#[derive(Debug, Error)]
pub enum CartFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The shipping address is empty after sanitization.
    #[error("shipping address cannot be empty")]
    EmptyAddress,
}

/// Form payload emitted by the quantity controls on the cart page.
///
/// A quantity of zero or less removes the line, so no lower bound is
/// validated here.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub quantity: i32,
}

/// Form payload emitted by the checkout page.
#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutForm {
    #[validate(length(min = 1, max = 500))]
    pub shipping_address: String,
}

impl CheckoutForm {
    /// Validates and sanitizes the shipping address.
    pub fn into_shipping_address(self) -> CartFormResult<String> {
        self.validate()?;

        let address = sanitize_multiline_text(&self.shipping_address);
        if address.is_empty() {
            return Err(CartFormError::EmptyAddress);
        }

        Ok(address)
    }
}

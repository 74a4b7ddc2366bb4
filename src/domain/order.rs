use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One purchased line inside a committed order.
///
/// `name` and `price_cents` are snapshots taken at commit time, so later
/// edits to the product leave the order record untouched.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderItem {
    /// Product reference; cleared if the product is later deleted.
    pub product_id: Option<i32>,
    /// Product name at purchase time.
    pub name: String,
    /// Units purchased.
    pub quantity: i32,
    /// Price per unit at purchase time, in cents.
    pub price_cents: i32,
}

impl OrderItem {
    /// Total cost of this line in cents.
    pub fn line_total_cents(&self) -> i64 {
        i64::from(self.price_cents) * i64::from(self.quantity)
    }
}

/// Domain representation of a committed order. Immutable once created.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Order {
    /// Unique identifier of the order.
    pub id: i32,
    /// Owning customer identifier.
    pub customer_id: i32,
    /// Shipping address captured at checkout.
    pub shipping_address: String,
    /// Purchased lines, in the order they sat in the cart.
    pub items: Vec<OrderItem>,
    /// Timestamp for when the order was committed.
    pub created_at: NaiveDateTime,
}

impl Order {
    /// Total cost of the order in cents.
    pub fn total_cents(&self) -> i64 {
        self.items.iter().map(OrderItem::line_total_cents).sum()
    }
}

/// One requested line inside a checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: i32,
    pub quantity: i32,
}

impl NewOrderItem {
    pub fn new(product_id: i32, quantity: i32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Payload handed to the checkout transaction.
///
/// Item order is preserved end to end: items are validated, written and
/// reported in the order they appear here.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Owning customer identifier.
    pub customer_id: i32,
    /// Shipping address supplied at checkout.
    pub shipping_address: String,
    /// Requested lines, in cart insertion order.
    pub items: Vec<NewOrderItem>,
    /// Timestamp captured when the payload was created.
    pub created_at: NaiveDateTime,
}

impl NewOrder {
    /// Build a checkout payload with the supplied details and current timestamp.
    pub fn new(customer_id: i32, shipping_address: impl Into<String>) -> Self {
        Self {
            customer_id,
            shipping_address: shipping_address.into(),
            items: Vec::new(),
            created_at: chrono::Local::now().naive_utc(),
        }
    }

    /// Attach the requested lines to the payload.
    pub fn with_items(mut self, items: impl IntoIterator<Item = NewOrderItem>) -> Self {
        self.items = items.into_iter().collect();
        self
    }
}

/// Query definition used to list orders.
#[derive(Debug, Clone, Default)]
pub struct OrderListQuery {
    /// Optional owning-customer filter.
    pub customer_id: Option<i32>,
}

impl OrderListQuery {
    /// Construct a query matching every order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by owning customer.
    pub fn customer(mut self, customer_id: i32) -> Self {
        self.customer_id = Some(customer_id);
        self
    }
}

use serde::{Deserialize, Serialize};

/// One (product, quantity) line inside a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: i32,
    pub quantity: i32,
}

/// Ephemeral per-session cart.
///
/// A value object serialized into the browser session: an
/// insertion-ordered list of lines with map semantics (at most one line
/// per product, quantity always >= 1). It is read from the session, passed
/// around by value and written back wholesale after every mutation; it is
/// never persisted in the database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Requested quantity for `product_id`, if present.
    pub fn quantity_of(&self, product_id: i32) -> Option<i32> {
        self.lines
            .iter()
            .find(|line| line.product_id == product_id)
            .map(|line| line.quantity)
    }

    /// Increment the line for `product_id` by one, creating it at 1.
    pub fn add(&mut self, product_id: i32) {
        match self.position(product_id) {
            Some(index) => self.lines[index].quantity += 1,
            None => self.lines.push(CartLine {
                product_id,
                quantity: 1,
            }),
        }
    }

    /// Set the line for `product_id` to `quantity`.
    ///
    /// A quantity of zero or less removes the line; a cart never stores a
    /// non-positive quantity.
    pub fn set_quantity(&mut self, product_id: i32, quantity: i32) {
        if quantity <= 0 {
            self.lines.retain(|line| line.product_id != product_id);
            return;
        }

        match self.position(product_id) {
            Some(index) => self.lines[index].quantity = quantity,
            None => self.lines.push(CartLine {
                product_id,
                quantity,
            }),
        }
    }

    /// Decrement the line for `product_id` by one, removing it at zero.
    pub fn remove(&mut self, product_id: i32) {
        if let Some(index) = self.position(product_id) {
            if self.lines[index].quantity > 1 {
                self.lines[index].quantity -= 1;
            } else {
                self.lines.remove(index);
            }
        }
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn position(&self, product_id: i32) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product_id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_creates_and_increments_lines() {
        let mut cart = Cart::new();
        cart.add(7);
        cart.add(7);
        cart.add(9);

        assert_eq!(cart.quantity_of(7), Some(2));
        assert_eq!(cart.quantity_of(9), Some(1));
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn lines_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add(3);
        cart.add(1);
        cart.add(2);
        cart.add(1);

        let ids: Vec<i32> = cart.lines().iter().map(|line| line.product_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn set_quantity_zero_removes_the_line() {
        let mut cart = Cart::new();
        cart.add(5);
        cart.set_quantity(5, 0);

        assert!(cart.is_empty());
        assert_eq!(cart.quantity_of(5), None);
    }

    #[test]
    fn set_quantity_negative_removes_the_line() {
        let mut cart = Cart::new();
        cart.add(5);
        cart.set_quantity(5, -3);

        assert!(cart.is_empty());
    }

    #[test]
    fn set_quantity_never_stores_non_positive_values() {
        let mut cart = Cart::new();
        cart.set_quantity(4, 0);
        cart.set_quantity(4, -1);

        assert!(cart.is_empty());

        cart.set_quantity(4, 6);
        assert_eq!(cart.quantity_of(4), Some(6));
    }

    #[test]
    fn remove_decrements_and_drops_at_zero() {
        let mut cart = Cart::new();
        cart.add(2);
        cart.add(2);

        cart.remove(2);
        assert_eq!(cart.quantity_of(2), Some(1));

        cart.remove(2);
        assert_eq!(cart.quantity_of(2), None);

        // removing an absent product is a no-op
        cart.remove(2);
        assert!(cart.is_empty());
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = Cart::new();
        cart.add(1);
        cart.add(2);
        cart.clear();

        assert!(cart.is_empty());
    }

    #[test]
    fn cart_round_trips_through_json() {
        let mut cart = Cart::new();
        cart.add(11);
        cart.set_quantity(12, 4);

        let json = serde_json::to_string(&cart).expect("serialize cart");
        let restored: Cart = serde_json::from_str(&json).expect("deserialize cart");
        assert_eq!(restored, cart);
    }
}

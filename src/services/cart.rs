use serde::Serialize;

use crate::auth::AuthenticatedUser;
use crate::domain::cart::Cart;
use crate::domain::order::{NewOrder, NewOrderItem, Order, OrderListQuery};
use crate::domain::product::Product;
use crate::forms::cart::{CheckoutForm, UpdateCartForm};
use crate::repository::errors::CheckoutError;
use crate::repository::{OrderReader, OrderWriter, ProductReader, UserReader};
use crate::services::{ServiceError, ServiceResult};

/// One cart line joined with its live product row.
#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub product: Product,
    pub quantity: i32,
    pub line_total_cents: i64,
}

/// Data required to render the cart page.
pub struct CartPageData {
    pub items: Vec<CartItemView>,
    pub total_cents: i64,
}

/// Data required to render the checkout page.
pub struct CheckoutPageData {
    pub items: Vec<CartItemView>,
    pub total_cents: i64,
    /// The customer's stored address, prefilled into the form.
    pub prefill_address: Option<String>,
}

/// Adds one unit of `product_id` to the cart.
///
/// The product must exist and be approved; otherwise the cart is left
/// unchanged. Stock is not checked here — it only becomes authoritative
/// at checkout.
pub fn add_to_cart<R>(
    repo: &R,
    user: &AuthenticatedUser,
    mut cart: Cart,
    product_id: i32,
) -> ServiceResult<Cart>
where
    R: ProductReader + ?Sized,
{
    if !user.is_customer() {
        return Err(ServiceError::Unauthorized);
    }

    match repo.get_product_by_id(product_id)? {
        Some(product) if product.is_approved => {
            cart.add(product.id);
            Ok(cart)
        }
        _ => Err(ServiceError::NotFound),
    }
}

/// Sets the quantity for one cart line; zero or less removes the line.
pub fn update_cart(
    user: &AuthenticatedUser,
    mut cart: Cart,
    form: UpdateCartForm,
) -> ServiceResult<Cart> {
    if !user.is_customer() {
        return Err(ServiceError::Unauthorized);
    }

    cart.set_quantity(form.product_id, form.quantity);
    Ok(cart)
}

/// Removes one unit of `product_id` from the cart.
pub fn remove_from_cart(
    user: &AuthenticatedUser,
    mut cart: Cart,
    product_id: i32,
) -> ServiceResult<Cart> {
    if !user.is_customer() {
        return Err(ServiceError::Unauthorized);
    }

    cart.remove(product_id);
    Ok(cart)
}

/// Materializes the cart against live product rows for display.
///
/// Lines whose product has vanished are skipped; the session cart itself
/// is not rewritten here.
pub fn load_cart_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    cart: &Cart,
) -> ServiceResult<CartPageData>
where
    R: ProductReader + ?Sized,
{
    if !user.is_customer() {
        return Err(ServiceError::Unauthorized);
    }

    let items = materialize(repo, cart)?;
    let total_cents = items.iter().map(|item| item.line_total_cents).sum();

    Ok(CartPageData { items, total_cents })
}

/// Loads the checkout summary plus the stored address for prefilling.
pub fn load_checkout_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    cart: &Cart,
) -> ServiceResult<CheckoutPageData>
where
    R: ProductReader + UserReader + ?Sized,
{
    if !user.is_customer() {
        return Err(ServiceError::Unauthorized);
    }

    if cart.is_empty() {
        return Err(ServiceError::Checkout(CheckoutError::EmptyCart));
    }

    let items = materialize(repo, cart)?;
    let total_cents = items.iter().map(|item| item.line_total_cents).sum();
    let prefill_address = repo.get_user_by_id(user.id)?.and_then(|user| user.address);

    Ok(CheckoutPageData {
        items,
        total_cents,
        prefill_address,
    })
}

/// Converts the cart into a durable order.
///
/// Preconditions (authenticated customer, non-empty cart, usable address)
/// are enforced here before the store is touched; the all-or-nothing write
/// itself happens inside [`OrderWriter::checkout`]. The caller clears the
/// session cart only when this returns `Ok`.
pub fn checkout<R>(
    repo: &R,
    user: &AuthenticatedUser,
    cart: &Cart,
    form: CheckoutForm,
) -> ServiceResult<Order>
where
    R: OrderWriter + ?Sized,
{
    if !user.is_customer() {
        return Err(ServiceError::Unauthorized);
    }

    if cart.is_empty() {
        return Err(ServiceError::Checkout(CheckoutError::EmptyCart));
    }

    let shipping_address = form
        .into_shipping_address()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let items = cart
        .lines()
        .iter()
        .map(|line| NewOrderItem::new(line.product_id, line.quantity));

    let new_order = NewOrder::new(user.id, shipping_address).with_items(items);

    repo.checkout(&new_order).map_err(ServiceError::from)
}

/// Lists the customer's own orders, newest first.
pub fn order_history<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<Order>>
where
    R: OrderReader + ?Sized,
{
    if !user.is_customer() {
        return Err(ServiceError::Unauthorized);
    }

    repo.list_orders(OrderListQuery::new().customer(user.id))
        .map_err(ServiceError::from)
}

fn materialize<R>(repo: &R, cart: &Cart) -> ServiceResult<Vec<CartItemView>>
where
    R: ProductReader + ?Sized,
{
    let mut items = Vec::with_capacity(cart.len());

    for line in cart.lines() {
        let Some(product) = repo.get_product_by_id(line.product_id)? else {
            continue;
        };

        items.push(CartItemView {
            line_total_cents: i64::from(product.price_cents) * i64::from(line.quantity),
            quantity: line.quantity,
            product,
        });
    }

    Ok(items)
}

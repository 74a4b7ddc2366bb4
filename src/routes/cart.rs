use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::cart::Cart;
use crate::forms::cart::{CheckoutForm, UpdateCartForm};
use crate::repository::DieselRepository;
use crate::repository::errors::CheckoutError;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, cart as cart_service};

/// Session key the cart value object lives under.
const CART_SESSION_KEY: &str = "cart";

/// Reads the cart out of the session; a missing or unreadable value is an
/// empty cart.
fn load_cart(session: &Session) -> Cart {
    match session.get::<Cart>(CART_SESSION_KEY) {
        Ok(cart) => cart.unwrap_or_default(),
        Err(err) => {
            log::warn!("Discarding unreadable session cart: {err}");
            Cart::new()
        }
    }
}

/// Rewrites the whole cart back into the session.
fn store_cart(session: &Session, cart: &Cart) -> Result<(), HttpResponse> {
    session.insert(CART_SESSION_KEY, cart).map_err(|err| {
        log::error!("Failed to store the cart in the session: {err}");
        HttpResponse::InternalServerError().finish()
    })
}

#[get("/cart")]
pub async fn show_cart(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let cart = load_cart(&session);

    match cart_service::load_cart_page(repo.get_ref(), &user, &cart) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "cart");
            context.insert("cart_items", &data.items);
            context.insert("total_cents", &data.total_cents);
            render_template(&tera, "cart/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load the cart: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/cart")]
pub async fn update_cart(
    user: AuthenticatedUser,
    session: Session,
    web::Form(form): web::Form<UpdateCartForm>,
) -> impl Responder {
    let cart = load_cart(&session);

    match cart_service::update_cart(&user, cart, form) {
        Ok(cart) => {
            if let Err(response) = store_cart(&session, &cart) {
                return response;
            }
            FlashMessage::success("Cart updated!").send();
            redirect("/cart")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to update the cart: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/cart/add/{id}")]
pub async fn add_to_cart(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let cart = load_cart(&session);

    match cart_service::add_to_cart(repo.get_ref(), &user, cart, path.into_inner()) {
        Ok(cart) => {
            if let Err(response) = store_cart(&session, &cart) {
                return response;
            }
            FlashMessage::success("Product added to cart").send();
            redirect("/")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not available").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to add to the cart: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/cart/remove/{id}")]
pub async fn remove_from_cart(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    session: Session,
) -> impl Responder {
    let cart = load_cart(&session);

    match cart_service::remove_from_cart(&user, cart, path.into_inner()) {
        Ok(cart) => {
            if let Err(response) = store_cart(&session, &cart) {
                return response;
            }
            FlashMessage::success("Product removed from cart").send();
            redirect("/cart")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to remove from the cart: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/checkout")]
pub async fn show_checkout(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let cart = load_cart(&session);

    match cart_service::load_checkout_page(repo.get_ref(), &user, &cart) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "cart");
            context.insert("cart_items", &data.items);
            context.insert("total_cents", &data.total_cents);
            context.insert("prefill_address", &data.prefill_address);
            render_template(&tera, "cart/checkout.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(ServiceError::Checkout(err)) => {
            FlashMessage::error(err.to_string()).send();
            redirect("/cart")
        }
        Err(err) => {
            log::error!("Failed to load the checkout page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/checkout")]
pub async fn process_checkout(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CheckoutForm>,
) -> impl Responder {
    let cart = load_cart(&session);

    match cart_service::checkout(repo.get_ref(), &user, &cart, form) {
        Ok(_) => {
            // The cart only leaves the session once the order is durable.
            let _ = session.remove(CART_SESSION_KEY);
            FlashMessage::success("Order placed successfully!").send();
            redirect("/orders")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(ServiceError::Checkout(CheckoutError::Repository(err))) => {
            log::error!("Checkout could not commit: {err}");
            FlashMessage::error("Checkout failed, please try again.").send();
            redirect("/cart")
        }
        Err(ServiceError::Checkout(err)) => {
            FlashMessage::error(err.to_string()).send();
            redirect("/cart")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/checkout")
        }
        Err(err) => {
            log::error!("Checkout failed: {err}");
            FlashMessage::error("Checkout failed, please try again.").send();
            redirect("/cart")
        }
    }
}

#[get("/orders")]
pub async fn order_history(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match cart_service::order_history(repo.get_ref(), &user) {
        Ok(orders) => {
            let totals: Vec<i64> = orders.iter().map(|order| order.total_cents()).collect();
            let mut context = base_context(&flash_messages, Some(&user), "orders");
            context.insert("orders", &orders);
            context.insert("order_totals", &totals);
            render_template(&tera, "cart/orders.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load the order history: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

//! End-to-end service flows against a real SQLite-backed repository.

use farm_market::auth::AuthenticatedUser;
use farm_market::domain::cart::Cart;
use farm_market::forms::auth::{LoginForm, RegisterForm};
use farm_market::forms::cart::CheckoutForm;
use farm_market::forms::products::ProductForm;
use farm_market::domain::user::{NewUser, UserRole};
use farm_market::repository::errors::CheckoutError;
use farm_market::repository::{DieselRepository, UserWriter};
use farm_market::services::{ServiceError, admin, auth, cart, products};

mod common;

fn register_form(name: &str, email: &str, role: &str) -> RegisterForm {
    RegisterForm {
        name: name.to_string(),
        email: email.to_string(),
        password: "orchard apples".to_string(),
        phone: None,
        role: role.to_string(),
        farm_name: Some("Greenfield Farm".to_string()),
        location: Some("Springfield".to_string()),
    }
}

fn login_form(email: &str) -> LoginForm {
    LoginForm {
        email: email.to_string(),
        password: "orchard apples".to_string(),
    }
}

fn product_form(name: &str, price: &str, quantity: i32) -> ProductForm {
    ProductForm {
        name: name.to_string(),
        description: None,
        price: price.to_string(),
        quantity,
        category_id: None,
    }
}

fn checkout_form() -> CheckoutForm {
    CheckoutForm {
        shipping_address: "12 Main St".to_string(),
    }
}

fn create_admin(repo: &DieselRepository) -> AuthenticatedUser {
    repo.create_user(&NewUser::new(
        "Ada",
        "ada@example.com",
        "hash",
        UserRole::Admin,
    ))
    .expect("create admin")
    .into()
}

#[test]
fn full_marketplace_flow() {
    let test_db = common::TestDb::new("test_full_marketplace_flow.db");
    let repo = DieselRepository::new(test_db.pool());

    // A farmer registers and is held for approval.
    let farmer = auth::register(
        &repo,
        register_form("Greta", "greta@farm.example", "farmer"),
    )
    .expect("farmer registration");
    assert!(!farmer.is_approved);

    let refused = auth::login(&repo, login_form("greta@farm.example"));
    assert!(matches!(refused, Err(ServiceError::Form(message)) if message.contains("pending")));

    // An admin approves the farmer, who can then log in.
    let ada = create_admin(&repo);
    admin::approve_farmer(&repo, &ada, farmer.id).expect("farmer approval");

    let greta: AuthenticatedUser = auth::login(&repo, login_form("greta@farm.example"))
        .expect("farmer login")
        .into();

    // The farmer lists produce; it needs moderation before it can be bought.
    let tomatoes = products::create_product(&repo, &greta, product_form("Heirloom Tomatoes", "10.00", 5))
        .expect("create product");
    let honey = products::create_product(&repo, &greta, product_form("Raw Honey", "20.00", 1))
        .expect("create product");
    assert!(!tomatoes.is_approved);

    // A customer cannot cart an unapproved product.
    let carl: AuthenticatedUser = auth::register(
        &repo,
        register_form("Carl", "carl@example.com", "customer"),
    )
    .expect("customer registration")
    .into();

    let rejected = cart::add_to_cart(&repo, &carl, Cart::new(), tomatoes.id);
    assert!(matches!(rejected, Err(ServiceError::NotFound)));

    admin::approve_product(&repo, &ada, tomatoes.id).expect("approve tomatoes");
    admin::approve_product(&repo, &ada, honey.id).expect("approve honey");

    // The customer builds a cart: two tomatoes, one honey.
    let cart = cart::add_to_cart(&repo, &carl, Cart::new(), tomatoes.id).expect("add tomatoes");
    let cart = cart::add_to_cart(&repo, &carl, cart, tomatoes.id).expect("add tomatoes again");
    let cart = cart::add_to_cart(&repo, &carl, cart, honey.id).expect("add honey");

    let page = cart::load_cart_page(&repo, &carl, &cart).expect("cart page");
    assert_eq!(page.total_cents, 2 * 1000 + 2000);

    // Checkout commits the order, snapshots prices and drains stock.
    let order = cart::checkout(&repo, &carl, &cart, checkout_form()).expect("checkout");
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].name, "Heirloom Tomatoes");
    assert_eq!(order.items[0].price_cents, 1000);
    assert_eq!(order.items[1].price_cents, 2000);

    let history = cart::order_history(&repo, &carl).expect("order history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, order.id);
    assert_eq!(history[0].total_cents(), 4000);

    // Honey is sold out now; a second attempt names the offender.
    let mut retry = Cart::new();
    retry.add(honey.id);

    let result = cart::checkout(&repo, &carl, &retry, checkout_form());
    match result {
        Err(ServiceError::Checkout(CheckoutError::InsufficientStock { name, available })) => {
            assert_eq!(name, "Raw Honey");
            assert_eq!(available, 0);
        }
        other => panic!("expected an insufficient-stock failure, got {other:?}"),
    }
}

#[test]
fn farmer_edits_send_products_back_into_moderation() {
    let test_db = common::TestDb::new("test_edits_reset_moderation.db");
    let repo = DieselRepository::new(test_db.pool());

    let ada = create_admin(&repo);

    let greta: AuthenticatedUser = {
        let farmer = auth::register(
            &repo,
            register_form("Greta", "greta@farm.example", "farmer"),
        )
        .expect("farmer registration");
        admin::approve_farmer(&repo, &ada, farmer.id).expect("farmer approval")
    }
    .into();

    let product = products::create_product(&repo, &greta, product_form("Green Beans", "3.00", 10))
        .expect("create product");
    let product = admin::approve_product(&repo, &ada, product.id).expect("approve");
    assert!(product.is_approved);

    let edited = products::update_product(
        &repo,
        &greta,
        product.id,
        product_form("Green Beans", "3.50", 8),
    )
    .expect("edit product");

    assert_eq!(edited.price_cents, 350);
    assert!(!edited.is_approved, "edits must clear approval");
}

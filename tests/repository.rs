use chrono::NaiveDate;

use farm_market::domain::category::NewCategory;
use farm_market::domain::order::{NewOrder, NewOrderItem, OrderListQuery};
use farm_market::domain::product::{NewProduct, ProductListQuery, UpdateProduct};
use farm_market::domain::user::{NewUser, UpdateProfile, User, UserListQuery, UserRole};
use farm_market::repository::errors::{CheckoutError, RepositoryError};
use farm_market::repository::{
    CategoryReader, CategoryWriter, DieselRepository, OrderReader, OrderWriter, ProductReader,
    ProductWriter, UserReader, UserWriter,
};

mod common;

fn create_farmer(repo: &DieselRepository, email: &str) -> User {
    repo.create_user(
        &NewUser::new("Greta", email, "hash", UserRole::Farmer).with_farm_name("Greenfield Farm"),
    )
    .expect("create farmer")
}

fn create_customer(repo: &DieselRepository, email: &str) -> User {
    repo.create_user(&NewUser::new("Carl", email, "hash", UserRole::Customer))
        .expect("create customer")
}

fn create_listing(
    repo: &DieselRepository,
    farmer_id: i32,
    name: &str,
    price_cents: i32,
    quantity: i32,
    approved: bool,
) -> farm_market::domain::product::Product {
    let product = repo
        .create_product(&NewProduct::new(farmer_id, name, price_cents, quantity))
        .expect("create product");

    if approved {
        repo.set_product_approval(product.id, true)
            .expect("approve product")
    } else {
        product
    }
}

#[test]
fn user_repository_crud() {
    let test_db = common::TestDb::new("test_user_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let farmer = create_farmer(&repo, "Greta@Farm.example");
    assert_eq!(farmer.email, "greta@farm.example");
    assert!(!farmer.is_approved);

    // lookup is case-insensitive on the stored lowercased email
    let found = repo
        .get_user_by_email("GRETA@farm.EXAMPLE")
        .unwrap()
        .expect("farmer by email");
    assert_eq!(found.id, farmer.id);

    let approved = repo.approve_user(farmer.id).unwrap();
    assert!(approved.is_approved);

    let updated = repo
        .update_profile(
            farmer.id,
            &UpdateProfile::new()
                .name("Greta G.")
                .bio(Some("Organic greens."))
                .phone(None::<String>),
        )
        .unwrap();
    assert_eq!(updated.name, "Greta G.");
    assert_eq!(updated.bio.as_deref(), Some("Organic greens."));
    assert_eq!(updated.phone, None);

    let farmers = repo
        .list_users(UserListQuery::new().role(UserRole::Farmer))
        .unwrap();
    assert_eq!(farmers.len(), 1);

    repo.delete_user(farmer.id).unwrap();
    assert!(repo.get_user_by_id(farmer.id).unwrap().is_none());
    assert!(matches!(
        repo.delete_user(farmer.id),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn duplicate_emails_conflict() {
    let test_db = common::TestDb::new("test_duplicate_emails_conflict.db");
    let repo = DieselRepository::new(test_db.pool());

    create_customer(&repo, "carl@example.com");

    let err = repo
        .create_user(&NewUser::new("Carla", "carl@example.com", "hash", UserRole::Customer))
        .expect_err("expected duplicate email to fail");
    assert!(matches!(err, RepositoryError::Conflict));
}

#[test]
fn category_repository_crud() {
    let test_db = common::TestDb::new("test_category_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let dairy = repo.create_category(&NewCategory::new("Dairy")).unwrap();
    repo.create_category(&NewCategory::new("Vegetables")).unwrap();

    let err = repo
        .create_category(&NewCategory::new("Dairy"))
        .expect_err("expected duplicate category to fail");
    assert!(matches!(err, RepositoryError::Conflict));

    let names: Vec<String> = repo
        .list_categories()
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(names, vec!["Dairy".to_string(), "Vegetables".to_string()]);

    repo.delete_category(dairy.id).unwrap();
    assert!(repo.get_category_by_id(dairy.id).unwrap().is_none());
}

#[test]
fn product_repository_scopes_writes_to_the_owner() {
    let test_db = common::TestDb::new("test_product_repository_owner_scope.db");
    let repo = DieselRepository::new(test_db.pool());

    let greta = create_farmer(&repo, "greta@farm.example");
    let hans = create_farmer(&repo, "hans@farm.example");

    let product = create_listing(&repo, greta.id, "Heirloom Tomatoes", 450, 20, false);
    assert!(!product.is_approved);

    let err = repo
        .update_product(product.id, hans.id, &UpdateProduct::new().quantity(5))
        .expect_err("expected foreign update to fail");
    assert!(matches!(err, RepositoryError::NotFound));

    let err = repo
        .delete_product(product.id, hans.id)
        .expect_err("expected foreign delete to fail");
    assert!(matches!(err, RepositoryError::NotFound));

    let updated = repo
        .update_product(
            product.id,
            greta.id,
            &UpdateProduct::new().price_cents(500).approved(false),
        )
        .unwrap();
    assert_eq!(updated.price_cents, 500);

    repo.delete_product(product.id, greta.id).unwrap();
    assert!(repo.get_product_by_id(product.id).unwrap().is_none());
}

#[test]
fn product_listing_filters() {
    let test_db = common::TestDb::new("test_product_listing_filters.db");
    let repo = DieselRepository::new(test_db.pool());

    let greta = create_farmer(&repo, "greta@farm.example");
    create_listing(&repo, greta.id, "Heirloom Tomatoes", 450, 20, true);
    create_listing(&repo, greta.id, "Green Beans", 300, 10, false);

    let approved = repo
        .list_products(ProductListQuery::new().approved_only())
        .unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].name, "Heirloom Tomatoes");

    let all = repo
        .list_products(ProductListQuery::new().farmer(greta.id))
        .unwrap();
    assert_eq!(all.len(), 2);

    let searched = repo
        .list_products(ProductListQuery::new().search("bean"))
        .unwrap();
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].name, "Green Beans");
}

#[test]
fn checkout_commits_the_whole_cart() {
    let test_db = common::TestDb::new("test_checkout_commits.db");
    let repo = DieselRepository::new(test_db.pool());

    let greta = create_farmer(&repo, "greta@farm.example");
    let carl = create_customer(&repo, "carl@example.com");

    let p1 = create_listing(&repo, greta.id, "Heirloom Tomatoes", 1000, 5, true);
    let p2 = create_listing(&repo, greta.id, "Raw Honey", 2000, 1, true);

    let new_order = NewOrder::new(carl.id, "12 Main St").with_items([
        NewOrderItem::new(p1.id, 2),
        NewOrderItem::new(p2.id, 1),
    ]);

    let order = repo.checkout(&new_order).expect("checkout should commit");

    assert_eq!(order.customer_id, carl.id);
    assert_eq!(order.shipping_address, "12 Main St");
    assert_eq!(order.items.len(), 2);

    // items come back in cart insertion order with price snapshots
    assert_eq!(order.items[0].product_id, Some(p1.id));
    assert_eq!(order.items[0].name, "Heirloom Tomatoes");
    assert_eq!(order.items[0].quantity, 2);
    assert_eq!(order.items[0].price_cents, 1000);
    assert_eq!(order.items[1].product_id, Some(p2.id));
    assert_eq!(order.items[1].quantity, 1);
    assert_eq!(order.items[1].price_cents, 2000);
    assert_eq!(order.total_cents(), 4000);

    // stock decremented by exactly the purchased quantities
    assert_eq!(repo.get_product_by_id(p1.id).unwrap().unwrap().quantity, 3);
    assert_eq!(repo.get_product_by_id(p2.id).unwrap().unwrap().quantity, 0);
}

#[test]
fn checkout_rejects_insufficient_stock_and_changes_nothing() {
    let test_db = common::TestDb::new("test_checkout_insufficient_stock.db");
    let repo = DieselRepository::new(test_db.pool());

    let greta = create_farmer(&repo, "greta@farm.example");
    let carl = create_customer(&repo, "carl@example.com");

    let product = create_listing(&repo, greta.id, "Raw Honey", 2000, 2, true);

    let new_order =
        NewOrder::new(carl.id, "12 Main St").with_items([NewOrderItem::new(product.id, 3)]);

    let err = repo
        .checkout(&new_order)
        .expect_err("expected the checkout to abort");
    assert!(matches!(
        err,
        CheckoutError::InsufficientStock { ref name, available: 2 } if name == "Raw Honey"
    ));

    // nothing persisted
    assert_eq!(
        repo.get_product_by_id(product.id).unwrap().unwrap().quantity,
        2
    );
    assert!(
        repo.list_orders(OrderListQuery::new())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn checkout_is_all_or_nothing_across_items() {
    let test_db = common::TestDb::new("test_checkout_all_or_nothing.db");
    let repo = DieselRepository::new(test_db.pool());

    let greta = create_farmer(&repo, "greta@farm.example");
    let carl = create_customer(&repo, "carl@example.com");

    let satisfiable = create_listing(&repo, greta.id, "Heirloom Tomatoes", 1000, 5, true);
    let short = create_listing(&repo, greta.id, "Raw Honey", 2000, 1, true);

    let new_order = NewOrder::new(carl.id, "12 Main St").with_items([
        NewOrderItem::new(satisfiable.id, 2),
        NewOrderItem::new(short.id, 2),
    ]);

    let err = repo
        .checkout(&new_order)
        .expect_err("expected the checkout to abort");
    assert!(matches!(err, CheckoutError::InsufficientStock { .. }));

    // the satisfiable item's decrement was rolled back with the rest
    assert_eq!(
        repo.get_product_by_id(satisfiable.id)
            .unwrap()
            .unwrap()
            .quantity,
        5
    );
    assert_eq!(repo.get_product_by_id(short.id).unwrap().unwrap().quantity, 1);
    assert!(
        repo.list_orders(OrderListQuery::new())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn checkout_rejects_unapproved_and_missing_products() {
    let test_db = common::TestDb::new("test_checkout_unavailable.db");
    let repo = DieselRepository::new(test_db.pool());

    let greta = create_farmer(&repo, "greta@farm.example");
    let carl = create_customer(&repo, "carl@example.com");

    let pending = create_listing(&repo, greta.id, "Green Beans", 300, 10, false);

    let err = repo
        .checkout(
            &NewOrder::new(carl.id, "12 Main St").with_items([NewOrderItem::new(pending.id, 1)]),
        )
        .expect_err("expected an unapproved product to abort");
    assert!(matches!(
        err,
        CheckoutError::ProductUnavailable { ref name } if name == "Green Beans"
    ));

    let err = repo
        .checkout(&NewOrder::new(carl.id, "12 Main St").with_items([NewOrderItem::new(9999, 1)]))
        .expect_err("expected a missing product to abort");
    assert!(matches!(err, CheckoutError::ProductUnavailable { .. }));

    assert_eq!(
        repo.get_product_by_id(pending.id).unwrap().unwrap().quantity,
        10
    );
    assert!(
        repo.list_orders(OrderListQuery::new())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn checkout_rejects_an_empty_cart() {
    let test_db = common::TestDb::new("test_checkout_empty_cart.db");
    let repo = DieselRepository::new(test_db.pool());

    let carl = create_customer(&repo, "carl@example.com");

    let err = repo
        .checkout(&NewOrder::new(carl.id, "12 Main St"))
        .expect_err("expected an empty cart to be refused");
    assert!(matches!(err, CheckoutError::EmptyCart));
}

#[test]
fn price_snapshots_survive_later_price_changes() {
    let test_db = common::TestDb::new("test_price_snapshot_immutability.db");
    let repo = DieselRepository::new(test_db.pool());

    let greta = create_farmer(&repo, "greta@farm.example");
    let carl = create_customer(&repo, "carl@example.com");

    let product = create_listing(&repo, greta.id, "Heirloom Tomatoes", 1000, 5, true);

    let order = repo
        .checkout(&NewOrder::new(carl.id, "12 Main St").with_items([NewOrderItem::new(
            product.id,
            1,
        )]))
        .expect("checkout should commit");

    repo.update_product(
        product.id,
        greta.id,
        &UpdateProduct::new().price_cents(9900),
    )
    .expect("price change");

    let reloaded = repo
        .get_order_by_id(order.id, carl.id)
        .unwrap()
        .expect("order still exists");
    assert_eq!(reloaded.items[0].price_cents, 1000);
}

#[test]
fn checkout_never_oversells_the_last_unit() {
    let test_db = common::TestDb::new("test_checkout_last_unit.db");
    let repo = DieselRepository::new(test_db.pool());

    let greta = create_farmer(&repo, "greta@farm.example");
    let carl = create_customer(&repo, "carl@example.com");
    let dana = create_customer(&repo, "dana@example.com");

    let product = create_listing(&repo, greta.id, "Raw Honey", 2000, 1, true);

    let first = repo.checkout(
        &NewOrder::new(carl.id, "12 Main St").with_items([NewOrderItem::new(product.id, 1)]),
    );
    assert!(first.is_ok());

    let second = repo
        .checkout(
            &NewOrder::new(dana.id, "34 Oak Ave").with_items([NewOrderItem::new(product.id, 1)]),
        )
        .expect_err("the second buyer must be refused");
    assert!(matches!(second, CheckoutError::InsufficientStock { .. }));

    let remaining = repo.get_product_by_id(product.id).unwrap().unwrap().quantity;
    assert_eq!(remaining, 0); // never negative
}

#[test]
fn orders_list_newest_first_and_are_customer_scoped() {
    let test_db = common::TestDb::new("test_order_listing.db");
    let repo = DieselRepository::new(test_db.pool());

    let greta = create_farmer(&repo, "greta@farm.example");
    let carl = create_customer(&repo, "carl@example.com");
    let dana = create_customer(&repo, "dana@example.com");

    let product = create_listing(&repo, greta.id, "Heirloom Tomatoes", 1000, 50, true);

    let day = |day| {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid date")
    };

    let mut first = NewOrder::new(carl.id, "12 Main St").with_items([NewOrderItem::new(
        product.id,
        1,
    )]);
    first.created_at = day(1);
    let first = repo.checkout(&first).expect("first checkout");

    let mut second = NewOrder::new(carl.id, "12 Main St").with_items([NewOrderItem::new(
        product.id,
        2,
    )]);
    second.created_at = day(2);
    let second = repo.checkout(&second).expect("second checkout");

    let mut other = NewOrder::new(dana.id, "34 Oak Ave").with_items([NewOrderItem::new(
        product.id,
        1,
    )]);
    other.created_at = day(3);
    repo.checkout(&other).expect("other customer's checkout");

    let carls = repo
        .list_orders(OrderListQuery::new().customer(carl.id))
        .unwrap();
    let ids: Vec<i32> = carls.iter().map(|order| order.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    // point lookups are scoped to the owning customer
    assert!(repo.get_order_by_id(first.id, dana.id).unwrap().is_none());
    assert!(repo.get_order_by_id(first.id, carl.id).unwrap().is_some());

    let everything = repo.list_orders(OrderListQuery::new()).unwrap();
    assert_eq!(everything.len(), 3);
}

use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, NewCategory};
use crate::domain::order::{NewOrder, Order, OrderListQuery};
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
use crate::domain::user::{NewUser, UpdateProfile, User, UserListQuery};
use crate::repository::errors::{CheckoutError, RepositoryResult};

pub mod errors;

pub mod category;
pub mod order;
pub mod product;
pub mod user;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over user accounts.
pub trait UserReader {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<Vec<User>>;
}

/// Write operations over user accounts.
pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn update_profile(&self, user_id: i32, updates: &UpdateProfile) -> RepositoryResult<User>;
    fn approve_user(&self, user_id: i32) -> RepositoryResult<User>;
    fn delete_user(&self, user_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over categories.
pub trait CategoryReader {
    fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<Category>>;
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
}

/// Write operations over categories.
pub trait CategoryWriter {
    fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
    fn delete_category(&self, category_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over produce listings.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
}

/// Write operations over produce listings.
///
/// `update_product` and `delete_product` are scoped to the owning farmer;
/// the moderation operations (`set_product_approval`, `remove_product`)
/// act on any listing.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(
        &self,
        product_id: i32,
        farmer_id: i32,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product>;
    fn set_product_approval(&self, product_id: i32, approved: bool) -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32, farmer_id: i32) -> RepositoryResult<()>;
    fn remove_product(&self, product_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over committed orders.
pub trait OrderReader {
    fn get_order_by_id(&self, id: i32, customer_id: i32) -> RepositoryResult<Option<Order>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<Vec<Order>>;
}

/// The checkout transaction.
pub trait OrderWriter {
    /// Convert a cart into a durable order, all or nothing.
    ///
    /// Runs a single transaction that inserts the order header, then walks
    /// the requested lines in input order: each line requires an approved
    /// product with enough stock, decrements the stock conditionally and
    /// records a name/price snapshot. The first failing line aborts the
    /// whole attempt and nothing persists.
    fn checkout(&self, new_order: &NewOrder) -> Result<Order, CheckoutError>;
}

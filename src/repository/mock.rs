use mockall::mock;

use super::{
    CategoryReader, CategoryWriter, OrderReader, OrderWriter, ProductReader, ProductWriter,
    UserReader, UserWriter,
};
use crate::domain::{
    category::{Category, NewCategory},
    order::{NewOrder, Order, OrderListQuery},
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
    user::{NewUser, UpdateProfile, User, UserListQuery},
};
use crate::repository::errors::{CheckoutError, RepositoryResult};

mock! {
    pub UserReader {}

    impl UserReader for UserReader {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
        fn list_users(&self, query: UserListQuery) -> RepositoryResult<Vec<User>>;
    }
}

mock! {
    pub UserWriter {}

    impl UserWriter for UserWriter {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn update_profile(&self, user_id: i32, updates: &UpdateProfile) -> RepositoryResult<User>;
        fn approve_user(&self, user_id: i32) -> RepositoryResult<User>;
        fn delete_user(&self, user_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub CategoryReader {}

    impl CategoryReader for CategoryReader {
        fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<Category>>;
        fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    }
}

mock! {
    pub CategoryWriter {}

    impl CategoryWriter for CategoryWriter {
        fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
        fn delete_category(&self, category_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, farmer_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn set_product_approval(&self, product_id: i32, approved: bool) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32, farmer_id: i32) -> RepositoryResult<()>;
        fn remove_product(&self, product_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub OrderReader {}

    impl OrderReader for OrderReader {
        fn get_order_by_id(&self, id: i32, customer_id: i32) -> RepositoryResult<Option<Order>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<Vec<Order>>;
    }
}

mock! {
    pub OrderWriter {}

    impl OrderWriter for OrderWriter {
        fn checkout(&self, new_order: &NewOrder) -> Result<Order, CheckoutError>;
    }
}

use crate::auth::AuthenticatedUser;
use crate::domain::category::Category;
use crate::domain::order::{Order, OrderListQuery};
use crate::domain::product::{Product, ProductListQuery};
use crate::domain::user::{User, UserListQuery, UserRole};
use crate::forms::admin::AddCategoryForm;
use crate::repository::{
    CategoryReader, CategoryWriter, OrderReader, ProductReader, ProductWriter, UserReader,
    UserWriter,
};
use crate::services::{ServiceError, ServiceResult};

/// Data required to render the admin dashboard.
pub struct AdminDashboardData {
    pub users: Vec<User>,
    /// Every listing, approved or not.
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub categories: Vec<Category>,
}

/// Loads the admin overview of the whole marketplace.
pub fn load_dashboard<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<AdminDashboardData>
where
    R: UserReader + ProductReader + OrderReader + CategoryReader + ?Sized,
{
    if !user.is_admin() {
        return Err(ServiceError::Unauthorized);
    }

    Ok(AdminDashboardData {
        users: repo.list_users(UserListQuery::new())?,
        products: repo.list_products(ProductListQuery::new())?,
        orders: repo.list_orders(OrderListQuery::new())?,
        categories: repo.list_categories()?,
    })
}

/// Marks a listing as approved for sale.
pub fn approve_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    if !user.is_admin() {
        return Err(ServiceError::Unauthorized);
    }

    repo.set_product_approval(product_id, true)
        .map_err(ServiceError::from)
}

/// Rejects a listing, deleting it outright.
pub fn reject_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    if !user.is_admin() {
        return Err(ServiceError::Unauthorized);
    }

    repo.remove_product(product_id).map_err(ServiceError::from)
}

/// Approves a pending farmer account so it can log in.
pub fn approve_farmer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    farmer_id: i32,
) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    if !user.is_admin() {
        return Err(ServiceError::Unauthorized);
    }

    let target = repo
        .get_user_by_id(farmer_id)?
        .ok_or(ServiceError::NotFound)?;

    if target.role != UserRole::Farmer {
        return Err(ServiceError::Form("User is not a farmer".to_string()));
    }

    repo.approve_user(farmer_id).map_err(ServiceError::from)
}

/// Deletes an account.
///
/// Admins cannot delete themselves or other admins. A farmer's listings
/// are removed along with the account.
pub fn delete_user<R>(repo: &R, user: &AuthenticatedUser, user_id: i32) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    if !user.is_admin() {
        return Err(ServiceError::Unauthorized);
    }

    if user_id == user.id {
        return Err(ServiceError::Form(
            "You cannot delete your own account".to_string(),
        ));
    }

    let target = repo
        .get_user_by_id(user_id)?
        .ok_or(ServiceError::NotFound)?;

    if target.role == UserRole::Admin {
        return Err(ServiceError::Form(
            "Cannot delete other admin accounts".to_string(),
        ));
    }

    repo.delete_user(user_id)?;

    Ok(target)
}

/// Creates a new category.
pub fn create_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddCategoryForm,
) -> ServiceResult<Category>
where
    R: CategoryWriter + ?Sized,
{
    if !user.is_admin() {
        return Err(ServiceError::Unauthorized);
    }

    let new_category = form
        .into_new_category()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_category(&new_category)
        .map_err(ServiceError::from)
}

/// Deletes a category. Listings keep existing without one.
pub fn delete_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    category_id: i32,
) -> ServiceResult<()>
where
    R: CategoryWriter + ?Sized,
{
    if !user.is_admin() {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_category(category_id).map_err(ServiceError::from)
}

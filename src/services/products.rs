use crate::auth::AuthenticatedUser;
use crate::domain::category::Category;
use crate::domain::product::{Product, ProductListQuery};
use crate::forms::products::ProductForm;
use crate::repository::{CategoryReader, ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult};

/// Data required to render the farmer dashboard.
pub struct DashboardData {
    /// Every listing owned by the farmer, approved or not.
    pub products: Vec<Product>,
}

/// Data required to render the listing editor.
pub struct ProductFormData {
    /// The listing being edited, absent when adding.
    pub product: Option<Product>,
    /// All categories, for the category select.
    pub categories: Vec<Category>,
}

/// Loads the farmer dashboard with all of the farmer's own listings.
pub fn load_dashboard<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<DashboardData>
where
    R: ProductReader + ?Sized,
{
    if !user.is_farmer() {
        return Err(ServiceError::Unauthorized);
    }

    let products = repo.list_products(ProductListQuery::new().farmer(user.id))?;

    Ok(DashboardData { products })
}

/// Loads the editor for a new listing.
pub fn load_add_form<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<ProductFormData>
where
    R: CategoryReader + ?Sized,
{
    if !user.is_farmer() {
        return Err(ServiceError::Unauthorized);
    }

    Ok(ProductFormData {
        product: None,
        categories: repo.list_categories()?,
    })
}

/// Loads the editor for one of the farmer's own listings.
pub fn load_edit_form<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<ProductFormData>
where
    R: ProductReader + CategoryReader + ?Sized,
{
    if !user.is_farmer() {
        return Err(ServiceError::Unauthorized);
    }

    let product = repo
        .get_product_by_id(product_id)?
        .filter(|product| product.farmer_id == user.id)
        .ok_or(ServiceError::NotFound)?;

    Ok(ProductFormData {
        product: Some(product),
        categories: repo.list_categories()?,
    })
}

/// Creates a new listing for the farmer. Listings start unapproved.
pub fn create_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    if !user.is_farmer() {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_new_product(user.id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_product(&payload).map_err(ServiceError::from)
}

/// Updates one of the farmer's own listings.
///
/// Every edit sends the listing back into moderation.
pub fn update_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    form: ProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    if !user.is_farmer() {
        return Err(ServiceError::Unauthorized);
    }

    let updates = form
        .into_update_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?
        .approved(false);

    repo.update_product(product_id, user.id, &updates)
        .map_err(ServiceError::from)
}

/// Deletes one of the farmer's own listings.
pub fn delete_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    if !user.is_farmer() {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_product(product_id, user.id)
        .map_err(ServiceError::from)
}

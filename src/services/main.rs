use serde::Deserialize;

use crate::domain::category::Category;
use crate::domain::product::{Product, ProductListQuery};
use crate::domain::user::{User, UserRole};
use crate::repository::{CategoryReader, ProductReader, UserReader};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the storefront index.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Optional category filter; the select submits an empty string for
    /// "all categories", so this stays textual until parsed.
    pub category: Option<String>,
}

/// Data required to render the storefront index.
pub struct IndexPageData {
    /// Approved products matching the filters.
    pub products: Vec<Product>,
    /// All categories, for the filter bar.
    pub categories: Vec<Category>,
    /// Search query echoed back to the view when present.
    pub search: Option<String>,
    /// Selected category echoed back to the view when present.
    pub selected_category: Option<i32>,
}

/// Loads the public storefront: approved products only.
pub fn load_index_page<R>(repo: &R, query: IndexQuery) -> ServiceResult<IndexPageData>
where
    R: ProductReader + CategoryReader + ?Sized,
{
    let selected_category = query
        .category
        .as_deref()
        .and_then(|value| value.trim().parse::<i32>().ok());

    let mut list_query = ProductListQuery::new().approved_only();

    if let Some(term) = query
        .search
        .as_ref()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
    {
        list_query = list_query.search(term);
    }

    if let Some(category_id) = selected_category {
        list_query = list_query.category(category_id);
    }

    let products = repo.list_products(list_query)?;
    let categories = repo.list_categories()?;

    Ok(IndexPageData {
        products,
        categories,
        search: query.search,
        selected_category,
    })
}

/// Data required to render a public farmer profile.
pub struct FarmerPageData {
    pub farmer: User,
    /// The farmer's approved products.
    pub products: Vec<Product>,
}

/// Loads a public farmer profile.
///
/// Only approved farmer accounts are visible; anything else reads as
/// missing so the page does not leak pending registrations.
pub fn load_farmer_page<R>(repo: &R, farmer_id: i32) -> ServiceResult<FarmerPageData>
where
    R: UserReader + ProductReader + ?Sized,
{
    let farmer = repo.get_user_by_id(farmer_id)?.ok_or(ServiceError::NotFound)?;

    if farmer.role != UserRole::Farmer || !farmer.is_approved {
        return Err(ServiceError::NotFound);
    }

    let products =
        repo.list_products(ProductListQuery::new().farmer(farmer_id).approved_only())?;

    Ok(FarmerPageData { farmer, products })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::repository::mock::{MockProductReader, MockUserReader};
    use crate::repository::{ProductReader, UserReader};
    use crate::repository::errors::RepositoryResult;
    use crate::domain::user::UserListQuery;

    fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    fn sample_farmer(id: i32, role: UserRole, is_approved: bool) -> User {
        User {
            id,
            name: "Greta".to_string(),
            email: "greta@farm.example".to_string(),
            password_hash: "hash".to_string(),
            role,
            phone: None,
            bio: None,
            address: None,
            farm_name: Some("Greenfield Farm".to_string()),
            location: Some("Springfield".to_string()),
            is_approved,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    struct FakeRepo {
        users: MockUserReader,
        products: MockProductReader,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                users: MockUserReader::new(),
                products: MockProductReader::new(),
            }
        }
    }

    impl UserReader for FakeRepo {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>> {
            self.users.get_user_by_id(id)
        }

        fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
            self.users.get_user_by_email(email)
        }

        fn list_users(&self, query: UserListQuery) -> RepositoryResult<Vec<User>> {
            self.users.list_users(query)
        }
    }

    impl ProductReader for FakeRepo {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>> {
            self.products.get_product_by_id(id)
        }

        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>> {
            self.products.list_products(query)
        }
    }

    #[test]
    fn farmer_page_hides_unapproved_farmers() {
        let mut repo = FakeRepo::new();
        repo.users
            .expect_get_user_by_id()
            .returning(|id| Ok(Some(sample_farmer(id, UserRole::Farmer, false))));

        let result = load_farmer_page(&repo, 5);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn farmer_page_rejects_non_farmers() {
        let mut repo = FakeRepo::new();
        repo.users
            .expect_get_user_by_id()
            .returning(|id| Ok(Some(sample_farmer(id, UserRole::Customer, true))));

        let result = load_farmer_page(&repo, 5);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn farmer_page_lists_only_approved_products() {
        let mut repo = FakeRepo::new();
        repo.users
            .expect_get_user_by_id()
            .returning(|id| Ok(Some(sample_farmer(id, UserRole::Farmer, true))));
        repo.products
            .expect_list_products()
            .times(1)
            .withf(|query| {
                assert_eq!(query.farmer_id, Some(5));
                assert!(query.approved_only);
                true
            })
            .returning(|_| Ok(Vec::new()));

        let data = load_farmer_page(&repo, 5).expect("expected success");
        assert_eq!(data.farmer.id, 5);
        assert!(data.products.is_empty());
    }
}

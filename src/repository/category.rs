use diesel::prelude::*;

use crate::{
    domain::category::{Category as DomainCategory, NewCategory as DomainNewCategory},
    models::category::{Category as DbCategory, NewCategory as DbNewCategory},
    repository::{
        CategoryReader, CategoryWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl CategoryReader for DieselRepository {
    fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let category = categories::table
            .filter(categories::id.eq(id))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(Into::into))
    }

    fn list_categories(&self) -> RepositoryResult<Vec<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_categories = categories::table
            .order(categories::name.asc())
            .load::<DbCategory>(&mut conn)?;

        Ok(db_categories.into_iter().map(Into::into).collect())
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, new_category: &DomainNewCategory) -> RepositoryResult<DomainCategory> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_new = DbNewCategory::from(new_category);

        let created = diesel::insert_into(categories::table)
            .values(&db_new)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(created.into())
    }

    fn delete_category(&self, category_id: i32) -> RepositoryResult<()> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let deleted = diesel::delete(categories::table.filter(categories::id.eq(category_id)))
            .execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

use chrono::Local;
use diesel::prelude::*;

use crate::{
    domain::user::{
        NewUser as DomainNewUser, UpdateProfile as DomainUpdateProfile, User as DomainUser,
        UserListQuery,
    },
    models::user::{NewUser as DbNewUser, UpdateProfile as DbUpdateProfile, User as DbUser},
    repository::{
        DieselRepository, UserReader, UserWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<DomainUser>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::id.eq(id))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<DomainUser>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::email.eq(email.to_lowercase()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn list_users(&self, query: UserListQuery) -> RepositoryResult<Vec<DomainUser>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let mut items = users::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(role) = query.role {
            items = items.filter(users::role.eq(<&str>::from(role)));
        }

        let db_users = items
            .order(users::created_at.desc())
            .load::<DbUser>(&mut conn)?;

        Ok(db_users.into_iter().map(Into::into).collect())
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &DomainNewUser) -> RepositoryResult<DomainUser> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_new = DbNewUser::from(new_user);

        let created = diesel::insert_into(users::table)
            .values(&db_new)
            .get_result::<DbUser>(&mut conn)?;

        Ok(created.into())
    }

    fn update_profile(
        &self,
        user_id: i32,
        updates: &DomainUpdateProfile,
    ) -> RepositoryResult<DomainUser> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateProfile::from(updates);

        let updated = diesel::update(users::table.filter(users::id.eq(user_id)))
            .set(&db_updates)
            .get_result::<DbUser>(&mut conn)?;

        Ok(updated.into())
    }

    fn approve_user(&self, user_id: i32) -> RepositoryResult<DomainUser> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let updated = diesel::update(users::table.filter(users::id.eq(user_id)))
            .set((
                users::is_approved.eq(true),
                users::updated_at.eq(Local::now().naive_utc()),
            ))
            .get_result::<DbUser>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_user(&self, user_id: i32) -> RepositoryResult<()> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let deleted =
            diesel::delete(users::table.filter(users::id.eq(user_id))).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

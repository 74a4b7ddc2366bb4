use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::user::{
    NewUser as DomainNewUser, UpdateProfile as DomainUpdateProfile, User as DomainUser,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub farm_name: Option<String>,
    pub location: Option<String>,
    pub is_approved: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub phone: Option<&'a str>,
    pub farm_name: Option<&'a str>,
    pub location: Option<&'a str>,
    pub is_approved: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct UpdateProfile<'a> {
    pub name: Option<&'a str>,
    pub phone: Option<Option<&'a str>>,
    pub bio: Option<Option<&'a str>>,
    pub address: Option<Option<&'a str>>,
    pub farm_name: Option<Option<&'a str>>,
    pub location: Option<Option<&'a str>>,
    pub updated_at: NaiveDateTime,
}

impl From<User> for DomainUser {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            password_hash: value.password_hash,
            role: value.role.as_str().into(),
            phone: value.phone,
            bio: value.bio,
            address: value.address,
            farm_name: value.farm_name,
            location: value.location,
            is_approved: value.is_approved,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(value: &'a DomainNewUser) -> Self {
        Self {
            name: value.name.as_str(),
            email: value.email.as_str(),
            password_hash: value.password_hash.as_str(),
            role: value.role.into(),
            phone: value.phone.as_deref(),
            farm_name: value.farm_name.as_deref(),
            location: value.location.as_deref(),
            is_approved: value.is_approved,
        }
    }
}

impl<'a> From<&'a DomainUpdateProfile> for UpdateProfile<'a> {
    fn from(value: &'a DomainUpdateProfile) -> Self {
        Self {
            name: value.name.as_deref(),
            phone: value.phone.as_ref().map(|inner| inner.as_deref()),
            bio: value.bio.as_ref().map(|inner| inner.as_deref()),
            address: value.address.as_ref().map(|inner| inner.as_deref()),
            farm_name: value.farm_name.as_ref().map(|inner| inner.as_deref()),
            location: value.location.as_ref().map(|inner| inner.as_deref()),
            updated_at: value.updated_at,
        }
    }
}

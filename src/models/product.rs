use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub farmer_id: i32,
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i32,
    pub quantity: i32,
    pub is_approved: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub farmer_id: i32,
    pub category_id: Option<i32>,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price_cents: i32,
    pub quantity: i32,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct UpdateProduct<'a> {
    pub name: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub price_cents: Option<i32>,
    pub quantity: Option<i32>,
    pub category_id: Option<Option<i32>>,
    pub is_approved: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            farmer_id: value.farmer_id,
            category_id: value.category_id,
            name: value.name,
            description: value.description,
            price_cents: value.price_cents,
            quantity: value.quantity,
            is_approved: value.is_approved,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            farmer_id: value.farmer_id,
            category_id: value.category_id,
            name: value.name.as_str(),
            description: value.description.as_deref(),
            price_cents: value.price_cents,
            quantity: value.quantity,
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(value: &'a DomainUpdateProduct) -> Self {
        Self {
            name: value.name.as_deref(),
            description: value.description.as_ref().map(|inner| inner.as_deref()),
            price_cents: value.price_cents,
            quantity: value.quantity,
            category_id: value.category_id,
            is_approved: value.is_approved,
            updated_at: value.updated_at,
        }
    }
}

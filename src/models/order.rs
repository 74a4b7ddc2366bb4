use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order::{Order as DomainOrder, OrderItem as DomainOrderItem};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub customer_id: i32,
    pub shipping_address: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(belongs_to(Order, foreign_key = order_id))]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub name: String,
    pub quantity: i32,
    pub price_cents: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder<'a> {
    pub customer_id: i32,
    pub shipping_address: &'a str,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem<'a> {
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub name: &'a str,
    pub quantity: i32,
    pub price_cents: i32,
}

impl Order {
    pub fn into_domain(self, items: Vec<OrderItem>) -> DomainOrder {
        DomainOrder {
            id: self.id,
            customer_id: self.customer_id,
            shipping_address: self.shipping_address,
            items: items.into_iter().map(OrderItem::into_domain).collect(),
            created_at: self.created_at,
        }
    }
}

impl OrderItem {
    pub fn into_domain(self) -> DomainOrderItem {
        DomainOrderItem {
            product_id: self.product_id,
            name: self.name,
            quantity: self.quantity,
            price_cents: self.price_cents,
        }
    }
}

impl From<(Order, Vec<OrderItem>)> for DomainOrder {
    fn from(value: (Order, Vec<OrderItem>)) -> Self {
        value.0.into_domain(value.1)
    }
}

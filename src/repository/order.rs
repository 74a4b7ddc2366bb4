use std::collections::HashMap;

use diesel::prelude::*;

use crate::{
    domain::order::{NewOrder as DomainNewOrder, Order as DomainOrder, OrderListQuery},
    models::order::{
        NewOrder as DbNewOrder, NewOrderItem as DbNewOrderItem, Order as DbOrder,
        OrderItem as DbOrderItem,
    },
    models::product::Product as DbProduct,
    repository::{
        DieselRepository, OrderReader, OrderWriter,
        errors::{CheckoutError, RepositoryResult},
    },
};

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, id: i32, customer_id: i32) -> RepositoryResult<Option<DomainOrder>> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;
        let order = orders::table
            .filter(orders::id.eq(id))
            .filter(orders::customer_id.eq(customer_id))
            .first::<DbOrder>(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = order_items::table
            .filter(order_items::order_id.eq(order.id))
            .order(order_items::id.asc())
            .load::<DbOrderItem>(&mut conn)?;

        Ok(Some(DomainOrder::from((order, items))))
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<Vec<DomainOrder>> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        let mut items = orders::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(customer_id) = query.customer_id {
            items = items.filter(orders::customer_id.eq(customer_id));
        }

        // Newest first; the id breaks ties between same-second orders.
        let db_orders = items
            .order((orders::created_at.desc(), orders::id.desc()))
            .load::<DbOrder>(&mut conn)?;

        if db_orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = db_orders.iter().map(|order| order.id).collect();

        let rows = order_items::table
            .filter(order_items::order_id.eq_any(&order_ids))
            .order(order_items::id.asc())
            .load::<DbOrderItem>(&mut conn)?;

        let mut items_by_order: HashMap<i32, Vec<DbOrderItem>> = HashMap::new();
        for item in rows {
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        let orders = db_orders
            .into_iter()
            .map(|order| {
                let order_id = order.id;
                let items = items_by_order.remove(&order_id).unwrap_or_default();
                DomainOrder::from((order, items))
            })
            .collect();

        Ok(orders)
    }
}

impl OrderWriter for DieselRepository {
    fn checkout(&self, new_order: &DomainNewOrder) -> Result<DomainOrder, CheckoutError> {
        use crate::schema::{order_items, orders, products};

        if new_order.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut conn = self.conn().map_err(CheckoutError::Repository)?;

        conn.transaction::<DomainOrder, CheckoutError, _>(|conn| {
            let db_new = DbNewOrder {
                customer_id: new_order.customer_id,
                shipping_address: new_order.shipping_address.as_str(),
                created_at: new_order.created_at,
            };

            let created = diesel::insert_into(orders::table)
                .values(&db_new)
                .get_result::<DbOrder>(conn)?;

            for item in &new_order.items {
                let product = products::table
                    .filter(products::id.eq(item.product_id))
                    .first::<DbProduct>(conn)
                    .optional()?;

                let Some(product) = product else {
                    return Err(CheckoutError::ProductUnavailable {
                        name: format!("#{}", item.product_id),
                    });
                };

                if !product.is_approved {
                    return Err(CheckoutError::ProductUnavailable { name: product.name });
                }

                // The conditional decrement is the serialization point: if a
                // concurrent checkout drained the stock since the read above,
                // zero rows match and this attempt aborts instead of
                // overselling.
                let decremented = diesel::update(
                    products::table
                        .filter(products::id.eq(item.product_id))
                        .filter(products::quantity.ge(item.quantity)),
                )
                .set(products::quantity.eq(products::quantity - item.quantity))
                .execute(conn)?;

                if decremented == 0 {
                    return Err(CheckoutError::InsufficientStock {
                        name: product.name,
                        available: product.quantity,
                    });
                }

                let db_item = DbNewOrderItem {
                    order_id: created.id,
                    product_id: Some(product.id),
                    name: product.name.as_str(),
                    quantity: item.quantity,
                    price_cents: product.price_cents,
                };

                diesel::insert_into(order_items::table)
                    .values(&db_item)
                    .execute(conn)?;
            }

            let items = order_items::table
                .filter(order_items::order_id.eq(created.id))
                .order(order_items::id.asc())
                .load::<DbOrderItem>(conn)?;

            Ok(DomainOrder::from((created, items)))
        })
    }
}

//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    catalog::models::ProductUuid,
    checkout::models::{NewOrder, Order, OrderItem, OrderStatus, OrderUuid},
    rows::{encode_u32, encode_u64, try_get_amount, try_get_u32},
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("sql/get_order_items.sql");
const GET_ORDER_STATUS_SQL: &str = include_str!("sql/get_order_status.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Inserts the order and all of its items.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: NewOrder,
    ) -> Result<Order, sqlx::Error> {
        let coupon_code = order.coupon_code.as_deref();

        let mut created = query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(&order.customer_name)
            .bind(&order.customer_email)
            .bind(&order.customer_phone)
            .bind(encode_u64("subtotal", order.subtotal.minor())?)
            .bind(encode_u64("discount", order.discount.minor())?)
            .bind(encode_u64("shipping_cost", order.shipping_cost.minor())?)
            .bind(encode_u64("tax_amount", order.tax_amount.minor())?)
            .bind(encode_u64("total_amount", order.total_amount.minor())?)
            .bind(OrderStatus::Pending.as_str())
            .bind(coupon_code)
            .bind(&order.payment_method)
            .bind(&order.shipping_method)
            .fetch_one(&mut **tx)
            .await?;

        for item in &order.items {
            query(CREATE_ORDER_ITEM_SQL)
                .bind(item.uuid)
                .bind(order.uuid.into_uuid())
                .bind(item.product.into_uuid())
                .bind(item.size.as_deref())
                .bind(encode_u32("quantity", item.quantity)?)
                .bind(encode_u64("unit_price", item.unit_price.minor())?)
                .execute(&mut **tx)
                .await?;
        }

        created.items = order.items;

        Ok(created)
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// All orders, newest first, without items.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        query_as::<Postgres, OrderItem>(GET_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Reads the current status under a row lock, so a concurrent
    /// transition on the same order waits for this transaction.
    pub(crate) async fn status_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<OrderStatus>, sqlx::Error> {
        let status: Option<String> = query_scalar(GET_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        status.map(|value| parse_status(&value)).transpose()
    }

    pub(crate) async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn parse_status(value: &str) -> Result<OrderStatus, sqlx::Error> {
    OrderStatus::parse(value).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: format!("unknown order status: {value}").into(),
    })
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
            customer_phone: row.try_get("customer_phone")?,
            subtotal: try_get_amount(row, "subtotal")?,
            discount: try_get_amount(row, "discount")?,
            shipping_cost: try_get_amount(row, "shipping_cost")?,
            tax_amount: try_get_amount(row, "tax_amount")?,
            total_amount: try_get_amount(row, "total_amount")?,
            status: parse_status(&status)?,
            coupon_code: row.try_get("coupon_code")?,
            payment_method: row.try_get("payment_method")?,
            shipping_method: row.try_get("shipping_method")?,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get::<Uuid, _>("uuid")?,
            product: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            size: row.try_get("size")?,
            quantity: try_get_u32(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
        })
    }
}

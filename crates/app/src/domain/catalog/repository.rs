//! Catalog Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use souk::money::Amount;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::{
    catalog::models::{
        NewProduct, NewVariant, Product, ProductUpdate, ProductUuid, ProductVariant, effective_price,
    },
    rows::{encode_u32, encode_u64, try_get_amount, try_get_u64},
};

const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const CREATE_VARIANT_SQL: &str = include_str!("sql/create_variant.sql");
const GET_VARIANTS_SQL: &str = include_str!("sql/get_variants.sql");
const PRODUCT_STOCK_SQL: &str = include_str!("sql/product_stock.sql");
const VARIANT_STOCK_SQL: &str = include_str!("sql/variant_stock.sql");
const RESERVE_PRODUCT_STOCK_SQL: &str = include_str!("sql/reserve_product_stock.sql");
const RESERVE_VARIANT_STOCK_SQL: &str = include_str!("sql/reserve_variant_stock.sql");
const RELEASE_PRODUCT_STOCK_SQL: &str = include_str!("sql/release_product_stock.sql");
const RELEASE_VARIANT_STOCK_SQL: &str = include_str!("sql/release_variant_stock.sql");
const PRODUCT_PRICES_SQL: &str = include_str!("sql/product_prices.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(&product.name)
            .bind(encode_u64("original_price", product.original_price.minor())?)
            .bind(encode_u64(
                "discounted_price",
                product.discounted_price.minor(),
            )?)
            .bind(encode_u64("stock", product.stock)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(&update.name)
            .bind(encode_u64("original_price", update.original_price.minor())?)
            .bind(encode_u64(
                "discounted_price",
                update.discounted_price.minor(),
            )?)
            .bind(encode_u64("stock", update.stock)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn create_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        variant: NewVariant,
    ) -> Result<ProductVariant, sqlx::Error> {
        query_as::<Postgres, ProductVariant>(CREATE_VARIANT_SQL)
            .bind(variant.uuid.into_uuid())
            .bind(product.into_uuid())
            .bind(&variant.size)
            .bind(encode_u64("stock", variant.stock)?)
            .bind(encode_u64("min_display_stock", variant.min_display_stock)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_variants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Vec<ProductVariant>, sqlx::Error> {
        query_as::<Postgres, ProductVariant>(GET_VARIANTS_SQL)
            .bind(product.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Purchasable quantity for a product or one of its variants.
    ///
    /// Unknown products and unknown variants report zero — availability
    /// fails closed.
    pub(crate) async fn available(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        size: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let stock: Option<i64> = match size {
            Some(size) => {
                query_scalar(VARIANT_STOCK_SQL)
                    .bind(product.into_uuid())
                    .bind(size)
                    .fetch_optional(&mut **tx)
                    .await?
            }
            None => {
                query_scalar(PRODUCT_STOCK_SQL)
                    .bind(product.into_uuid())
                    .fetch_optional(&mut **tx)
                    .await?
            }
        };

        Ok(stock.and_then(|stock| u64::try_from(stock).ok()).unwrap_or(0))
    }

    /// Atomically decrement stock by `quantity` when enough is available.
    ///
    /// Returns the number of rows updated: 1 on success, 0 when stock was
    /// insufficient or the key does not exist. The conditional `UPDATE` is
    /// the serialization point for concurrent reservations on the same key.
    pub(crate) async fn reserve(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        size: Option<&str>,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let quantity = i64::from(encode_u32("quantity", quantity)?);

        let result = match size {
            Some(size) => {
                query(RESERVE_VARIANT_STOCK_SQL)
                    .bind(product.into_uuid())
                    .bind(size)
                    .bind(quantity)
                    .execute(&mut **tx)
                    .await?
            }
            None => {
                query(RESERVE_PRODUCT_STOCK_SQL)
                    .bind(product.into_uuid())
                    .bind(quantity)
                    .execute(&mut **tx)
                    .await?
            }
        };

        Ok(result.rows_affected())
    }

    /// Compensating increment, used when a committed order is cancelled.
    pub(crate) async fn release(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        size: Option<&str>,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let quantity = i64::from(encode_u32("quantity", quantity)?);

        let result = match size {
            Some(size) => {
                query(RELEASE_VARIANT_STOCK_SQL)
                    .bind(product.into_uuid())
                    .bind(size)
                    .bind(quantity)
                    .execute(&mut **tx)
                    .await?
            }
            None => {
                query(RELEASE_PRODUCT_STOCK_SQL)
                    .bind(product.into_uuid())
                    .bind(quantity)
                    .execute(&mut **tx)
                    .await?
            }
        };

        Ok(result.rows_affected())
    }

    /// Authoritative effective unit price, or `None` for an unknown product.
    pub(crate) async fn unit_price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Option<Amount>, sqlx::Error> {
        let row = query(PRODUCT_PRICES_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        row.map(|row| {
            let original = try_get_amount(&row, "original_price")?;
            let discounted = try_get_amount(&row, "discounted_price")?;

            Ok(effective_price(original, discounted))
        })
        .transpose()
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            original_price: try_get_amount(row, "original_price")?,
            discounted_price: try_get_amount(row, "discounted_price")?,
            stock: try_get_u64(row, "stock")?,
            variants: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ProductVariant {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get::<uuid::Uuid, _>("uuid")?.into(),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            size: row.try_get("size")?,
            stock: try_get_u64(row, "stock")?,
            min_display_stock: try_get_u64(row, "min_display_stock")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

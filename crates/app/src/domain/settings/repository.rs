//! Settings Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use souk::shipping::{ShippingMethod, StoreSettings};
use sqlx::{Postgres, Row, Transaction, postgres::PgRow, query};

use crate::domain::{
    rows::{encode_u64, try_get_amount, try_get_opt_amount},
    settings::models::{SettingsUpdate, SiteSettings},
};

const GET_SETTINGS_SQL: &str = include_str!("sql/get_settings.sql");
const UPSERT_SETTINGS_SQL: &str = include_str!("sql/upsert_settings.sql");
const LIST_SHIPPING_METHODS_SQL: &str = include_str!("sql/list_shipping_methods.sql");
const PUT_SHIPPING_METHOD_SQL: &str = include_str!("sql/put_shipping_method.sql");
const DELETE_SHIPPING_METHOD_SQL: &str = include_str!("sql/delete_shipping_method.sql");

/// Primary key of the settings singleton row.
const SETTINGS_ID: &str = "default";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSettingsRepository;

impl PgSettingsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// The singleton settings row, or `None` for a store that has never
    /// been configured.
    pub(crate) async fn get_settings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<SiteSettings>, sqlx::Error> {
        query(GET_SETTINGS_SQL)
            .bind(SETTINGS_ID)
            .fetch_optional(&mut **tx)
            .await?
            .map(|row| settings_from_row(&row))
            .transpose()
    }

    pub(crate) async fn upsert_settings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        update: SettingsUpdate,
    ) -> Result<SiteSettings, sqlx::Error> {
        let free_shipping_min = update
            .free_shipping_min
            .map(|amount| encode_u64("free_shipping_min", amount.minor()))
            .transpose()?;

        let row = query(UPSERT_SETTINGS_SQL)
            .bind(SETTINGS_ID)
            .bind(encode_u64("shipping_standard", update.shipping_standard.minor())?)
            .bind(encode_u64("shipping_express", update.shipping_express.minor())?)
            .bind(free_shipping_min)
            .bind(update.tax_percent)
            .fetch_one(&mut **tx)
            .await?;

        settings_from_row(&row)
    }

    pub(crate) async fn list_shipping_methods(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ShippingMethod>, sqlx::Error> {
        query(LIST_SHIPPING_METHODS_SQL)
            .fetch_all(&mut **tx)
            .await?
            .iter()
            .map(method_from_row)
            .collect()
    }

    pub(crate) async fn put_shipping_method(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        method: ShippingMethod,
    ) -> Result<ShippingMethod, sqlx::Error> {
        let row = query(PUT_SHIPPING_METHOD_SQL)
            .bind(&method.id)
            .bind(&method.label)
            .bind(encode_u64("price", method.price.minor())?)
            .bind(method.enabled)
            .fetch_one(&mut **tx)
            .await?;

        method_from_row(&row)
    }

    pub(crate) async fn delete_shipping_method(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_SHIPPING_METHOD_SQL)
            .bind(id)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// The pricing snapshot the calculators consume: the singleton row (or
    /// defaults when absent) plus every admin-defined shipping method.
    ///
    /// Disabled methods are included; the calculator treats them as
    /// unknown.
    pub(crate) async fn snapshot(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<StoreSettings, sqlx::Error> {
        let settings = self.get_settings(tx).await?.unwrap_or_default();
        let custom_methods = self.list_shipping_methods(tx).await?;

        Ok(StoreSettings {
            shipping_standard: settings.shipping_standard,
            shipping_express: settings.shipping_express,
            free_shipping_min: settings.free_shipping_min,
            tax_percent: settings.tax_percent,
            custom_methods,
        })
    }
}

fn settings_from_row(row: &PgRow) -> Result<SiteSettings, sqlx::Error> {
    Ok(SiteSettings {
        shipping_standard: try_get_amount(row, "shipping_standard")?,
        shipping_express: try_get_amount(row, "shipping_express")?,
        free_shipping_min: try_get_opt_amount(row, "free_shipping_min")?,
        tax_percent: row.try_get::<Option<Decimal>, _>("tax_percent")?,
        updated_at: Some(row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff()),
    })
}

fn method_from_row(row: &PgRow) -> Result<ShippingMethod, sqlx::Error> {
    Ok(ShippingMethod {
        id: row.try_get("id")?,
        label: row.try_get("label")?,
        price: try_get_amount(row, "price")?,
        enabled: row.try_get("enabled")?,
    })
}

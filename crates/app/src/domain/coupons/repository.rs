//! Coupons Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use souk::coupons::CouponRule;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    coupons::models::{Coupon, CouponUuid, NewCoupon, kind_as_str, kind_from_str},
    rows::{encode_u32, encode_u64, try_get_opt_amount, try_get_opt_u32, try_get_u32},
};

const CREATE_COUPON_SQL: &str = include_str!("sql/create_coupon.sql");
const GET_COUPON_BY_CODE_SQL: &str = include_str!("sql/get_coupon_by_code.sql");
const LIST_COUPONS_SQL: &str = include_str!("sql/list_coupons.sql");
const SET_COUPON_ACTIVE_SQL: &str = include_str!("sql/set_coupon_active.sql");
const REDEEM_COUPON_SQL: &str = include_str!("sql/redeem_coupon.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: NewCoupon,
    ) -> Result<Coupon, sqlx::Error> {
        let min_subtotal = coupon
            .min_subtotal
            .map(|amount| encode_u64("min_subtotal", amount.minor()))
            .transpose()?;

        let usage_limit = coupon
            .usage_limit
            .map(|limit| encode_u32("usage_limit", limit))
            .transpose()?;

        query_as::<Postgres, Coupon>(CREATE_COUPON_SQL)
            .bind(coupon.uuid.into_uuid())
            .bind(&coupon.code)
            .bind(kind_as_str(coupon.kind))
            .bind(encode_u64("value", coupon.value)?)
            .bind(min_subtotal)
            .bind(usage_limit)
            .bind(coupon.starts_at.map(SqlxTimestamp::from))
            .bind(coupon.ends_at.map(SqlxTimestamp::from))
            .bind(coupon.active)
            .fetch_one(&mut **tx)
            .await
    }

    /// Look up a coupon by its normalized (upper-cased) code.
    pub(crate) async fn get_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<Coupon>, sqlx::Error> {
        query_as::<Postgres, Coupon>(GET_COUPON_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_coupons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Coupon>, sqlx::Error> {
        query_as::<Postgres, Coupon>(LIST_COUPONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn set_active(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
        active: bool,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_COUPON_ACTIVE_SQL)
            .bind(code)
            .bind(active)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Increment the usage counter, guarded by the usage limit.
    ///
    /// Returns 0 when the coupon is unknown or exhausted; called exactly
    /// once per checkout, inside the checkout's transaction.
    pub(crate) async fn redeem(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REDEEM_COUPON_SQL)
            .bind(code)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Coupon {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("kind")?;
        let kind = kind_from_str(&kind).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "kind".to_string(),
            source: format!("unknown coupon kind: {kind}").into(),
        })?;

        Ok(Self {
            uuid: CouponUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            rule: CouponRule {
                kind,
                value: u64::try_from(row.try_get::<i64, _>("value")?).map_err(|e| {
                    sqlx::Error::ColumnDecode {
                        index: "value".to_string(),
                        source: Box::new(e),
                    }
                })?,
                min_subtotal: try_get_opt_amount(row, "min_subtotal")?,
                usage_limit: try_get_opt_u32(row, "usage_limit")?,
                usage_count: try_get_u32(row, "usage_count")?,
                starts_at: row
                    .try_get::<Option<SqlxTimestamp>, _>("starts_at")?
                    .map(SqlxTimestamp::to_jiff),
                ends_at: row
                    .try_get::<Option<SqlxTimestamp>, _>("ends_at")?
                    .map(SqlxTimestamp::to_jiff),
                active: row.try_get("active")?,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

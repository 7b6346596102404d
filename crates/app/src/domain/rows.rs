//! Shared row-decoding helpers.
//!
//! Money and stock live in `BIGINT` columns but are non-negative in the
//! domain, so every read goes through a checked `i64 -> u64` conversion.

use souk::money::Amount;
use sqlx::{Row, postgres::PgRow};

pub(crate) fn try_get_amount(row: &PgRow, index: &str) -> sqlx::Result<Amount> {
    try_get_u64(row, index).map(Amount::from_minor)
}

pub(crate) fn try_get_u64(row: &PgRow, index: &str) -> sqlx::Result<u64> {
    let value: i64 = row.try_get(index)?;

    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_get_opt_amount(row: &PgRow, index: &str) -> sqlx::Result<Option<Amount>> {
    let value: Option<i64> = row.try_get(index)?;

    value
        .map(|value| {
            u64::try_from(value)
                .map(Amount::from_minor)
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: index.to_string(),
                    source: Box::new(e),
                })
        })
        .transpose()
}

pub(crate) fn try_get_opt_u32(row: &PgRow, index: &str) -> sqlx::Result<Option<u32>> {
    let value: Option<i32> = row.try_get(index)?;

    value
        .map(|value| {
            u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
                index: index.to_string(),
                source: Box::new(e),
            })
        })
        .transpose()
}

pub(crate) fn try_get_u32(row: &PgRow, index: &str) -> sqlx::Result<u32> {
    let value: i32 = row.try_get(index)?;

    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: Box::new(e),
    })
}

/// Encode an unsigned minor-unit or stock value for a `BIGINT` bind.
pub(crate) fn encode_u64(index: &str, value: u64) -> sqlx::Result<i64> {
    i64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: Box::new(e),
    })
}

/// Encode a quantity for an `INTEGER` bind.
pub(crate) fn encode_u32(index: &str, value: u32) -> sqlx::Result<i32> {
    i32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: Box::new(e),
    })
}

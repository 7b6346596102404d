//! Checkout service errors.

use souk::{coupons::CouponRejection, money::AmountError};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::checkout::models::OrderStatus;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("line quantity must be greater than zero")]
    InvalidQuantity,

    #[error("product {0} not found")]
    ProductNotFound(Uuid),

    /// A coupon code was supplied but does not apply; the order is not
    /// placed without it.
    #[error("coupon rejected: {0}")]
    InvalidCoupon(CouponRejection),

    #[error("insufficient stock for product {product}")]
    InsufficientStock {
        product: Uuid,
        size: Option<String>,
        requested: u32,
        available: u64,
    },

    #[error("unknown or disabled shipping method: {0}")]
    UnknownShippingMethod(String),

    #[error("pricing failed")]
    Pricing(#[from] AmountError),

    #[error("order not found")]
    NotFound,

    #[error("order cannot move from {from:?} to {to:?}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CheckoutError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(
                ErrorKind::UniqueViolation | ErrorKind::ForeignKeyViolation | ErrorKind::Other | _,
            )
            | None => Self::Sql(error),
        }
    }
}

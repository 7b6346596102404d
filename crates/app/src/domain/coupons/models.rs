//! Coupon Models

use jiff::Timestamp;
use souk::{
    coupons::{CouponKind, CouponRule},
    money::Amount,
};

use crate::uuids::TypedUuid;

/// Coupon UUID
pub type CouponUuid = TypedUuid<Coupon>;

/// Coupon Model
///
/// The persisted record wraps the pure [`CouponRule`] the evaluator works
/// on; the code is stored upper-cased and unique.
#[derive(Debug, Clone)]
pub struct Coupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub rule: CouponRule,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Coupon Model
#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub kind: CouponKind,
    pub value: u64,
    pub min_subtotal: Option<Amount>,
    pub usage_limit: Option<u32>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub active: bool,
}

/// Wire value for a coupon kind column.
pub(crate) const fn kind_as_str(kind: CouponKind) -> &'static str {
    match kind {
        CouponKind::Percent => "PERCENT",
        CouponKind::Fixed => "FIXED",
    }
}

pub(crate) fn kind_from_str(value: &str) -> Option<CouponKind> {
    match value {
        "PERCENT" => Some(CouponKind::Percent),
        "FIXED" => Some(CouponKind::Fixed),
        _ => None,
    }
}

//! Souk
//!
//! Souk is the pricing and fulfilment-eligibility core of a storefront
//! checkout: coupon evaluation, shipping and tax calculation, and order
//! quote composition over integer minor-unit amounts. Everything in this
//! crate is pure; persistence and transactions live in `souk-app`.

pub mod coupons;
pub mod money;
pub mod quotes;
pub mod shipping;

//! Souk Domain Concerns

pub mod catalog;
pub mod checkout;
pub mod coupons;
pub mod settings;

mod rows;

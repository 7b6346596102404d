//! Settings Models

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Serialize;
use souk::money::Amount;

/// The persisted store-wide pricing configuration.
///
/// Stored as a singleton row; [`SiteSettings::default`] is what a store
/// that has never been configured prices with.
#[derive(Debug, Clone, Serialize)]
pub struct SiteSettings {
    pub shipping_standard: Amount,
    pub shipping_express: Amount,
    pub free_shipping_min: Option<Amount>,
    pub tax_percent: Option<Decimal>,
    pub updated_at: Option<Timestamp>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            shipping_standard: Amount::ZERO,
            shipping_express: Amount::ZERO,
            free_shipping_min: None,
            tax_percent: None,
            updated_at: None,
        }
    }
}

/// Replacement values for the settings singleton.
#[derive(Debug, Clone)]
pub struct SettingsUpdate {
    pub shipping_standard: Amount,
    pub shipping_express: Amount,
    pub free_shipping_min: Option<Amount>,
    pub tax_percent: Option<Decimal>,
}

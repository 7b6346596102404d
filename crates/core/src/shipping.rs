//! Shipping cost and tax calculation.
//!
//! Both calculators are pure functions over a [`StoreSettings`] snapshot,
//! which the caller loads from wherever store configuration lives. That
//! keeps the arithmetic deterministic and directly testable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::{Amount, AmountError, percent_of};

/// Identifier of the built-in standard shipping method.
pub const STANDARD: &str = "STANDARD";

/// Identifier of the built-in express shipping method.
pub const EXPRESS: &str = "EXPRESS";

/// An admin-defined shipping method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingMethod {
    /// Method identifier as sent by clients.
    pub id: String,
    /// Human-readable name.
    pub label: String,
    /// Price in minor units.
    pub price: Amount,
    /// Disabled methods are rejected exactly like unknown ones.
    pub enabled: bool,
}

/// Store-level pricing configuration.
///
/// A snapshot of the admin settings; read-only to the calculators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Price of the built-in `STANDARD` method.
    pub shipping_standard: Amount,
    /// Price of the built-in `EXPRESS` method.
    pub shipping_express: Amount,
    /// Subtotal at or above which shipping is free, when set.
    pub free_shipping_min: Option<Amount>,
    /// Tax percentage on a 0–100 scale, when set.
    pub tax_percent: Option<Decimal>,
    /// Admin-defined methods beyond the built-in two.
    pub custom_methods: Vec<ShippingMethod>,
}

/// The requested shipping method is not configured or is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown or disabled shipping method: {0}")]
pub struct UnknownShippingMethod(pub String);

/// Computes the shipping cost for a subtotal and chosen method.
///
/// The free-shipping threshold is compared against the pre-discount
/// subtotal. The method must exist and be enabled even when the threshold
/// waives the cost; a misconfigured method id is a bug to surface, never a
/// value to default.
///
/// # Errors
///
/// Returns [`UnknownShippingMethod`] when `method_id` is neither a built-in
/// method nor an enabled custom method.
pub fn shipping_cost(
    subtotal: Amount,
    method_id: &str,
    settings: &StoreSettings,
) -> Result<Amount, UnknownShippingMethod> {
    let price = method_price(method_id, settings)?;

    if settings
        .free_shipping_min
        .is_some_and(|threshold| subtotal >= threshold)
    {
        return Ok(Amount::ZERO);
    }

    Ok(price)
}

/// Computes the tax amount for a subtotal.
///
/// A store with no configured tax percentage charges no tax. Rounding is
/// half away from zero.
///
/// # Errors
///
/// Returns [`AmountError`] when the configured percentage cannot be applied
/// (negative or overflowing).
pub fn tax_amount(subtotal: Amount, settings: &StoreSettings) -> Result<Amount, AmountError> {
    match settings.tax_percent {
        None => Ok(Amount::ZERO),
        Some(percent) => percent_of(subtotal, percent),
    }
}

fn method_price(
    method_id: &str,
    settings: &StoreSettings,
) -> Result<Amount, UnknownShippingMethod> {
    match method_id {
        STANDARD => Ok(settings.shipping_standard),
        EXPRESS => Ok(settings.shipping_express),
        other => settings
            .custom_methods
            .iter()
            .find(|method| method.enabled && method.id == other)
            .map(|method| method.price)
            .ok_or_else(|| UnknownShippingMethod(other.to_string())),
    }
}

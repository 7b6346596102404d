//! Quote composition.

use serde::{Deserialize, Serialize};

use crate::money::Amount;

/// The priced breakdown of a checkout attempt.
///
/// Composed once per attempt and, on commit, snapshotted onto the order so
/// later price or coupon changes never alter a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Sum of line prices before discount, shipping, and tax.
    pub subtotal: Amount,
    /// Coupon discount; zero when no coupon applied.
    pub discount: Amount,
    /// Shipping cost after the free-shipping threshold.
    pub shipping: Amount,
    /// Tax amount.
    pub tax: Amount,
    /// `max(0, subtotal - discount + shipping + tax)`.
    pub total: Amount,
}

impl Quote {
    /// Composes a quote, clamping the final total at zero.
    #[must_use]
    pub fn compose(subtotal: Amount, discount: Amount, shipping: Amount, tax: Amount) -> Self {
        let total = i128::from(subtotal.minor()) - i128::from(discount.minor())
            + i128::from(shipping.minor())
            + i128::from(tax.minor());

        let total = total.clamp(0, i128::from(u64::MAX));

        Self {
            subtotal,
            discount,
            shipping,
            tax,
            total: Amount::from_minor(u64::try_from(total).unwrap_or(u64::MAX)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minor(value: u64) -> Amount {
        Amount::from_minor(value)
    }

    #[test]
    fn compose_adds_shipping_and_tax_after_discount() {
        let quote = Quote::compose(minor(100_000), minor(15_000), minor(7_500), minor(14_000));

        assert_eq!(quote.total, minor(106_500));
    }

    #[test]
    fn compose_clamps_total_at_zero() {
        // An oversized discount cannot push the total negative.
        let quote = Quote::compose(minor(100), minor(10_000), minor(0), minor(0));

        assert_eq!(quote.total, Amount::ZERO);
    }

    #[test]
    fn compose_with_no_extras_is_subtotal() {
        let quote = Quote::compose(minor(4_200), Amount::ZERO, Amount::ZERO, Amount::ZERO);

        assert_eq!(quote.total, minor(4_200));
        assert_eq!(quote.subtotal, minor(4_200));
    }
}

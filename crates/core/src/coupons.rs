//! Coupon evaluation.
//!
//! Deciding whether a coupon code applies to a subtotal, and how much it
//! takes off, is pure: the rule record, the subtotal, and the evaluation
//! instant go in, a discount or a typed rejection comes out. Nothing here
//! mutates usage counters — redemption is the checkout commit's job, so
//! repeated quote requests stay idempotent.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::Amount;

/// How a coupon's `value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CouponKind {
    /// `value` is a whole-number percentage of the subtotal, 1–100.
    Percent,
    /// `value` is a fixed minor-unit amount.
    Fixed,
}

/// The redemption rules attached to a coupon code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponRule {
    /// Percent or fixed discount.
    pub kind: CouponKind,
    /// Whole-number percentage for [`CouponKind::Percent`], minor units for
    /// [`CouponKind::Fixed`].
    pub value: u64,
    /// Minimum subtotal required to redeem, when set.
    pub min_subtotal: Option<Amount>,
    /// Maximum number of redemptions, when set.
    pub usage_limit: Option<u32>,
    /// Redemptions so far.
    pub usage_count: u32,
    /// Start of the activity window; open-ended when `None`.
    pub starts_at: Option<Timestamp>,
    /// End of the activity window; open-ended when `None`.
    pub ends_at: Option<Timestamp>,
    /// Administrative kill switch.
    pub active: bool,
}

impl CouponRule {
    /// Whether the coupon can be redeemed at `now`: active, inside the
    /// activity window, and not exhausted.
    pub fn usable_at(&self, now: Timestamp) -> bool {
        if !self.active {
            return false;
        }

        if self.starts_at.is_some_and(|starts_at| now < starts_at) {
            return false;
        }

        if self.ends_at.is_some_and(|ends_at| now > ends_at) {
            return false;
        }

        self.usage_limit
            .is_none_or(|limit| self.usage_count < limit)
    }
}

/// Why a coupon does not apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponRejection {
    /// The supplied code was empty after trimming.
    #[error("coupon code is missing")]
    MissingCode,

    /// The subtotal was zero, so there is nothing to discount.
    #[error("subtotal must be greater than zero")]
    InvalidSubtotal,

    /// Unknown code, inactive, outside the activity window, or exhausted.
    #[error("coupon is invalid or expired")]
    InvalidOrExpired,

    /// The subtotal is below the coupon's minimum.
    #[error("subtotal is below the coupon minimum")]
    MinSubtotal,
}

impl CouponRejection {
    /// Stable machine-readable reason code for clients.
    pub const fn reason(self) -> &'static str {
        match self {
            Self::MissingCode => "missing_code",
            Self::InvalidSubtotal => "invalid_subtotal",
            Self::InvalidOrExpired => "invalid_or_expired",
            Self::MinSubtotal => "min_subtotal",
        }
    }
}

/// A successfully evaluated discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponDiscount {
    /// Amount taken off the subtotal, clamped so it never exceeds it.
    pub discount: Amount,
    /// `subtotal - discount`.
    pub total: Amount,
}

/// Normalizes a client-supplied coupon code: trimmed, upper-cased.
///
/// Codes are stored upper-cased, so lookups after normalization are
/// case-insensitive.
///
/// # Errors
///
/// Returns [`CouponRejection::MissingCode`] when the code is empty after
/// trimming.
pub fn normalize_code(code: &str) -> Result<String, CouponRejection> {
    let code = code.trim();

    if code.is_empty() {
        return Err(CouponRejection::MissingCode);
    }

    Ok(code.to_uppercase())
}

/// Evaluates a coupon rule against a subtotal at a given instant.
///
/// Read-only: the rule's `usage_count` is inspected, never incremented.
///
/// # Errors
///
/// - [`CouponRejection::InvalidSubtotal`] when the subtotal is zero.
/// - [`CouponRejection::InvalidOrExpired`] when the rule is unusable at
///   `now` (inactive, outside its window, or exhausted).
/// - [`CouponRejection::MinSubtotal`] when the subtotal is below the rule's
///   minimum.
pub fn evaluate(
    rule: &CouponRule,
    subtotal: Amount,
    now: Timestamp,
) -> Result<CouponDiscount, CouponRejection> {
    if subtotal.is_zero() {
        return Err(CouponRejection::InvalidSubtotal);
    }

    if !rule.usable_at(now) {
        return Err(CouponRejection::InvalidOrExpired);
    }

    if rule
        .min_subtotal
        .is_some_and(|min_subtotal| subtotal < min_subtotal)
    {
        return Err(CouponRejection::MinSubtotal);
    }

    let discount = match rule.kind {
        CouponKind::Percent => percent_discount(subtotal, rule.value),
        CouponKind::Fixed => Amount::from_minor(rule.value).min(subtotal),
    };

    Ok(CouponDiscount {
        discount,
        total: subtotal.saturating_sub(discount),
    })
}

/// `value` percent of `subtotal`, rounded half away from zero and clamped to
/// the subtotal.
fn percent_discount(subtotal: Amount, value: u64) -> Amount {
    let minor = u128::from(subtotal.minor());
    let raw = (minor * u128::from(value) + 50) / 100;

    // After the clamp the value fits in u64 again.
    Amount::from_minor(u64::try_from(raw.min(minor)).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn percent_rule(value: u64) -> CouponRule {
        CouponRule {
            kind: CouponKind::Percent,
            value,
            min_subtotal: None,
            usage_limit: None,
            usage_count: 0,
            starts_at: None,
            ends_at: None,
            active: true,
        }
    }

    fn fixed_rule(value: u64) -> CouponRule {
        CouponRule {
            kind: CouponKind::Fixed,
            ..percent_rule(value)
        }
    }

    #[test]
    fn normalize_trims_and_uppercases() -> TestResult {
        assert_eq!(normalize_code("  save10 ")?, "SAVE10");

        Ok(())
    }

    #[test]
    fn normalize_empty_code_is_missing() {
        assert_eq!(normalize_code("   "), Err(CouponRejection::MissingCode));
        assert_eq!(normalize_code(""), Err(CouponRejection::MissingCode));
    }

    #[test]
    fn percent_math() -> TestResult {
        // 15% of 1000.00 is 150.00.
        let result = evaluate(&percent_rule(15), Amount::from_minor(100_000), Timestamp::now())?;

        assert_eq!(result.discount, Amount::from_minor(15_000));
        assert_eq!(result.total, Amount::from_minor(85_000));

        Ok(())
    }

    #[test]
    fn fixed_discount_clamped_to_subtotal() -> TestResult {
        // A 300.00 fixed coupon on a 200.00 subtotal discounts 200.00.
        let result = evaluate(&fixed_rule(30_000), Amount::from_minor(20_000), Timestamp::now())?;

        assert_eq!(result.discount, Amount::from_minor(20_000));
        assert_eq!(result.total, Amount::ZERO);

        Ok(())
    }

    #[test]
    fn discount_never_exceeds_subtotal() -> TestResult {
        for (rule, subtotal) in [
            (percent_rule(100), Amount::from_minor(12_345)),
            (percent_rule(1), Amount::from_minor(1)),
            (fixed_rule(1), Amount::from_minor(999)),
            (fixed_rule(u64::MAX), Amount::from_minor(50)),
        ] {
            let result = evaluate(&rule, subtotal, Timestamp::now())?;

            assert!(result.discount <= subtotal, "discount exceeded subtotal");
            assert_eq!(result.total, subtotal.saturating_sub(result.discount));
        }

        Ok(())
    }

    #[test]
    fn zero_subtotal_is_invalid() {
        let result = evaluate(&percent_rule(10), Amount::ZERO, Timestamp::now());

        assert_eq!(result, Err(CouponRejection::InvalidSubtotal));
    }

    #[test]
    fn expired_coupon_rejected_regardless_of_other_fields() {
        let rule = CouponRule {
            ends_at: Some(Timestamp::UNIX_EPOCH),
            ..percent_rule(50)
        };

        let result = evaluate(&rule, Amount::from_minor(100_000), Timestamp::now());

        assert_eq!(result, Err(CouponRejection::InvalidOrExpired));
    }

    #[test]
    fn future_start_rejected() {
        let rule = CouponRule {
            starts_at: Some(Timestamp::MAX),
            ..percent_rule(10)
        };

        let result = evaluate(&rule, Amount::from_minor(1_000), Timestamp::now());

        assert_eq!(result, Err(CouponRejection::InvalidOrExpired));
    }

    #[test]
    fn inactive_coupon_rejected() {
        let rule = CouponRule {
            active: false,
            ..percent_rule(10)
        };

        let result = evaluate(&rule, Amount::from_minor(1_000), Timestamp::now());

        assert_eq!(result, Err(CouponRejection::InvalidOrExpired));
    }

    #[test]
    fn exhausted_usage_rejected() {
        let rule = CouponRule {
            usage_limit: Some(5),
            usage_count: 5,
            ..percent_rule(10)
        };

        let result = evaluate(&rule, Amount::from_minor(1_000), Timestamp::now());

        assert_eq!(result, Err(CouponRejection::InvalidOrExpired));
    }

    #[test]
    fn below_min_subtotal_rejected() {
        let rule = CouponRule {
            min_subtotal: Some(Amount::from_minor(100_000)),
            ..percent_rule(10)
        };

        let result = evaluate(&rule, Amount::from_minor(99_999), Timestamp::now());

        assert_eq!(result, Err(CouponRejection::MinSubtotal));
    }

    #[test]
    fn evaluation_is_idempotent() -> TestResult {
        let rule = CouponRule {
            usage_limit: Some(3),
            usage_count: 1,
            ..percent_rule(10)
        };

        let now = Timestamp::now();
        let subtotal = Amount::from_minor(140_000);

        let first = evaluate(&rule, subtotal, now)?;
        let second = evaluate(&rule, subtotal, now)?;

        assert_eq!(first, second);
        assert_eq!(rule.usage_count, 1, "evaluation must not mutate usage");

        Ok(())
    }

    #[test]
    fn rejection_reason_codes_are_stable() {
        assert_eq!(CouponRejection::MissingCode.reason(), "missing_code");
        assert_eq!(CouponRejection::InvalidSubtotal.reason(), "invalid_subtotal");
        assert_eq!(
            CouponRejection::InvalidOrExpired.reason(),
            "invalid_or_expired"
        );
        assert_eq!(CouponRejection::MinSubtotal.reason(), "min_subtotal");
    }
}

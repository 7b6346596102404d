//! Checkout Models

use jiff::Timestamp;
use souk::money::Amount;
use uuid::Uuid;

use crate::{domain::catalog::models::ProductUuid, uuids::TypedUuid};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Lifecycle of a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Paid,
    Failed,
    Cancelled,
    Processing,
    Shipped,
    Delivered,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Processing => "PROCESSING",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(Self::Pending),
            "PAID" => Some(Self::Paid),
            "FAILED" => Some(Self::Failed),
            "CANCELLED" => Some(Self::Cancelled),
            "PROCESSING" => Some(Self::Processing),
            "SHIPPED" => Some(Self::Shipped),
            "DELIVERED" => Some(Self::Delivered),
            _ => None,
        }
    }

    /// Whether an order may move from `self` to `next`.
    ///
    /// Fulfilment only moves forward; `Failed`, `Cancelled`, and
    /// `Delivered` are terminal.
    #[must_use]
    pub const fn can_transition(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Paid | Self::Failed | Self::Cancelled)
                | (Self::Paid, Self::Processing | Self::Cancelled)
                | (Self::Processing, Self::Shipped | Self::Cancelled)
                | (Self::Shipped, Self::Delivered)
        )
    }

    /// Whether cancelling from this status returns reserved stock to the
    /// shelves. Shipped goods are already gone.
    #[must_use]
    pub const fn holds_stock(self) -> bool {
        matches!(self, Self::Pending | Self::Paid | Self::Processing)
    }
}

/// One line of a checkout request. Quantities are validated, prices are
/// never taken from the client.
#[derive(Debug, Clone)]
pub struct CheckoutLine {
    pub product: ProductUuid,
    pub size: Option<String>,
    pub quantity: u32,
}

/// Everything a client submits to place an order.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub lines: Vec<CheckoutLine>,
    pub coupon_code: Option<String>,
    pub shipping_method: String,
    pub payment_method: String,
}

/// A placed order with its priced breakdown.
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderUuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub subtotal: Amount,
    pub discount: Amount,
    pub shipping_cost: Amount,
    pub tax_amount: Amount,
    pub total_amount: Amount,
    pub status: OrderStatus,
    pub coupon_code: Option<String>,
    pub payment_method: String,
    pub shipping_method: String,
    pub items: Vec<OrderItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A fully priced order ready to persist. Status starts at
/// [`OrderStatus::Pending`]; timestamps come from the database.
#[derive(Debug, Clone)]
pub(crate) struct NewOrder {
    pub uuid: OrderUuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub subtotal: Amount,
    pub discount: Amount,
    pub shipping_cost: Amount,
    pub tax_amount: Amount,
    pub total_amount: Amount,
    pub coupon_code: Option<String>,
    pub payment_method: String,
    pub shipping_method: String,
    pub items: Vec<OrderItem>,
}

/// A priced line frozen at checkout time.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub uuid: Uuid,
    pub product: ProductUuid,
    pub size: Option<String>,
    pub quantity: u32,
    pub unit_price: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrips_through_wire_values() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Failed,
            OrderStatus::Cancelled,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }

        assert_eq!(OrderStatus::parse("REFUNDED"), None);
    }

    #[test]
    fn terminal_statuses_allow_no_transitions() {
        for terminal in [
            OrderStatus::Failed,
            OrderStatus::Cancelled,
            OrderStatus::Delivered,
        ] {
            for next in [
                OrderStatus::Pending,
                OrderStatus::Paid,
                OrderStatus::Processing,
                OrderStatus::Shipped,
                OrderStatus::Delivered,
            ] {
                assert!(
                    !terminal.can_transition(next),
                    "{terminal:?} must not move to {next:?}"
                );
            }
        }
    }

    #[test]
    fn fulfilment_only_moves_forward() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Paid));
        assert!(OrderStatus::Paid.can_transition(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition(OrderStatus::Delivered));

        assert!(!OrderStatus::Paid.can_transition(OrderStatus::Pending));
        assert!(!OrderStatus::Shipped.can_transition(OrderStatus::Cancelled));
        assert!(!OrderStatus::Pending.can_transition(OrderStatus::Shipped));
    }
}

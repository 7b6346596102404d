//! Checkout service: the order total composer and the order lifecycle.
//!
//! Placing an order runs in a single transaction: reprice, evaluate the
//! coupon, price shipping and tax, reserve stock, redeem the coupon, and
//! persist the order with its numbers locked in. Any failure before commit
//! rolls the whole thing back, so no order row and no stock change survive
//! a rejected checkout.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use souk::{
    coupons::{self, CouponRejection},
    money::{self, Amount},
    quotes::Quote,
    shipping,
};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        catalog::PgCatalogRepository,
        checkout::{
            errors::CheckoutError,
            models::{CheckoutRequest, NewOrder, Order, OrderItem, OrderStatus, OrderUuid},
            repository::PgOrdersRepository,
        },
        coupons::PgCouponsRepository,
        settings::PgSettingsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCheckoutService {
    db: Db,
    orders: PgOrdersRepository,
    catalog: PgCatalogRepository,
    coupons: PgCouponsRepository,
    settings: PgSettingsRepository,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            catalog: PgCatalogRepository::new(),
            coupons: PgCouponsRepository::new(),
            settings: PgSettingsRepository::new(),
        }
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    async fn place_order(&self, request: CheckoutRequest) -> Result<Order, CheckoutError> {
        if request.lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        if request.lines.iter().any(|line| line.quantity == 0) {
            return Err(CheckoutError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        // Authoritative prices only; whatever the client claims is ignored.
        let mut subtotal = Amount::ZERO;
        let mut items = Vec::with_capacity(request.lines.len());

        for line in &request.lines {
            let unit_price = self
                .catalog
                .unit_price(&mut tx, line.product)
                .await?
                .ok_or(CheckoutError::ProductNotFound(line.product.into_uuid()))?;

            let line_total = money::line_total(unit_price, line.quantity)?;
            subtotal = subtotal.checked_add(line_total)?;

            items.push(OrderItem {
                uuid: Uuid::now_v7(),
                product: line.product,
                size: line.size.clone(),
                quantity: line.quantity,
                unit_price,
            });
        }

        // An unusable coupon rejects the whole checkout rather than pricing
        // the order without it.
        let mut coupon_code = None;
        let mut discount = Amount::ZERO;

        if let Some(code) = request.coupon_code.as_deref() {
            let code = coupons::normalize_code(code).map_err(CheckoutError::InvalidCoupon)?;

            let coupon = self
                .coupons
                .get_by_code(&mut tx, &code)
                .await?
                .ok_or(CheckoutError::InvalidCoupon(CouponRejection::InvalidOrExpired))?;

            let evaluated = coupons::evaluate(&coupon.rule, subtotal, Timestamp::now())
                .map_err(CheckoutError::InvalidCoupon)?;

            discount = evaluated.discount;
            coupon_code = Some(code);
        }

        // Shipping threshold and tax both work off the pre-discount subtotal.
        let store = self.settings.snapshot(&mut tx).await?;

        let shipping_cost = shipping::shipping_cost(subtotal, &request.shipping_method, &store)
            .map_err(|e| CheckoutError::UnknownShippingMethod(e.0))?;
        let tax_amount = shipping::tax_amount(subtotal, &store)?;

        let quote = Quote::compose(subtotal, discount, shipping_cost, tax_amount);

        // Reserve every line; the first shortage aborts and the rollback
        // undoes the reservations already made.
        for item in &items {
            let reserved = self
                .catalog
                .reserve(&mut tx, item.product, item.size.as_deref(), item.quantity)
                .await?;

            if reserved == 0 {
                let available = self
                    .catalog
                    .available(&mut tx, item.product, item.size.as_deref())
                    .await?;

                tracing::warn!(
                    product = %item.product,
                    requested = item.quantity,
                    available,
                    "checkout rejected: insufficient stock"
                );

                return Err(CheckoutError::InsufficientStock {
                    product: item.product.into_uuid(),
                    size: item.size.clone(),
                    requested: item.quantity,
                    available,
                });
            }
        }

        // The one place a coupon is consumed. A concurrent checkout may
        // have exhausted it since evaluation; the guard catches that.
        if let Some(code) = coupon_code.as_deref() {
            let redeemed = self.coupons.redeem(&mut tx, code).await?;

            if redeemed == 0 {
                return Err(CheckoutError::InvalidCoupon(
                    CouponRejection::InvalidOrExpired,
                ));
            }
        }

        let order = self
            .orders
            .create_order(
                &mut tx,
                NewOrder {
                    uuid: OrderUuid::new(),
                    customer_name: request.customer_name,
                    customer_email: request.customer_email,
                    customer_phone: request.customer_phone,
                    subtotal: quote.subtotal,
                    discount: quote.discount,
                    shipping_cost: quote.shipping,
                    tax_amount: quote.tax,
                    total_amount: quote.total,
                    coupon_code,
                    payment_method: request.payment_method,
                    shipping_method: request.shipping_method,
                    items,
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            order = %order.uuid,
            total = %order.total_amount,
            "order placed"
        );

        Ok(order)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<Order, CheckoutError> {
        let mut tx = self.db.begin().await?;

        let mut found = self.orders.get_order(&mut tx, order).await?;
        let items = self.orders.get_items(&mut tx, order).await?;

        tx.commit().await?;

        found.items = items;

        Ok(found)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, CheckoutError> {
        let mut tx = self.db.begin().await?;

        let orders = self.orders.list_orders(&mut tx).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<(), CheckoutError> {
        let mut tx = self.db.begin().await?;

        let current = self
            .orders
            .status_for_update(&mut tx, order)
            .await?
            .ok_or(CheckoutError::NotFound)?;

        if !current.can_transition(status) {
            return Err(CheckoutError::InvalidStatusTransition {
                from: current,
                to: status,
            });
        }

        self.orders.set_status(&mut tx, order, status).await?;

        tx.commit().await?;

        tracing::info!(order = %order, from = current.as_str(), to = status.as_str(), "order status updated");

        Ok(())
    }

    async fn cancel_order(&self, order: OrderUuid) -> Result<(), CheckoutError> {
        let mut tx = self.db.begin().await?;

        let current = self
            .orders
            .status_for_update(&mut tx, order)
            .await?
            .ok_or(CheckoutError::NotFound)?;

        if !current.can_transition(OrderStatus::Cancelled) {
            return Err(CheckoutError::InvalidStatusTransition {
                from: current,
                to: OrderStatus::Cancelled,
            });
        }

        // Cancelling an order that still holds reservations puts the units
        // back on the shelves in the same transaction.
        if current.holds_stock() {
            let items = self.orders.get_items(&mut tx, order).await?;

            for item in &items {
                self.catalog
                    .release(&mut tx, item.product, item.size.as_deref(), item.quantity)
                    .await?;
            }
        }

        self.orders
            .set_status(&mut tx, order, OrderStatus::Cancelled)
            .await?;

        tx.commit().await?;

        tracing::info!(order = %order, "order cancelled");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Prices and persists an order in one transaction. Rejection leaves
    /// no order row and no stock change behind.
    async fn place_order(&self, request: CheckoutRequest) -> Result<Order, CheckoutError>;

    /// Retrieves an order with its items.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, CheckoutError>;

    /// Retrieves all orders, newest first, without items.
    async fn list_orders(&self) -> Result<Vec<Order>, CheckoutError>;

    /// Moves an order through its lifecycle, enforcing the allowed
    /// transitions.
    async fn update_status(&self, order: OrderUuid, status: OrderStatus)
    -> Result<(), CheckoutError>;

    /// Cancels an order and releases any stock it still holds.
    async fn cancel_order(&self, order: OrderUuid) -> Result<(), CheckoutError>;
}

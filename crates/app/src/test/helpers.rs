//! Test Helpers

use souk::{coupons::CouponKind, money::Amount};

use crate::{
    domain::{
        catalog::{
            CatalogService, CatalogServiceError,
            models::{NewProduct, NewVariant, Product, ProductUuid, ProductVariant, VariantUuid},
        },
        checkout::models::{CheckoutLine, CheckoutRequest},
        coupons::models::{CouponUuid, NewCoupon},
    },
    test::TestContext,
};

pub(crate) async fn create_product(
    ctx: &TestContext,
    name: &str,
    price_minor: u64,
    stock: u64,
) -> Result<Product, CatalogServiceError> {
    ctx.catalog
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            name: name.to_string(),
            original_price: Amount::from_minor(price_minor),
            discounted_price: Amount::from_minor(price_minor),
            stock,
        })
        .await
}

pub(crate) async fn create_variant(
    ctx: &TestContext,
    product: ProductUuid,
    size: &str,
    stock: u64,
) -> Result<ProductVariant, CatalogServiceError> {
    ctx.catalog
        .add_variant(
            product,
            NewVariant {
                uuid: VariantUuid::new(),
                size: size.to_string(),
                stock,
                min_display_stock: 0,
            },
        )
        .await
}

/// An active percent coupon with no window, minimum, or usage limit.
pub(crate) fn percent_coupon(code: &str, value: u64) -> NewCoupon {
    NewCoupon {
        uuid: CouponUuid::new(),
        code: code.to_string(),
        kind: CouponKind::Percent,
        value,
        min_subtotal: None,
        usage_limit: None,
        starts_at: None,
        ends_at: None,
        active: true,
    }
}

pub(crate) fn line(product: ProductUuid, size: Option<&str>, quantity: u32) -> CheckoutLine {
    CheckoutLine {
        product,
        size: size.map(str::to_string),
        quantity,
    }
}

pub(crate) fn checkout_request(
    lines: Vec<CheckoutLine>,
    coupon_code: Option<&str>,
    shipping_method: &str,
) -> CheckoutRequest {
    CheckoutRequest {
        customer_name: "Nadia Farouk".to_string(),
        customer_email: "nadia@example.com".to_string(),
        customer_phone: "+20 100 000 0000".to_string(),
        lines,
        coupon_code: coupon_code.map(str::to_string),
        shipping_method: shipping_method.to_string(),
        payment_method: "COD".to_string(),
    }
}

//! Catalog Models

use jiff::Timestamp;
use souk::money::Amount;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Variant UUID
pub type VariantUuid = TypedUuid<ProductVariant>;

/// Product Model
#[derive(Debug, Clone)]
pub struct Product {
    pub uuid: ProductUuid,
    pub name: String,
    pub original_price: Amount,
    pub discounted_price: Amount,
    /// Purchasable stock when the product has no variants.
    pub stock: u64,
    pub variants: Vec<ProductVariant>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    /// The price checkout charges for one unit.
    pub fn effective_price(&self) -> Amount {
        effective_price(self.original_price, self.discounted_price)
    }
}

/// The sale price applies only when it is strictly below the original price.
pub fn effective_price(original: Amount, discounted: Amount) -> Amount {
    if discounted < original {
        discounted
    } else {
        original
    }
}

/// Product Variant Model
#[derive(Debug, Clone)]
pub struct ProductVariant {
    pub uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    /// Unique per product.
    pub size: String,
    pub stock: u64,
    /// Display-only low-stock threshold; pricing never enforces it.
    pub min_display_stock: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Product Model
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub original_price: Amount,
    pub discounted_price: Amount,
    pub stock: u64,
}

/// Product Update Model
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub name: String,
    pub original_price: Amount,
    pub discounted_price: Amount,
    pub stock: u64,
}

/// New Variant Model
#[derive(Debug, Clone)]
pub struct NewVariant {
    pub uuid: VariantUuid,
    pub size: String,
    pub stock: u64,
    pub min_display_stock: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discounted_price_applies_only_when_strictly_lower() {
        let original = Amount::from_minor(10_000);

        assert_eq!(
            effective_price(original, Amount::from_minor(8_000)),
            Amount::from_minor(8_000)
        );
        assert_eq!(effective_price(original, original), original);
        assert_eq!(
            effective_price(original, Amount::from_minor(12_000)),
            original
        );
    }
}

//! Catalog service: product/variant administration and the stock ledger.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogServiceError,
        models::{NewProduct, NewVariant, Product, ProductUpdate, ProductUuid, ProductVariant},
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let mut found = self.repository.get_product(&mut tx, product).await?;
        let variants = self.repository.get_variants(&mut tx, product).await?;

        tx.commit().await?;

        found.variants = variants;

        Ok(found)
    }

    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn add_variant(
        &self,
        product: ProductUuid,
        variant: NewVariant,
    ) -> Result<ProductVariant, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_variant(&mut tx, product, variant)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn available(
        &self,
        product: ProductUuid,
        size: Option<String>,
    ) -> Result<u64, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let available = self
            .repository
            .available(&mut tx, product, size.as_deref())
            .await?;

        tx.commit().await?;

        Ok(available)
    }

    async fn reserve(
        &self,
        product: ProductUuid,
        size: Option<String>,
        quantity: u32,
    ) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let reserved = self
            .repository
            .reserve(&mut tx, product, size.as_deref(), quantity)
            .await?;

        if reserved == 0 {
            let available = self
                .repository
                .available(&mut tx, product, size.as_deref())
                .await?;

            return Err(CatalogServiceError::InsufficientStock {
                product: product.into_uuid(),
                size,
                requested: quantity,
                available,
            });
        }

        tx.commit().await?;

        Ok(())
    }

    async fn release(
        &self,
        product: ProductUuid,
        size: Option<String>,
        quantity: u32,
    ) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let released = self
            .repository
            .release(&mut tx, product, size.as_deref(), quantity)
            .await?;

        if released == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Creates a new product.
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogServiceError>;

    /// Retrieve a single product with its variants.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, CatalogServiceError>;

    /// Retrieves all products, without variants.
    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError>;

    /// Replaces a product's editable fields.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, CatalogServiceError>;

    /// Deletes a product and its variants.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), CatalogServiceError>;

    /// Adds a sized variant to a product. Sizes are unique per product.
    async fn add_variant(
        &self,
        product: ProductUuid,
        variant: NewVariant,
    ) -> Result<ProductVariant, CatalogServiceError>;

    /// Purchasable quantity for a product or variant; zero when unknown.
    async fn available(
        &self,
        product: ProductUuid,
        size: Option<String>,
    ) -> Result<u64, CatalogServiceError>;

    /// Atomically reserves `quantity` units, failing without change when
    /// not enough stock is available.
    async fn reserve(
        &self,
        product: ProductUuid,
        size: Option<String>,
        quantity: u32,
    ) -> Result<(), CatalogServiceError>;

    /// Compensating increment for a reservation that will not be fulfilled.
    async fn release(
        &self,
        product: ProductUuid,
        size: Option<String>,
        quantity: u32,
    ) -> Result<(), CatalogServiceError>;
}

//! Settings service: store-wide pricing configuration.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use souk::shipping::{ShippingMethod, StoreSettings};

use crate::{
    database::Db,
    domain::settings::{
        errors::SettingsServiceError,
        models::{SettingsUpdate, SiteSettings},
        repository::PgSettingsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgSettingsService {
    db: Db,
    repository: PgSettingsRepository,
}

impl PgSettingsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgSettingsRepository::new(),
        }
    }
}

#[async_trait]
impl SettingsService for PgSettingsService {
    async fn get_settings(&self) -> Result<SiteSettings, SettingsServiceError> {
        let mut tx = self.db.begin().await?;

        let settings = self.repository.get_settings(&mut tx).await?;

        tx.commit().await?;

        Ok(settings.unwrap_or_default())
    }

    async fn update_settings(
        &self,
        update: SettingsUpdate,
    ) -> Result<SiteSettings, SettingsServiceError> {
        if update
            .tax_percent
            .is_some_and(|percent| percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED)
        {
            return Err(SettingsServiceError::InvalidTaxPercent);
        }

        let mut tx = self.db.begin().await?;

        let settings = self.repository.upsert_settings(&mut tx, update).await?;

        tx.commit().await?;

        Ok(settings)
    }

    async fn list_shipping_methods(&self) -> Result<Vec<ShippingMethod>, SettingsServiceError> {
        let mut tx = self.db.begin().await?;

        let methods = self.repository.list_shipping_methods(&mut tx).await?;

        tx.commit().await?;

        Ok(methods)
    }

    async fn put_shipping_method(
        &self,
        method: ShippingMethod,
    ) -> Result<ShippingMethod, SettingsServiceError> {
        if method.id.trim().is_empty() || method.label.trim().is_empty() {
            return Err(SettingsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let stored = self.repository.put_shipping_method(&mut tx, method).await?;

        tx.commit().await?;

        Ok(stored)
    }

    async fn remove_shipping_method(&self, id: &str) -> Result<(), SettingsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_shipping_method(&mut tx, id).await?;

        if rows_affected == 0 {
            return Err(SettingsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn snapshot(&self) -> Result<StoreSettings, SettingsServiceError> {
        let mut tx = self.db.begin().await?;

        let snapshot = self.repository.snapshot(&mut tx).await?;

        tx.commit().await?;

        Ok(snapshot)
    }
}

#[automock]
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// The settings singleton; a never-configured store reads as the
    /// defaults without writing anything.
    async fn get_settings(&self) -> Result<SiteSettings, SettingsServiceError>;

    /// Replaces the settings singleton.
    async fn update_settings(
        &self,
        update: SettingsUpdate,
    ) -> Result<SiteSettings, SettingsServiceError>;

    /// All admin-defined shipping methods, enabled or not.
    async fn list_shipping_methods(&self) -> Result<Vec<ShippingMethod>, SettingsServiceError>;

    /// Creates or replaces a shipping method by id.
    async fn put_shipping_method(
        &self,
        method: ShippingMethod,
    ) -> Result<ShippingMethod, SettingsServiceError>;

    /// Deletes a shipping method.
    async fn remove_shipping_method(&self, id: &str) -> Result<(), SettingsServiceError>;

    /// The full pricing snapshot the calculators consume.
    async fn snapshot(&self) -> Result<StoreSettings, SettingsServiceError>;
}

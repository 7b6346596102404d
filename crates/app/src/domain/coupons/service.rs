//! Coupons service: administration plus the read-only quote operation.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use souk::{
    coupons::{self, CouponDiscount, CouponKind, CouponRejection},
    money::Amount,
};

use crate::{
    database::Db,
    domain::coupons::{
        errors::CouponsServiceError,
        models::{Coupon, NewCoupon},
        repository::PgCouponsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    repository: PgCouponsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCouponsRepository::new(),
        }
    }
}

#[async_trait]
impl CouponsService for PgCouponsService {
    async fn create_coupon(&self, mut coupon: NewCoupon) -> Result<Coupon, CouponsServiceError> {
        coupon.code = coupons::normalize_code(&coupon.code)
            .map_err(|_| CouponsServiceError::MissingRequiredData)?;

        if coupon.kind == CouponKind::Percent && !(1..=100).contains(&coupon.value) {
            return Err(CouponsServiceError::InvalidPercentValue);
        }

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_coupon(&mut tx, coupon).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_coupon(&self, code: &str) -> Result<Coupon, CouponsServiceError> {
        let code =
            coupons::normalize_code(code).map_err(|_| CouponsServiceError::MissingRequiredData)?;

        let mut tx = self.db.begin().await?;

        let coupon = self.repository.get_by_code(&mut tx, &code).await?;

        tx.commit().await?;

        coupon.ok_or(CouponsServiceError::NotFound)
    }

    async fn list_coupons(&self) -> Result<Vec<Coupon>, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupons = self.repository.list_coupons(&mut tx).await?;

        tx.commit().await?;

        Ok(coupons)
    }

    async fn set_active(&self, code: &str, active: bool) -> Result<(), CouponsServiceError> {
        let code =
            coupons::normalize_code(code).map_err(|_| CouponsServiceError::MissingRequiredData)?;

        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.set_active(&mut tx, &code, active).await?;

        if rows_affected == 0 {
            return Err(CouponsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn quote(
        &self,
        code: &str,
        subtotal: Amount,
    ) -> Result<CouponDiscount, CouponsServiceError> {
        let code = coupons::normalize_code(code).map_err(CouponsServiceError::Rejected)?;

        let mut tx = self.db.begin().await?;

        let coupon = self.repository.get_by_code(&mut tx, &code).await?;

        tx.commit().await?;

        let Some(coupon) = coupon else {
            return Err(CouponsServiceError::Rejected(
                CouponRejection::InvalidOrExpired,
            ));
        };

        coupons::evaluate(&coupon.rule, subtotal, Timestamp::now())
            .map_err(CouponsServiceError::Rejected)
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Creates a coupon. Codes are normalized to upper case and unique.
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<Coupon, CouponsServiceError>;

    /// Retrieves a coupon by code, normalizing it first.
    async fn get_coupon(&self, code: &str) -> Result<Coupon, CouponsServiceError>;

    /// Retrieves all coupons.
    async fn list_coupons(&self) -> Result<Vec<Coupon>, CouponsServiceError>;

    /// Activates or deactivates a coupon without deleting its history.
    async fn set_active(&self, code: &str, active: bool) -> Result<(), CouponsServiceError>;

    /// Evaluates a coupon against a subtotal without redeeming it. Safe to
    /// call any number of times; the usage counter is untouched.
    async fn quote(
        &self,
        code: &str,
        subtotal: Amount,
    ) -> Result<CouponDiscount, CouponsServiceError>;
}

//! Store Settings

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::SettingsServiceError;
pub use service::*;

pub(crate) use repository::PgSettingsRepository;

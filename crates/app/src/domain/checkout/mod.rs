//! Checkout & Orders

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::CheckoutError;
pub use service::*;

pub(crate) use repository::PgOrdersRepository;

//! Persistence and transactional orchestration for the souk pricing engine.

pub mod context;
pub mod database;
pub mod domain;

#[cfg(test)]
mod test;

mod uuids;

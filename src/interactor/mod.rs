pub mod db;
pub mod investment_interactor;
pub mod limit_interactor;
#[cfg(test)]
pub mod memory_repository;
pub mod payment_interactor;
pub mod profile_interactor;
pub mod repository;
pub mod wallet_interactor;

pub use repository::{PaymentRepository, PgRepository};

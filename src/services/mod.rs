pub mod balance_refresh_service;

pub use balance_refresh_service::BalanceRefreshService;

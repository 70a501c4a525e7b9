pub mod algorand;
pub mod commands;
pub mod config;
pub mod di;
pub mod entity;
pub mod interactor;
pub mod payment_uri;
pub mod router;
pub mod services;
pub mod utils;
pub mod view;
pub mod voice;

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use teloxide::{dispatching::dialogue::InMemStorage, Bot};

// Re-export commonly used items
pub use config::AppConfig;
pub use di::ServiceContainer;
pub use entity::*;
pub use payment_uri::PaymentUri;
pub use router::{Router, TelegramRouter};
pub use services::BalanceRefreshService;
pub use voice::{describe, parse_voice_command};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wire the service container, router, dialogue storage and refresh service
pub fn create_application(
    bot: Bot,
    db_pool: Arc<PgPool>,
    algod_client: algorand::AlgodClient,
    config: AppConfig,
) -> (
    TelegramRouter,
    Bot,
    Arc<ServiceContainer>,
    Arc<InMemStorage<State>>,
    BalanceRefreshService,
) {
    let services = Arc::new(ServiceContainer::new(db_pool, algod_client, config));
    let refresh_period = Duration::from_secs(services.config().refresh_interval_secs.max(1));
    let storage = InMemStorage::<State>::new();
    let router = TelegramRouter::new(services.clone());
    let refresh_service = BalanceRefreshService::new(
        services.repository(),
        services.chain_client(),
        refresh_period,
    );

    (router, bot, services, storage, refresh_service)
}

pub mod api;
pub mod config;
pub mod db;
pub mod notifications;
pub mod payments;
pub mod ui;

pub use db::DbPool;

use std::sync::Arc;

use crate::api::rate_limit::RateLimiter;
use config::Config;
use notifications::Mailer;
use payments::PaymentClient;

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub mailer: Mailer,
    pub payments: PaymentClient,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> Self {
        let mailer = Mailer::new(config.email.clone());
        let payments = PaymentClient::new(config.payments.clone());
        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));
        Self {
            config,
            db,
            mailer,
            payments,
            rate_limiter,
        }
    }
}

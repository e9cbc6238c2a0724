pub mod api;
pub mod config;
pub mod currency;
pub mod db;
pub mod errors;
pub mod form;
pub mod metrics;
pub mod models;
pub mod status;
pub mod transfer;

use crate::api::auth::TokenSigner;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
    /// `None` when no auth secret is configured (auth disabled).
    pub tokens: Option<TokenSigner>,
}

impl AppState {
    pub fn new(
        db: sqlx::PgPool,
        config: AppConfig,
        metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
    ) -> Self {
        let tokens = config
            .auth_secret
            .as_deref()
            .map(|secret| TokenSigner::new(secret, config.token_ttl_hours));

        Self {
            db,
            config,
            metrics_handle,
            tokens,
        }
    }
}

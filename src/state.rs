//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Todo se construye una vez al arrancar.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::agent::ServiceLogTools;
use crate::config::environment::EnvironmentConfig;
use crate::repositories::{ServiceLogRepository, SqliteServiceLogRepository};
use crate::services::{AnalyticsService, ServiceLogService, WebhookService};
use crate::utils::errors::AppError;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub service_logs: Arc<ServiceLogService>,
    pub analytics: Arc<AnalyticsService>,
    pub tools: Arc<ServiceLogTools>,
    pub webhooks: WebhookService,
}

impl AppState {
    /// Conecta todas las capas sobre el pool recibido
    pub fn new(pool: SqlitePool, config: EnvironmentConfig) -> Result<Self, AppError> {
        let repository: Arc<dyn ServiceLogRepository> =
            Arc::new(SqliteServiceLogRepository::new(pool, config.table_name.clone())?);

        let service_logs = Arc::new(ServiceLogService::new(repository));
        let analytics = Arc::new(AnalyticsService::new(service_logs.clone()));
        let tools = Arc::new(ServiceLogTools::new(service_logs.clone(), analytics.clone()));
        let webhooks = WebhookService::new(config.webhook_url.clone(), config.webhook_timeout);

        Ok(Self {
            config,
            service_logs,
            analytics,
            tools,
            webhooks,
        })
    }

    /// Inicialización única del almacenamiento
    pub async fn initialize(&self) -> Result<(), AppError> {
        self.service_logs.initialize().await
    }
}

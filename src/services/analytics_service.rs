use std::sync::Arc;

use chrono::Utc;

use crate::models::analytics::{
    AverageCost, DueSoon, MechanicCosts, Overdue, RecentService, Report, ServiceCount,
    ServiceTypeFrequency, TopMechanic, TopOwner,
};
use crate::models::VehicleServiceLog;
use crate::services::analytics;
use crate::services::service_log_service::ServiceLogService;
use crate::utils::errors::AppError;

/// Servicio de analytics: lee todos los registros una vez y delega en las
/// funciones puras de `analytics`
pub struct AnalyticsService {
    logs: Arc<ServiceLogService>,
}

impl AnalyticsService {
    pub fn new(logs: Arc<ServiceLogService>) -> Self {
        Self { logs }
    }

    async fn all_logs(&self) -> Result<Vec<VehicleServiceLog>, AppError> {
        self.logs.list_logs(None).await
    }

    pub async fn total_count(&self) -> Result<Report<ServiceCount>, AppError> {
        Ok(analytics::total_count(&self.all_logs().await?))
    }

    pub async fn average_cost(&self) -> Result<Report<AverageCost>, AppError> {
        Ok(analytics::average_cost(&self.all_logs().await?))
    }

    pub async fn most_frequent_service_type(&self) -> Result<Report<ServiceTypeFrequency>, AppError> {
        Ok(analytics::most_frequent_service_type(&self.all_logs().await?))
    }

    pub async fn most_recent_service(&self) -> Result<Report<RecentService>, AppError> {
        Ok(analytics::most_recent_service(&self.all_logs().await?))
    }

    pub async fn vehicles_due_soon(&self, days: Option<u32>) -> Result<Report<DueSoon>, AppError> {
        let days = days.unwrap_or(analytics::DEFAULT_DUE_SOON_DAYS);
        Ok(analytics::vehicles_due_soon(&self.all_logs().await?, Utc::now(), days))
    }

    pub async fn overdue_services(&self) -> Result<Report<Overdue>, AppError> {
        Ok(analytics::overdue_services(&self.all_logs().await?, Utc::now()))
    }

    pub async fn owner_with_most_services(&self) -> Result<Report<TopOwner>, AppError> {
        Ok(analytics::owner_with_most_services(&self.all_logs().await?))
    }

    pub async fn mechanic_with_most_services(&self) -> Result<Report<TopMechanic>, AppError> {
        Ok(analytics::mechanic_with_most_services(&self.all_logs().await?))
    }

    pub async fn total_cost_by_mechanic(&self) -> Result<Report<MechanicCosts>, AppError> {
        Ok(analytics::total_cost_by_mechanic(&self.all_logs().await?))
    }
}

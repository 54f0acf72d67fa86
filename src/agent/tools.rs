//! Herramientas del agente conversacional
//!
//! Cada herramienta envuelve una operación del servicio o de analytics y
//! devuelve el sobre `{success, message, data}`. `invoke` permite llamarlas
//! por nombre con argumentos JSON.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dto::service_log_dto::{DeleteConfirmation, ServiceLogInput};
use crate::dto::ApiResponse;
use crate::models::analytics::{DueSoon, Report};
use crate::models::VehicleServiceLog;
use crate::services::{AnalyticsService, ServiceLogService};
use crate::utils::errors::{AppError, AppResult};

pub const TOOL_NAMES: [&str; 14] = [
    "get_logs",
    "add_log",
    "list_by_vehicle",
    "due_soon",
    "update_cost_by_vehicle",
    "remove_by_vehicle",
    "total_services",
    "average_cost",
    "most_frequent_service",
    "most_recent_service",
    "overdue_services",
    "owner_with_most_services",
    "mechanic_with_most_services",
    "total_cost_by_mechanic",
];

#[derive(Debug, Default, Deserialize)]
struct GetLogsArgs {
    #[serde(default, alias = "vehicle_name")]
    vehicle_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VehicleArgs {
    #[serde(alias = "vehicle_id")]
    vehicle_name: String,
}

#[derive(Debug, Default, Deserialize)]
struct DueSoonArgs {
    #[serde(default)]
    days: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct UpdateCostArgs {
    #[serde(alias = "vehicle_id")]
    vehicle_name: String,
    #[serde(alias = "cost")]
    new_cost: f64,
}

pub struct ServiceLogTools {
    logs: Arc<ServiceLogService>,
    analytics: Arc<AnalyticsService>,
}

impl ServiceLogTools {
    pub fn new(logs: Arc<ServiceLogService>, analytics: Arc<AnalyticsService>) -> Self {
        Self { logs, analytics }
    }

    pub async fn get_logs(&self, vehicle_id: Option<&str>) -> AppResult<ApiResponse<Vec<VehicleServiceLog>>> {
        let logs = self.logs.list_logs(vehicle_id).await?;
        let message = match vehicle_id {
            Some(vehicle) => format!("Found {} service logs for vehicle {}", logs.len(), vehicle),
            None => format!("Found {} service logs", logs.len()),
        };
        Ok(ApiResponse::success_with_message(logs, message))
    }

    pub async fn add_log(&self, fields: ServiceLogInput) -> AppResult<ApiResponse<VehicleServiceLog>> {
        let log = self.logs.create_log(fields).await?;
        let message = format!(
            "Service log {} added for vehicle {}",
            log.id, log.vehicle_id
        );
        Ok(ApiResponse::success_with_message(log, message))
    }

    pub async fn list_by_vehicle(&self, vehicle_name: &str) -> AppResult<ApiResponse<Vec<VehicleServiceLog>>> {
        let logs = self.logs.list_logs(Some(vehicle_name)).await?;
        let message = if logs.is_empty() {
            format!("No service logs found for vehicle {}", vehicle_name)
        } else {
            format!("Found {} service logs for vehicle {}", logs.len(), vehicle_name)
        };
        Ok(ApiResponse::success_with_message(logs, message))
    }

    pub async fn due_soon(&self, days: Option<u32>) -> AppResult<ApiResponse<Report<DueSoon>>> {
        Ok(report_envelope(self.analytics.vehicles_due_soon(days).await?))
    }

    /// Cambia el coste del primer registro del vehículo (orden de listado)
    pub async fn update_cost_by_vehicle(
        &self,
        vehicle_name: &str,
        new_cost: f64,
    ) -> AppResult<ApiResponse<VehicleServiceLog>> {
        let Some(log) = self.first_log_for(vehicle_name).await? else {
            return Ok(ApiResponse::failure(format!(
                "No service logs found for vehicle {}",
                vehicle_name
            )));
        };

        let id = log.id.clone();
        let mut fields = ServiceLogInput::from(log);
        fields.cost = Some(new_cost);

        let updated = self.logs.update_log(&id, fields).await?;
        let message = format!(
            "Cost for vehicle {} updated to {:.2}",
            vehicle_name, updated.cost
        );
        Ok(ApiResponse::success_with_message(updated, message))
    }

    /// Elimina el primer registro del vehículo (orden de listado)
    pub async fn remove_by_vehicle(&self, vehicle_name: &str) -> AppResult<ApiResponse<DeleteConfirmation>> {
        let Some(log) = self.first_log_for(vehicle_name).await? else {
            return Ok(ApiResponse::failure(format!(
                "No service logs found for vehicle {}",
                vehicle_name
            )));
        };

        let confirmation = self.logs.delete_log(&log.id).await?;
        let message = confirmation.message.clone();
        Ok(ApiResponse::success_with_message(confirmation, message))
    }

    async fn first_log_for(&self, vehicle_name: &str) -> AppResult<Option<VehicleServiceLog>> {
        Ok(self.logs.list_logs(Some(vehicle_name)).await?.into_iter().next())
    }

    /// Ejecuta una herramienta por nombre.
    ///
    /// Los errores de validación o de registro inexistente se devuelven como
    /// sobre con `success: false`; los de almacenamiento se propagan.
    pub async fn invoke(&self, tool: &str, args: Value) -> AppResult<Value> {
        let args = if args.is_null() { Value::Object(Default::default()) } else { args };
        log::info!("🤖 Herramienta '{}' invocada", tool);

        let result = match tool {
            "get_logs" => {
                let args: GetLogsArgs = parse_args(tool, args)?;
                to_value(self.get_logs(args.vehicle_id.as_deref()).await)
            }
            "add_log" => {
                let fields: ServiceLogInput = parse_args(tool, args)?;
                to_value(self.add_log(fields).await)
            }
            "list_by_vehicle" => {
                let args: VehicleArgs = parse_args(tool, args)?;
                to_value(self.list_by_vehicle(&args.vehicle_name).await)
            }
            "due_soon" => {
                let args: DueSoonArgs = parse_args(tool, args)?;
                to_value(self.due_soon(args.days).await)
            }
            "update_cost_by_vehicle" => {
                let args: UpdateCostArgs = parse_args(tool, args)?;
                to_value(self.update_cost_by_vehicle(&args.vehicle_name, args.new_cost).await)
            }
            "remove_by_vehicle" => {
                let args: VehicleArgs = parse_args(tool, args)?;
                to_value(self.remove_by_vehicle(&args.vehicle_name).await)
            }
            "total_services" => to_value(self.analytics.total_count().await.map(report_envelope)),
            "average_cost" => to_value(self.analytics.average_cost().await.map(report_envelope)),
            "most_frequent_service" => {
                to_value(self.analytics.most_frequent_service_type().await.map(report_envelope))
            }
            "most_recent_service" => {
                to_value(self.analytics.most_recent_service().await.map(report_envelope))
            }
            "overdue_services" => to_value(self.analytics.overdue_services().await.map(report_envelope)),
            "owner_with_most_services" => {
                to_value(self.analytics.owner_with_most_services().await.map(report_envelope))
            }
            "mechanic_with_most_services" => {
                to_value(self.analytics.mechanic_with_most_services().await.map(report_envelope))
            }
            "total_cost_by_mechanic" => {
                to_value(self.analytics.total_cost_by_mechanic().await.map(report_envelope))
            }
            unknown => {
                return Err(AppError::BadRequest(format!("Unknown tool '{}'", unknown)));
            }
        };

        match result {
            Err(e) if e.is_client_error() => {
                log::warn!("⚠️ Herramienta '{}' rechazada: {}", tool, e);
                serde_json::to_value(ApiResponse::<()>::failure(e.to_string()))
                    .map_err(|e| AppError::Internal(e.to_string()))
            }
            other => other,
        }
    }
}

/// Sobre para resultados de analytics: el resumen es el mensaje
fn report_envelope<T>(report: Report<T>) -> ApiResponse<Report<T>> {
    let message = report.summary.clone();
    ApiResponse::success_with_message(report, message)
}

fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> AppResult<T> {
    serde_json::from_value(args)
        .map_err(|e| AppError::BadRequest(format!("Invalid arguments for tool '{}': {}", tool, e)))
}

fn to_value<T: Serialize>(result: AppResult<T>) -> AppResult<Value> {
    result.and_then(|value| {
        serde_json::to_value(value).map_err(|e| AppError::Internal(e.to_string()))
    })
}

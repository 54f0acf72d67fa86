//! Modelos de Analytics
//!
//! Este módulo contiene los resultados de los análisis sobre los registros
//! de mantenimiento: cada análisis devuelve un `Report` con un estado,
//! un resumen legible y los datos estructurados.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::service_log::VehicleServiceLog;

/// Estado del resultado de un análisis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Ok,
    /// No hay ningún registro
    NoData,
    /// Hay registros pero ninguno identifica al mecánico
    NoMechanicInfo,
}

/// Resultado de un análisis
#[derive(Debug, Clone, Serialize)]
pub struct Report<T> {
    pub status: ReportStatus,
    pub summary: String,
    pub data: Option<T>,
}

impl<T> Report<T> {
    pub fn ok(data: T, summary: String) -> Self {
        Self {
            status: ReportStatus::Ok,
            summary,
            data: Some(data),
        }
    }

    pub fn no_data() -> Self {
        Self {
            status: ReportStatus::NoData,
            summary: "No service logs found".to_string(),
            data: None,
        }
    }

    /// Sin registros, pero con un valor neutro (conteo 0, promedio 0)
    pub fn no_data_with(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::no_data()
        }
    }

    pub fn no_mechanic_info() -> Self {
        Self {
            status: ReportStatus::NoMechanicInfo,
            summary: "No mechanic information available in service logs".to_string(),
            data: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ReportStatus::Ok
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCount {
    pub total_services: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageCost {
    pub average_cost: f64,
    pub total_cost: f64,
    pub service_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceTypeFrequency {
    pub service_type: String,
    pub frequency: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentService {
    pub log: VehicleServiceLog,
}

/// Vehículo con mantenimiento próximo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DueSoonEntry {
    pub vehicle_id: String,
    pub service_type: String,
    pub next_service_date: DateTime<Utc>,
    pub days_until: i64,
    pub log_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DueSoon {
    pub days: u32,
    pub vehicles: Vec<DueSoonEntry>,
}

/// Mantenimiento vencido
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueEntry {
    pub vehicle_id: String,
    pub service_type: String,
    pub next_service_date: DateTime<Utc>,
    pub days_overdue: i64,
    pub log_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overdue {
    pub services: Vec<OverdueEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopOwner {
    pub owner: String,
    pub service_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopMechanic {
    pub mechanic_id: String,
    pub service_count: usize,
}

/// Totales de un mecánico
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MechanicCost {
    pub mechanic_id: String,
    pub total_cost: f64,
    pub average_cost: f64,
    pub service_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MechanicCosts {
    pub mechanics: Vec<MechanicCost>,
}

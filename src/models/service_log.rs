//! Modelo de VehicleServiceLog
//!
//! Un registro de mantenimiento de un vehículo. Mapea a una fila de la tabla
//! de service logs; las fechas viajan como instantes UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Valor que el análisis de propietarios y mecánicos usa cuando falta el dato
pub const UNKNOWN: &str = "Unknown";

/// Registro persistido con su identificador asignado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleServiceLog {
    pub id: String,
    pub owner_name: Option<String>,
    pub vehicle_type: Option<String>,
    pub vehicle_id: String,
    pub service_date: DateTime<Utc>,
    pub service_type: String,
    pub description: Option<String>,
    pub mileage: i64,
    pub cost: f64,
    pub next_service_date: Option<DateTime<Utc>>,
    pub mechanic_id: Option<String>,
}

/// Registro ya normalizado, antes de insertarse.
///
/// `id` sólo viene informado cuando el llamador lo fija; el repositorio
/// genera uno nuevo en caso contrario.
#[derive(Debug, Clone, PartialEq)]
pub struct NewServiceLog {
    pub id: Option<String>,
    pub owner_name: Option<String>,
    pub vehicle_type: Option<String>,
    pub vehicle_id: String,
    pub service_date: DateTime<Utc>,
    pub service_type: String,
    pub description: Option<String>,
    pub mileage: i64,
    pub cost: f64,
    pub next_service_date: Option<DateTime<Utc>>,
    pub mechanic_id: Option<String>,
}

impl NewServiceLog {
    /// Convierte el registro en persistido con el `id` indicado
    pub fn with_id(self, id: String) -> VehicleServiceLog {
        VehicleServiceLog {
            id,
            owner_name: self.owner_name,
            vehicle_type: self.vehicle_type,
            vehicle_id: self.vehicle_id,
            service_date: self.service_date,
            service_type: self.service_type,
            description: self.description,
            mileage: self.mileage,
            cost: self.cost,
            next_service_date: self.next_service_date,
            mechanic_id: self.mechanic_id,
        }
    }
}

impl VehicleServiceLog {
    /// Propietario para agrupaciones ("Unknown" si falta)
    pub fn owner_or_unknown(&self) -> &str {
        self.owner_name.as_deref().unwrap_or(UNKNOWN)
    }

    /// Mecánico identificado, descartando ausentes y el centinela "Unknown"
    pub fn known_mechanic(&self) -> Option<&str> {
        self.mechanic_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty() && *id != UNKNOWN)
    }
}

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{NewServiceLog, VehicleServiceLog};
use crate::utils::errors::{validation_error, AppError};
use crate::utils::validation::{format_datetime, validate_datetime};

// Entrada cruda para crear o reemplazar un registro.
// `owner` y `vehicle_name` se aceptan como sinónimos de los campos canónicos.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ServiceLogInput {
    pub id: Option<String>,

    #[serde(alias = "owner")]
    pub owner_name: Option<String>,

    pub vehicle_type: Option<String>,

    #[serde(alias = "vehicle_name")]
    #[validate(length(min = 1, max = 100))]
    pub vehicle_id: Option<String>,

    pub service_date: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub service_type: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = 0))]
    pub mileage: Option<i64>,

    #[validate(range(min = 0.0))]
    pub cost: Option<f64>,

    pub next_service_date: Option<String>,

    pub mechanic_id: Option<String>,
}

// Filtro de listado
#[derive(Debug, Default, Deserialize)]
pub struct ListLogsQuery {
    #[serde(alias = "vehicle_name")]
    pub vehicle_id: Option<String>,
}

// Confirmación de borrado
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteConfirmation {
    pub message: String,
}

impl ServiceLogInput {
    /// Normaliza la entrada al registro canónico o devuelve `AppError::Validation`
    pub fn into_new_log(self) -> Result<NewServiceLog, AppError> {
        self.validate()?;

        let vehicle_id = required_text("vehicle_id", self.vehicle_id)?;
        let service_type = required_text("service_type", self.service_type)?;

        let service_date = match self.service_date.as_deref() {
            Some(raw) => validate_datetime(raw).map_err(|_| {
                validation_error("service_date", format!("'{}' is not a valid date", raw))
            })?,
            None => return Err(validation_error("service_date", "service_date is required")),
        };

        let next_service_date = match optional_text(self.next_service_date) {
            Some(raw) => Some(validate_datetime(&raw).map_err(|_| {
                validation_error("next_service_date", format!("'{}' is not a valid date", raw))
            })?),
            None => None,
        };

        let mileage = self
            .mileage
            .ok_or_else(|| validation_error("mileage", "mileage is required"))?;

        let cost = match self.cost {
            Some(cost) if cost.is_finite() => cost,
            Some(_) => return Err(validation_error("cost", "cost must be a finite number")),
            None => return Err(validation_error("cost", "cost is required")),
        };

        if let Some(next) = next_service_date {
            if next < service_date {
                log::warn!(
                    "⚠️ next_service_date {} es anterior a service_date {} (vehículo {})",
                    format_datetime(&next),
                    format_datetime(&service_date),
                    vehicle_id
                );
            }
        }

        Ok(NewServiceLog {
            id: optional_text(self.id),
            owner_name: optional_text(self.owner_name),
            vehicle_type: optional_text(self.vehicle_type),
            vehicle_id,
            service_date,
            service_type,
            description: optional_text(self.description),
            mileage,
            cost,
            next_service_date,
            mechanic_id: optional_text(self.mechanic_id),
        })
    }
}

impl From<VehicleServiceLog> for ServiceLogInput {
    fn from(log: VehicleServiceLog) -> Self {
        Self {
            id: Some(log.id),
            owner_name: log.owner_name,
            vehicle_type: log.vehicle_type,
            vehicle_id: Some(log.vehicle_id),
            service_date: Some(format_datetime(&log.service_date)),
            service_type: Some(log.service_type),
            description: log.description,
            mileage: Some(log.mileage),
            cost: Some(log.cost),
            next_service_date: log.next_service_date.as_ref().map(format_datetime),
            mechanic_id: log.mechanic_id,
        }
    }
}

fn required_text(field: &'static str, value: Option<String>) -> Result<String, AppError> {
    optional_text(value).ok_or_else(|| validation_error(field, format!("{} is required", field)))
}

// Texto vacío o sólo espacios cuenta como ausente
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

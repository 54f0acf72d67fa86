use std::sync::Arc;

use crate::dto::service_log_dto::{DeleteConfirmation, ServiceLogInput};
use crate::models::VehicleServiceLog;
use crate::repositories::ServiceLogRepository;
use crate::utils::errors::{not_found_error, AppError};

const RESOURCE: &str = "Vehicle service log";

/// Servicio de registros de mantenimiento.
///
/// Único llamador del repositorio: normaliza la entrada y convierte
/// "ninguna fila afectada" en `AppError::NotFound`.
pub struct ServiceLogService {
    repository: Arc<dyn ServiceLogRepository>,
}

impl ServiceLogService {
    pub fn new(repository: Arc<dyn ServiceLogRepository>) -> Self {
        Self { repository }
    }

    /// Crea la tabla si hace falta; se llama una vez al arrancar
    pub async fn initialize(&self) -> Result<(), AppError> {
        self.repository.ensure_schema().await?;
        log::info!("✅ Almacenamiento de service logs inicializado");
        Ok(())
    }

    pub async fn create_log(&self, input: ServiceLogInput) -> Result<VehicleServiceLog, AppError> {
        let new_log = input.into_new_log()?;
        let log = self.repository.insert(new_log).await?;
        log::info!("✅ Service log {} creado para vehículo {}", log.id, log.vehicle_id);
        Ok(log)
    }

    pub async fn get_log(&self, id: &str) -> Result<VehicleServiceLog, AppError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| not_found_error(RESOURCE, id))
    }

    pub async fn list_logs(&self, vehicle_id: Option<&str>) -> Result<Vec<VehicleServiceLog>, AppError> {
        let logs = self.repository.list(vehicle_id).await?;
        log::debug!("📊 {} service logs (filtro: {:?})", logs.len(), vehicle_id);
        Ok(logs)
    }

    /// Reemplaza el registro completo; el `id` de la ruta prevalece sobre el del cuerpo
    pub async fn update_log(
        &self,
        id: &str,
        input: ServiceLogInput,
    ) -> Result<VehicleServiceLog, AppError> {
        let log = input.into_new_log()?.with_id(id.to_string());

        if !self.repository.update(&log).await? {
            return Err(AppError::NotFound(format!(
                "{} with id '{}' not found to update",
                RESOURCE, id
            )));
        }

        log::info!("✅ Service log {} actualizado", id);
        Ok(log)
    }

    pub async fn delete_log(&self, id: &str) -> Result<DeleteConfirmation, AppError> {
        let deleted = self.repository.delete(id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(format!(
                "{} with id '{}' not found to delete",
                RESOURCE, id
            )));
        }

        log::info!("🗑️ Service log {} eliminado", id);
        Ok(DeleteConfirmation {
            message: format!("Vehicle service log with id {} deleted successfully", id),
        })
    }
}

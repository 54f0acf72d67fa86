//! Modelos del sistema
//!
//! Este módulo contiene el modelo de registros de mantenimiento y los
//! resultados de los análisis sobre esos registros.

pub mod analytics;
pub mod service_log;

pub use service_log::{NewServiceLog, VehicleServiceLog};

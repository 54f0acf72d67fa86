//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: validación
//! y orquestación de registros, analytics y notificaciones salientes.

pub mod analytics;
pub mod analytics_service;
pub mod service_log_service;
pub mod webhook_service;

pub use analytics_service::AnalyticsService;
pub use service_log_service::ServiceLogService;
pub use webhook_service::{RegisteredUser, WebhookOutcome, WebhookService};

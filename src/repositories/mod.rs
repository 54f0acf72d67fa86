pub mod service_log_repository;

pub use service_log_repository::{ServiceLogRepository, SqliteServiceLogRepository};

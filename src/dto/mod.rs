pub mod api_response;
pub mod service_log_dto;

pub use api_response::ApiResponse;

//! Vehicle service logs
//!
//! Registro de mantenimientos de vehículos: CRUD sobre SQLite, analytics
//! de costes y vencimientos, superficie de herramientas para el agente
//! y API HTTP.

pub mod agent;
pub mod config;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app_router;
pub use state::AppState;

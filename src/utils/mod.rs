//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores y validación
//! de fechas e identificadores.

pub mod errors;
pub mod validation;

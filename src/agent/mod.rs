//! Superficie de herramientas para el agente conversacional

pub mod tools;

pub use tools::{ServiceLogTools, TOOL_NAMES};

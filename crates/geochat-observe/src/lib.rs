//! Observability for GeoChat: log subscriber setup and span export.

pub mod tracing_setup;

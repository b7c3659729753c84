//! HTTP surface of the TA Directory: configuration, middleware and the
//! axum routes over the domain services.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod services;

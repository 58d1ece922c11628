pub mod configuration;
pub mod domain;
pub mod form;
pub mod routes;
pub mod session;
pub mod startup;
pub mod subscription_service;
pub mod telemetry;

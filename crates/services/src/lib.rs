#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod treatment_service;

pub use treatment_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, TreatmentServiceError};
pub use treatment_service::{TreatmentService, seed_drafts};

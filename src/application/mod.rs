//! Application layer: business logic and orchestration.

pub mod services;

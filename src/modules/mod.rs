//! Feature modules. Each module follows the same structure:
//!
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: business logic
//! - `model.rs`: entities and DTOs
//! - `router.rs`: route wiring

pub mod auth;
pub mod courses;

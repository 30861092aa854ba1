//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod analytics;
pub mod api_key;
pub mod brand;
pub mod calendar;
pub mod campaign;
pub mod generation;
pub mod notification;
pub mod project;
pub mod scene;
pub mod template;
pub mod usage;
pub mod user;

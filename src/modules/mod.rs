//! Feature modules.
//!
//! Each module follows the same layout:
//!
//! - `controller.rs`: HTTP handlers with OpenAPI annotations
//! - `service.rs`: business logic over the [`Store`](openschool_db::Store)
//! - `router.rs`: Axum router configuration

pub mod health;
pub mod schools;
pub mod students;

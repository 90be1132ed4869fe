//! # Menu Core
//! 
//! Domain entities, repository ports, and the export/import services for
//! migrating a menu tree between environments.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;

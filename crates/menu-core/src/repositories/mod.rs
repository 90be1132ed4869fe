//! Repository traits (ports)

pub mod menu_repository;

pub use menu_repository::{MenuRepository, MenuWriter};

#[cfg(test)]
pub use menu_repository::MockMenuWriter;

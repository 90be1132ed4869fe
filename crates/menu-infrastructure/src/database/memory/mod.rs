//! In-memory repository implementations

pub mod menu_repo_impl;

pub use menu_repo_impl::{InMemoryMenuRepository, InMemoryMenuTransaction, NameUniqueness};

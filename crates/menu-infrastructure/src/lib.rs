//! # Menu Infrastructure
//! 
//! Repository adapters for the menu store.

pub mod database;

pub use database::{
    create_pool, run_migrations, InMemoryMenuRepository, NameUniqueness, PgMenuRepository,
};

//! HTTP handlers

pub mod health;
pub mod menu_migrate;

//! # Menu API
//! 
//! HTTP handlers and routing for menu list, export, and import.

pub mod handlers;
pub mod error;
pub mod response;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;

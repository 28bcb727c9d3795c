//! Web layer for the schedule service.
//!
//! Provides the CRUD endpoints for trains, stations and schedule records,
//! plus the rendered schedule page.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
pub use templates::*;

//! Web layer for the trip comparison.
//!
//! Provides the request form, the live comparison page, its JSON form
//! and the PDF download.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;

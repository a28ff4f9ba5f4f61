//! SongRank API: HTTP surface over the `songs` table.
//!
//! Read endpoints take comma-separated column lists and score filters;
//! write endpoints insert a song or change one column of a song by id. The
//! store is injected through [`AppState`], so the router runs against the
//! hosted table or the in-memory store alike.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use config::{AppConfig, ServerConfig};
pub use error::ApiError;
pub use router::build_router;
pub use server::{serve, serve_on, ServerError};
pub use state::AppState;

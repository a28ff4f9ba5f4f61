//! SongRank Store: access to the `songs` table.
//!
//! This crate builds on `songrank-core` to provide:
//! - A query builder rendering PostgREST parameters
//! - The `SongStore` trait with Supabase and in-memory implementations
//! - Store connection settings with environment overrides
//! - The song queries served by the HTTP layer

pub mod config;
pub mod memory;
pub mod provider;
pub mod query;
pub mod songs;
pub mod supabase;

pub use config::{ConfigError, StoreConfig};
pub use memory::MemoryStore;
pub use provider::{SongStore, StoreError};
pub use query::{Direction, Filter, Literal, SongQuery};
pub use supabase::SupabaseStore;

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn stores_are_send_sync() {
        assert_send::<MemoryStore>();
        assert_sync::<MemoryStore>();
        assert_send::<SupabaseStore>();
        assert_sync::<SupabaseStore>();
    }

    #[test]
    fn query_and_errors_are_send_sync() {
        assert_send::<SongQuery>();
        assert_sync::<SongQuery>();
        assert_send::<StoreError>();
        assert_sync::<StoreError>();
        assert_send::<StoreConfig>();
        assert_sync::<StoreConfig>();
    }
}

//! PostgreSQL entity store.
//!
//! One table per entity kind; ancestor relationships are parent-id columns.
//! Query plans produced by the filter compiler execute here as dynamically
//! assembled SQL whose identifiers only ever come from the compiler's
//! whitelist, never from raw caller input.

pub mod conferences;
pub mod pool;
pub mod profiles;
pub mod sessions;
pub mod speakers;

pub use pool::{create_pool, run_migrations, Pool};

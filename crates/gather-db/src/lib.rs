//! Database layer for Gather.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode
//! initialization, and embedded SQL migrations. Every table is created
//! through versioned migrations managed by this crate.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: a single-file store with no external
//!   database process; WAL allows concurrent readers with a single
//!   writer, which matches the request-scoped access pattern.
//! - **`r2d2` connection pool**: bounded connection reuse without manual
//!   lifetime management. Deployments point the pool at a file;
//!   tests point it at `:memory:`. Nothing downstream branches on which.
//! - **Embedded migrations**: SQL files compiled in via `include_str!`,
//!   so the schema ships with the binary and cannot drift from the code
//!   that depends on it.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};

//! Credential and chirp storage.
//!
//! The auth core talks to storage only through [`DatabaseClient`]. The
//! bundled implementation is [`TursoClient`], a libsql store that runs either
//! in memory (tests, local development) or against a SQLite file.
//!
//! Select the backend via `chirpy.toml`:
//! ```toml
//! [database]
//! url = "./data/chirpy.db"   # or ":memory:"
//! ```

#![allow(missing_docs)]

// Relational database
pub mod traits;
pub mod turso;

// Re-exports
pub use traits::{DatabaseClient, DatabaseProvider};
pub use turso::TursoClient;

// # Surveyor Database Integration
//
// SQLite persistence for finished submissions. The store implements
// `SubmissionSink`, so a session can write to it directly and the CLI can
// follow its live listing.

pub mod pool;
pub mod store;

// Re-exports for convenience
pub use pool::{DEFAULT_DATABASE_URL, DbPoolError, SqlitePool};
pub use store::{DbError, SqliteSubmissionStore};

// Prelude module
pub mod prelude {
    pub use crate::pool::SqlitePool;
    pub use crate::store::SqliteSubmissionStore;
}

//! Surveyor facade crate.
//!
//! Re-exports the core, runtime, http and db crates behind a single entry
//! point. `http` and `db` are default features.

pub use surveyor_core as core;
#[cfg(feature = "db")]
pub use surveyor_db as db;
#[cfg(feature = "http")]
pub use surveyor_http as http;
pub use surveyor_runtime as runtime;

pub use surveyor_core::{AnswerSet, Catalog, Outcome, Question, Schematic, Target, UiState};
#[cfg(feature = "db")]
pub use surveyor_db::SqliteSubmissionStore;
#[cfg(feature = "http")]
pub use surveyor_http::{HttpFormSource, HttpSourceConfig};
pub use surveyor_runtime::{FormSession, SessionDriver};

pub mod prelude {
    pub use surveyor_core::prelude::*;
    #[cfg(feature = "db")]
    pub use surveyor_db::prelude::*;
    pub use surveyor_runtime::prelude::*;
    #[cfg(feature = "http")]
    pub use surveyor_http::{HttpFormSource, HttpSourceConfig};
}

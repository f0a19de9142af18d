//! # Surveyor Runtime
//!
//! Runs form sessions on tokio: [`FormSession`] is the state machine,
//! [`SessionDriver`] serializes user actions onto it and restarts the form
//! after each submission.

pub mod driver;
pub mod memory;
pub mod session;
pub mod source;

pub mod prelude {
    pub use crate::driver::{Action, SessionConfig, SessionDriver, SessionHandle};
    pub use crate::memory::MemorySubmissionStore;
    pub use crate::session::FormSession;
    pub use crate::source::{JsonFileSource, StaticFormSource};
}

pub use driver::{Action, DEFAULT_RESTART_DELAY, DriverError, SessionConfig, SessionDriver, SessionHandle};
pub use memory::MemorySubmissionStore;
pub use session::FormSession;
pub use source::{JsonFileSource, StaticFormSource};

//! Search flow: debounced input, catalog requests and the per-client view.

mod coordinator;
mod debounce;
mod session;
mod types;

pub use coordinator::SearchCoordinator;
pub use debounce::Debouncer;
pub use session::{spawn_session, SessionHandle};
pub use types::*;

//! Client-side session state and its persistence.

pub mod session;
pub mod storage;

pub use session::{Session, SessionError, SessionPhase, SessionStore};
pub use storage::{FileTokenStore, MemoryTokenStore, StorageError, TokenStore};

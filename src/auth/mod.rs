//! Authentication and session lifecycle for the Data API.
//!
//! The main types in this module are:
//!
//! - [`Session`]: the current authentication state (token or unauthenticated)
//! - [`SessionManager`]: owns the token, re-authenticates lazily, and
//!   serializes re-authentication so concurrent callers share one round-trip

mod session;

pub use session::{Session, SessionManager};

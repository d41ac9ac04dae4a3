//! Operation log over the step-forest engines.
//!
//! A [`Session`] owns one engine per [`TreeKind`], validates incoming values
//! against its [`SessionConfig`], and keeps every operation's step batch in
//! call order so a viewer can replay them.

pub mod config;
pub mod error;
pub mod session;

pub use config::{SessionConfig, ValueBounds};
pub use error::SessionError;
pub use session::{Operation, Session, TreeKind};

//! Domain primitives and ports.
//!
//! Public surface:
//! - User (alias to `user::User`): stored account as returned by reads.
//! - NewUser (alias to `user::NewUser`): registration payload.
//! - UserId (alias to `user::UserId`): store-assigned identifier.
//! - PageRequest (alias to `user::PageRequest`): list pagination window.
//! - ports: repository traits implemented by outbound adapters.

pub mod ports;
pub mod user;

pub use self::user::{NewUser, PageRequest, User, UserId};

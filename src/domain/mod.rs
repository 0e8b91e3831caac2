//! Domain types for the event service.
//!
//! This module contains the event entity, user roles and the access rules
//! that tie them together.

mod access;
mod event;
mod user;

pub use access::*;
pub use event::*;
pub use user::*;

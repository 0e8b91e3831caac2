//! Authentication module for the event service.
//!
//! Callers authenticate with a bearer JWT issued by the login endpoint.
//! Requests without a token proceed as anonymous callers.

mod jwt;
mod middleware;

pub use jwt::*;
pub use middleware::*;

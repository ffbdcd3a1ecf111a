//! JSON HTTP surface
//!
//! REST-ish endpoints answering with `{success, message, ...}` envelopes:
//! 400 for validation, 404 for unknown ids, 409 for conflicts, 500 for I/O.

pub mod handler;
pub mod response;
pub mod server;

pub use response::{ApiError, ApiResult};
pub use server::{router, AppState, HttpServer};

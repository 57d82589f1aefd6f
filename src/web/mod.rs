//! Web interface module
//!
//! Exposes the message store over HTTP: request validation, response
//! shaping and the per-request tracing span.

mod error;
mod handlers;
mod palindrome;
mod server;
mod trace;

pub use error::{ApiError, ErrorBody};
pub use handlers::{AppState, CreateMessageRequest, PALINDROME_FLAG};
pub use palindrome::is_palindrome;
pub use server::{router, run_web_server, ServerConfig};

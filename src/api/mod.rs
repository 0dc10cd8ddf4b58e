//! Lambda HTTP entrypoint and request processing

pub mod handler;
pub mod helpers;
pub mod notice_handler;
pub mod parsing;
pub mod routes;
pub mod signature;
pub mod slash_handler;
pub mod state;

pub use handler::{function_handler, handle_request};
pub use state::AppState;

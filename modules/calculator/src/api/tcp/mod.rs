//! Line-oriented TCP transport for the calculator.

pub mod server;
pub mod session;

pub use server::CalcServer;
pub use session::{ERROR_MARKER, ServerControl, Session, handle_connection};

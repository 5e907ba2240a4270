//! WebSocket interface module.
//!
//! Pushes the detection report to connected hosts after every completed
//! pass, and accepts rescan requests.

mod handler;
mod message;

pub use handler::ws_handler;
pub use message::WsMessage;

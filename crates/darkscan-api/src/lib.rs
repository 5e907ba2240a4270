//! # darkscan API
//!
//! Host query interface over one running engine.
//!
//! - **HTTP**: pattern counts, rescans, highlight, activation, feedback and
//!   document ingestion
//! - **WebSocket**: every completed scan is pushed to connected hosts
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 darkscan-api                 │
//! │   ┌──────────┐                ┌───────────┐  │
//! │   │   HTTP   │                │ WebSocket │  │
//! │   └────┬─────┘                └─────┬─────┘  │
//! │        │ requests          results  │        │
//! └────────┼────────────────────────────┼────────┘
//!          ▼                            │
//! ┌──────────────────────────────────────────────┐
//! │        Scheduler  (darkscan-runloop)         │
//! │   ScanSession ── DiffEngine ── broadcast     │
//! └──────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod http;
pub mod server;
pub mod state;
pub mod websocket;

pub use error::ApiError;
pub use http::routes::create_router;
pub use server::{ApiServer, InterfaceConfig};
pub use state::AppState;
pub use websocket::WsMessage;

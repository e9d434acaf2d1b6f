//! Transport layer for live game views.
//!
//! Provides:
//! - Page location to socket endpoint derivation
//! - Viewer loop feeding a renderer from a message stream
//! - WebSocket connector (feature: websocket)
//! - Terminal front-end widgets (feature: tui)

pub mod location;
pub mod viewer;

#[cfg(feature = "websocket")]
pub mod websocket;

#[cfg(feature = "tui")]
pub mod tui;

pub use location::{LocationError, PageLocation};
pub use viewer::{ViewSummary, Viewer};

#[cfg(feature = "websocket")]
pub use websocket::{Connection, ConnectionState, Connector, TransportError};

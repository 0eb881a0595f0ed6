//! Realtime delivery: websocket actors, the local fan-out registry, and the
//! optional Redis broker that links processes.

pub mod broker;
pub mod hub;
pub mod protocol;
pub mod session;

pub use broker::RealtimeBroker;
pub use hub::{HubEvent, WsRegistry};

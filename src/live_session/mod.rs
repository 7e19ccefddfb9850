//! Registry of long-lived live trading sessions.
//!
//! Unlike tasks, live sessions do not finish on their own: they run until
//! stopped. The registry is an explicit handle shared with the components
//! that start, inspect, and stop sessions.

mod registry;
mod session;

pub use registry::{LiveSessionError, LiveSessionRegistry, LiveSessionResult};
pub use session::{LiveSession, LiveSessionId, LiveTradeHandle, StartLiveSessionRequest};

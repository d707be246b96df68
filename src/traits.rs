//! Traits that decouple the dimmer from the concrete IPC connection.
//!
//! [`WayfireSocket`](crate::wayfire::socket::WayfireSocket) implements both
//! of them over a single Unix socket.  The
//! [`FocusDimmer`](crate::dimmer::FocusDimmer) only depends on these
//! abstractions, so tests can drive it with scripted events and a recording
//! compositor.

use crate::event::{Event, ViewId};

/// A stream of compositor events.
///
/// # Contract
///
/// * [`subscribe`](EventSource::subscribe) is called once, before the first
///   [`next_event`](EventSource::next_event).
/// * [`next_event`](EventSource::next_event) **blocks** until an event
///   arrives.  `Ok(None)` means the stream closed cleanly.
pub trait EventSource {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Ask the compositor to start pushing events.
    fn subscribe(&mut self) -> Result<(), Self::Error>;

    /// Block until the next event, or `None` once the stream has ended.
    fn next_event(&mut self) -> Result<Option<Event>, Self::Error>;
}

/// The mutations the dimmer issues against the compositor.
pub trait Compositor {
    /// The error type produced by this compositor.
    type Error: std::error::Error + Send + 'static;

    /// Set the opacity of `view` to `alpha` (in `[0.0, 1.0]`).
    fn set_view_alpha(&mut self, view: ViewId, alpha: f64) -> Result<(), Self::Error>;
}

//! The focus-reactive dimmer.
//!
//! [`FocusDimmer`] tracks the last focused toplevel view and reacts to
//! `view-focused` events by issuing opacity changes through the
//! [`Compositor`] trait:
//!
//! * the previously focused toplevel is set to the inactive alpha, but only
//!   when focus moves to another toplevel;
//! * the newly focused toplevel is set to the active alpha.
//!
//! When focus moves to something that is not a toplevel (a panel, a popup,
//! nothing at all) no call is made and the last focused view keeps the
//! opacity it had.

use crate::config::AlphaConfig;
use crate::event::{Event, EventKind, ViewId};
use crate::traits::{Compositor, EventSource};
use log::{debug, info};

/// Possible errors from the dimmer.
#[derive(Debug, thiserror::Error)]
pub enum DimmerError {
    /// Reading from the event source failed.
    #[error("event source error: {0}")]
    Events(String),
    /// The compositor rejected an opacity change.
    #[error("compositor error: {0}")]
    Compositor(String),
}

/// Owns the focus state and turns focus events into opacity changes.
///
/// # Typical usage
///
/// ```ignore
/// let mut socket = WayfireSocket::from_env()?;
/// let mut dimmer = FocusDimmer::new(AlphaConfig::default());
/// dimmer.run(&mut socket)?;
/// ```
#[derive(Debug)]
pub struct FocusDimmer {
    alphas: AlphaConfig,
    focused: Option<ViewId>,
}

impl FocusDimmer {
    /// Create a dimmer with no focused view.
    pub fn new(alphas: AlphaConfig) -> Self {
        Self {
            alphas,
            focused: None,
        }
    }

    /// The last toplevel that was brought to full opacity, if it still has
    /// focus.
    pub fn focused(&self) -> Option<ViewId> {
        self.focused
    }

    /// The toplevel an event moves focus to.
    ///
    /// `None` for focus events without a view or with a non-toplevel view,
    /// and for every event that is not a focus change.
    pub fn candidate(event: &Event) -> Option<ViewId> {
        if event.kind != EventKind::ViewFocused {
            return None;
        }
        event
            .view
            .as_ref()
            .filter(|view| view.is_toplevel())
            .map(|view| view.id)
    }

    /// Process a single event.
    ///
    /// Returns `true` if the focus state changed.
    pub fn handle<C: Compositor>(
        &mut self,
        compositor: &mut C,
        event: &Event,
    ) -> Result<bool, DimmerError> {
        if event.kind != EventKind::ViewFocused {
            return Ok(false);
        }

        let candidate = Self::candidate(event);
        if candidate == self.focused {
            return Ok(false);
        }

        if let (Some(previous), Some(_)) = (self.focused, candidate) {
            compositor
                .set_view_alpha(previous, self.alphas.inactive)
                .map_err(|e| DimmerError::Compositor(e.to_string()))?;
        }

        if let Some(next) = candidate {
            compositor
                .set_view_alpha(next, self.alphas.active)
                .map_err(|e| DimmerError::Compositor(e.to_string()))?;
        }

        info!("focus {:?} -> {:?}", self.focused, candidate);
        self.focused = candidate;
        Ok(true)
    }

    /// Subscribe to events and process them until the connection closes.
    ///
    /// This method **blocks**.  Any error ends the loop.
    pub fn run<T>(&mut self, connection: &mut T) -> Result<(), DimmerError>
    where
        T: EventSource + Compositor,
    {
        connection
            .subscribe()
            .map_err(|e| DimmerError::Events(e.to_string()))?;
        info!("subscribed to compositor events");

        while let Some(event) = connection
            .next_event()
            .map_err(|e| DimmerError::Events(e.to_string()))?
        {
            debug!("received {} {:?}", event.kind, event.view);
            self.handle(connection, &event)?;
        }
        Ok(())
    }
}

//  Tests

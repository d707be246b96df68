//! **wf-inactive-alpha**: dims unfocused windows on Wayfire.
//!
//! The daemon connects to the compositor's IPC socket, subscribes to its
//! event stream and, whenever keyboard focus moves from one toplevel view
//! to another, lowers the opacity of the old one and restores the new one
//! to full opacity.
//!
//! # Architecture
//!
//! The crate is organised around two small traits:
//!
//! * [`traits::EventSource`] for a blocking stream of compositor events.
//! * [`traits::Compositor`] for the opacity mutation the dimmer issues.
//!
//! [`dimmer::FocusDimmer`] holds the focus state and depends only on those
//! traits.  The concrete implementation of both lives in [`wayfire`]
//! (Wayfire's length-prefixed JSON IPC over a Unix socket).

pub mod config;
pub mod dimmer;
pub mod event;
pub mod traits;
pub mod wayfire;

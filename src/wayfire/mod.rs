//! Wayfire-specific implementations.
//!
//! This module provides the concrete backend for the
//! [`EventSource`](crate::traits::EventSource) and
//! [`Compositor`](crate::traits::Compositor) traits, powered by Wayfire's
//! IPC socket.
//!
//! Nothing outside this module should reference Wayfire's wire format
//! directly.

pub mod codec;
pub mod socket;

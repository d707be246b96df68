//! Blocking client for the Wayfire IPC socket.
//!
//! The compositor exports the socket address in `$WAYFIRE_SOCKET`.  One
//! connection carries both method calls (request → response) and, after
//! subscribing, the event stream.  Responses and events therefore share the
//! read side: while waiting for a response, any event that arrives first is
//! queued and handed out later by [`EventSource::next_event`].

use crate::event::{Event, Message, Response, ViewId};
use crate::traits::{Compositor, EventSource};
use crate::wayfire::codec::{read_frame, write_frame, FrameError};
use log::{debug, trace};
use serde::Serialize;
use serde_json::json;
use std::collections::VecDeque;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

/// Environment variable holding the socket path.
pub const SOCKET_ENV: &str = "WAYFIRE_SOCKET";

/// Method that subscribes the caller to view events.
pub const WATCH_METHOD: &str = "window-rules/events/watch";

/// Method that changes the opacity of a single view.
pub const SET_VIEW_ALPHA_METHOD: &str = "wf/alpha/set-view-alpha";

/// Errors that can occur when talking to Wayfire.
#[derive(Debug, thiserror::Error)]
pub enum WayfireError {
    #[error("WAYFIRE_SOCKET not set")]
    MissingSocketEnv,
    #[error("connect to {}: {source}", .path.display())]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{method} failed: {message}")]
    Method { method: String, message: String },
    #[error("connection closed while waiting for the reply to {0}")]
    Closed(String),
}

/// Request envelope: `{"method": ..., "data": ...}`.
#[derive(Serialize)]
struct Request<'a> {
    method: &'a str,
    data: serde_json::Value,
}

/// A single connection to the compositor.
pub struct WayfireSocket {
    stream: UnixStream,
    pending: VecDeque<Event>,
}

impl WayfireSocket {
    /// Connect to the socket named by `$WAYFIRE_SOCKET`.
    pub fn from_env() -> Result<Self, WayfireError> {
        let path = std::env::var_os(SOCKET_ENV).ok_or(WayfireError::MissingSocketEnv)?;
        Self::connect(PathBuf::from(path))
    }

    /// Connect to the socket at `path`.
    pub fn connect(path: impl AsRef<Path>) -> Result<Self, WayfireError> {
        let path = path.as_ref();
        let stream = UnixStream::connect(path).map_err(|source| WayfireError::Connect {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("connected to {}", path.display());
        Ok(Self {
            stream,
            pending: VecDeque::new(),
        })
    }

    /// Call `method` with `data` and wait for its response.
    ///
    /// Events that arrive before the response are queued for
    /// [`next_event`](EventSource::next_event).
    pub fn call(&mut self, method: &str, data: serde_json::Value) -> Result<Response, WayfireError> {
        let request = serde_json::to_vec(&Request { method, data })?;
        trace!("-> {}", String::from_utf8_lossy(&request));
        write_frame(&mut self.stream, &request)?;

        loop {
            let Some(payload) = read_frame(&mut self.stream)? else {
                return Err(WayfireError::Closed(method.to_string()));
            };
            match Message::from_json(&payload)? {
                Message::Event(ev) => {
                    debug!("queueing {} event received while waiting for {}", ev.kind, method);
                    self.pending.push_back(ev);
                }
                Message::Response(resp) => {
                    if let Some(message) = resp.error_message() {
                        return Err(WayfireError::Method {
                            method: method.to_string(),
                            message: message.to_string(),
                        });
                    }
                    return Ok(resp);
                }
            }
        }
    }
}

impl EventSource for WayfireSocket {
    type Error = WayfireError;

    fn subscribe(&mut self) -> Result<(), Self::Error> {
        self.call(WATCH_METHOD, json!({}))?;
        Ok(())
    }

    fn next_event(&mut self) -> Result<Option<Event>, Self::Error> {
        if let Some(ev) = self.pending.pop_front() {
            return Ok(Some(ev));
        }
        loop {
            let Some(payload) = read_frame(&mut self.stream)? else {
                return Ok(None);
            };
            match Message::from_json(&payload)? {
                Message::Event(ev) => return Ok(Some(ev)),
                Message::Response(resp) => {
                    debug!("ignoring unsolicited response {:?}", resp);
                }
            }
        }
    }
}

impl Compositor for WayfireSocket {
    type Error = WayfireError;

    fn set_view_alpha(&mut self, view: ViewId, alpha: f64) -> Result<(), Self::Error> {
        self.call(SET_VIEW_ALPHA_METHOD, json!({ "view-id": view, "alpha": alpha }))?;
        Ok(())
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use serde_json::Value;
    use std::os::unix::net::UnixListener;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::thread::JoinHandle;

    /// Monotonic counter to generate unique socket paths per test.
    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    /// Helper: create a unique temporary socket path for each test.
    fn tmp_socket_path() -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "wf-inactive-alpha-test-{}-{}.sock",
            std::process::id(),
            id
        ))
    }

    /// Bind a fake compositor and run `script` on the first connection.
    fn fake_compositor<F>(script: F) -> (PathBuf, JoinHandle<()>)
    where
        F: FnOnce(UnixStream) + Send + 'static,
    {
        let path = tmp_socket_path();
        let _ = std::fs::remove_file(&path);
        let listener = UnixListener::bind(&path).expect("bind");
        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            script(stream);
        });
        (path, handle)
    }

    fn recv(stream: &mut UnixStream) -> Value {
        let payload = read_frame(stream).unwrap().expect("request");
        serde_json::from_slice(&payload).unwrap()
    }

    fn send(stream: &mut UnixStream, value: Value) {
        write_frame(stream, value.to_string().as_bytes()).unwrap();
    }

    fn focus_event(id: ViewId) -> Value {
        json!({"event": "view-focused", "view": {"id": id, "type": "toplevel"}})
    }

    #[test]
    fn subscribe_sends_watch_request() {
        let (path, server) = fake_compositor(|mut s| {
            let req = recv(&mut s);
            assert_eq!(req["method"], WATCH_METHOD);
            assert_eq!(req["data"], json!({}));
            send(&mut s, json!({"result": "ok"}));
        });

        let mut sock = WayfireSocket::connect(&path).unwrap();
        sock.subscribe().unwrap();
        server.join().unwrap();
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn set_view_alpha_sends_view_id_and_alpha() {
        let (path, server) = fake_compositor(|mut s| {
            let req = recv(&mut s);
            assert_eq!(req["method"], SET_VIEW_ALPHA_METHOD);
            assert_eq!(req["data"]["view-id"], 7);
            assert_eq!(req["data"]["alpha"], 0.8);
            send(&mut s, json!({"result": "ok"}));
        });

        let mut sock = WayfireSocket::connect(&path).unwrap();
        sock.set_view_alpha(7, 0.8).unwrap();
        server.join().unwrap();
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn events_before_response_are_queued_in_order() {
        let (path, server) = fake_compositor(|mut s| {
            let _ = recv(&mut s);
            send(&mut s, focus_event(1));
            send(&mut s, focus_event(2));
            send(&mut s, json!({"result": "ok"}));
            send(&mut s, focus_event(3));
        });

        let mut sock = WayfireSocket::connect(&path).unwrap();
        sock.set_view_alpha(9, 1.0).unwrap();
        let ids: Vec<ViewId> = (0..3)
            .map(|_| sock.next_event().unwrap().unwrap().view.unwrap().id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);

        server.join().unwrap();
        assert!(sock.next_event().unwrap().is_none());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn error_response_is_reported_with_method() {
        let (path, server) = fake_compositor(|mut s| {
            let _ = recv(&mut s);
            send(&mut s, json!({"error": "no such view"}));
        });

        let mut sock = WayfireSocket::connect(&path).unwrap();
        let err = sock.set_view_alpha(404, 1.0).unwrap_err();
        match err {
            WayfireError::Method { method, message } => {
                assert_eq!(method, SET_VIEW_ALPHA_METHOD);
                assert_eq!(message, "no such view");
            }
            other => panic!("unexpected error {:?}", other),
        }
        server.join().unwrap();
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn next_event_skips_stray_responses() {
        let (path, server) = fake_compositor(|mut s| {
            send(&mut s, json!({"result": "ok"}));
            send(&mut s, json!({"event": "view-mapped", "view": {"id": 4, "type": "toplevel"}}));
        });

        let mut sock = WayfireSocket::connect(&path).unwrap();
        let ev = sock.next_event().unwrap().unwrap();
        assert_eq!(ev.kind, EventKind::ViewMapped);
        server.join().unwrap();
        assert!(sock.next_event().unwrap().is_none());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn close_while_waiting_for_reply_is_an_error() {
        let (path, server) = fake_compositor(|mut s| {
            let _ = recv(&mut s);
        });

        let mut sock = WayfireSocket::connect(&path).unwrap();
        let err = sock.subscribe().unwrap_err();
        assert!(matches!(err, WayfireError::Closed(ref m) if m == WATCH_METHOD));
        server.join().unwrap();
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_message_is_an_error() {
        let (path, server) = fake_compositor(|mut s| {
            write_frame(&mut s, b"not json at all").unwrap();
        });

        let mut sock = WayfireSocket::connect(&path).unwrap();
        server.join().unwrap();
        assert!(matches!(sock.next_event(), Err(WayfireError::Json(_))));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn connect_to_missing_socket_fails() {
        let path = tmp_socket_path();
        let err = WayfireSocket::connect(&path).err().expect("connect should fail");
        assert!(matches!(err, WayfireError::Connect { .. }));
    }
}

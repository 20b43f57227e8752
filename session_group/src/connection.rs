use crate::error::{push_error, Error, PushErrorKind};
use crate::message::Message;
use log::*;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tokio::sync::mpsc::UnboundedSender;

/// User identity carried by a session. `UNBOUND_UID` means no user is bound yet.
pub type UserId = i64;

pub const UNBOUND_UID: UserId = 0;

/// Unique identifier for a session (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A live client connection as seen by a group.
///
/// Groups hold sessions by `Arc` and never own their lifetime: a session may
/// be closed elsewhere while a group still references it, in which case
/// `push` is expected to fail and the group reports it through `warn`.
pub trait Session: Send + Sync {
    fn sid(&self) -> &SessionId;

    fn uid(&self) -> UserId;

    /// Attempt delivery of `payload` under `route` to this session.
    fn push(&self, route: &str, payload: &Value) -> Result<(), Error>;

    /// Report a failure that concerns only this session.
    fn warn(&self, err: &Error) {
        warn!(
            "Push to session {} failed, UID[{}]: {}",
            self.sid(),
            self.uid(),
            err
        );
    }
}

impl fmt::Debug for dyn Session {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Session")
            .field("sid", self.sid())
            .field("uid", &self.uid())
            .finish()
    }
}

/// Session backed by an unbounded channel; the receiving half is owned by
/// whatever task writes to the client transport.
#[derive(Debug)]
pub struct ChannelSession {
    sid: SessionId,
    uid: AtomicI64,
    closed: AtomicBool,
    sender: UnboundedSender<Message>,
}

impl ChannelSession {
    pub fn new(sender: UnboundedSender<Message>) -> Self {
        Self {
            sid: SessionId::new(),
            uid: AtomicI64::new(UNBOUND_UID),
            closed: AtomicBool::new(false),
            sender,
        }
    }

    /// Bind the session to a user.
    pub fn bind(&self, uid: UserId) {
        self.uid.store(uid, Ordering::Release);
    }

    /// Mark the session closed. Pushes fail from here on.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!("Session {} closed, UID[{}]", self.sid, self.uid());
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire) || self.sender.is_closed()
    }
}

impl Session for ChannelSession {
    fn sid(&self) -> &SessionId {
        &self.sid
    }

    fn uid(&self) -> UserId {
        self.uid.load(Ordering::Acquire)
    }

    fn push(&self, route: &str, payload: &Value) -> Result<(), Error> {
        if self.closed.load(Ordering::Acquire) {
            return Err(push_error(
                PushErrorKind::Closed,
                &format!("session {} is closed", self.sid),
            ));
        }

        self.sender
            .send(Message::new(route, payload.clone()))
            .map_err(|e| {
                push_error(
                    PushErrorKind::Disconnected,
                    &format!("session {}: {}", self.sid, e),
                )
            })
    }
}

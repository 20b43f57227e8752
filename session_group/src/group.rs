use crate::connection::{Session, SessionId, UserId};
use crate::error::Error;
use log::*;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Lifecycle of a group. The only transition is `Working -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Working,
    Closed,
}

/// Status and membership live under one lock so they are always observed together.
struct Inner {
    status: Status,
    sessions: HashMap<SessionId, Arc<dyn Session>>,
}

/// A named set of sessions with fan-out delivery.
///
/// Mutations (`add`, `leave`, `leave_all`, `close`) take the lock exclusively;
/// queries and `multicast`/`broadcast` take it shared. Delivery holds the shared
/// lock for the whole push loop, so `close` waits for in-flight fan-out and no
/// push ever runs against a closed group.
///
/// Shared acquisitions are recursive: a session may query the group it is
/// being pushed from, even while a mutation is queued behind the delivery.
pub struct Group {
    name: String,
    inner: RwLock<Inner>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: RwLock::new(Inner {
                status: Status::Working,
                sessions: HashMap::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> Status {
        self.inner.read_recursive().status
    }

    pub fn is_closed(&self) -> bool {
        self.status() == Status::Closed
    }

    /// Add a session. Fails with `DuplicateSession` rather than replacing an
    /// existing member with the same session id.
    pub fn add(&self, session: Arc<dyn Session>) -> Result<(), Error> {
        let mut inner = self.inner.write();
        if inner.status == Status::Closed {
            return Err(Error::group_closed());
        }

        match inner.sessions.entry(session.sid().clone()) {
            Entry::Occupied(_) => Err(Error::duplicate_session()),
            Entry::Vacant(slot) => {
                debug!(
                    "Add session to group[{}], SID[{}], UID[{}]",
                    self.name,
                    session.sid(),
                    session.uid()
                );
                slot.insert(session);
                Ok(())
            }
        }
    }

    /// Remove a session. Removing a non-member is not an error.
    pub fn leave(&self, session: &dyn Session) -> Result<(), Error> {
        let mut inner = self.inner.write();
        if inner.status == Status::Closed {
            return Err(Error::group_closed());
        }

        if inner.sessions.remove(session.sid()).is_some() {
            debug!(
                "Remove session from group[{}], SID[{}], UID[{}]",
                self.name,
                session.sid(),
                session.uid()
            );
        }
        Ok(())
    }

    pub fn leave_all(&self) -> Result<(), Error> {
        let mut inner = self.inner.write();
        if inner.status == Status::Closed {
            return Err(Error::group_closed());
        }

        debug!(
            "Clear {} session(s) from group[{}]",
            inner.sessions.len(),
            self.name
        );
        inner.sessions = HashMap::new();
        Ok(())
    }

    /// Close the group and drop every member reference. A second call fails
    /// with `GroupClosed` so double-close is detectable.
    pub fn close(&self) -> Result<(), Error> {
        let mut inner = self.inner.write();
        if inner.status == Status::Closed {
            return Err(Error::group_closed());
        }

        inner.status = Status::Closed;
        inner.sessions = HashMap::new();
        debug!("Group[{}] closed", self.name);
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.inner.read_recursive().sessions.len()
    }

    /// Find a member bound to `uid`.
    ///
    /// When several members share a uid the one returned is whichever the map
    /// yields first; no ordering between them is promised.
    pub fn member(&self, uid: UserId) -> Result<Arc<dyn Session>, Error> {
        self.inner
            .read_recursive()
            .sessions
            .values()
            .find(|s| s.uid() == uid)
            .cloned()
            .ok_or_else(Error::member_not_found)
    }

    /// User ids of all current members.
    pub fn members(&self) -> Vec<UserId> {
        self.inner
            .read_recursive()
            .sessions
            .values()
            .map(|s| s.uid())
            .collect()
    }

    pub fn contains(&self, uid: UserId) -> bool {
        self.member(uid).is_ok()
    }

    /// Push to every member accepted by `filter`.
    ///
    /// Only the closed precondition is reported to the caller. A failed push
    /// goes to that member's `warn` and delivery continues with the rest.
    pub fn multicast<F>(&self, route: &str, payload: &Value, filter: F) -> Result<(), Error>
    where
        F: Fn(&dyn Session) -> bool,
    {
        let inner = self.inner.read_recursive();
        if inner.status == Status::Closed {
            return Err(Error::group_closed());
        }

        let mut targeted = 0usize;
        let mut failed = 0usize;
        for session in inner.sessions.values() {
            if !filter(&**session) {
                continue;
            }
            targeted += 1;
            if let Err(e) = session.push(route, payload) {
                failed += 1;
                session.warn(&e);
            }
        }

        debug!(
            "Multicast[{}] in group[{}] to {} of {} member(s), {} failed",
            route,
            self.name,
            targeted,
            inner.sessions.len(),
            failed
        );
        Ok(())
    }

    /// Push to every member; same delivery policy as `multicast`.
    pub fn broadcast(&self, route: &str, payload: &Value) -> Result<(), Error> {
        self.multicast(route, payload, |_| true)
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let inner = self.inner.read_recursive();
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("status", &inner.status)
            .field("count", &inner.sessions.len())
            .finish()
    }
}

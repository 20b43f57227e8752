//! Concurrent session groups with fan-out delivery.
//!
//! A `Group` tracks a set of live client sessions under a name and pushes
//! routed payloads to them, either to every member (`broadcast`) or to the
//! members accepted by a caller-supplied filter (`multicast`).
//!
//! # Architecture
//!
//! - **One lock per group**: status and membership share a single
//!   `parking_lot::RwLock`. Mutations take it exclusively, queries and
//!   delivery take it shared.
//! - **Delivery under the shared lock**: fan-out holds the shared lock for
//!   the whole push loop. Deliveries run alongside each other and alongside
//!   queries, while `close` and other mutations wait until they finish.
//! - **Best-effort fan-out**: a failed push is reported on the failing
//!   session (`Session::warn`) and never aborts delivery to the others or
//!   surfaces as the caller's error. Only `GroupClosed` does.
//! - **Terminal close**: `close` empties the group for good. Every later
//!   mutation or delivery, and a second `close`, fails with `GroupClosed`.
//!
//! # Example
//!
//! ```rust,ignore
//! use session_group::{ChannelSession, Group};
//!
//! let group = Group::new("room1");
//! let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
//! group.add(Arc::new(ChannelSession::new(tx)))?;
//! group.broadcast("chat.msg", &serde_json::json!("hi"))?;
//! ```
//!
//! # Modules
//!
//! - `connection`: the `Session` trait, `SessionId` and the channel-backed `ChannelSession`
//! - `group`: `Group` membership, queries and fan-out
//! - `manager`: `Manager`, a registry of named groups
//! - `message`: the routed `Message` delivered to channel sessions
//! - `error`: `Error` and its kinds

pub mod connection;
pub mod error;
pub mod group;
pub mod manager;
pub mod message;

pub use connection::{ChannelSession, Session, SessionId, UserId, UNBOUND_UID};
pub use error::{Error, ErrorKind, PushErrorKind};
pub use group::{Group, Status};
pub use manager::Manager;
pub use message::Message;

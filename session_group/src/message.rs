use serde::Serialize;
use serde_json::Value;

/// A routed payload as handed to a session's receiver.
///
/// The route is an opaque category label (e.g. `"chat.msg"`); groups pass it
/// through without interpreting it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub route: String,
    pub payload: Value,
}

impl Message {
    pub fn new(route: impl Into<String>, payload: Value) -> Self {
        Self {
            route: route.into(),
            payload,
        }
    }
}

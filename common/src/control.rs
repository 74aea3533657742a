use crate::snapshot::null_as_default;
use serde::{Deserialize, Serialize};

/// Generic reply of the mutating endpoints (`{ok, error?}`). Extra fields
/// such as the applied speed are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlReply {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl ControlReply {
    /// Server-supplied error message, if the request was rejected with one.
    pub fn rejection(&self) -> Option<&str> {
        if self.ok {
            None
        } else {
            self.error.as_deref().filter(|e| !e.is_empty())
        }
    }
}

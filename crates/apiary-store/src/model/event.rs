use serde::{Deserialize, Serialize};

/// An entry in a cell's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub level: String,
    pub action: String,
    pub object: String,
    pub result: String,
}

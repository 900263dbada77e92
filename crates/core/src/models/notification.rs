use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    Reminder,
    Verification,
}

/// An outgoing notification. Delivery is best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub recipient: String,
    pub template: TemplateType,
    pub payload: serde_json::Value,
    pub attach: bool,
}

use crate::constants::wire::{DATA_PREFIX, FRAME_TERMINATOR};
use crate::error::HuddleError;
use crate::team::{Category, TeamMessage};
use serde::{Deserialize, Serialize};

/// Wire shape of one message on the event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentFrame {
    pub agent: String,
    pub message: String,
    pub timestamp: i64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Category>,
}

impl From<&TeamMessage> for AgentFrame {
    fn from(msg: &TeamMessage) -> Self {
        Self {
            agent: msg.agent().to_string(),
            message: msg.text().to_string(),
            timestamp: msg.produced_at(),
            kind: msg.category(),
        }
    }
}

impl AgentFrame {
    /// `data: {json}` followed by a blank line.
    pub fn encode(&self) -> Result<String, HuddleError> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{DATA_PREFIX}{json}{FRAME_TERMINATOR}"))
    }
}

pub fn encode_frame(msg: &TeamMessage) -> Result<String, HuddleError> {
    AgentFrame::from(msg).encode()
}

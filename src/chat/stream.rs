use log::debug;
use serde::Deserialize;

/// Event data the server sends after the last chunk
pub const DONE_SENTINEL: &str = "[DONE]";

/// One decoded event of a streamed chat completion
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamChunk {
    pub id: String,
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub delta: StreamDelta,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamDelta {
    pub content: Option<String>,
}

impl StreamChunk {
    /// Text carried by the first choice, if any
    pub fn content(&self) -> Option<&str> {
        self.choices.first()?.delta.content.as_deref()
    }
}

/// Decode the data field of one server-sent event
///
/// The `[DONE]` sentinel and undecodable payloads (pings, keep-alives) yield `None`.
pub fn decode_event_data(data: &str) -> Option<StreamChunk> {
    let data = data.trim();
    if data.is_empty() || data == DONE_SENTINEL {
        return None;
    }
    match serde_json::from_str(data) {
        Ok(chunk) => Some(chunk),
        Err(e) => {
            debug!("Skipping stream event: {}", e);
            None
        }
    }
}

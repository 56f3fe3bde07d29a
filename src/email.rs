use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;

/// One email as handed to the pipeline, deserialized from the stdin JSON
/// record. Owned by the caller for the duration of a single scan.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailRecord {
    pub sender: String,
    pub message: String,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
}

impl EmailRecord {
    pub fn from_json(input: &str) -> anyhow::Result<Self> {
        serde_json::from_str(input).context("invalid email record JSON")
    }

    /// Subject line carried in the headers map, if any.
    pub fn header_subject(&self) -> Option<&str> {
        let headers = self.headers.as_ref()?;
        headers
            .get("Subject")
            .or_else(|| headers.get("subject"))
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// Extract a subject line from raw message text by scanning for the literal
/// `Subject:` marker (then the lowercase variant) and taking everything up to
/// the next newline. Returns `None` when no marker with a terminated line is
/// present.
pub fn extract_subject(message: &str) -> Option<String> {
    for marker in ["Subject:", "subject:"] {
        if let Some(start) = message.find(marker) {
            if let Some(offset) = message[start..].find('\n') {
                let line = message[start + marker.len()..start + offset].trim();
                return Some(line.to_string());
            }
        }
    }
    None
}

/// Extract the body from raw message text: everything after the first
/// blank-line separator, or the whole message when none exists.
pub fn extract_body(message: &str) -> String {
    match message.find("\n\n") {
        Some(start) => message[start + 2..].trim().to_string(),
        None => message.to_string(),
    }
}

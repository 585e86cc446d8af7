use nexus_tree::{ChangeRequest, ChangeType, Path, TreeError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A change sent by a bound client: `{"path": "...", "value": ..., "type": "SET"}`.
///
/// `path` is relative to the session's bound model path; `type` defaults to `SET`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeMessage {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub value: Value,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub change_type: Option<String>,
}

impl ChangeMessage {
    /// Resolves the message against the session's bound path.
    ///
    /// # Errors
    /// [`TreeError::MalformedPath`] or [`TreeError::InvalidChangeType`].
    pub fn into_request(self, bound: &Path) -> Result<ChangeRequest, TreeError> {
        let relative = Path::parse(&self.path)?;
        let change_type = match self.change_type.as_deref() {
            Some(raw) => raw.parse()?,
            None => ChangeType::Set,
        };
        Ok(ChangeRequest { path: bound.concat(&relative), value: self.value, change_type })
    }
}

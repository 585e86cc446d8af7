use crate::error::TreeError;
use crate::path::Path;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// How a [`ChangeRequest`] mutates the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ChangeType {
    /// Replace or create the value at the target path.
    #[default]
    Set,
    /// Remove the value at the target path.
    Delete,
}

impl ChangeType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Set => "SET",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeType {
    type Err = TreeError;

    /// `ADD` is accepted as a synonym of `SET`; older clients still send it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SET" | "ADD" => Ok(Self::Set),
            "DELETE" => Ok(Self::Delete),
            other => Err(TreeError::InvalidChangeType {
                message: format!("'{other}' (expected SET or DELETE)").into(),
                context: None,
            }),
        }
    }
}

/// A single mutation of a component model; the only way a model changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRequest {
    /// Relative to the model root.
    pub path: Path,
    pub value: Value,
    pub change_type: ChangeType,
}

impl ChangeRequest {
    #[must_use]
    pub const fn set(path: Path, value: Value) -> Self {
        Self { path, value, change_type: ChangeType::Set }
    }

    #[must_use]
    pub const fn delete(path: Path) -> Self {
        Self { path, value: Value::Null, change_type: ChangeType::Delete }
    }
}

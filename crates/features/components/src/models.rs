use nexus_tree::Component;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Body of `POST /components/{path}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ConstructRequest {
    /// Type name; selects the stored defaults.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Initial model, merged over the type's default model.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub model: Value,
}

/// A live component and its current model.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentView {
    pub path: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[schema(value_type = Object)]
    pub model: Value,
}

impl From<&Component> for ComponentView {
    fn from(component: &Component) -> Self {
        Self {
            path: component.path().render(),
            type_name: component.type_name().to_owned(),
            model: component.model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentSummary {
    pub path: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every failed response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable description of what went wrong
    #[schema(example = "File not found: missing.txt")]
    pub error: String,
}

/// Body of successful operations that only report an outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

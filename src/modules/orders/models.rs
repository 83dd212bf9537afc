use serde::{Deserialize, Serialize};

/// Body of `POST /place-order`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrder {
    pub session_id: String,
}

/// Envelope used by the order routes: `{status, message, data?}`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data: None,
        }
    }
}

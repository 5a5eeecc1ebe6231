//! Response envelope of the library API

use serde::{de::DeserializeOwned, Deserialize};

use crate::error::{AppError, AppResult};

/// `{ "success": .., "message": .., "data": .. }`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Decode a response body and unwrap its `data` field
    pub fn decode_data(body: serde_json::Value) -> AppResult<T> {
        let envelope: ApiResponse<T> =
            serde_json::from_value(body).map_err(|e| AppError::Decode(e.to_string()))?;
        envelope
            .data
            .ok_or_else(|| AppError::Decode("response carried no data".to_string()))
    }
}

/// Best-effort extraction of the API's error message from a failed response body
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

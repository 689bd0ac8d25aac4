//! Post/redirect/get: every mutation answers 303 with `message` and `type`.

use crate::errors::{AppError, AppResult};
use axum::response::Redirect;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Warning,
}

impl FlashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Warning => "warning",
        }
    }

    /// Anything but `success` is shown as a warning.
    pub fn from_query(s: Option<&str>) -> Self {
        match s {
            Some("success") => FlashKind::Success,
            _ => FlashKind::Warning,
        }
    }
}

/// `?message=...&type=...` on GET pages.
#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub message: String,
    pub kind: FlashKind,
}

impl FlashQuery {
    pub fn flash(&self) -> Option<Flash> {
        let message = self.message.as_deref().map(str::trim).filter(|m| !m.is_empty())?;
        Some(Flash {
            message: message.to_string(),
            kind: FlashKind::from_query(self.kind.as_deref()),
        })
    }
}

/// `location?message=...&type=...`
pub fn location_with_message(location: &str, message: &str, kind: FlashKind) -> String {
    if message.is_empty() {
        return location.to_string();
    }
    match serde_urlencoded::to_string([("message", message), ("type", kind.as_str())]) {
        Ok(query) => format!("{}?{}", location, query),
        Err(_) => location.to_string(),
    }
}

pub fn redirect_with_message(location: &str, message: &str, kind: FlashKind) -> Redirect {
    Redirect::to(&location_with_message(location, message, kind))
}

/// Success message -> success flash, validation error -> warning flash,
/// anything else propagates as an HTTP error.
pub fn redirect_outcome(location: &str, outcome: AppResult<String>) -> AppResult<Redirect> {
    match outcome {
        Ok(message) => Ok(redirect_with_message(location, &message, FlashKind::Success)),
        Err(AppError::Validation(message)) => {
            warn!(location, "{}", message);
            Ok(redirect_with_message(location, &message, FlashKind::Warning))
        }
        Err(e) => Err(e),
    }
}

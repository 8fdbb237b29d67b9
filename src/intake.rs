use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::error::SignupError;
use crate::models::SignupPayload;
use crate::notify::Notifier;
use crate::store::SignupStore;
use crate::workflow;

/// Body shape the web boundary returns verbatim. Failures carry only a
/// message and the transport status, no machine-readable error code.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }

    fn failure(message: String) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

/// Boundary adapter: decode the posted mapping, run the workflow, map the
/// outcome to a transport status. Validation problems are the caller's to
/// fix (400); a failed confirmation send is ours (500).
pub async fn handle_signup(
    payload: Value,
    store: &SignupStore,
    notifier: &Notifier,
    persist: bool,
) -> (u16, ApiResponse) {
    let payload: SignupPayload = match serde_json::from_value(payload) {
        Ok(payload) => payload,
        Err(err) => {
            return (
                400,
                ApiResponse::failure(format!("malformed signup payload: {err}")),
            )
        }
    };

    match workflow::process_submission(&payload, store, notifier, persist).await {
        Ok(outcome) => {
            info!(
                message = %outcome.message,
                email = %outcome.record.parent_email,
                "form submission successful"
            );
            (200, ApiResponse::ok("Signup successful!"))
        }
        Err(err) => {
            error!(error = %err, "signup submission failed");
            let status = match err {
                SignupError::Validation(_) => 400,
                SignupError::Delivery(_) => 500,
            };
            (status, ApiResponse::failure(err.to_string()))
        }
    }
}

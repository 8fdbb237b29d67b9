use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{SignupError, ValidationError};
use crate::models::{SignupPayload, SignupRecord};
use crate::notify::Notifier;
use crate::store::SignupStore;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// What a successful submission hands back to the boundary.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub message: String,
    pub record: SignupRecord,
}

/// Runs one signup end to end: normalize, validate, append to the sheet
/// (best effort, skipped when `persist` is off), send the confirmation.
/// Once validation has passed, only the confirmation send can fail the
/// submission.
pub async fn process_submission(
    payload: &SignupPayload,
    store: &SignupStore,
    notifier: &Notifier,
    persist: bool,
) -> Result<SubmissionOutcome, SignupError> {
    let submission_id = Uuid::new_v4();
    info!(%submission_id, "processing signup submission");

    let parent_name = payload.parent_name.trim();
    let parent_email = payload.parent_email.trim();
    let children_names = payload.children_names.normalized();

    if parent_name.is_empty() || parent_email.is_empty() {
        return Err(ValidationError::MissingFields.into());
    }
    if !EMAIL_PATTERN.is_match(parent_email) {
        return Err(ValidationError::InvalidEmail.into());
    }

    let record = SignupRecord::new(parent_name, parent_email, &children_names);
    info!(%submission_id, email = %record.parent_email, "signup record created");

    if persist {
        if let Err(err) = store.append(&record) {
            warn!(%submission_id, error = %err, "sheet append failed, continuing");
        }
    } else {
        info!(%submission_id, "read-only deployment, skipping sheet append");
    }

    notifier
        .send_confirmation(&record.parent_email, &record.parent_name, &record.children_names)
        .await?;

    Ok(SubmissionOutcome {
        message: "Signup processed successfully".to_string(),
        record,
    })
}

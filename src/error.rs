use thiserror::Error;

/// Problems the submitter can fix. Detected before any side effect.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("missing required fields: parent name and email")]
    MissingFields,
    #[error("invalid email format")]
    InvalidEmail,
}

/// Signup sheet failures. Never fatal to a submission.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("signup sheet I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("signup sheet is malformed: {0}")]
    Csv(#[from] csv::Error),
}

/// Outbound email failures. Fatal to the operation that needed the send.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("email request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("email provider rejected the message ({status}): {detail}")]
    Provider { status: u16, detail: String },
}

/// Everything a submission can fail with once it reaches the workflow.
#[derive(Debug, Error)]
pub enum SignupError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

use tracing::{debug, info};

use crate::error::DeliveryError;
use crate::models::StoredSignup;
use crate::notify::Notifier;
use crate::store::{SignupStore, DEFAULT_RECENT_LIMIT};

/// Result of one digest run.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub records: Vec<StoredSignup>,
    pub report_html: Option<String>,
}

/// Emails a digest of the most recent signups to the operations address.
/// An empty sheet is a successful no-op.
pub async fn generate(
    store: &SignupStore,
    notifier: &Notifier,
    label: &str,
) -> Result<ReportOutcome, DeliveryError> {
    info!(label, "generating signup report");

    let records = store.read_recent(DEFAULT_RECENT_LIMIT);
    if records.is_empty() {
        info!("no new signups to report");
        return Ok(ReportOutcome {
            records,
            report_html: None,
        });
    }

    let report_html = notifier.send_digest(&records, label).await?;
    clear_reported(&records);

    Ok(ReportOutcome {
        records,
        report_html: Some(report_html),
    })
}

/// Reported rows stay in the sheet untouched, so consecutive digests can
/// repeat rows that were already sent.
fn clear_reported(records: &[StoredSignup]) {
    debug!(count = records.len(), "reported signups left in the sheet");
}

/// Pushes the digest template through the live delivery path using canned
/// rows. Verifies the delivery wiring without touching the sheet.
pub async fn send_test_report(notifier: &Notifier) -> Result<(), DeliveryError> {
    let samples = vec![
        StoredSignup {
            date: "2025-11-02".to_string(),
            parent_name: "Test Parent 1".to_string(),
            parent_email: "test1@example.com".to_string(),
            children_names: "Test Child 1".to_string(),
            email_status: "active".to_string(),
            signup_source: "web_form".to_string(),
        },
        StoredSignup {
            date: "2025-11-02".to_string(),
            parent_name: "Test Parent 2".to_string(),
            parent_email: "test2@example.com".to_string(),
            children_names: "Test Child 2, Test Child 3".to_string(),
            email_status: "active".to_string(),
            signup_source: "web_form".to_string(),
        },
    ];

    notifier.send_digest(&samples, "Test Report").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SignupRecord;
    use crate::notify::{test_notifier, FailingSender, RecordingSender};
    use std::sync::Arc;

    fn temp_store(dir: &tempfile::TempDir) -> SignupStore {
        SignupStore::new(dir.path().join("signups.csv"))
    }

    #[tokio::test]
    async fn empty_sheet_is_a_silent_success() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);
        let sender = RecordingSender::new();
        let notifier = test_notifier(sender.clone());

        let outcome = generate(&store, &notifier, "Daily Report").await.unwrap();

        assert!(outcome.records.is_empty());
        assert!(outcome.report_html.is_none());
        assert!(sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn digest_covers_the_trailing_window() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);
        let sender = RecordingSender::new();
        let notifier = test_notifier(sender.clone());

        for n in 0..7 {
            store
                .append(&SignupRecord::new(
                    &format!("Parent {n}"),
                    &format!("parent{n}@example.com"),
                    "N/A",
                ))
                .unwrap();
        }

        let outcome = generate(&store, &notifier, "Daily Report").await.unwrap();

        assert_eq!(outcome.records.len(), 5);
        let html = outcome.report_html.unwrap();
        assert!(html.contains("parent6@example.com"));
        assert!(!html.contains("parent1@example.com"));

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "julie@juldd.com");
    }

    #[tokio::test]
    async fn rerun_without_new_signups_repeats_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);
        let sender = RecordingSender::new();
        let notifier = test_notifier(sender.clone());

        store
            .append(&SignupRecord::new("Jane Doe", "jane@example.com", "Sam"))
            .unwrap();

        let first = generate(&store, &notifier, "Daily Report").await.unwrap();
        let second = generate(&store, &notifier, "Daily Report").await.unwrap();

        assert_eq!(first.records, second.records);
        assert_eq!(sender.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delivery_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);
        let notifier = test_notifier(Arc::new(FailingSender));

        store
            .append(&SignupRecord::new("Jane Doe", "jane@example.com", "Sam"))
            .unwrap();

        assert!(generate(&store, &notifier, "Daily Report").await.is_err());
    }

    #[tokio::test]
    async fn test_report_sends_canned_rows() {
        let sender = RecordingSender::new();
        let notifier = test_notifier(sender.clone());

        send_test_report(&notifier).await.unwrap();

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Test Report - New Newsletter Signups");
        assert!(sent[0].html.contains("Test Parent 1"));
        assert!(sent[0].html.contains("Test Child 2, Test Child 3"));
    }
}

use std::fmt::Write;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::DeliveryError;
use crate::models::{StoredSignup, EMAIL_STATUS_ACTIVE, NO_CHILDREN};

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";
const CONFIRMATION_SUBJECT: &str = "🎉 Welcome to JULDD Media Kids' AI Newsletter!";

/// Outbound message in the shape the delivery API accepts.
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendReceipt {
    pub id: String,
}

/// Opaque email-delivery capability. Implementations own transport and
/// credentials; callers own content and recipients.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, DeliveryError>;
}

/// Resend REST client. One POST per message, no retries.
pub struct ResendSender {
    http: reqwest::Client,
    api_key: String,
}

impl ResendSender {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl EmailSender for ResendSender {
    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, DeliveryError> {
        let response = self
            .http
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %detail, "Resend rejected the message");
            return Err(DeliveryError::Provider {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response.json::<SendReceipt>().await?)
    }
}

/// Renders and dispatches the two outbound messages: per-signup confirmations
/// and the operator digest.
pub struct Notifier {
    sender: Arc<dyn EmailSender>,
    from: String,
    report_recipient: String,
}

impl Notifier {
    pub fn new(sender: Arc<dyn EmailSender>, from: String, report_recipient: String) -> Self {
        Self {
            sender,
            from,
            report_recipient,
        }
    }

    pub async fn send_confirmation(
        &self,
        email: &str,
        parent_name: &str,
        children_names: &str,
    ) -> Result<(), DeliveryError> {
        info!(to = %email, "sending confirmation email");
        let message = EmailMessage {
            from: self.from.clone(),
            to: email.to_string(),
            subject: CONFIRMATION_SUBJECT.to_string(),
            html: render_confirmation(parent_name, children_names),
        };
        let receipt = self.sender.send(&message).await?;
        info!(message_id = %receipt.id, "confirmation email sent");
        Ok(())
    }

    /// Sends the digest to the fixed operations recipient and returns the
    /// rendered HTML.
    pub async fn send_digest(
        &self,
        records: &[StoredSignup],
        label: &str,
    ) -> Result<String, DeliveryError> {
        info!(to = %self.report_recipient, count = records.len(), "sending digest email");
        let html = render_digest(records, label);
        let message = EmailMessage {
            from: self.from.clone(),
            to: self.report_recipient.clone(),
            subject: format!("{label} - New Newsletter Signups"),
            html: html.clone(),
        };
        let receipt = self.sender.send(&message).await?;
        info!(message_id = %receipt.id, "digest email sent");
        Ok(html)
    }
}

pub fn render_confirmation(parent_name: &str, children_names: &str) -> String {
    let children_line = if children_names == NO_CHILDREN {
        "Not specified (you can update this later)"
    } else {
        children_names
    };

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; line-height: 1.6;">
  <h2 style="color: #0f3460;">Welcome to JULDD Media! 🎉</h2>
  <p>Hi {parent_name},</p>
  <p>Thank you for signing up for the JULDD Media Kids' AI Newsletter! We're excited to bring educational AI-powered content to your family.</p>
  <h3>Your Free Trial</h3>
  <p>✅ <strong>1 Month Free Access</strong> - No credit card required! Your trial starts immediately.</p>
  <h3>Family Details</h3>
  <p>Children: {children_line}</p>
  <h3>What to Expect</h3>
  <ul style="color: #333;">
    <li>📚 Educational content with AI-powered learning tools</li>
    <li>🎨 Engaging animations and audio stories for kids</li>
    <li>👨‍👩‍👧‍👦 Age-appropriate, family-friendly material</li>
    <li>📧 Regular newsletter updates (bi-weekly to start)</li>
  </ul>
  <p>Look for your first newsletter in your inbox soon. If you don't see it, check your spam folder. If you have any questions, reply to this email or contact us at <a href="mailto:support@julddmedia.com">support@julddmedia.com</a>.</p>
  <p>Best, <br><strong>The JULDD Media Team</strong></p>
</div>"#
    )
}

pub fn render_digest(records: &[StoredSignup], label: &str) -> String {
    let mut rows = String::new();
    for (index, record) in records.iter().enumerate() {
        let status = if record.email_status.is_empty() {
            EMAIL_STATUS_ACTIVE
        } else {
            &record.email_status
        };
        let _ = write!(
            rows,
            r#"
      <tr style="border-bottom: 1px solid #ddd;">
        <td style="padding: 10px;">{number}</td>
        <td style="padding: 10px;">{date}</td>
        <td style="padding: 10px;">{name}</td>
        <td style="padding: 10px;">{email}</td>
        <td style="padding: 10px;">{children}</td>
        <td style="padding: 10px;"><span style="background: #4caf50; color: #fff; padding: 5px 10px; border-radius: 3px;">{status}</span></td>
      </tr>"#,
            number = index + 1,
            date = record.date,
            name = record.parent_name,
            email = record.parent_email,
            children = record.children_names,
        );
    }

    let generated_at = Utc::now().format("%Y-%m-%d %H:%M UTC");
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto;">
  <h2 style="color: #0f3460;">📊 {label}</h2>
  <p style="color: #666;">New Newsletter Signups</p>
  <p><strong>Total New Signups:</strong> {total}</p>
  <table style="width: 100%; border-collapse: collapse; margin: 20px 0;">
    <thead>
      <tr style="background: #0f3460; color: white;">
        <th style="padding: 10px; text-align: left;">#</th>
        <th style="padding: 10px; text-align: left;">Date</th>
        <th style="padding: 10px; text-align: left;">Parent Name</th>
        <th style="padding: 10px; text-align: left;">Email</th>
        <th style="padding: 10px; text-align: left;">Children</th>
        <th style="padding: 10px; text-align: left;">Status</th>
      </tr>
    </thead>
    <tbody>{rows}
    </tbody>
  </table>
  <p style="color: #666; font-size: 12px;">Report generated on {generated_at}</p>
</div>"#,
        total = records.len(),
    )
}

#[cfg(test)]
pub(crate) struct RecordingSender {
    pub sent: std::sync::Mutex<Vec<EmailMessage>>,
}

#[cfg(test)]
impl RecordingSender {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: std::sync::Mutex::new(Vec::new()),
        })
    }
}

#[cfg(test)]
#[async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, DeliveryError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(message.clone());
        Ok(SendReceipt {
            id: format!("test-message-{}", sent.len()),
        })
    }
}

#[cfg(test)]
pub(crate) struct FailingSender;

#[cfg(test)]
#[async_trait]
impl EmailSender for FailingSender {
    async fn send(&self, _message: &EmailMessage) -> Result<SendReceipt, DeliveryError> {
        Err(DeliveryError::Provider {
            status: 503,
            detail: "synthetic outage".to_string(),
        })
    }
}

#[cfg(test)]
pub(crate) fn test_notifier(sender: Arc<dyn EmailSender>) -> Notifier {
    Notifier::new(
        sender,
        "JULDD Media <onboarding@resend.dev>".to_string(),
        "julie@juldd.com".to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(parent_name: &str, parent_email: &str) -> StoredSignup {
        StoredSignup {
            date: "2026-08-06".to_string(),
            parent_name: parent_name.to_string(),
            parent_email: parent_email.to_string(),
            children_names: "Sam".to_string(),
            email_status: "active".to_string(),
            signup_source: "web_form".to_string(),
        }
    }

    #[test]
    fn confirmation_greets_parent_and_lists_children() {
        let html = render_confirmation("Jane Doe", "Alice, Bob");
        assert!(html.contains("Hi Jane Doe,"));
        assert!(html.contains("Children: Alice, Bob"));
    }

    #[test]
    fn confirmation_explains_missing_children() {
        let html = render_confirmation("Jane Doe", "N/A");
        assert!(html.contains("Children: Not specified (you can update this later)"));
    }

    #[test]
    fn digest_lists_every_record_with_count() {
        let records = vec![
            stored("Jane Doe", "jane@example.com"),
            stored("John Roe", "john@example.com"),
        ];
        let html = render_digest(&records, "Daily Report");
        assert!(html.contains("📊 Daily Report"));
        assert!(html.contains("<strong>Total New Signups:</strong> 2"));
        assert!(html.contains("jane@example.com"));
        assert!(html.contains("john@example.com"));
    }

    #[test]
    fn digest_badges_blank_status_as_active() {
        let mut record = stored("Jane Doe", "jane@example.com");
        record.email_status = String::new();
        let html = render_digest(&[record], "Daily Report");
        assert!(html.contains(">active</span>"));
    }

    #[tokio::test]
    async fn confirmation_goes_to_the_signup_address() {
        let sender = RecordingSender::new();
        let notifier = test_notifier(sender.clone());

        notifier
            .send_confirmation("jane@example.com", "Jane Doe", "Sam")
            .await
            .unwrap();

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "jane@example.com");
        assert_eq!(sent[0].from, "JULDD Media <onboarding@resend.dev>");
        assert_eq!(sent[0].subject, CONFIRMATION_SUBJECT);
    }

    #[tokio::test]
    async fn digest_goes_to_the_operations_address() {
        let sender = RecordingSender::new();
        let notifier = test_notifier(sender.clone());

        let html = notifier
            .send_digest(&[stored("Jane Doe", "jane@example.com")], "Daily Report")
            .await
            .unwrap();

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "julie@juldd.com");
        assert_eq!(sent[0].subject, "Daily Report - New Newsletter Signups");
        assert_eq!(sent[0].html, html);
    }

    #[tokio::test]
    async fn sender_failure_is_wrapped_and_raised() {
        let notifier = test_notifier(Arc::new(FailingSender));

        let err = notifier
            .send_confirmation("jane@example.com", "Jane Doe", "N/A")
            .await
            .unwrap_err();

        assert!(matches!(err, DeliveryError::Provider { status: 503, .. }));
    }
}

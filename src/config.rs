use std::path::PathBuf;

use anyhow::Context;

pub const DEFAULT_FROM: &str = "JULDD Media <onboarding@resend.dev>";
pub const DEFAULT_REPORT_RECIPIENT: &str = "julie@juldd.com";
pub const DEFAULT_STORE_FILE: &str = "juldd_media_signups.csv";

/// Runtime knobs, resolved from the environment exactly once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub resend_api_key: String,
    pub from_email: String,
    pub report_recipient: String,
    pub store_path: PathBuf,
    /// False on read-only deployments, where the sheet append is skipped.
    pub persist_signups: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let resend_api_key =
            std::env::var("RESEND_API_KEY").context("RESEND_API_KEY must be set to a Resend API key")?;
        let from_email =
            std::env::var("FROM_EMAIL").unwrap_or_else(|_| DEFAULT_FROM.to_string());
        let report_recipient =
            std::env::var("REPORT_EMAIL").unwrap_or_else(|_| DEFAULT_REPORT_RECIPIENT.to_string());
        let store_path = std::env::var("SIGNUP_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_FILE));
        // Vercel mounts a read-only filesystem.
        let persist_signups = std::env::var_os("VERCEL").is_none();

        Ok(Self {
            resend_api_key,
            from_email,
            report_recipient,
            store_path,
            persist_signups,
        })
    }
}

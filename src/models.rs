use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Header row of the signup sheet, in persisted column order.
pub const SHEET_COLUMNS: [&str; 6] = [
    "Date",
    "Parent Name",
    "Email",
    "Children Names",
    "Email Status",
    "Signup Source",
];

pub const EMAIL_STATUS_ACTIVE: &str = "active";
pub const SIGNUP_SOURCE_WEB_FORM: &str = "web_form";
pub const NO_CHILDREN: &str = "N/A";

/// One validated signup, appended to the sheet exactly once and never
/// updated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Parent Name")]
    pub parent_name: String,
    #[serde(rename = "Email")]
    pub parent_email: String,
    #[serde(rename = "Children Names")]
    pub children_names: String,
    #[serde(rename = "Email Status")]
    pub email_status: String,
    #[serde(rename = "Signup Source")]
    pub signup_source: String,
}

impl SignupRecord {
    pub fn new(parent_name: &str, parent_email: &str, children_names: &str) -> Self {
        Self {
            date: Utc::now().date_naive(),
            parent_name: parent_name.to_string(),
            parent_email: parent_email.to_string(),
            children_names: children_names.to_string(),
            email_status: EMAIL_STATUS_ACTIVE.to_string(),
            signup_source: SIGNUP_SOURCE_WEB_FORM.to_string(),
        }
    }
}

/// One row read back from the sheet. Values stay as written; nothing is
/// re-parsed on the read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSignup {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Parent Name")]
    pub parent_name: String,
    #[serde(rename = "Email")]
    pub parent_email: String,
    #[serde(rename = "Children Names")]
    pub children_names: String,
    #[serde(rename = "Email Status")]
    pub email_status: String,
    #[serde(rename = "Signup Source")]
    pub signup_source: String,
}

/// Inbound form mapping as the web boundary posts it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupPayload {
    pub parent_name: String,
    pub parent_email: String,
    #[serde(alias = "childName", alias = "children")]
    pub children_names: ChildrenNames,
}

/// The children field arrives as a single string, a list of strings, or not
/// at all, depending on which form variant posted it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
pub enum ChildrenNames {
    #[default]
    Missing,
    Single(String),
    Multiple(Vec<String>),
}

impl ChildrenNames {
    /// Collapses to the persisted string: entries trimmed, blanks dropped,
    /// the "N/A" sentinel when nothing is left.
    pub fn normalized(&self) -> String {
        let joined = match self {
            ChildrenNames::Missing => String::new(),
            ChildrenNames::Single(name) => name.trim().to_string(),
            ChildrenNames::Multiple(names) => names
                .iter()
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        };
        if joined.is_empty() {
            NO_CHILDREN.to_string()
        } else {
            joined
        }
    }
}

//! Inbound request bodies and the validated values handlers work with.
//!
//! Bodies are deserialized leniently (every field optional, any JSON type) and
//! then validated. A field counts as present when it is truthy the way the web
//! client treats it: missing, `null`, `""`, `false` and `0` are all absent.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::ServiceError;

/// Renders a present field as text, or `None` when it is absent.
#[must_use]
pub fn field_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some("[object Object]".to_string()),
    }
}

/// Collects required fields, remembering which ones were absent.
struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    fn new() -> Self {
        Self {
            missing: Vec::new(),
        }
    }

    fn take(&mut self, name: &'static str, value: Option<&Value>) -> String {
        field_text(value).unwrap_or_else(|| {
            self.missing.push(name);
            String::new()
        })
    }

    fn finish(self) -> Result<(), ServiceError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::MissingFields(self.missing))
        }
    }
}

/// Square count to display: the explicit count when given, otherwise the
/// number of comma-separated entries in `square_numbers`.
fn square_count(explicit: Option<&Value>, square_numbers: &str) -> u32 {
    explicit
        .and_then(|v| match v {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or_else(|| {
            let entries = square_numbers
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .count();
            u32::try_from(entries).unwrap_or(u32::MAX)
        })
}

// ============================================================================
// help-agent
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct HelpRequest {
    pub message: Option<Value>,
}

impl HelpRequest {
    /// The user's message as text, when present. Non-string values such as
    /// numbers are forwarded as their JSON text.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        field_text(self.message.as_ref())
    }
}

// ============================================================================
// notify-organizer
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerNotificationRequest {
    pub organizer_email: Option<Value>,
    pub organizer_name: Option<Value>,
    pub buyer_name: Option<Value>,
    pub fundraiser_name: Option<Value>,
    pub square_numbers: Option<Value>,
    pub square_count: Option<Value>,
    pub total_amount: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizerNotice {
    pub organizer_email: String,
    pub organizer_name: Option<String>,
    pub buyer_name: String,
    pub fundraiser_name: String,
    pub square_numbers: String,
    pub square_count: u32,
    pub total_amount: String,
}

impl OrganizerNotificationRequest {
    /// # Errors
    ///
    /// Returns [`ServiceError::MissingFields`] naming every absent required field.
    pub fn validate(&self) -> Result<OrganizerNotice, ServiceError> {
        let mut required = Required::new();
        let organizer_email = required.take("organizerEmail", self.organizer_email.as_ref());
        let buyer_name = required.take("buyerName", self.buyer_name.as_ref());
        let fundraiser_name = required.take("fundraiserName", self.fundraiser_name.as_ref());
        let square_numbers = required.take("squareNumbers", self.square_numbers.as_ref());
        let total_amount = required.take("totalAmount", self.total_amount.as_ref());
        required.finish()?;

        Ok(OrganizerNotice {
            organizer_email,
            organizer_name: field_text(self.organizer_name.as_ref()),
            buyer_name,
            fundraiser_name,
            square_count: square_count(self.square_count.as_ref(), &square_numbers),
            square_numbers,
            total_amount,
        })
    }
}

// ============================================================================
// send-pending-confirmation
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingConfirmationRequest {
    pub buyer_email: Option<Value>,
    pub buyer_name: Option<Value>,
    pub fundraiser_name: Option<Value>,
    pub square_numbers: Option<Value>,
    pub square_count: Option<Value>,
    pub total_amount: Option<Value>,
    pub organizer_email: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReceipt {
    pub buyer_email: String,
    pub buyer_name: String,
    pub fundraiser_name: String,
    pub square_numbers: String,
    pub square_count: u32,
    pub total_amount: String,
    pub organizer_email: Option<String>,
}

impl PendingConfirmationRequest {
    /// # Errors
    ///
    /// Returns [`ServiceError::MissingFields`] naming every absent required field.
    pub fn validate(&self) -> Result<PendingReceipt, ServiceError> {
        let mut required = Required::new();
        let buyer_email = required.take("buyerEmail", self.buyer_email.as_ref());
        let buyer_name = required.take("buyerName", self.buyer_name.as_ref());
        let fundraiser_name = required.take("fundraiserName", self.fundraiser_name.as_ref());
        let square_numbers = required.take("squareNumbers", self.square_numbers.as_ref());
        let total_amount = required.take("totalAmount", self.total_amount.as_ref());
        required.finish()?;

        Ok(PendingReceipt {
            buyer_email,
            buyer_name,
            fundraiser_name,
            square_count: square_count(self.square_count.as_ref(), &square_numbers),
            square_numbers,
            total_amount,
            organizer_email: field_text(self.organizer_email.as_ref()),
        })
    }
}

// ============================================================================
// send-confirmation-email
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    Pending,
    AdminNotification,
    Approved,
}

impl EmailKind {
    pub const ALL: [EmailKind; 3] = [
        EmailKind::Pending,
        EmailKind::AdminNotification,
        EmailKind::Approved,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EmailKind::Pending => "pending",
            EmailKind::AdminNotification => "admin-notification",
            EmailKind::Approved => "approved",
        }
    }
}

impl fmt::Display for EmailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmailKind {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmailKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                ServiceError::InvalidRequest(
                    "Invalid emailType. Must be: pending, admin-notification, or approved"
                        .to_string(),
                )
            })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationEmailRequest {
    pub buyer_email: Option<Value>,
    pub buyer_name: Option<Value>,
    pub squares: Option<Value>,
    pub fundraiser_id: Option<Value>,
    pub email_type: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationEmail {
    pub buyer_email: String,
    pub buyer_name: String,
    pub squares: String,
    pub fundraiser_id: String,
    pub kind: EmailKind,
}

impl ConfirmationEmailRequest {
    /// # Errors
    ///
    /// Returns [`ServiceError::MissingFields`] when required fields are absent,
    /// then [`ServiceError::InvalidRequest`] for an unknown `emailType`.
    pub fn validate(&self) -> Result<ConfirmationEmail, ServiceError> {
        let mut required = Required::new();
        let buyer_email = required.take("buyerEmail", self.buyer_email.as_ref());
        let buyer_name = required.take("buyerName", self.buyer_name.as_ref());
        let squares = required.take("squares", self.squares.as_ref());
        let fundraiser_id = required.take("fundraiserId", self.fundraiser_id.as_ref());
        let email_type = required.take("emailType", self.email_type.as_ref());
        required.finish()?;

        Ok(ConfirmationEmail {
            buyer_email,
            buyer_name,
            squares,
            fundraiser_id,
            kind: email_type.parse()?,
        })
    }
}

// ============================================================================
// Fundraiser lookup
// ============================================================================

pub const DEFAULT_FUNDRAISER_TITLE: &str = "Fundraiser";
pub const DEFAULT_ORGANIZATION_NAME: &str = "Fundraiser Organizer";
pub const DEFAULT_ETRANSFER_EMAIL: &str = "payments@example.com";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";

/// Organizer details for one fundraiser, as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FundraiserProfile {
    pub title: Option<String>,
    pub organization_name: Option<String>,
    pub etransfer_email: Option<String>,
}

impl FundraiserProfile {
    #[must_use]
    pub fn title(&self) -> &str {
        non_empty(self.title.as_deref()).unwrap_or(DEFAULT_FUNDRAISER_TITLE)
    }

    #[must_use]
    pub fn organization_name(&self) -> &str {
        non_empty(self.organization_name.as_deref()).unwrap_or(DEFAULT_ORGANIZATION_NAME)
    }

    #[must_use]
    pub fn etransfer_email(&self) -> &str {
        non_empty(self.etransfer_email.as_deref()).unwrap_or(DEFAULT_ETRANSFER_EMAIL)
    }

    /// Where admin notifications go.
    #[must_use]
    pub fn admin_email(&self) -> &str {
        non_empty(self.etransfer_email.as_deref()).unwrap_or(DEFAULT_ADMIN_EMAIL)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

impl ConfirmationEmail {
    /// Admin notifications go to the organizer's payment address, everything
    /// else to the buyer.
    #[must_use]
    pub fn recipient<'a>(&'a self, profile: &'a FundraiserProfile) -> &'a str {
        match self.kind {
            EmailKind::AdminNotification => profile.admin_email(),
            EmailKind::Pending | EmailKind::Approved => &self.buyer_email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_values_are_absent() {
        for v in [json!(null), json!(""), json!(0), json!(false)] {
            assert_eq!(field_text(Some(&v)), None, "{v} should be absent");
        }
        assert_eq!(field_text(None), None);
    }

    #[test]
    fn arrays_render_comma_joined() {
        assert_eq!(field_text(Some(&json!([4, 17, "22"]))), Some("4,17,22".into()));
        assert_eq!(field_text(Some(&json!(12.5))), Some("12.5".into()));
    }

    #[test]
    fn help_message_follows_presence_rule() {
        let message = |v| HelpRequest { message: Some(v) }.message();
        assert_eq!(message(json!("hello")), Some("hello".into()));
        assert_eq!(message(json!(42)), Some("42".into()));
        assert_eq!(message(json!(0)), None);
        assert_eq!(message(json!("")), None);
        assert_eq!(HelpRequest::default().message(), None);
    }

    #[test]
    fn square_count_falls_back_to_number_list() {
        assert_eq!(square_count(None, "4, 17, 22"), 3);
        assert_eq!(square_count(Some(&json!(2)), "4, 17, 22"), 2);
        assert_eq!(square_count(Some(&json!("5")), "1"), 5);
    }
}

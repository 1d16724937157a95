//! `send-confirmation-email` function: the three-step purchase workflow
//! (pending reservation, admin notification, approval).
//!
//! The fundraiser's organizer details are looked up first so the email can
//! name the organization and its e-transfer address.

use serde_json::{Value, json};
use tracing::{error, info};

use super::{helpers, parsing};
use crate::core::config::ConfigError;
use crate::core::models::ConfirmationEmailRequest;
use crate::directory::FundraiserDirectory;
use crate::email::{
    CONFIRMATION_SENDER, EmailSender, OutgoingEmail, ReservationContext, render_confirmation,
};

/// Collaborators of the confirmation workflow.
pub struct ConfirmationServices<S, D> {
    pub sender: S,
    pub directory: D,
}

impl<S: EmailSender, D: FundraiserDirectory> ConfirmationServices<S, D> {
    #[must_use]
    pub fn new(sender: S, directory: D) -> Self {
        Self { sender, directory }
    }
}

#[tracing::instrument(level = "info", skip_all)]
pub async fn handle_confirmation_email<S: EmailSender, D: FundraiserDirectory>(
    services: Result<&ConfirmationServices<S, D>, &ConfigError>,
    event: &Value,
) -> Value {
    if parsing::is_preflight(event) {
        return helpers::preflight();
    }

    let request: ConfirmationEmailRequest = match parsing::parse_json_body(event) {
        Ok(r) => r,
        Err(e) => return helpers::error_response(&e),
    };

    #[cfg(feature = "debug-logs")]
    info!("Confirmation email request: {:?}", request);

    let confirmation = match request.validate() {
        Ok(c) => c,
        Err(e) => {
            error!("Rejecting confirmation email: {}", e);
            return helpers::error_response(&e);
        }
    };

    let services = match services {
        Ok(s) => s,
        Err(e) => return helpers::config_error_response(e),
    };

    info!(
        email_type = %confirmation.kind,
        fundraiser_id = %confirmation.fundraiser_id,
        "Composing confirmation email"
    );

    let authorization = parsing::event_header(event, "Authorization");
    let profile = match services
        .directory
        .lookup(&confirmation.fundraiser_id, authorization)
        .await
    {
        Ok(p) => p,
        Err(e) => return helpers::error_response(&e),
    };

    let context = ReservationContext {
        buyer_name: confirmation.buyer_name.clone(),
        buyer_email: confirmation.buyer_email.clone(),
        squares: confirmation.squares.clone(),
        fundraiser_title: profile.title().to_string(),
        organization_name: profile.organization_name().to_string(),
        etransfer_email: profile.etransfer_email().to_string(),
    };

    let email = OutgoingEmail::new(
        CONFIRMATION_SENDER,
        confirmation.recipient(&profile),
        render_confirmation(confirmation.kind, &context),
    );

    match services.sender.send(&email).await {
        Ok(data) => helpers::ok_json(&json!({
            "success": true,
            "data": data,
            "emailType": confirmation.kind.as_str(),
        })),
        Err(e) => helpers::error_response(&e),
    }
}

//! `notify-organizer` function: tells the organizer squares were claimed.

use serde_json::{Value, json};
use tracing::{error, info};

use super::{helpers, parsing};
use crate::core::config::ConfigError;
use crate::core::models::OrganizerNotificationRequest;
use crate::email::templates::render_organizer_notice;
use crate::email::{EmailSender, OutgoingEmail, SQUAREFUND_SENDER};

#[tracing::instrument(level = "info", skip_all)]
pub async fn handle_notify_organizer<S: EmailSender>(
    sender: Result<&S, &ConfigError>,
    event: &Value,
) -> Value {
    if parsing::is_preflight(event) {
        return helpers::preflight();
    }

    let request: OrganizerNotificationRequest = match parsing::parse_json_body(event) {
        Ok(r) => r,
        Err(e) => return helpers::error_response(&e),
    };

    #[cfg(feature = "debug-logs")]
    info!("Organizer notification request: {:?}", request);

    let notice = match request.validate() {
        Ok(n) => n,
        Err(e) => {
            error!("Rejecting organizer notification: {}", e);
            return helpers::error_response(&e);
        }
    };

    let sender = match sender {
        Ok(s) => s,
        Err(e) => return helpers::config_error_response(e),
    };

    info!(
        fundraiser = %notice.fundraiser_name,
        squares = notice.square_count,
        "Sending organizer notification"
    );

    let email = OutgoingEmail::new(
        SQUAREFUND_SENDER,
        &notice.organizer_email,
        render_organizer_notice(&notice),
    );

    match sender.send(&email).await {
        Ok(data) => helpers::ok_json(&json!({ "success": true, "data": data })),
        Err(e) => helpers::error_response(&e),
    }
}

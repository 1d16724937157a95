//! `send-pending-confirmation` function: tells the buyer their squares are
//! reserved until payment is verified.

use serde_json::{Value, json};
use tracing::{error, info};

use super::{helpers, parsing};
use crate::core::config::ConfigError;
use crate::core::models::PendingConfirmationRequest;
use crate::email::templates::render_reservation_receipt;
use crate::email::{EmailSender, OutgoingEmail, SQUAREFUND_SENDER};

#[tracing::instrument(level = "info", skip_all)]
pub async fn handle_pending_confirmation<S: EmailSender>(
    sender: Result<&S, &ConfigError>,
    event: &Value,
) -> Value {
    if parsing::is_preflight(event) {
        return helpers::preflight();
    }

    let request: PendingConfirmationRequest = match parsing::parse_json_body(event) {
        Ok(r) => r,
        Err(e) => return helpers::error_response(&e),
    };

    #[cfg(feature = "debug-logs")]
    info!("Pending confirmation request: {:?}", request);

    let receipt = match request.validate() {
        Ok(r) => r,
        Err(e) => {
            error!("Rejecting pending confirmation: {}", e);
            return helpers::error_response(&e);
        }
    };

    let sender = match sender {
        Ok(s) => s,
        Err(e) => return helpers::config_error_response(e),
    };

    info!(
        fundraiser = %receipt.fundraiser_name,
        squares = receipt.square_count,
        "Sending pending confirmation"
    );

    let email = OutgoingEmail::new(
        SQUAREFUND_SENDER,
        &receipt.buyer_email,
        render_reservation_receipt(&receipt),
    );

    match sender.send(&email).await {
        Ok(data) => helpers::ok_json(&json!({ "success": true, "data": data })),
        Err(e) => helpers::error_response(&e),
    }
}

//! `help-agent` function: chat replies from the SquareFund concierge.

use serde_json::{Value, json};
use tracing::{error, info};

use super::{helpers, parsing};
use crate::ai::{ChatModel, HelpAgent};
use crate::core::config::ConfigError;
use crate::core::models::HelpRequest;

/// Handles one help-agent invocation.
///
/// Always answers; failures become JSON error bodies. A model that keeps
/// answering with error statuses still yields a 200 carrying the fallback
/// apology.
#[tracing::instrument(level = "info", skip_all)]
pub async fn handle_help_request<M: ChatModel>(
    agent: Result<&HelpAgent<M>, &ConfigError>,
    event: &Value,
) -> Value {
    if parsing::is_preflight(event) {
        return helpers::preflight();
    }

    let request: HelpRequest = match parsing::parse_json_body(event) {
        Ok(r) => r,
        Err(e) => {
            error!("Failed to parse help request: {}", e);
            return helpers::error_response(&e);
        }
    };

    #[cfg(feature = "debug-logs")]
    info!("Help request body: {:?}", request);

    let Some(message) = request.message() else {
        return helpers::err_response(400, "Message is required");
    };

    let agent = match agent {
        Ok(agent) => agent,
        Err(e) => {
            error!("{} is not set: {}", e.var(), e);
            return helpers::err_response(500, "API configuration error");
        }
    };

    info!(message_length = message.len(), "Generating help reply");

    match agent.reply(&message).await {
        Ok(reply) => helpers::ok_json(&json!({ "response": reply })),
        Err(e) => {
            error!("Error in help agent: {}", e);
            helpers::json_response(
                500,
                &json!({ "error": "Failed to process request", "details": e.to_string() }),
            )
        }
    }
}

//! Common helper functions for API handlers.
//!
//! Every function answers in the API Gateway proxy shape
//! (`statusCode`, `headers`, `body`) with permissive CORS headers so the web
//! client can call it directly.

use serde_json::{Value, json};
use tracing::error;

use crate::core::config::ConfigError;
use crate::errors::ServiceError;

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

fn headers(json_body: bool) -> Value {
    let mut headers = json!({
        "Access-Control-Allow-Origin": CORS_ALLOW_ORIGIN,
        "Access-Control-Allow-Headers": CORS_ALLOW_HEADERS,
    });
    if json_body {
        headers["Content-Type"] = Value::String("application/json".to_string());
    }
    headers
}

/// Answer to a CORS preflight request.
#[must_use]
pub fn preflight() -> Value {
    json!({
        "statusCode": 200,
        "headers": headers(false),
        "body": "ok"
    })
}

#[must_use]
pub fn json_response(status_code: u16, body: &Value) -> Value {
    json!({
        "statusCode": status_code,
        "headers": headers(true),
        "body": body.to_string()
    })
}

#[must_use]
pub fn ok_json(body: &Value) -> Value {
    json_response(200, body)
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json_response(status_code, &json!({ "error": message }))
}

#[must_use]
pub fn err_with_details(status_code: u16, message: &str, details: &Value) -> Value {
    json_response(status_code, &json!({ "error": message, "details": details }))
}

/// Converts an error that reached a handler boundary into its response.
#[must_use]
pub fn error_response(err: &ServiceError) -> Value {
    let status = err.status_code();
    match err {
        ServiceError::MissingFields(fields) => json_response(
            status,
            &json!({ "error": err.to_string(), "missingFields": fields }),
        ),
        ServiceError::NotFound { details } => err_with_details(status, &err.to_string(), details),
        ServiceError::EmailRejected { details, .. } => {
            err_with_details(status, &err.to_string(), details)
        }
        ServiceError::Configuration(config) => config_error_response(config),
        _ => err_response(status, &err.to_string()),
    }
}

/// 500 naming the missing or invalid setting, e.g. `RESEND_API_KEY not configured`.
#[must_use]
pub fn config_error_response(err: &ConfigError) -> Value {
    error!("Configuration error: {}", err);
    err_response(500, &err.to_string())
}

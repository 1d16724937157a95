/// SquareFund - serverless functions behind the SquareFund fundraising boards.
///
/// Each function is its own AWS Lambda binary:
/// 1. `help-agent` answers chat questions through Gemini, retrying with
///    exponential backoff and falling back to an apology when the model stays
///    unavailable
/// 2. `notify-organizer` emails the organizer when squares are claimed
/// 3. `send-pending-confirmation` emails the buyer that squares are reserved
/// 4. `send-confirmation-email` runs the pending / admin-notification /
///    approved workflow, looking up organizer details in Supabase first
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda for serverless execution
/// - reqwest for the Gemini, Resend and Supabase REST calls
/// - Tokio for async runtime and the timers between retries
///
/// # Example
///
/// ```no_run
/// use squarefund::ai::{GeminiClient, HelpAgent};
/// use squarefund::core::config::GeminiConfig;
/// use squarefund::core::{RetryCaller, RetryPolicy};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     squarefund::setup_logging();
///
///     let config = GeminiConfig::from_env()?;
///     let model = GeminiClient::new(squarefund::core::http_client(), &config)?;
///     let agent = HelpAgent::new(model, RetryCaller::new(RetryPolicy::default()));
///
///     println!("{}", agent.reply("How do I approve a payment?").await?);
///     Ok(())
/// }
/// ```
// Module declarations
pub mod ai;
pub mod api;
pub mod core;
pub mod directory;
pub mod email;
pub mod errors;

pub use errors::ServiceError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration, filtered by `RUST_LOG` (default `info`).
/// Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// squarefund::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

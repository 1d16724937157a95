use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;
use squarefund::ai::{GeminiClient, HelpAgent};
use squarefund::api::handle_help_request;
use squarefund::core::config::GeminiConfig;
use squarefund::core::{RetryCaller, RetryPolicy, http_client};
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    squarefund::setup_logging();

    // A missing key is reported on every request instead of crash-looping the function.
    let agent = match GeminiConfig::from_env() {
        Ok(config) => Ok(HelpAgent::new(
            GeminiClient::new(http_client(), &config)?,
            RetryCaller::new(RetryPolicy::default()),
        )),
        Err(e) => {
            error!("Config error: {}", e);
            Err(e)
        }
    };
    let agent = &agent;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<Value, Error>(handle_help_request(agent.as_ref(), &event.payload).await)
    }))
    .await
}

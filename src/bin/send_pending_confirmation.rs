use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;
use squarefund::api::handle_pending_confirmation;
use squarefund::core::config::ResendConfig;
use squarefund::core::http_client;
use squarefund::email::ResendClient;
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    squarefund::setup_logging();

    let sender = match ResendConfig::from_env() {
        Ok(config) => Ok(ResendClient::new(http_client(), &config)?),
        Err(e) => {
            error!("Config error: {}", e);
            Err(e)
        }
    };
    let sender = &sender;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<Value, Error>(handle_pending_confirmation(sender.as_ref(), &event.payload).await)
    }))
    .await
}

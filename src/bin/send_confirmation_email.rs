use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;
use squarefund::api::{ConfirmationServices, handle_confirmation_email};
use squarefund::core::config::{ConfigError, ResendConfig, SupabaseConfig};
use squarefund::core::http_client;
use squarefund::directory::SupabaseDirectory;
use squarefund::email::ResendClient;
use tracing::error;

type Services = ConfirmationServices<ResendClient, SupabaseDirectory>;

fn build_services() -> Result<Result<Services, ConfigError>, Error> {
    let (resend, supabase) = match (ResendConfig::from_env(), SupabaseConfig::from_env()) {
        (Ok(resend), Ok(supabase)) => (resend, supabase),
        (Err(e), _) | (_, Err(e)) => return Ok(Err(e)),
    };

    let http = http_client();
    Ok(Ok(ConfirmationServices::new(
        ResendClient::new(http.clone(), &resend)?,
        SupabaseDirectory::new(http, &supabase)?,
    )))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    squarefund::setup_logging();

    let services = build_services()?;
    if let Err(e) = &services {
        error!("Config error: {}", e);
    }
    let services = &services;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<Value, Error>(handle_confirmation_email(services.as_ref(), &event.payload).await)
    }))
    .await
}
